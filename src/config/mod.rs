//! TOML configuration for the resolver and its CLI.
//!
//! Every section is optional. `${NAME}` is replaced with the value of the
//! environment variable `NAME` before parsing, except after a `#`.
//!
//! ```toml
//! [schema]
//! resource = "group"
//! core_urn = "${SCIM_CORE_URN}"
//!
//! [filter]
//! max_length = 2048
//!
//! [observability.logging]
//! format = "json"
//! ```

mod observability;
mod schema;

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

pub use observability::*;
pub use schema::*;

use crate::scim::FilterLimits;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(default, deny_unknown_fields)]
pub struct ScimFieldsConfig {
    /// Which core schema attribute tokens resolve against.
    pub schema: SchemaConfig,
    /// Filter parsing limits.
    pub filter: FilterLimits,
    pub observability: ObservabilityConfig,
}

impl ScimFieldsConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e, path.into()))?;
        Self::from_str(&text)
    }

    /// Expand `${NAME}` references, parse, then validate.
    pub fn from_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(&expand_env_vars(text)?)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("filter.max_length", self.filter.max_length),
            ("filter.max_depth", self.filter.max_depth),
        ] {
            if value == 0 {
                return Err(ConfigError::Validation(format!("{key} must be at least 1")));
            }
        }
        self.schema.validate().map_err(ConfigError::Validation)
    }

    #[cfg(feature = "json-schema")]
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ScimFieldsConfig)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {1}: {0}")]
    Io(std::io::Error, PathBuf),

    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Environment variable {0} is not set")]
    EnvVarNotFound(String),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex"));

fn expand_env_vars(text: &str) -> Result<String, ConfigError> {
    let mut expanded = String::with_capacity(text.len());

    for line in text.split_inclusive('\n') {
        let (body, comment) = line.split_at(line.find('#').unwrap_or(line.len()));

        let mut missing = None;
        let body = ENV_VAR_PATTERN.replace_all(body, |caps: &Captures<'_>| {
            std::env::var(&caps[1]).unwrap_or_else(|_| {
                missing.get_or_insert_with(|| caps[1].to_string());
                String::new()
            })
        });
        if let Some(name) = missing {
            return Err(ConfigError::EnvVarNotFound(name));
        }

        expanded.push_str(&body);
        expanded.push_str(comment);
    }

    Ok(expanded)
}
