use serde::{Deserialize, Serialize};

use crate::scim::ScimResourceType;

/// Core schema selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    /// Resource type whose core attributes are recognized.
    #[serde(default)]
    pub resource: ScimResourceType,

    /// Override for the core schema URN used as the attribute prefix.
    /// Defaults to the SCIM 2.0 URN of `resource`.
    #[serde(default)]
    pub core_urn: Option<String>,
}

impl SchemaConfig {
    /// The core schema URN attribute tokens are matched against.
    pub fn core_schema_urn(&self) -> &str {
        self.core_urn
            .as_deref()
            .unwrap_or_else(|| self.resource.core_schema_urn())
    }

    pub fn validate(&self) -> Result<(), String> {
        let Some(urn) = &self.core_urn else {
            return Ok(());
        };

        if urn.trim().is_empty() {
            return Err("schema.core_urn must not be empty".into());
        }
        if urn.ends_with(':') || urn.ends_with('.') {
            return Err(format!(
                "schema.core_urn '{urn}' must not end with a field separator"
            ));
        }

        Ok(())
    }
}
