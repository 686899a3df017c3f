use serde::{Deserialize, Serialize};

/// `[observability]` section. Only logging is configurable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(default, deny_unknown_fields)]
pub struct ObservabilityConfig {
    pub logging: LoggingConfig,
}

/// `[observability.logging]`: how the CLI renders `tracing` events on stderr.
///
/// Library callers install their own subscriber and ignore this section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum level when neither `RUST_LOG` nor `directives` says otherwise.
    pub level: LogLevel,
    pub format: LogFormat,
    /// Prefix each event with the wall-clock time.
    pub timestamps: bool,
    /// Append the source location of each event.
    pub source_location: bool,
    /// Extra `EnvFilter` directives, e.g. `scim_fields::deprecation=off`.
    pub directives: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            timestamps: true,
            source_location: false,
            directives: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive spelling understood by `EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Event layout on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, for reading in a terminal
    Pretty,
    #[default]
    Compact,
    /// One JSON object per line
    Json,
}
