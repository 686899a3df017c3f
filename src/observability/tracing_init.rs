//! Subscriber setup for the command-line front end.

use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, Layer, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber described by `logging`.
///
/// Events go to stderr so that command output on stdout stays parseable.
pub fn init_tracing(logging: &LoggingConfig) -> Result<(), TracingError> {
    tracing_subscriber::registry()
        .with(build_env_filter(logging))
        .with(stderr_layer(logging))
        .try_init()
        .map_err(|e| TracingError::Init(e.to_string()))
}

fn stderr_layer<S>(logging: &LoggingConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(logging.source_location)
        .with_line_number(logging.source_location);

    match (logging.format, logging.timestamps) {
        (LogFormat::Pretty, true) => layer.pretty().boxed(),
        (LogFormat::Pretty, false) => layer.pretty().without_time().boxed(),
        (LogFormat::Compact, true) => layer.compact().boxed(),
        (LogFormat::Compact, false) => layer.compact().without_time().boxed(),
        (LogFormat::Json, true) => layer.json().boxed(),
        (LogFormat::Json, false) => layer.json().without_time().boxed(),
    }
}

/// `RUST_LOG` wins; otherwise the configured level plus any extra directives.
/// Unparseable directives fall back to the bare level.
fn build_env_filter(logging: &LoggingConfig) -> EnvFilter {
    let level = logging.level.as_str();
    let directives = std::env::var("RUST_LOG")
        .ok()
        .or_else(|| logging.directives.as_ref().map(|extra| format!("{level},{extra}")));

    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(level))
}

/// Tracing initialization errors.
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Failed to initialize tracing: {0}")]
    Init(String),
}
