//! Observability module providing structured logging.
//!
//! Installs the `tracing` subscriber used by the command-line front end.
//! Library code only emits events; embedding applications bring their own
//! subscriber.

mod tracing_init;

pub use tracing_init::*;
