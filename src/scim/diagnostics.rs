//! Deprecation notices emitted while resolving filter attributes.

use parking_lot::Mutex;

/// Receiver for non-fatal notices, such as use of the legacy period
/// separator in an extension attribute.
///
/// Sinks cannot fail; a notice never turns into a filter error.
pub trait DiagnosticSink {
    fn warn(&self, message: &str);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&str),
{
    fn warn(&self, message: &str) {
        self(message)
    }
}

/// Emits notices as `tracing` warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "scim_fields::deprecation", "{}", message);
    }
}

/// Discards notices.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn warn(&self, _message: &str) {}
}

/// Collects notices in memory.
///
/// Useful for callers that return deprecation warnings alongside a response,
/// and for asserting on emitted notices in tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the notices received so far, in arrival order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    /// Remove and return all collected notices.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock())
    }
}

impl DiagnosticSink for RecordingSink {
    fn warn(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}
