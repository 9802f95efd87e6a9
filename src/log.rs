//! Default logging sink backed by `tracing`.

use crate::interfaces::Log;

/// Forwards formatted progress text to the `tracing` macros, so hosts that
/// already run a subscriber get test output alongside their own events.
pub struct TracingLog;

impl Log for TracingLog {
    fn info(&self, message: &str) {
        tracing::info!(target: "testbed", "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "testbed", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "testbed", "{message}");
    }
}
