//! Default collaborator factory.

use std::sync::Arc;

use crate::executor::DefaultTestExecutor;
use crate::interfaces::{
    Log, TestAdapter, TestExecutor, TestMethodExecutor, TestProvider, TestReporter,
};
use crate::provider::DefaultTestProvider;
use crate::reporter::DefaultTestReporter;

/// Constructs the built-in provider, reporter, and executor. Environment and
/// sink pass through unchanged (the trait's defaults).
pub struct DefaultTestAdapter;

impl TestAdapter for DefaultTestAdapter {
    fn create_provider(&self) -> Arc<dyn TestProvider> {
        Arc::new(DefaultTestProvider)
    }

    fn create_reporter(&self, log: Arc<dyn Log>) -> Arc<dyn TestReporter> {
        Arc::new(DefaultTestReporter::new(log))
    }

    fn create_executor(
        &self,
        method_executor: Arc<dyn TestMethodExecutor>,
        stop_on_error: bool,
        sequential: bool,
        timeout_ms: u64,
    ) -> Arc<dyn TestExecutor> {
        Arc::new(DefaultTestExecutor::new(
            method_executor,
            stop_on_error,
            sequential,
            timeout_ms,
        ))
    }
}
