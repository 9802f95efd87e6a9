//! Orchestrator I/O boundary interfaces
//!
//! This module defines trait-based abstractions for the key orchestration
//! operations:
//! - Suite discovery (module registry scan by name pattern)
//! - Test execution (timed, optionally concurrent invocation + outcome capture)
//! - Outcome reporting (aggregation + formatted progress output)
//! - Collaborator construction (the adapter factory seam)
//!
//! The orchestrator depends only on these traits, never on the concrete
//! types, so hosts and tests can substitute every collaborator with a fake.
//! Default implementations preserve the built-in behavior.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::environment::TestEnvironment;
use crate::reporter::Outcome;
use crate::suite::{CaseResult, SceneHandle, TestCase, TestModule, TestSuite};

/// Infrastructure faults in the orchestrator's own machinery.
///
/// These are a distinct, fatal category from "tests ran and some failed":
/// they propagate to the caller of the top-level run operation and are never
/// converted into exit codes.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("suite discovery failed: {0}")]
    Discovery(String),

    #[error("test execution failed: {0}")]
    Execution(String),
}

// ============================================================================
// Logging sink
// ============================================================================

/// Sink for formatted progress and summary text.
///
/// The reporter owns message formatting; the sink owns the transport.
pub trait Log: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

// ============================================================================
// Suite discovery
// ============================================================================

/// Discover test suites in a module registry by name pattern.
///
/// Returns an empty vec rather than failing when nothing matches. The
/// built-in provider never errors for a well-formed module; substituted
/// back-ends surface discovery faults as [`RunError::Discovery`], which the
/// orchestrator propagates instead of converting into an exit code.
pub trait TestProvider: Send + Sync {
    fn suites_by_pattern(
        &self,
        module: &TestModule,
        pattern: &str,
    ) -> Result<Vec<TestSuite>, RunError>;
}

// ============================================================================
// Outcome reporting
// ============================================================================

/// Aggregates per-test outcomes for one run.
///
/// A reporter instance is single-use: created per run, written by the
/// executor (possibly from concurrent tasks), read once by the orchestrator
/// after the run completes. `had_error` is monotonic — once true it stays
/// true for the remainder of the run.
pub trait TestReporter: Send + Sync {
    /// Record one test outcome. Called exactly once per executed test.
    fn record_outcome(&self, outcome: Outcome);

    /// True iff at least one recorded outcome is a failure.
    fn had_error(&self) -> bool;

    /// Called once by the orchestrator after the executor completes.
    fn summarize(&self) {}
}

// ============================================================================
// Method execution capability
// ============================================================================

/// Capability that invokes one test method and reports its result.
///
/// Injected by the caller of the top-level run operation; the default
/// implementation simply drives the case's registered future.
#[async_trait]
pub trait TestMethodExecutor: Send + Sync {
    async fn invoke(&self, scene: SceneHandle, case: TestCase) -> CaseResult;
}

// ============================================================================
// Test execution
// ============================================================================

/// Runs discovered suites against the host scene, feeding the reporter.
///
/// Execution policies (timeout, stop-on-error, sequential) are construction
/// parameters supplied through [`TestAdapter::create_executor`].
#[async_trait]
pub trait TestExecutor: Send + Sync {
    async fn run(
        &self,
        scene: SceneHandle,
        suites: Vec<TestSuite>,
        reporter: Arc<dyn TestReporter>,
    ) -> Result<(), RunError>;
}

// ============================================================================
// Adapter (factory seam)
// ============================================================================

/// Factory seam producing all per-run collaborator objects.
///
/// The sole extension point of the orchestrator: substituting an adapter on a
/// [`TestRunner`] replaces environment resolution, discovery, execution, and
/// reporting wholesale without touching orchestrator logic.
///
/// [`TestRunner`]: crate::runner::TestRunner
pub trait TestAdapter: Send + Sync {
    /// Resolve the environment for this run. Defaults to a pass-through.
    fn create_test_environment(&self, env: TestEnvironment) -> TestEnvironment {
        env
    }

    /// Wrap or replace the injected logging sink. Defaults to a pass-through.
    fn create_log(&self, sink: Arc<dyn Log>) -> Arc<dyn Log> {
        sink
    }

    fn create_provider(&self) -> Arc<dyn TestProvider>;

    fn create_reporter(&self, log: Arc<dyn Log>) -> Arc<dyn TestReporter>;

    fn create_executor(
        &self,
        method_executor: Arc<dyn TestMethodExecutor>,
        stop_on_error: bool,
        sequential: bool,
        timeout_ms: u64,
    ) -> Arc<dyn TestExecutor>;
}
