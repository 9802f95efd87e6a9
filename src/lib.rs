#![forbid(unsafe_code)]
//! Embeddable test-execution orchestrator for host applications.
//!
//! The host hands this crate an argument list, a module registry of test
//! suites, and an opaque scene handle; the orchestrator discovers suites by
//! name pattern, runs them under a per-test timeout, aggregates pass/fail
//! outcomes, and dispatches an exit code through substitutable callbacks.
//!
//! ```no_run
//! use std::sync::Arc;
//! use testbed::{SceneHandle, TestEnvironment, TestModule, TestRunner, TestSuite, TracingLog};
//!
//! # async fn run(host_args: Vec<String>) -> Result<(), testbed::RunError> {
//! let module = TestModule::builder()
//!     .suite(
//!         TestSuite::builder("InventoryTest")
//!             .case("starts_empty", |_scene| async { Ok(()) })
//!             .build(),
//!     )
//!     .build();
//!
//! TestRunner::new()
//!     .run_tests(
//!         &module,
//!         SceneHandle::new(()),
//!         TestEnvironment::from_args(&host_args),
//!         Arc::new(TracingLog),
//!     )
//!     .await
//! # }
//! ```
//!
//! Activation is opt-in: without `--run-tests=<pattern>` in the arguments the
//! whole pipeline is inert, so the call can stay in the host's startup path.
//!
//! ## Panic Policy
//!
//! Production code propagates errors with `Result` and `?`. Panics inside
//! *user test cases* are expected (failed assertions) and are caught at a
//! task-join boundary, recorded as failing outcomes. `.expect()` appears only
//! for true invariants, with an `INVARIANT:` message.

pub mod adapter;
pub mod environment;
pub mod executor;
pub mod interfaces;
pub mod log;
pub mod provider;
pub mod reporter;
pub mod runner;
pub mod suite;
pub mod trace;

pub use adapter::DefaultTestAdapter;
pub use environment::TestEnvironment;
pub use executor::{DefaultTestExecutor, DefaultTestMethodExecutor};
pub use interfaces::{
    Log, RunError, TestAdapter, TestExecutor, TestMethodExecutor, TestProvider, TestReporter,
};
pub use log::TracingLog;
pub use provider::DefaultTestProvider;
pub use reporter::{DefaultTestReporter, Outcome, OutcomeStatus};
pub use runner::{DEFAULT_TIMEOUT_MILLISECONDS, ExitCallback, TestRunner};
pub use suite::{
    CaseFuture, CaseResult, SceneHandle, TestCase, TestFailure, TestModule, TestModuleBuilder,
    TestSuite, TestSuiteBuilder,
};
