//! Default timed test execution.
//!
//! Every test invocation runs on its own tokio task so that a panicking
//! assertion is caught at the join boundary instead of unwinding through the
//! orchestrator, and so a per-test timeout can cancel the wait for one test
//! without cancelling the run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::{JoinError, JoinSet};

use crate::interfaces::{RunError, TestExecutor, TestMethodExecutor, TestReporter};
use crate::reporter::Outcome;
use crate::suite::{CaseResult, HookFn, SceneHandle, TestCase, TestSuite};

/// Default method executor: drives the case's registered future.
pub struct DefaultTestMethodExecutor;

#[async_trait]
impl TestMethodExecutor for DefaultTestMethodExecutor {
    async fn invoke(&self, scene: SceneHandle, case: TestCase) -> CaseResult {
        case.future(scene).await
    }
}

/// Execution policies shared with per-suite tasks.
struct ExecutorInner {
    method_executor: Arc<dyn TestMethodExecutor>,
    stop_on_error: bool,
    timeout: Duration,
}

/// Built-in executor.
///
/// - `sequential=true`: suites and tests run one at a time in declaration
///   order.
/// - `sequential=false`: one task per suite; tests within a suite stay
///   ordered. The reporter is the single shared mutation point.
/// - `stop_on_error` is a cooperative abort flag checked between tests:
///   in-flight tests are awaited, not-yet-started tests are skipped.
/// - `cleanup_all` hooks fire exactly once per started suite after all
///   suites finish, pass or fail.
/// - A panicking hook is caught at a task boundary and logged; it never
///   unwinds through the run or skips another suite's cleanup.
pub struct DefaultTestExecutor {
    inner: Arc<ExecutorInner>,
    sequential: bool,
}

impl DefaultTestExecutor {
    pub fn new(
        method_executor: Arc<dyn TestMethodExecutor>,
        stop_on_error: bool,
        sequential: bool,
        timeout_ms: u64,
    ) -> Self {
        Self {
            inner: Arc::new(ExecutorInner {
                method_executor,
                stop_on_error,
                timeout: Duration::from_millis(timeout_ms),
            }),
            sequential,
        }
    }
}

#[async_trait]
impl TestExecutor for DefaultTestExecutor {
    async fn run(
        &self,
        scene: SceneHandle,
        suites: Vec<TestSuite>,
        reporter: Arc<dyn TestReporter>,
    ) -> Result<(), RunError> {
        let abort = Arc::new(AtomicBool::new(false));
        // Per suite: did setup_all run, i.e. does cleanup_all apply.
        let mut started = vec![false; suites.len()];
        let mut fault: Option<RunError> = None;

        if self.sequential {
            for (index, suite) in suites.iter().enumerate() {
                started[index] = run_suite(
                    Arc::clone(&self.inner),
                    scene.clone(),
                    suite.clone(),
                    Arc::clone(&reporter),
                    Arc::clone(&abort),
                )
                .await;
            }
        } else {
            let mut tasks = JoinSet::new();
            for (index, suite) in suites.iter().enumerate() {
                let inner = Arc::clone(&self.inner);
                let scene = scene.clone();
                let suite = suite.clone();
                let reporter = Arc::clone(&reporter);
                let abort = Arc::clone(&abort);
                tasks.spawn(async move {
                    (index, run_suite(inner, scene, suite, reporter, abort).await)
                });
            }
            // Drain every join result before cleanup: a failed suite task
            // must not skip cleanup_all for the suites that did start.
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((index, did_start)) => started[index] = did_start,
                    Err(error) => {
                        if fault.is_none() {
                            fault =
                                Some(RunError::Execution(format!("suite task failed: {error}")));
                        }
                    }
                }
            }
        }

        // All execution is done; fire cleanup_all once per started suite.
        for (suite, did_start) in suites.iter().zip(started) {
            if did_start {
                if let Some(hook) = suite.cleanup_all() {
                    tracing::debug!(suite = %suite.name(), "running cleanup_all hook");
                    run_hook(hook, scene.clone(), suite.name(), "cleanup_all").await;
                }
            }
        }

        match fault {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Hooks run on their own task: a panicking hook is logged and the run
/// continues, keeping the cleanup guarantee intact.
async fn run_hook(hook: &HookFn, scene: SceneHandle, suite_name: &str, hook_name: &'static str) {
    if let Err(error) = tokio::spawn(hook(scene)).await {
        tracing::warn!(suite = %suite_name, hook = hook_name, %error, "hook panicked");
    }
}

/// Run one suite's tests in order. Returns whether the suite started (its
/// `setup_all` ran), which decides whether `cleanup_all` applies.
async fn run_suite(
    inner: Arc<ExecutorInner>,
    scene: SceneHandle,
    suite: TestSuite,
    reporter: Arc<dyn TestReporter>,
    abort: Arc<AtomicBool>,
) -> bool {
    let mut started = false;
    for case in suite.cases() {
        if inner.stop_on_error && abort.load(Ordering::SeqCst) {
            break;
        }
        if !started {
            tracing::debug!(suite = %suite.name(), "starting test suite");
            if let Some(hook) = suite.setup_all() {
                run_hook(hook, scene.clone(), suite.name(), "setup_all").await;
            }
            started = true;
        }
        if let Some(hook) = suite.setup() {
            run_hook(hook, scene.clone(), suite.name(), "setup").await;
        }

        let outcome = run_case(&inner, scene.clone(), suite.name(), case).await;
        if inner.stop_on_error && outcome.is_failure() {
            abort.store(true, Ordering::SeqCst);
        }
        reporter.record_outcome(outcome);

        if let Some(hook) = suite.cleanup() {
            run_hook(hook, scene.clone(), suite.name(), "cleanup").await;
        }
    }
    started
}

/// Invoke one test method on its own task, bounded by the per-test timeout.
async fn run_case(
    inner: &ExecutorInner,
    scene: SceneHandle,
    suite_name: &str,
    case: &TestCase,
) -> Outcome {
    let method_executor = Arc::clone(&inner.method_executor);
    let owned_case = case.clone();
    let mut handle = tokio::spawn(async move { method_executor.invoke(scene, owned_case).await });

    match tokio::time::timeout(inner.timeout, &mut handle).await {
        Ok(Ok(Ok(()))) => Outcome::passed(suite_name, case.name()),
        Ok(Ok(Err(failure))) => Outcome::failed(suite_name, case.name(), failure.message),
        Ok(Err(join_error)) => {
            Outcome::failed(suite_name, case.name(), panic_diagnostic(join_error))
        }
        Err(_elapsed) => {
            handle.abort();
            Outcome::failed(
                suite_name,
                case.name(),
                format!("timed out after {} ms", inner.timeout.as_millis()),
            )
        }
    }
}

fn panic_diagnostic(error: JoinError) -> String {
    if !error.is_panic() {
        return "test task was cancelled".to_string();
    }
    let payload = error.into_panic();
    if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<&'static str>() {
        format!("panicked: {message}")
    } else {
        "panicked with a non-string payload".to_string()
    }
}
