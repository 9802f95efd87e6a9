//! Top-level orchestration: wiring, exit codes, and listener lifecycle.
//!
//! [`TestRunner`] is the per-process configuration object: it owns the
//! adapter, the exit callbacks, the per-test timeout, and the execution
//! policies. There is no process-wide mutable runner state; tests and hosts
//! that need different behavior construct their own runner, so nothing leaks
//! between runs.

use std::sync::Arc;

use crate::adapter::DefaultTestAdapter;
use crate::environment::TestEnvironment;
use crate::executor::DefaultTestMethodExecutor;
use crate::interfaces::{Log, RunError, TestAdapter, TestMethodExecutor};
use crate::suite::{SceneHandle, TestModule};
use crate::trace::{ListenerGuard, LogTraceListener};

/// Default per-test timeout.
pub const DEFAULT_TIMEOUT_MILLISECONDS: u64 = 10_000;

/// Exit dispatch callback: receives the scene handle and the computed code.
pub type ExitCallback = Arc<dyn Fn(&SceneHandle, i32) + Send + Sync>;

/// Default exit behavior: terminate the process with the computed code.
/// Hosts with their own shutdown sequence substitute [`TestRunner::on_exit`].
fn default_on_exit(_scene: &SceneHandle, code: i32) {
    std::process::exit(code);
}

/// Default force-exit behavior: immediate termination, bypassing any normal
/// shutdown ordering, so coverage tooling can flush on its own terms.
fn default_on_force_exit(_scene: &SceneHandle, code: i32) {
    std::process::exit(code);
}

/// The orchestrator.
///
/// State machine per run: Idle → EnvironmentResolved → (NoOp | Running) →
/// Finished. Transitions are strictly sequential; exit-code computation never
/// begins before the executor's completion is observed.
pub struct TestRunner {
    adapter: Arc<dyn TestAdapter>,
    on_exit: ExitCallback,
    on_force_exit: ExitCallback,
    timeout_ms: u64,
    stop_on_error: bool,
    sequential: bool,
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRunner {
    pub fn new() -> Self {
        Self {
            adapter: Arc::new(DefaultTestAdapter),
            on_exit: Arc::new(default_on_exit),
            on_force_exit: Arc::new(default_on_force_exit),
            timeout_ms: DEFAULT_TIMEOUT_MILLISECONDS,
            stop_on_error: false,
            sequential: true,
        }
    }

    /// Substitute the collaborator factory.
    pub fn adapter(mut self, adapter: Arc<dyn TestAdapter>) -> Self {
        self.adapter = adapter;
        self
    }

    /// Substitute the normal exit callback.
    pub fn on_exit<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SceneHandle, i32) + Send + Sync + 'static,
    {
        self.on_exit = Arc::new(callback);
        self
    }

    /// Substitute the force-exit callback used in coverage mode.
    pub fn on_force_exit<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SceneHandle, i32) + Send + Sync + 'static,
    {
        self.on_force_exit = Arc::new(callback);
        self
    }

    /// Override the per-test timeout for runs started from this runner.
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Abort remaining tests as soon as one failure is recorded.
    pub fn stop_on_error(mut self, stop_on_error: bool) -> Self {
        self.stop_on_error = stop_on_error;
        self
    }

    /// Run suites one at a time (default) or concurrently.
    pub fn sequential(mut self, sequential: bool) -> Self {
        self.sequential = sequential;
        self
    }

    /// Run tests with the default method executor.
    pub async fn run_tests(
        &self,
        module: &TestModule,
        scene: SceneHandle,
        env: TestEnvironment,
        sink: Arc<dyn Log>,
    ) -> Result<(), RunError> {
        self.run_tests_with(module, scene, env, sink, None).await
    }

    /// Run tests, optionally injecting the method-executor capability.
    ///
    /// If the environment carries no run pattern this is a no-op: no
    /// collaborators are constructed and no exit callback fires. Otherwise
    /// the run completes, the diagnostic listener (if any) is removed, and
    /// when `should_quit_on_finish` is set the exit callback receives `1` if
    /// any test failed, `0` otherwise. Coverage mode routes the code through
    /// the force-exit callback instead.
    ///
    /// Discovery or execution faults propagate as [`RunError`]; they are
    /// never turned into exit codes.
    pub async fn run_tests_with(
        &self,
        module: &TestModule,
        scene: SceneHandle,
        env: TestEnvironment,
        sink: Arc<dyn Log>,
        method_executor: Option<Arc<dyn TestMethodExecutor>>,
    ) -> Result<(), RunError> {
        let env = self.adapter.create_test_environment(env);
        let Some(pattern) = env.run_pattern.clone() else {
            return Ok(());
        };

        let log = self.adapter.create_log(sink);
        let provider = self.adapter.create_provider();
        let reporter = self.adapter.create_reporter(Arc::clone(&log));
        let method_executor =
            method_executor.unwrap_or_else(|| Arc::new(DefaultTestMethodExecutor));
        let executor = self.adapter.create_executor(
            method_executor,
            self.stop_on_error,
            self.sequential,
            self.timeout_ms,
        );

        // Guard drops on every path below, including the `?` propagation.
        let listener = env.attach_diagnostic_listener.then(|| {
            tracing::debug!("installing diagnostic listener");
            ListenerGuard::install(Arc::new(LogTraceListener::new(Arc::clone(&log))))
        });

        let suites = provider.suites_by_pattern(module, &pattern)?;
        tracing::debug!(pattern = %pattern, suites = suites.len(), "discovered test suites");

        executor
            .run(scene.clone(), suites, Arc::clone(&reporter))
            .await?;

        reporter.summarize();
        let exit_code = i32::from(reporter.had_error());

        // Listener must be gone before any termination dispatch.
        drop(listener);

        if env.should_quit_on_finish {
            tracing::debug!(exit_code, coverage = env.coverage_mode, "dispatching exit");
            if env.coverage_mode {
                (self.on_force_exit)(&scene, exit_code);
            } else {
                (self.on_exit)(&scene, exit_code);
            }
        }
        Ok(())
    }
}
