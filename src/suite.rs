//! Test suites, test cases, and the module registry.
//!
//! The orchestrator never constructs suites itself: hosts register them on a
//! [`TestModule`] through the builder API at module-load time, and the suite
//! provider discovers them from there by name pattern. This keeps discovery
//! explicit — no runtime type introspection is involved.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;

// ============================================================================
// Scene handle
// ============================================================================

/// Opaque handle to the host object a test run executes against (a scene
/// root, an application context, ...).
///
/// Cheap to clone. The orchestrator passes it through to test cases, hooks,
/// and exit callbacks without ever looking inside; hosts that need the
/// concrete type back use [`SceneHandle::downcast_ref`].
#[derive(Clone)]
pub struct SceneHandle(Arc<dyn Any + Send + Sync>);

impl SceneHandle {
    /// Wrap a host object in an opaque handle.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Borrow the underlying host object, if it is a `T`.
    pub fn downcast_ref<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for SceneHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SceneHandle(..)")
    }
}

// ============================================================================
// Case results
// ============================================================================

/// Failure raised by a single test case.
///
/// This is the "assertion failed" signal, distinct from [`RunError`]: a
/// `TestFailure` becomes a failing outcome, never an orchestrator error.
///
/// [`RunError`]: crate::interfaces::RunError
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TestFailure {
    /// Human-readable diagnostic, surfaced verbatim in the failing outcome.
    pub message: String,
}

impl TestFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result of one test-case body.
pub type CaseResult = Result<(), TestFailure>;

/// Boxed future produced by a test-case body.
pub type CaseFuture = Pin<Box<dyn Future<Output = CaseResult> + Send>>;
type CaseFn = Arc<dyn Fn(SceneHandle) -> CaseFuture + Send + Sync>;

pub(crate) type HookFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
pub(crate) type HookFn = Arc<dyn Fn(SceneHandle) -> HookFuture + Send + Sync>;

// ============================================================================
// Test cases and suites
// ============================================================================

/// A single named test method belonging to a suite.
#[derive(Clone)]
pub struct TestCase {
    name: String,
    body: CaseFn,
}

impl TestCase {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start the case body against the given scene.
    pub fn future(&self, scene: SceneHandle) -> CaseFuture {
        (self.body)(scene)
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase").field("name", &self.name).finish()
    }
}

/// A named grouping of test cases, discovered (not constructed) by the
/// suite provider.
///
/// Suites carry optional lifecycle hooks:
///
/// - `setup_all` — once, before the suite's first test starts
/// - `setup` — before each test
/// - `cleanup` — after each test
/// - `cleanup_all` — exactly once per suite after the whole run finishes,
///   even when tests failed or remaining tests were skipped by stop-on-error
///
/// Cloning is cheap; case bodies and hooks are shared.
#[derive(Clone)]
pub struct TestSuite {
    name: String,
    cases: Vec<TestCase>,
    setup_all: Option<HookFn>,
    setup: Option<HookFn>,
    cleanup: Option<HookFn>,
    cleanup_all: Option<HookFn>,
}

impl TestSuite {
    pub fn builder(name: impl Into<String>) -> TestSuiteBuilder {
        TestSuiteBuilder {
            suite: TestSuite {
                name: name.into(),
                cases: Vec::new(),
                setup_all: None,
                setup: None,
                cleanup: None,
                cleanup_all: None,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub(crate) fn setup_all(&self) -> Option<&HookFn> {
        self.setup_all.as_ref()
    }

    pub(crate) fn setup(&self) -> Option<&HookFn> {
        self.setup.as_ref()
    }

    pub(crate) fn cleanup(&self) -> Option<&HookFn> {
        self.cleanup.as_ref()
    }

    pub(crate) fn cleanup_all(&self) -> Option<&HookFn> {
        self.cleanup_all.as_ref()
    }
}

impl fmt::Debug for TestSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestSuite")
            .field("name", &self.name)
            .field("cases", &self.cases.len())
            .finish()
    }
}

/// Builder for [`TestSuite`].
pub struct TestSuiteBuilder {
    suite: TestSuite,
}

impl TestSuiteBuilder {
    /// Register a test case. Cases run in registration order.
    pub fn case<F, Fut>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(SceneHandle) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CaseResult> + Send + 'static,
    {
        self.suite.cases.push(TestCase {
            name: name.into(),
            body: Arc::new(move |scene| Box::pin(body(scene))),
        });
        self
    }

    /// Hook run once before the suite's first test starts.
    pub fn setup_all<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(SceneHandle) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.suite.setup_all = Some(Arc::new(move |scene| Box::pin(hook(scene))));
        self
    }

    /// Hook run before each test.
    pub fn setup<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(SceneHandle) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.suite.setup = Some(Arc::new(move |scene| Box::pin(hook(scene))));
        self
    }

    /// Hook run after each test.
    pub fn cleanup<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(SceneHandle) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.suite.cleanup = Some(Arc::new(move |scene| Box::pin(hook(scene))));
        self
    }

    /// Hook run exactly once per suite after the whole run finishes.
    pub fn cleanup_all<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(SceneHandle) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.suite.cleanup_all = Some(Arc::new(move |scene| Box::pin(hook(scene))));
        self
    }

    pub fn build(self) -> TestSuite {
        self.suite
    }
}

// ============================================================================
// Module registry
// ============================================================================

/// The "assembly handle" passed to the suite provider: an explicit registry
/// of suites in registration order.
///
/// Hosts typically build one per binary/module and hand it to
/// [`TestRunner::run_tests`]. Registration order is preserved so discovery
/// results are deterministic.
///
/// [`TestRunner::run_tests`]: crate::runner::TestRunner::run_tests
#[derive(Debug, Default, Clone)]
pub struct TestModule {
    suites: Vec<TestSuite>,
}

impl TestModule {
    pub fn builder() -> TestModuleBuilder {
        TestModuleBuilder { suites: Vec::new() }
    }

    pub fn suites(&self) -> &[TestSuite] {
        &self.suites
    }
}

/// Builder for [`TestModule`].
pub struct TestModuleBuilder {
    suites: Vec<TestSuite>,
}

impl TestModuleBuilder {
    pub fn suite(mut self, suite: TestSuite) -> Self {
        self.suites.push(suite);
        self
    }

    pub fn build(self) -> TestModule {
        TestModule { suites: self.suites }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_preserves_registration_order() {
        let module = TestModule::builder()
            .suite(TestSuite::builder("Beta").build())
            .suite(TestSuite::builder("Alpha").build())
            .build();
        let names: Vec<&str> = module.suites().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["Beta", "Alpha"]);
    }

    #[test]
    fn scene_handle_downcasts_to_the_wrapped_type() {
        let scene = SceneHandle::new(42u32);
        assert_eq!(scene.downcast_ref::<u32>(), Some(&42));
        assert_eq!(scene.downcast_ref::<String>(), None);
    }

    #[tokio::test]
    async fn case_body_receives_the_scene() {
        let suite = TestSuite::builder("Handle")
            .case("reads_scene", |scene: SceneHandle| async move {
                match scene.downcast_ref::<u32>() {
                    Some(7) => Ok(()),
                    _ => Err(TestFailure::new("expected the host scene")),
                }
            })
            .build();
        let case = &suite.cases()[0];
        assert!(case.future(SceneHandle::new(7u32)).await.is_ok());
    }
}
