//! Outcome aggregation and progress formatting.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::interfaces::{Log, TestReporter};

// ============================================================================
// Outcomes
// ============================================================================

/// Per-test result, written exactly once per executed test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub suite: String,
    pub test: String,
    pub status: OutcomeStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    Passed,
    Failed {
        /// Diagnostic text: assertion message, panic payload, or timeout note.
        diagnostic: String,
    },
}

impl Outcome {
    pub fn passed(suite: impl Into<String>, test: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            test: test.into(),
            status: OutcomeStatus::Passed,
        }
    }

    pub fn failed(
        suite: impl Into<String>,
        test: impl Into<String>,
        diagnostic: impl Into<String>,
    ) -> Self {
        Self {
            suite: suite.into(),
            test: test.into(),
            status: OutcomeStatus::Failed {
                diagnostic: diagnostic.into(),
            },
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed { .. })
    }
}

// ============================================================================
// Default reporter
// ============================================================================

/// Built-in reporter: formats progress through the injected sink and keeps
/// the aggregate error flag.
///
/// Safe under concurrent writers — the outcome buffer sits behind a mutex and
/// the error flag is a monotonic atomic, so no update is lost when suites run
/// in parallel.
pub struct DefaultTestReporter {
    log: Arc<dyn Log>,
    had_error: AtomicBool,
    outcomes: Mutex<Vec<Outcome>>,
}

impl DefaultTestReporter {
    pub fn new(log: Arc<dyn Log>) -> Self {
        Self {
            log,
            had_error: AtomicBool::new(false),
            outcomes: Mutex::new(Vec::new()),
        }
    }

    fn with_outcomes<T>(&self, f: impl FnOnce(&mut Vec<Outcome>) -> T) -> T {
        let mut outcomes = self
            .outcomes
            .lock()
            .expect("INVARIANT: outcome buffer lock is never poisoned");
        f(&mut outcomes)
    }
}

impl TestReporter for DefaultTestReporter {
    fn record_outcome(&self, outcome: Outcome) {
        match &outcome.status {
            OutcomeStatus::Passed => {
                self.log
                    .info(&format!("PASS {}::{}", outcome.suite, outcome.test));
            }
            OutcomeStatus::Failed { diagnostic } => {
                self.had_error.store(true, Ordering::SeqCst);
                self.log.error(&format!(
                    "FAIL {}::{}: {}",
                    outcome.suite, outcome.test, diagnostic
                ));
            }
        }
        self.with_outcomes(|outcomes| outcomes.push(outcome));
    }

    fn had_error(&self) -> bool {
        self.had_error.load(Ordering::SeqCst)
    }

    fn summarize(&self) {
        let (passed, failed) = self.with_outcomes(|outcomes| {
            let failed = outcomes.iter().filter(|o| o.is_failure()).count();
            (outcomes.len() - failed, failed)
        });
        let line = format!("{passed} passed, {failed} failed");
        if failed > 0 {
            self.log.error(&line);
        } else {
            self.log.info(&line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    /// Sink fake capturing formatted lines.
    #[derive(Default)]
    struct BufferLog {
        lines: StdMutex<Vec<String>>,
    }

    impl BufferLog {
        fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }
    }

    impl Log for BufferLog {
        fn info(&self, message: &str) {
            self.lines.lock().unwrap().push(format!("info: {message}"));
        }
        fn warn(&self, message: &str) {
            self.lines.lock().unwrap().push(format!("warn: {message}"));
        }
        fn error(&self, message: &str) {
            self.lines.lock().unwrap().push(format!("error: {message}"));
        }
    }

    #[test]
    fn had_error_starts_false_and_is_monotonic() {
        let log = Arc::new(BufferLog::default());
        let reporter = DefaultTestReporter::new(log);
        assert!(!reporter.had_error());

        reporter.record_outcome(Outcome::failed("Suite", "fails", "boom"));
        assert!(reporter.had_error());

        reporter.record_outcome(Outcome::passed("Suite", "passes"));
        assert!(reporter.had_error(), "a later pass never clears the flag");
    }

    #[test]
    fn progress_and_summary_go_through_the_sink() {
        let log = Arc::new(BufferLog::default());
        let reporter = DefaultTestReporter::new(log.clone());

        reporter.record_outcome(Outcome::passed("Suite", "works"));
        reporter.record_outcome(Outcome::failed("Suite", "breaks", "assertion failed"));
        reporter.summarize();

        let lines = log.lines();
        assert_eq!(lines[0], "info: PASS Suite::works");
        assert_eq!(lines[1], "error: FAIL Suite::breaks: assertion failed");
        assert_eq!(lines[2], "error: 1 passed, 1 failed");
    }

    #[test]
    fn summary_of_a_clean_run_is_informational() {
        let log = Arc::new(BufferLog::default());
        let reporter = DefaultTestReporter::new(log.clone());
        reporter.record_outcome(Outcome::passed("Suite", "works"));
        reporter.summarize();
        assert_eq!(log.lines().last().unwrap(), "info: 1 passed, 0 failed");
    }
}
