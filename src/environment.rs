//! Run configuration parsed from host arguments.

/// Prefix for the run-activation flag; the remainder is the suite pattern.
const RUN_TESTS_PREFIX: &str = "--run-tests=";
const QUIT_ON_FINISH_FLAG: &str = "--quit-on-finish";
const LISTEN_TRACE_FLAG: &str = "--listen-trace";
const COVERAGE_FLAG: &str = "--coverage";

/// Immutable run configuration built from an ordered argument list.
///
/// An environment without a run pattern makes the whole pipeline inert: no
/// discovery, no execution, no exit callback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestEnvironment {
    /// Suite-name filter; `None` means "do nothing".
    pub run_pattern: Option<String>,
    /// Terminate the host (via the exit callbacks) once the run finishes.
    pub should_quit_on_finish: bool,
    /// Install a process-wide diagnostic listener for the duration of the run.
    pub attach_diagnostic_listener: bool,
    /// Use the force-exit path so coverage tooling sees an immediate exit.
    pub coverage_mode: bool,
}

impl TestEnvironment {
    /// Parse an argument list.
    ///
    /// Unrecognized flags are ignored for forward compatibility; malformed
    /// input never errors, it falls back to defaults. `--run-tests=` with an
    /// empty pattern counts as absent.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut env = Self::default();
        for arg in args {
            match arg.as_ref() {
                QUIT_ON_FINISH_FLAG => env.should_quit_on_finish = true,
                LISTEN_TRACE_FLAG => env.attach_diagnostic_listener = true,
                COVERAGE_FLAG => env.coverage_mode = true,
                other => {
                    if let Some(pattern) = other.strip_prefix(RUN_TESTS_PREFIX) {
                        if !pattern.is_empty() {
                            env.run_pattern = Some(pattern.to_string());
                        }
                    }
                }
            }
        }
        env
    }

    /// True when a run pattern is present and the pipeline should activate.
    pub fn is_active(&self) -> bool {
        self.run_pattern.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_args_produce_an_inert_environment() {
        let env = TestEnvironment::from_args(Vec::<String>::new());
        assert_eq!(env, TestEnvironment::default());
        assert!(!env.is_active());
    }

    #[test]
    fn run_pattern_is_extracted() {
        let env = TestEnvironment::from_args(["--run-tests=Inventory"]);
        assert_eq!(env.run_pattern.as_deref(), Some("Inventory"));
        assert!(env.is_active());
    }

    #[test]
    fn empty_run_pattern_counts_as_absent() {
        let env = TestEnvironment::from_args(["--run-tests="]);
        assert_eq!(env.run_pattern, None);
        assert!(!env.is_active());
    }

    #[test]
    fn all_flags_are_recognized() {
        let env = TestEnvironment::from_args([
            "--run-tests=*",
            "--quit-on-finish",
            "--listen-trace",
            "--coverage",
        ]);
        assert!(env.should_quit_on_finish);
        assert!(env.attach_diagnostic_listener);
        assert!(env.coverage_mode);
        assert_eq!(env.run_pattern.as_deref(), Some("*"));
    }

    #[test]
    fn unknown_flags_are_ignored() {
        let env = TestEnvironment::from_args(["--verbose", "--run-tests=Foo", "positional"]);
        assert_eq!(env.run_pattern.as_deref(), Some("Foo"));
        assert!(!env.should_quit_on_finish);
        assert!(!env.coverage_mode);
    }

    #[test]
    fn later_run_pattern_wins() {
        let env = TestEnvironment::from_args(["--run-tests=Foo", "--run-tests=Bar"]);
        assert_eq!(env.run_pattern.as_deref(), Some("Bar"));
    }
}
