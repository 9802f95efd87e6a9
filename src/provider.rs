//! Default suite discovery.

use crate::interfaces::{RunError, TestProvider};
use crate::suite::{TestModule, TestSuite};

/// Registry-backed provider.
///
/// Matching semantic: case-sensitive substring containment over the suite
/// name, with `*` alone matching every suite. Results follow the module's
/// registration order. Scanning a registry cannot fault, so this provider
/// never errors.
pub struct DefaultTestProvider;

impl TestProvider for DefaultTestProvider {
    fn suites_by_pattern(
        &self,
        module: &TestModule,
        pattern: &str,
    ) -> Result<Vec<TestSuite>, RunError> {
        Ok(module
            .suites()
            .iter()
            .filter(|suite| pattern == "*" || suite.name().contains(pattern))
            .cloned()
            .collect())
    }
}
