// system-tests/tests/helpers/timeouts.rs
// ============================================================================
// Module: System Test Timeouts
// Description: Centralized timeout resolution for suite helpers.
// Purpose: Keep system-test timeouts consistent and configurable across suites.
// Dependencies: system-tests config
// ============================================================================

use std::time::Duration;

use system_tests::config::SystemTestConfig;

/// Default readiness timeout for stub backends.
pub const READINESS_TIMEOUT: Duration = Duration::from_secs(10);

/// Returns the effective timeout, honoring the environment override.
///
/// The override acts as a minimum so it never shortens an explicitly
/// longer test timeout.
#[must_use]
pub fn resolve_timeout(requested: Duration) -> Duration {
    let config = SystemTestConfig::load().unwrap_or_else(|err| {
        panic!("system test configuration invalid: {err}");
    });
    config.timeout.map_or(requested, |override_timeout| requested.max(override_timeout))
}
