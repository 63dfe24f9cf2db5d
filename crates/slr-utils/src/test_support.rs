//! Test-only helpers shared across `slr-*` crates.

/// Check whether tests that hit real LLM backends should run.
///
/// `SLR_SKIP_LLM_TESTS=1` always disables them. `SLR_REAL_LLM_TESTS=1`
/// enables them; absent that, real-backend tests are skipped by default so
/// the suite runs offline and without credentials.
#[must_use]
pub fn llm_tests_enabled() -> bool {
    let skip = std::env::var("SLR_SKIP_LLM_TESTS")
        .ok()
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if skip {
        return false;
    }

    std::env::var("SLR_REAL_LLM_TESTS")
        .ok()
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Check whether tests that hit real provider HTTP APIs should run.
#[must_use]
pub fn provider_tests_enabled() -> bool {
    std::env::var("SLR_REAL_PROVIDER_TESTS")
        .ok()
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
