/// Metrics namespace used when none is configured
pub const DEFAULT_METRICS_NAMESPACE: &str = "roachtest";

/// Tag every test carries unless it declares its own
pub const DEFAULT_TEST_TAG: &str = "default";

/// Environment prefix for configuration overrides, e.g. `TESTREG__REGISTRY__DEFAULT_CLOUD`
pub(crate) const CONFIG_ENV_PREFIX: &str = "TESTREG";
