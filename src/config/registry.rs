use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_METRICS_NAMESPACE;
use crate::is_valid_namespace;
use crate::Cloud;
use crate::Error;
use crate::Result;

/// Registry-level settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RegistrySettings {
    /// Cloud a registry binds to when a test does not override it
    ///
    /// Default: `gce`
    #[serde(default = "default_cloud")]
    pub default_cloud: Cloud,

    /// Prefix of every registered metric; must already be a legal metric
    /// identifier
    ///
    /// Default: `roachtest`
    #[serde(default = "default_metrics_namespace")]
    pub metrics_namespace: String,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            default_cloud: default_cloud(),
            metrics_namespace: default_metrics_namespace(),
        }
    }
}

impl RegistrySettings {
    /// # Errors
    /// Returns `Error::Config` when the namespace is empty, starts with a
    /// digit, or would be altered by the metric name sanitizer.
    pub fn validate(&self) -> Result<()> {
        if self.metrics_namespace.is_empty() {
            return Err(Error::Config(ConfigError::Message(
                "metrics_namespace cannot be empty".into(),
            )));
        }
        if !is_valid_namespace(&self.metrics_namespace) {
            return Err(Error::Config(ConfigError::Message(format!(
                "metrics_namespace {:?} must match [A-Za-z_][A-Za-z0-9_]*",
                self.metrics_namespace
            ))));
        }
        Ok(())
    }
}

fn default_cloud() -> Cloud {
    Cloud::Gce
}
fn default_metrics_namespace() -> String {
    DEFAULT_METRICS_NAMESPACE.to_string()
}
