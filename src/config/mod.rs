//! Configuration for test registries.
//!
//! Sources are merged in this order (later overrides earlier):
//! 1. Type defaults, including the built-in compatibility table
//! 2. Configuration file named by `CONFIG_PATH`
//! 3. Environment variables with the `TESTREG__` prefix
//!
//! ```toml
//! [registry]
//! default_cloud = "aws"
//! metrics_namespace = "roachtest"
//!
//! [clouds.aws]
//! default_cpus = 8
//! ```
mod registry;
pub use registry::*;


use std::env;

use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::CONFIG_ENV_PREFIX;
use crate::CompatibilityTable;
use crate::Error;
use crate::LocalSsdSetting;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RegistryConfig {
    #[serde(default)]
    pub registry: RegistrySettings,

    /// Capability table consulted when specs are finalized
    #[serde(default)]
    pub clouds: CompatibilityTable,
}

impl RegistryConfig {
    /// Loads configuration from hierarchical sources without validation.
    ///
    /// Callers must run [`validate`](Self::validate) once all overrides are
    /// applied.
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var("CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(environment());

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Applies a further configuration file on top of `self`, then
    /// re-applies the environment. Not validated.
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(environment())
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Validates and returns the configuration.
    ///
    /// # Errors
    /// - invalid metrics namespace
    /// - default cloud missing from the capability table
    /// - a cloud with no architectures, a zero CPU baseline, or local SSD
    ///   modes that leave out `default` (every unmodified spec requests it)
    pub fn validate(self) -> Result<Self> {
        self.registry.validate()?;

        if self.clouds.capabilities(self.registry.default_cloud).is_none() {
            return Err(Error::Config(ConfigError::Message(format!(
                "default_cloud {} has no entry in [clouds]",
                self.registry.default_cloud
            ))));
        }

        for (cloud, caps) in self.clouds.clouds() {
            if caps.archs.is_empty() {
                return Err(Error::Config(ConfigError::Message(format!(
                    "clouds.{cloud}.archs cannot be empty"
                ))));
            }
            if !caps.local_ssd.contains(&LocalSsdSetting::Default) {
                return Err(Error::Config(ConfigError::Message(format!(
                    "clouds.{cloud}.local_ssd must include \"default\""
                ))));
            }
            if caps.default_cpus == 0 {
                return Err(Error::Config(ConfigError::Message(format!(
                    "clouds.{cloud}.default_cpus must be positive"
                ))));
            }
        }

        Ok(self)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(CONFIG_ENV_PREFIX)
        .separator("__")
        .ignore_empty(true)
        .try_parsing(true)
}
