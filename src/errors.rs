//! Cluster Spec Registry Error Hierarchy
//!
//! Errors are grouped by the stage that produces them: option construction,
//! spec finalization, test catalog registration and metric registration.
//! Every error is returned to the immediate caller; none is logged and
//! swallowed.

use config::ConfigError;

use crate::Arch;
use crate::Cloud;
use crate::LocalSsdSetting;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Registry configuration loading or validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An option was constructed with an out-of-range value
    #[error(transparent)]
    Option(#[from] OptionError),

    /// Spec finalization failures (field invariants and cross-field checks)
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// Test catalog failures
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Metric registration failures
    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

/// Construction-time value errors. Raised before any spec exists.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OptionError {
    #[error("cpu count must be positive, got {0}")]
    NonPositiveCpus(u32),

    #[error("volume size must be positive, got {0}GB")]
    NonPositiveVolumeSize(u32),

    #[error("ssd count must be positive, got {0}")]
    NonPositiveSsdCount(u32),

    #[error("zone list contains an empty entry: {0:?}")]
    EmptyZone(String),

    #[error("machine type for {0} cannot be empty")]
    EmptyMachineType(Cloud),

    #[error("reuse tag cannot be empty")]
    EmptyReuseTag,
}

/// Finalization failures. Each variant names the offending field and value.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SpecError {
    #[error("node_count must be positive, got {0}")]
    InvalidNodeCount(u32),

    #[error("cpus must be positive, got {0}")]
    InvalidCpus(u32),

    #[error("cloud {0} has no entry in the compatibility table")]
    UnknownCloud(Cloud),

    #[error("arch {arch} is not supported on {cloud}")]
    UnsupportedArch { cloud: Cloud, arch: Arch },

    #[error("local_ssd={setting} is not supported on {cloud}")]
    UnsupportedLocalSsd { cloud: Cloud, setting: LocalSsdSetting },

    #[error("terminate_on_migration is not supported on {0}")]
    UnsupportedTerminateOnMigration(Cloud),

    #[error("ssd_count={requested} exceeds the maximum of {max} on {cloud}")]
    TooManySsds { cloud: Cloud, requested: u32, max: u32 },

    #[error("ssd_count={0} requires local SSD, but local_ssd=disable")]
    SsdsWithLocalSsdDisabled(u32),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("test name cannot be empty")]
    EmptyTestName,

    #[error("test {0} has no owner")]
    MissingOwner(String),

    #[error("test {0} is already registered")]
    DuplicateTest(String),

    #[error("test {0} is not registered")]
    UnknownTest(String),

    #[error("invalid test filter {pattern:?}: {reason}")]
    InvalidFilter { pattern: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Two raw names sanitized to the same identifier within one namespace
    #[error(
        "metric {namespace}_{name} already registered from {existing:?}, rejected for {requested:?}"
    )]
    NameConflict {
        namespace: String,
        name: String,
        existing: String,
        requested: String,
    },

    #[error("metrics namespace {0:?} is not a legal metric identifier")]
    InvalidNamespace(String),

    /// Failures reported by the prometheus client
    #[error(transparent)]
    Prometheus(#[from] prometheus::Error),
}
