use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use super::CompatibilityTable;
use super::MigrationSemantics;
use crate::Arch;
use crate::Cloud;
use crate::SpecError;

/// Local SSD policy of a cluster request. Exactly one value holds at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocalSsdSetting {
    /// Defer to the cloud's own default
    #[default]
    Default,
    /// Force network-attached storage
    Disable,
    /// Request local ephemeral storage when available
    PreferOn,
}

impl fmt::Display for LocalSsdSetting {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let s = match self {
            LocalSsdSetting::Default => "default",
            LocalSsdSetting::Disable => "disable",
            LocalSsdSetting::PreferOn => "prefer-on",
        };
        f.write_str(s)
    }
}

/// Whether a test may run on a cluster left behind by a previous test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReusePolicy {
    /// Any previous cluster with a matching spec can be reused
    #[default]
    All,
    /// A fresh cluster is always required
    None,
    /// Only clusters that were used with the same tag can be reused
    Tagged(String),
}

/// A resolved, validated request for a test cluster.
///
/// Instances come from [`SpecBuilder`](crate::SpecBuilder) or from
/// deserialization, and both paths run finalization against a compatibility
/// table, so every `ClusterSpec` a caller holds is valid. There are no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawClusterSpec")]
pub struct ClusterSpec {
    pub(crate) cloud: Cloud,
    pub(crate) node_count: u32,
    pub(crate) cpus: u32,
    pub(crate) geo: bool,
    pub(crate) local_ssd: LocalSsdSetting,
    pub(crate) arch: Option<Arch>,
    pub(crate) terminate_on_migration: bool,
    pub(crate) zones: Vec<String>,
    pub(crate) volume_size_gb: Option<u32>,
    pub(crate) ssd_count: Option<u32>,
    pub(crate) machine_type: Option<String>,
    pub(crate) reuse: ReusePolicy,
}

impl ClusterSpec {
    pub fn cloud(&self) -> Cloud {
        self.cloud
    }

    /// Total nodes, including any non-compute roles the caller counts
    pub fn node_count(&self) -> u32 {
        self.node_count
    }

    /// CPUs per node
    pub fn cpus(&self) -> u32 {
        self.cpus
    }

    pub fn geo(&self) -> bool {
        self.geo
    }

    pub fn local_ssd(&self) -> LocalSsdSetting {
        self.local_ssd
    }

    /// `None` means the provider default architecture
    pub fn arch(&self) -> Option<Arch> {
        self.arch
    }

    pub fn terminate_on_migration(&self) -> bool {
        self.terminate_on_migration
    }

    pub fn zones(&self) -> &[String] {
        &self.zones
    }

    pub fn volume_size_gb(&self) -> Option<u32> {
        self.volume_size_gb
    }

    pub fn ssd_count(&self) -> Option<u32> {
        self.ssd_count
    }

    pub fn machine_type(&self) -> Option<&str> {
        self.machine_type.as_deref()
    }

    pub fn reuse(&self) -> &ReusePolicy {
        &self.reuse
    }

    /// Re-runs finalization checks against `table`.
    ///
    /// Deserialization checks against the built-in table; use this to check
    /// against a stricter or custom one.
    pub fn validate_against(
        &self,
        table: &CompatibilityTable,
    ) -> Result<(), SpecError> {
        if self.node_count == 0 {
            return Err(SpecError::InvalidNodeCount(self.node_count));
        }
        if self.cpus == 0 {
            return Err(SpecError::InvalidCpus(self.cpus));
        }

        let caps = table
            .capabilities(self.cloud)
            .ok_or(SpecError::UnknownCloud(self.cloud))?;

        if let Some(arch) = self.arch {
            if !caps.archs.contains(&arch) {
                return Err(SpecError::UnsupportedArch {
                    cloud: self.cloud,
                    arch,
                });
            }
        }

        if !caps.local_ssd.contains(&self.local_ssd) {
            return Err(SpecError::UnsupportedLocalSsd {
                cloud: self.cloud,
                setting: self.local_ssd,
            });
        }

        if self.terminate_on_migration && caps.migration == MigrationSemantics::Unsupported {
            return Err(SpecError::UnsupportedTerminateOnMigration(self.cloud));
        }

        if let Some(requested) = self.ssd_count {
            if requested > caps.max_ssds {
                return Err(SpecError::TooManySsds {
                    cloud: self.cloud,
                    requested,
                    max: caps.max_ssds,
                });
            }
            if requested > 1 && self.local_ssd == LocalSsdSetting::Disable {
                return Err(SpecError::SsdsWithLocalSsdDisabled(requested));
            }
        }

        Ok(())
    }
}

impl fmt::Display for ClusterSpec {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "n{}cpu{}", self.node_count, self.cpus)?;
        if self.geo {
            f.write_str("-geo")?;
        }
        match self.arch {
            Some(Arch::Amd64) | None => {}
            Some(arch) => write!(f, "-{arch}")?,
        }
        match self.local_ssd {
            LocalSsdSetting::Default => {}
            LocalSsdSetting::PreferOn => f.write_str("-ssd")?,
            LocalSsdSetting::Disable => f.write_str("-nossd")?,
        }
        Ok(())
    }
}

/// Wire form of a [`ClusterSpec`]; only reachable through `TryFrom`, which
/// finalizes it against the built-in table.
#[derive(Deserialize)]
struct RawClusterSpec {
    cloud: Cloud,
    node_count: u32,
    cpus: u32,
    #[serde(default)]
    geo: bool,
    #[serde(default)]
    local_ssd: LocalSsdSetting,
    #[serde(default)]
    arch: Option<Arch>,
    #[serde(default)]
    terminate_on_migration: bool,
    #[serde(default)]
    zones: Vec<String>,
    #[serde(default)]
    volume_size_gb: Option<u32>,
    #[serde(default)]
    ssd_count: Option<u32>,
    #[serde(default)]
    machine_type: Option<String>,
    #[serde(default)]
    reuse: ReusePolicy,
}

impl TryFrom<RawClusterSpec> for ClusterSpec {
    type Error = SpecError;

    fn try_from(raw: RawClusterSpec) -> Result<Self, Self::Error> {
        let spec = ClusterSpec {
            cloud: raw.cloud,
            node_count: raw.node_count,
            cpus: raw.cpus,
            geo: raw.geo,
            local_ssd: raw.local_ssd,
            arch: raw.arch,
            terminate_on_migration: raw.terminate_on_migration,
            zones: raw.zones,
            volume_size_gb: raw.volume_size_gb,
            ssd_count: raw.ssd_count,
            machine_type: raw.machine_type,
            reuse: raw.reuse,
        };
        spec.validate_against(&CompatibilityTable::default())?;
        Ok(spec)
    }
}

/// Mutable form of a [`ClusterSpec`] while options are being folded over it.
#[derive(Debug)]
pub(crate) struct StagingSpec {
    pub(crate) inner: ClusterSpec,
    /// Fields already written by an earlier option
    written: BTreeSet<&'static str>,
}

impl StagingSpec {
    /// Seeds every optional field at its documented default.
    pub(crate) fn seed(
        cloud: Cloud,
        node_count: u32,
        cpus: u32,
    ) -> Self {
        Self {
            inner: ClusterSpec {
                cloud,
                node_count,
                cpus,
                geo: false,
                local_ssd: LocalSsdSetting::Default,
                arch: None,
                terminate_on_migration: false,
                zones: Vec::new(),
                volume_size_gb: None,
                ssd_count: None,
                machine_type: None,
                reuse: ReusePolicy::All,
            },
            written: BTreeSet::new(),
        }
    }

    /// Records that an option wrote `field`; returns true when an earlier
    /// option had already written it.
    pub(crate) fn mark_written(
        &mut self,
        field: &'static str,
    ) -> bool {
        !self.written.insert(field)
    }

    pub(crate) fn finalize(
        self,
        table: &CompatibilityTable,
    ) -> Result<ClusterSpec, SpecError> {
        self.inner.validate_against(table)?;
        Ok(self.inner)
    }
}
