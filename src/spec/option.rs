//! Composable modifiers folded over a staging spec.
//!
//! Each option owns exactly one field of the spec (or one group of fields,
//! for provider-specific overrides). Scalar arguments are checked when the
//! option is constructed, so a `SpecOption` value is always applicable.
//! Options writing the same field follow last-write-wins.

use tracing::debug;

use super::cluster_spec::StagingSpec;
use super::LocalSsdSetting;
use super::ReusePolicy;
use crate::Arch;
use crate::Cloud;
use crate::OptionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecOption {
    Geo,
    Cpus(u32),
    LocalSsd(LocalSsdSetting),
    Arch(Arch),
    TerminateOnMigration,
    Zones(Vec<String>),
    VolumeSize(u32),
    Ssds(u32),
    MachineType { cloud: Cloud, name: String },
    Reuse(ReusePolicy),
}

/// Distributes nodes across multiple regions.
pub fn geo() -> SpecOption {
    SpecOption::Geo
}

/// Requests `n` CPUs per node.
pub fn cpu(n: u32) -> Result<SpecOption, OptionError> {
    if n == 0 {
        return Err(OptionError::NonPositiveCpus(n));
    }
    Ok(SpecOption::Cpus(n))
}

pub fn prefer_local_ssd() -> SpecOption {
    SpecOption::LocalSsd(LocalSsdSetting::PreferOn)
}

pub fn disable_local_ssd() -> SpecOption {
    SpecOption::LocalSsd(LocalSsdSetting::Disable)
}

pub fn arch(arch: Arch) -> SpecOption {
    SpecOption::Arch(arch)
}

/// Requires VMs to terminate rather than live-migrate on host maintenance.
pub fn terminate_on_migration() -> SpecOption {
    SpecOption::TerminateOnMigration
}

/// Pins nodes to the given comma-separated zones, e.g. `"us-east1-b,us-west1-b"`.
pub fn zones(list: &str) -> Result<SpecOption, OptionError> {
    let zones: Vec<String> = list.split(',').map(|z| z.trim().to_string()).collect();
    if zones.iter().any(|z| z.is_empty()) {
        return Err(OptionError::EmptyZone(list.to_string()));
    }
    Ok(SpecOption::Zones(zones))
}

/// Sets the network volume size in GB.
pub fn volume_size(gb: u32) -> Result<SpecOption, OptionError> {
    if gb == 0 {
        return Err(OptionError::NonPositiveVolumeSize(gb));
    }
    Ok(SpecOption::VolumeSize(gb))
}

/// Attaches `n` local SSDs per node.
pub fn ssds(n: u32) -> Result<SpecOption, OptionError> {
    if n == 0 {
        return Err(OptionError::NonPositiveSsdCount(n));
    }
    Ok(SpecOption::Ssds(n))
}

/// Overrides the machine type, only when the spec targets `cloud`.
pub fn machine_type(
    cloud: Cloud,
    name: &str,
) -> Result<SpecOption, OptionError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(OptionError::EmptyMachineType(cloud));
    }
    Ok(SpecOption::MachineType {
        cloud,
        name: name.to_string(),
    })
}

pub fn reuse_all() -> SpecOption {
    SpecOption::Reuse(ReusePolicy::All)
}

pub fn reuse_none() -> SpecOption {
    SpecOption::Reuse(ReusePolicy::None)
}

pub fn reuse_tagged(tag: &str) -> Result<SpecOption, OptionError> {
    if tag.is_empty() {
        return Err(OptionError::EmptyReuseTag);
    }
    Ok(SpecOption::Reuse(ReusePolicy::Tagged(tag.to_string())))
}

impl SpecOption {
    /// Name of the spec field this option writes
    pub fn field(&self) -> &'static str {
        match self {
            SpecOption::Geo => "geo",
            SpecOption::Cpus(_) => "cpus",
            SpecOption::LocalSsd(_) => "local_ssd",
            SpecOption::Arch(_) => "arch",
            SpecOption::TerminateOnMigration => "terminate_on_migration",
            SpecOption::Zones(_) => "zones",
            SpecOption::VolumeSize(_) => "volume_size_gb",
            SpecOption::Ssds(_) => "ssd_count",
            SpecOption::MachineType { .. } => "machine_type",
            SpecOption::Reuse(_) => "reuse",
        }
    }

    /// Writes this option's field(s) on `staging`. Never reads other fields,
    /// except the cloud for provider-specific overrides.
    ///
    /// A second write to the same field wins and is logged at debug level.
    pub(crate) fn apply(
        &self,
        staging: &mut StagingSpec,
    ) {
        if let SpecOption::MachineType { cloud, .. } = self {
            if *cloud != staging.inner.cloud {
                debug!("machine_type for {} ignored on {}", cloud, staging.inner.cloud);
                return;
            }
        }

        let field = self.field();
        if staging.mark_written(field) {
            debug!("{} overwritten by {:?}", field, self);
        }

        let spec = &mut staging.inner;
        match self {
            SpecOption::Geo => spec.geo = true,
            SpecOption::Cpus(n) => spec.cpus = *n,
            SpecOption::LocalSsd(setting) => spec.local_ssd = *setting,
            SpecOption::Arch(arch) => spec.arch = Some(*arch),
            SpecOption::TerminateOnMigration => spec.terminate_on_migration = true,
            SpecOption::Zones(zones) => spec.zones = zones.clone(),
            SpecOption::VolumeSize(gb) => spec.volume_size_gb = Some(*gb),
            SpecOption::Ssds(n) => spec.ssd_count = Some(*n),
            SpecOption::MachineType { name, .. } => spec.machine_type = Some(name.clone()),
            SpecOption::Reuse(policy) => spec.reuse = policy.clone(),
        }
    }
}
