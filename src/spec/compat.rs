//! Static capability data consulted during spec finalization.
//!
//! The table is plain data so that new clouds or architectures are added by
//! editing (or loading) a table, never by touching the builder.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::Arch;
use crate::Cloud;
use crate::LocalSsdSetting;

/// How a cloud treats VMs during host maintenance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationSemantics {
    /// VMs are live-migrated by default; terminate-on-migration is honored
    LiveMigrate,
    /// VMs are never live-migrated, so terminate-on-migration always holds
    TerminateOnly,
    /// The provider has no notion of host maintenance
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudCapabilities {
    /// Architectures the cloud can provision
    #[serde(default = "default_archs")]
    pub archs: Vec<Arch>,

    /// Local SSD policies the cloud can honor
    #[serde(default = "default_local_ssd")]
    pub local_ssd: Vec<LocalSsdSetting>,

    #[serde(default = "default_migration")]
    pub migration: MigrationSemantics,

    /// CPU baseline used when a test does not request a CPU count
    #[serde(default = "default_cpus")]
    pub default_cpus: u32,

    /// Upper bound on local SSDs per node
    #[serde(default = "default_max_ssds")]
    pub max_ssds: u32,
}

impl Default for CloudCapabilities {
    fn default() -> Self {
        Self {
            archs: default_archs(),
            local_ssd: default_local_ssd(),
            migration: default_migration(),
            default_cpus: default_cpus(),
            max_ssds: default_max_ssds(),
        }
    }
}

/// Mapping of cloud → capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompatibilityTable {
    clouds: BTreeMap<Cloud, CloudCapabilities>,
}

impl CompatibilityTable {
    /// An empty table; every cloud is unknown until added.
    pub fn empty() -> Self {
        Self {
            clouds: BTreeMap::new(),
        }
    }

    pub fn with_cloud(
        mut self,
        cloud: Cloud,
        caps: CloudCapabilities,
    ) -> Self {
        self.clouds.insert(cloud, caps);
        self
    }

    pub fn capabilities(
        &self,
        cloud: Cloud,
    ) -> Option<&CloudCapabilities> {
        self.clouds.get(&cloud)
    }

    pub fn clouds(&self) -> impl Iterator<Item = (&Cloud, &CloudCapabilities)> {
        self.clouds.iter()
    }
}

impl Default for CompatibilityTable {
    fn default() -> Self {
        use Arch::Amd64;
        use Arch::Arm64;
        use Arch::Fips;

        CompatibilityTable::empty()
            .with_cloud(
                Cloud::Aws,
                CloudCapabilities {
                    archs: vec![Amd64, Arm64, Fips],
                    migration: MigrationSemantics::TerminateOnly,
                    ..Default::default()
                },
            )
            .with_cloud(
                Cloud::Gce,
                CloudCapabilities {
                    archs: vec![Amd64, Arm64, Fips],
                    migration: MigrationSemantics::LiveMigrate,
                    ..Default::default()
                },
            )
            .with_cloud(
                Cloud::Azure,
                CloudCapabilities {
                    archs: vec![Amd64, Arm64],
                    migration: MigrationSemantics::TerminateOnly,
                    max_ssds: 4,
                    ..Default::default()
                },
            )
            .with_cloud(
                Cloud::Local,
                CloudCapabilities {
                    archs: vec![Amd64, Arm64],
                    local_ssd: vec![LocalSsdSetting::Default, LocalSsdSetting::Disable],
                    migration: MigrationSemantics::Unsupported,
                    max_ssds: 1,
                    ..Default::default()
                },
            )
    }
}

fn default_archs() -> Vec<Arch> {
    vec![Arch::Amd64]
}
fn default_local_ssd() -> Vec<LocalSsdSetting> {
    vec![
        LocalSsdSetting::Default,
        LocalSsdSetting::Disable,
        LocalSsdSetting::PreferOn,
    ]
}
fn default_migration() -> MigrationSemantics {
    MigrationSemantics::TerminateOnly
}
fn default_cpus() -> u32 {
    4
}
fn default_max_ssds() -> u32 {
    8
}
