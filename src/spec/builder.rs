//! Folds an ordered list of [`SpecOption`]s over a seeded staging spec and
//! freezes the result.
//!
//! ## Example
//! ```ignore
//! let spec = SpecBuilder::default().build(
//!     Cloud::Aws,
//!     100,
//!     4,
//!     &[geo(), cpu(12)?, prefer_local_ssd()],
//! )?;
//! assert_eq!(spec.cpus(), 12);
//! ```
//!
//! A failed build touches nothing outside its own staging spec.

use std::sync::Arc;

use tracing::debug;
use tracing::warn;

use super::cluster_spec::StagingSpec;
use super::ClusterSpec;
use super::CompatibilityTable;
use super::SpecOption;
use crate::Cloud;
use crate::Result;

/// Builds validated [`ClusterSpec`]s against a shared compatibility table.
#[derive(Debug, Clone, Default)]
pub struct SpecBuilder {
    table: Arc<CompatibilityTable>,
}

impl SpecBuilder {
    pub fn new(table: CompatibilityTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    pub fn table(&self) -> &CompatibilityTable {
        &self.table
    }

    /// Seeds a staging spec with `cloud`, `node_count` and `cpus`, applies
    /// `options` in order, then validates.
    ///
    /// # Errors
    /// Returns `Error::Spec` naming the first offending field when a field
    /// invariant or a cross-field compatibility check fails.
    pub fn build(
        &self,
        cloud: Cloud,
        node_count: u32,
        cpus: u32,
        options: &[SpecOption],
    ) -> Result<ClusterSpec> {
        let mut staging = StagingSpec::seed(cloud, node_count, cpus);
        for option in options {
            debug!("apply option {} = {:?}", option.field(), option);
            option.apply(&mut staging);
        }

        staging.finalize(&self.table).map_err(|e| {
            warn!("rejected cluster spec on {}: {}", cloud, e);
            e.into()
        })
    }
}
