//! Narrow seam to whatever fulfills a cluster request.

#[cfg(test)]
use mockall::automock;

use crate::ClusterSpec;
use crate::Result;

/// Consumes frozen specs. The registry never calls this on its own; callers
/// go through [`TestRegistry::provision`](crate::TestRegistry::provision)
/// once the test a spec belongs to is scheduled.
#[cfg_attr(test, automock)]
pub trait Provisioner: Send + Sync {
    fn provision(
        &self,
        spec: &ClusterSpec,
    ) -> Result<()>;
}
