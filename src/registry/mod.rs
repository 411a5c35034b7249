//! The catalog test authors use to declare clusters and register tests.
//!
//! A [`TestRegistry`] is an explicitly constructed value bound to one cloud.
//! Several registries (one per target cloud, say) can live side by side;
//! nothing here is global.
//!
//! ## Example
//! ```ignore
//! let r = TestRegistry::new(Cloud::Aws);
//! let spec = r.make_cluster_spec(4, &[cpu(8)?, geo()])?;
//! r.add(TestSpec::new("kv/splits/nodes=4", "kv", spec))?;
//! let gauge = r.metrics_factory().new_gauge("kv/splits/nodes=4", "splits")?;
//! ```

mod test_spec;
pub use test_spec::*;


use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::debug;
use tracing::info;

use crate::Cloud;
use crate::ClusterSpec;
use crate::MetricsFactory;
use crate::Provisioner;
use crate::RegistryConfig;
use crate::RegistryError;
use crate::Result;
use crate::SpecBuilder;
use crate::SpecError;
use crate::SpecOption;

#[derive(Debug)]
pub struct TestRegistry {
    cloud: Cloud,
    builder: SpecBuilder,
    metrics: MetricsFactory,
    tests: RwLock<BTreeMap<String, TestSpec>>,
}

impl TestRegistry {
    /// Binds a registry to `cloud` with the built-in compatibility table and
    /// the default metrics namespace.
    pub fn new(cloud: Cloud) -> Self {
        Self {
            cloud,
            builder: SpecBuilder::default(),
            metrics: MetricsFactory::default(),
            tests: RwLock::new(BTreeMap::new()),
        }
    }

    /// Builds a registry from a validated [`RegistryConfig`].
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        Ok(Self {
            cloud: config.registry.default_cloud,
            builder: SpecBuilder::new(config.clouds.clone()),
            metrics: MetricsFactory::new(&config.registry.metrics_namespace)?,
            tests: RwLock::new(BTreeMap::new()),
        })
    }

    /// Swaps the builder, and with it the compatibility table.
    pub fn with_builder(
        mut self,
        builder: SpecBuilder,
    ) -> Self {
        self.builder = builder;
        self
    }

    pub fn cloud(&self) -> Cloud {
        self.cloud
    }

    pub fn builder(&self) -> &SpecBuilder {
        &self.builder
    }

    /// Builds a spec on the registry's cloud. CPUs start from the cloud's
    /// baseline and can be overridden with [`cpu`](crate::cpu).
    pub fn make_cluster_spec(
        &self,
        node_count: u32,
        options: &[SpecOption],
    ) -> Result<ClusterSpec> {
        let cpus = self
            .builder
            .table()
            .capabilities(self.cloud)
            .map(|caps| caps.default_cpus)
            .ok_or(SpecError::UnknownCloud(self.cloud))?;
        self.builder.build(self.cloud, node_count, cpus, options)
    }

    /// Handle for registering metrics; clones share one ledger.
    pub fn metrics_factory(&self) -> MetricsFactory {
        self.metrics.clone()
    }

    /// Adds a test declaration to the catalog.
    ///
    /// # Errors
    /// `RegistryError` if the name or owner is empty, or the name is taken.
    pub fn add(
        &self,
        test: TestSpec,
    ) -> Result<()> {
        test.validate()?;

        let mut tests = self.tests.write();
        if tests.contains_key(&test.name) {
            return Err(RegistryError::DuplicateTest(test.name).into());
        }
        info!("registered test {} ({}) owned by {}", test.name, test.cluster, test.owner);
        tests.insert(test.name.clone(), test);
        Ok(())
    }

    pub fn get(
        &self,
        name: &str,
    ) -> Option<TestSpec> {
        self.tests.read().get(name).cloned()
    }

    /// Hands the frozen cluster spec of test `name` to `provisioner`.
    ///
    /// The catalog lock is released before the provisioner runs.
    ///
    /// # Errors
    /// `RegistryError::UnknownTest` if no test is registered under `name`;
    /// otherwise whatever the provisioner returns.
    pub fn provision(
        &self,
        name: &str,
        provisioner: &dyn Provisioner,
    ) -> Result<()> {
        let cluster = self
            .tests
            .read()
            .get(name)
            .map(|t| t.cluster.clone())
            .ok_or_else(|| RegistryError::UnknownTest(name.to_string()))?;

        debug!("provisioning {} for test {}", cluster, name);
        provisioner.provision(&cluster)
    }

    /// Tests matching `filter`, sorted by name.
    pub fn list(
        &self,
        filter: &TestFilter,
    ) -> Vec<TestSpec> {
        self.tests
            .read()
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tests.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.read().is_empty()
    }
}
