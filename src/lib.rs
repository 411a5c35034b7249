//! A registry of cloud-agnostic cluster specifications for integration tests.
//!
//! Test authors declare the topology they need through a [`TestRegistry`]:
//!
//! ```
//! use cluster_spec_registry::*;
//!
//! let r = TestRegistry::new(Cloud::Aws);
//! let spec = r
//!     .make_cluster_spec(100, &[geo(), cpu(12).unwrap(), prefer_local_ssd()])
//!     .unwrap();
//! assert_eq!(spec.cpus(), 12);
//! assert_eq!(spec.local_ssd(), LocalSsdSetting::PreferOn);
//! ```
//!
//! Specs are frozen once built; provisioning happens elsewhere, behind
//! [`Provisioner`]. Metric names derived from test names go through
//! [`sanitize_metric_name`] before they reach prometheus.

mod config;
pub mod constants;
mod errors;
mod metrics;
mod provision;
mod registry;
mod spec;

pub use config::*;
pub use errors::*;
pub use metrics::*;
pub use provision::*;
pub use registry::*;
pub use spec::*;
