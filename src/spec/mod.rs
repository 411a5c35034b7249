//! Cluster specifications: value types, the option set, the capability
//! table and the builder that ties them together.

mod builder;
mod cloud;
mod cluster_spec;
mod compat;
mod option;
pub use builder::*;
pub use cloud::*;
pub use cluster_spec::ClusterSpec;
pub use cluster_spec::LocalSsdSetting;
pub use cluster_spec::ReusePolicy;
pub use compat::*;
pub use option::*;

#[cfg(test)]
mod builder_test;
#[cfg(test)]
mod cloud_test;
