//! Metric registration keyed by sanitized test names.
//!
//! [`MetricsFactory`] wraps a prometheus [`Registry`] with a namespace and a
//! ledger of sanitized name → raw name. Two raw names that sanitize to the
//! same identifier are a naming conflict and are rejected, never merged.

mod sanitize;
pub use sanitize::*;


use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use prometheus::core::Collector;
use prometheus::Encoder;
use prometheus::Gauge;
use prometheus::Histogram;
use prometheus::HistogramOpts;
use prometheus::IntCounter;
use prometheus::Opts;
use prometheus::Registry;
use prometheus::TextEncoder;
use tracing::debug;

use crate::constants::DEFAULT_METRICS_NAMESPACE;
use crate::MetricsError;
use crate::Result;

/// Cloneable handle; clones share one registry and one name ledger.
#[derive(Clone)]
pub struct MetricsFactory {
    namespace: String,
    registry: Registry,
    /// sanitized name → raw name it was first registered under
    ledger: Arc<Mutex<HashMap<String, String>>>,
}

impl std::fmt::Debug for MetricsFactory {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("MetricsFactory")
            .field("namespace", &self.namespace)
            .field("registered", &self.ledger.lock().len())
            .finish()
    }
}

impl Default for MetricsFactory {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_METRICS_NAMESPACE.to_string(),
            registry: Registry::new(),
            ledger: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl MetricsFactory {
    /// Creates a factory over a fresh registry.
    ///
    /// # Errors
    /// `MetricsError::InvalidNamespace` if `namespace` is empty, starts with
    /// a digit, or contains characters the sanitizer would replace.
    pub fn new(namespace: &str) -> Result<Self> {
        Self::with_registry(namespace, Registry::new())
    }

    /// Creates a factory over an existing registry, e.g. one shared with an
    /// exporter.
    pub fn with_registry(
        namespace: &str,
        registry: Registry,
    ) -> Result<Self> {
        if !is_valid_namespace(namespace) {
            return Err(MetricsError::InvalidNamespace(namespace.to_string()).into());
        }
        Ok(Self {
            namespace: namespace.to_string(),
            registry,
            ledger: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn new_gauge(
        &self,
        raw_name: &str,
        help: &str,
    ) -> Result<Gauge> {
        self.register(raw_name, |name| {
            Gauge::with_opts(Opts::new(name, help).namespace(self.namespace.as_str()))
        })
    }

    pub fn new_counter(
        &self,
        raw_name: &str,
        help: &str,
    ) -> Result<IntCounter> {
        self.register(raw_name, |name| {
            IntCounter::with_opts(Opts::new(name, help).namespace(self.namespace.as_str()))
        })
    }

    pub fn new_histogram(
        &self,
        raw_name: &str,
        help: &str,
        buckets: Vec<f64>,
    ) -> Result<Histogram> {
        self.register(raw_name, |name| {
            Histogram::with_opts(
                HistogramOpts::new(name, help)
                    .namespace(self.namespace.as_str())
                    .buckets(buckets),
            )
        })
    }

    /// Sanitized names registered so far, sorted.
    pub fn registered_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.ledger.lock().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn gather(&self) -> Vec<prometheus::proto::MetricFamily> {
        self.registry.gather()
    }

    /// Renders all registered metrics in the prometheus text format.
    pub fn encode_text(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(MetricsError::from)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// The ledger lock is held from the conflict check until the name is
    /// recorded, so concurrent registrations of one name cannot both pass.
    fn register<C, F>(
        &self,
        raw_name: &str,
        make: F,
    ) -> Result<C>
    where
        C: Collector + Clone + 'static,
        F: FnOnce(String) -> prometheus::Result<C>,
    {
        let name = sanitize_metric_name(raw_name);
        let mut ledger = self.ledger.lock();

        if let Some(existing) = ledger.get(&name) {
            return Err(MetricsError::NameConflict {
                namespace: self.namespace.clone(),
                name,
                existing: existing.clone(),
                requested: raw_name.to_string(),
            }
            .into());
        }

        let collector = make(name.clone()).map_err(MetricsError::from)?;
        self.registry
            .register(Box::new(collector.clone()))
            .map_err(MetricsError::from)?;

        debug!("registered metric {}_{} for {:?}", self.namespace, name, raw_name);
        ledger.insert(name, raw_name.to_string());
        Ok(collector)
    }
}
