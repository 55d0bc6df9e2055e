pub mod endpoint;
pub mod percentiles;
pub mod registry;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::error::MetricsError;

pub use registry::{BucketHistogram, InMemoryRegistry, RegistrySnapshot};

/// Upper bounds (seconds) of the request-latency histogram buckets.
pub const LATENCY_BUCKETS: [f64; 11] = [
    0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
];

/// Labels attached to a single sample. Ordered so it can key a series map.
pub type Tags = BTreeMap<String, String>;

// ─── Metric definition ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Seconds,
}

/// Everything a registry needs to create a histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSpec {
    /// Namespace prefix, e.g. `http_server`
    pub group: String,
    /// Metric name inside the group, e.g. `request_latency`
    pub name: String,
    pub comment: String,
    pub unit: Unit,
    /// Strictly increasing finite upper bounds; `+Inf` is implicit.
    pub buckets: Vec<f64>,
}

impl HistogramSpec {
    /// `<group>.<name>`
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.group, self.name)
    }
}

// ─── Registry capability ─────────────────────────────────────────

/// A handle to a registered histogram. Recording must be safe from any
/// number of threads at once.
pub trait Histogram: Send + Sync {
    fn record(&self, tags: &Tags, value: f64) -> Result<(), MetricsError>;
}

/// Creates histograms. Whoever owns the storage and export implements this;
/// the latency observer only ever calls it once, at construction.
pub trait MetricsRegistry: Send + Sync {
    fn register_histogram(
        &self,
        spec: HistogramSpec,
    ) -> Result<Arc<dyn Histogram>, MetricsError>;
}
