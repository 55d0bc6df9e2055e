use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;

use hdrhistogram::Histogram as HdrHistogram;
use parking_lot::Mutex;
use serde::Serialize;

use super::percentiles::PercentileSet;
use super::{Histogram, HistogramSpec, MetricsRegistry, Tags, Unit};
use crate::error::MetricsError;

// ─── Configuration ───────────────────────────────────────────────

/// HdrHistogram range: 1 μs → 60 s, 3 significant figures.
/// Longer samples saturate at the top of the range.
const HIST_LOW: u64 = 1;
const HIST_HIGH: u64 = 60_000_000;
const HIST_SIGFIG: u8 = 3;

// ─── Public types ────────────────────────────────────────────────

/// Thread-safe, process-local metrics registry.
/// Observers register through `MetricsRegistry`, `/api/metrics` reads
/// `snapshot()`.
#[derive(Default)]
pub struct InMemoryRegistry {
    histograms: Mutex<BTreeMap<String, Arc<BucketHistogram>>>,
}

/// Fixed-bucket histogram with one series per distinct tag set.
pub struct BucketHistogram {
    spec: HistogramSpec,
    series: Mutex<BTreeMap<Tags, Series>>,
}

/// Everything the registry holds, ready for JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrySnapshot {
    pub histograms: Vec<HistogramSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistogramSnapshot {
    pub name: String,
    pub comment: String,
    pub unit: Unit,
    pub series: Vec<SeriesSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesSnapshot {
    pub tags: Tags,
    pub count: u64,
    pub sum: f64,
    /// Cumulative counts, last entry is `+Inf`.
    pub buckets: Vec<BucketCount>,
    pub percentiles: PercentileSet,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketCount {
    pub le: String,
    pub count: u64,
}

// ─── Internal state ──────────────────────────────────────────────

struct Series {
    /// Non-cumulative, one slot per bound plus the overflow slot
    counts: Vec<u64>,
    count: u64,
    sum: f64,
    /// Same samples in microseconds, for percentiles
    micros: HdrHistogram<u64>,
}

impl Series {
    fn new(bounds: usize) -> Result<Self, MetricsError> {
        let micros = HdrHistogram::<u64>::new_with_bounds(HIST_LOW, HIST_HIGH, HIST_SIGFIG)
            .map_err(|e| MetricsError::Allocation(format!("{e:?}")))?;
        Ok(Self {
            counts: vec![0; bounds + 1],
            count: 0,
            sum: 0.0,
            micros,
        })
    }

    fn record(&mut self, slot: usize, value: f64) {
        self.counts[slot] += 1;
        self.count += 1;
        self.sum += value;

        let us = (value * 1_000_000.0).round() as u64;
        self.micros.saturating_record(us.max(HIST_LOW));
    }
}

// ─── InMemoryRegistry impl ───────────────────────────────────────

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concrete handle for inspection; `name` is `<group>.<name>`.
    pub fn histogram(&self, name: &str) -> Option<Arc<BucketHistogram>> {
        self.histograms.lock().get(name).cloned()
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let histograms = self
            .histograms
            .lock()
            .values()
            .map(|h| h.snapshot())
            .collect();
        RegistrySnapshot { histograms }
    }
}

impl MetricsRegistry for InMemoryRegistry {
    /// Registering an identical spec again hands back the existing
    /// histogram, so several observers can share one metric.
    fn register_histogram(
        &self,
        spec: HistogramSpec,
    ) -> Result<Arc<dyn Histogram>, MetricsError> {
        validate_name(&spec.group)?;
        validate_name(&spec.name)?;
        validate_buckets(&spec)?;

        let key = spec.full_name();
        let mut histograms = self.histograms.lock();

        if let Some(existing) = histograms.get(&key) {
            if existing.spec != spec {
                return Err(MetricsError::Conflict(key));
            }
            return Ok(Arc::clone(existing) as Arc<dyn Histogram>);
        }

        let histogram = Arc::new(BucketHistogram {
            spec,
            series: Mutex::new(BTreeMap::new()),
        });
        histograms.insert(key, Arc::clone(&histogram));
        Ok(histogram as Arc<dyn Histogram>)
    }
}

fn validate_name(name: &str) -> Result<(), MetricsError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(MetricsError::InvalidName(name.to_owned()))
    }
}

fn validate_buckets(spec: &HistogramSpec) -> Result<(), MetricsError> {
    let invalid = |reason: &str| MetricsError::InvalidBuckets {
        name: spec.full_name(),
        reason: reason.to_owned(),
    };

    if spec.buckets.is_empty() {
        return Err(invalid("no bucket bounds"));
    }
    if spec.buckets.iter().any(|b| !b.is_finite()) {
        return Err(invalid("bounds must be finite"));
    }
    if spec.buckets.windows(2).any(|w| w[0] >= w[1]) {
        return Err(invalid("bounds must be strictly increasing"));
    }
    Ok(())
}

// ─── BucketHistogram impl ────────────────────────────────────────

impl BucketHistogram {
    pub fn spec(&self) -> &HistogramSpec {
        &self.spec
    }

    /// Number of samples recorded under `tags`.
    pub fn count(&self, tags: &Tags) -> u64 {
        self.series.lock().get(tags).map_or(0, |s| s.count)
    }

    /// Running sum per tag set. Tag sets that never saw a sample are absent.
    pub fn sums(&self) -> BTreeMap<Tags, f64> {
        self.series
            .lock()
            .iter()
            .map(|(tags, s)| (tags.clone(), s.sum))
            .collect()
    }

    pub fn snapshot(&self) -> HistogramSnapshot {
        let series = self
            .series
            .lock()
            .iter()
            .map(|(tags, s)| self.series_snapshot(tags, s))
            .collect();

        HistogramSnapshot {
            name: self.spec.full_name(),
            comment: self.spec.comment.clone(),
            unit: self.spec.unit,
            series,
        }
    }

    /// A value lands in the first bucket whose bound is >= the value.
    fn slot_for(&self, value: f64) -> usize {
        self.spec.buckets.partition_point(|&le| le < value)
    }

    fn series_snapshot(&self, tags: &Tags, s: &Series) -> SeriesSnapshot {
        let labels = self
            .spec
            .buckets
            .iter()
            .map(|le| le.to_string())
            .chain(std::iter::once("+Inf".to_owned()));

        let mut running = 0u64;
        let buckets = labels
            .zip(&s.counts)
            .map(|(le, &count)| {
                running += count;
                BucketCount { le, count: running }
            })
            .collect();

        SeriesSnapshot {
            tags: tags.clone(),
            count: s.count,
            sum: s.sum,
            buckets,
            percentiles: PercentileSet::from_micros(&s.micros),
        }
    }
}

impl Histogram for BucketHistogram {
    fn record(&self, tags: &Tags, value: f64) -> Result<(), MetricsError> {
        if !value.is_finite() {
            return Err(MetricsError::NonFiniteValue {
                name: self.spec.full_name(),
                value,
            });
        }

        let slot = self.slot_for(value);
        let mut series = self.series.lock();
        let entry = match series.entry(tags.clone()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(Series::new(self.spec.buckets.len())?),
        };
        entry.record(slot, value);
        Ok(())
    }
}
