use hdrhistogram::Histogram;
use serde::Serialize;

const MICROS_PER_SEC: f64 = 1_000_000.0;

/// Percentile estimates for one latency series, in seconds.
/// Derived from the microsecond HdrHistogram kept alongside the buckets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentileSet {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
    pub p999: f64,
}

impl PercentileSet {
    /// Returns zeroed values if the histogram is empty.
    pub fn from_micros(hist: &Histogram<u64>) -> Self {
        if hist.len() == 0 {
            return Self::empty();
        }

        let secs = |us: u64| us as f64 / MICROS_PER_SEC;
        Self {
            min: secs(hist.min()),
            max: secs(hist.max()),
            mean: hist.mean() / MICROS_PER_SEC,
            p50: secs(hist.value_at_quantile(0.50)),
            p95: secs(hist.value_at_quantile(0.95)),
            p99: secs(hist.value_at_quantile(0.99)),
            p999: secs(hist.value_at_quantile(0.999)),
        }
    }

    pub fn empty() -> Self {
        Self {
            min: 0.0,
            max: 0.0,
            mean: 0.0,
            p50: 0.0,
            p95: 0.0,
            p99: 0.0,
            p999: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_histogram_yields_zeroes() {
        let hist = Histogram::<u64>::new_with_bounds(1, 60_000_000, 3).unwrap();
        assert_eq!(PercentileSet::from_micros(&hist), PercentileSet::empty());
    }

    #[test]
    fn converts_microseconds_to_seconds() {
        let mut hist = Histogram::<u64>::new_with_bounds(1, 60_000_000, 3).unwrap();
        for us in [100_000u64, 200_000, 300_000] {
            hist.record(us).unwrap();
        }

        let set = PercentileSet::from_micros(&hist);
        assert!((set.min - 0.1).abs() < 0.001);
        assert!((set.max - 0.3).abs() < 0.001);
        assert!((set.mean - 0.2).abs() < 0.001);
        assert!((set.p50 - 0.2).abs() < 0.001);
    }
}
