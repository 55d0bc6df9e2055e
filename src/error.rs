use thiserror::Error;

/// Failures raised by a metrics registry or one of its histograms.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("invalid metric name `{0}`: expected ASCII letters, digits or `_`")]
    InvalidName(String),
    #[error("invalid buckets for `{name}`: {reason}")]
    InvalidBuckets { name: String, reason: String },
    #[error("metric `{0}` is already registered with a different definition")]
    Conflict(String),
    #[error("refusing to record non-finite value {value} into `{name}`")]
    NonFiniteValue { name: String, value: f64 },
    #[error("histogram allocation failed: {0}")]
    Allocation(String),
}

/// Failures inside the latency observer.
///
/// Only `Registration` ever reaches a caller (from `LatencyObserver::new`);
/// `Record` is swallowed at the middleware boundary.
#[derive(Debug, Error)]
pub enum ObserverError {
    #[error("could not register latency histogram")]
    Registration(#[source] MetricsError),
    #[error("could not record latency")]
    Record(#[source] MetricsError),
}
