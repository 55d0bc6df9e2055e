use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use std::error::Error as _;
use std::sync::Arc;
use tracing::{debug, warn};

use super::request_start::{extract_timestamp, REQUEST_START_HEADER};
use crate::config::ObserverConfig;
use crate::error::ObserverError;
use crate::metrics::{Histogram, HistogramSpec, MetricsRegistry, Tags, Unit, LATENCY_BUCKETS};

pub const METRIC_NAME: &str = "request_latency";

/// Records how long a request spent between the upstream proxy stamping
/// `X-Request-Start` and reaching the application.
///
/// Holds the histogram handle it registered at construction; nothing is
/// looked up per request.
pub struct LatencyObserver {
    config: ObserverConfig,
    metric_name: String,
    histogram: Arc<dyn Histogram>,
}

impl LatencyObserver {
    pub fn new(
        config: ObserverConfig,
        registry: &dyn MetricsRegistry,
    ) -> Result<Self, ObserverError> {
        let spec = HistogramSpec {
            group: config.metrics_prefix.clone(),
            name: METRIC_NAME.to_owned(),
            comment: "The time for the HTTP request to reach the application".to_owned(),
            unit: Unit::Seconds,
            buckets: LATENCY_BUCKETS.to_vec(),
        };
        let metric_name = spec.full_name();
        let histogram = registry
            .register_histogram(spec)
            .map_err(ObserverError::Registration)?;

        Ok(Self {
            config,
            metric_name,
            histogram,
        })
    }

    /// `<metrics_prefix>.request_latency`
    pub fn metric_name(&self) -> &str {
        &self.metric_name
    }

    pub fn config(&self) -> &ObserverConfig {
        &self.config
    }

    /// Measures one request against `now` (Unix seconds).
    ///
    /// Returns the recorded sample. Failures are swallowed here and only
    /// logged in debug mode.
    pub fn observe(&self, headers: &HeaderMap, now: f64) -> Option<f64> {
        match self.try_observe(headers, now) {
            Ok(sample) => sample,
            Err(err) => {
                if self.config.debug {
                    let cause = err.source().map(ToString::to_string).unwrap_or_default();
                    warn!(error = %err, cause = %cause, "Could not observe latency");
                }
                None
            }
        }
    }

    fn try_observe(&self, headers: &HeaderMap, now: f64) -> Result<Option<f64>, ObserverError> {
        // Proxies may put non-ASCII server names in front of `t=`
        let raw = headers
            .get(REQUEST_START_HEADER)
            .map(|v| String::from_utf8_lossy(v.as_bytes()));

        if self.config.debug {
            debug!(x_request_start = ?raw, now, "inspected X-Request-Start");
        }

        let started = extract_timestamp(raw.as_deref());

        let Some(latency) = started.map(|ts| now - ts) else {
            return Ok(None);
        };

        // Clock skew between hosts
        if latency < 0.0 {
            return Ok(None);
        }

        self.histogram
            .record(&Tags::new(), latency)
            .map_err(ObserverError::Record)?;
        Ok(Some(latency))
    }
}

/// Current wall-clock time as fractional Unix seconds.
pub fn unix_now() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Axum middleware: observe, then hand the untouched request on.
///
/// ```ignore
/// router.layer(axum::middleware::from_fn_with_state(observer, request_latency_middleware))
/// ```
pub async fn request_latency_middleware(
    State(observer): State<Arc<LatencyObserver>>,
    req: Request,
    next: Next,
) -> Response {
    let now = unix_now();
    observer.observe(req.headers(), now);
    next.run(req).await
}
