//! Records how long requests take to get from the upstream proxy to the
//! application, based on the `X-Request-Start` header the proxy stamps.
//!
//! Mount [`middleware::request_latency_middleware`] with a
//! [`LatencyObserver`] built against any [`metrics::MetricsRegistry`];
//! samples land in `<metrics_prefix>.request_latency`.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod telemetry;

pub use config::ObserverConfig;
pub use error::{MetricsError, ObserverError};
pub use middleware::LatencyObserver;

/// Shared application state available to every handler via `State<Arc<AppState>>`.
pub struct AppState {
    /// Owns the histogram storage; `/api/metrics` reads snapshots from it.
    pub registry: Arc<metrics::InMemoryRegistry>,

    /// Registered against `registry` at startup.
    pub observer: Arc<LatencyObserver>,
}

impl AppState {
    pub fn new(config: ObserverConfig) -> Result<Self, ObserverError> {
        let registry = Arc::new(metrics::InMemoryRegistry::new());
        let observer = LatencyObserver::new(config, registry.as_ref())?;
        Ok(Self {
            registry,
            observer: Arc::new(observer),
        })
    }
}
