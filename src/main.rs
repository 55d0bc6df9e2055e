use clap::Parser;
use std::error::Error as _;
use std::sync::Arc;
use tracing::{error, info};

use request_latency::config::ServerArgs;
use request_latency::{server, telemetry, AppState, ObserverConfig};

#[tokio::main]
async fn main() {
    let args = ServerArgs::parse();
    telemetry::init_logging(args.verbose || args.debug);

    // ── 1. Register the latency histogram ───────────────────────
    let state = match AppState::new(ObserverConfig::from(&args)) {
        Ok(state) => Arc::new(state),
        Err(err) => {
            let cause = err.source().map(ToString::to_string).unwrap_or_default();
            error!(error = %err, cause = %cause, "invalid observer configuration");
            std::process::exit(1);
        }
    };
    info!(
        metric = state.observer.metric_name(),
        debug = state.observer.config().debug,
        "latency observer ready"
    );

    // ── 2. Build Axum router ─────────────────────────────────────
    let app = server::create_router(state);

    // ── 3. Bind & serve ──────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to {}: {e}", args.bind));

    info!(addr = %args.bind, "listening");
    info!("Echo    → GET  /api/echo   (send X-Request-Start: t=<unix seconds>)");
    info!("Metrics → GET  /api/metrics");

    axum::serve(listener, app)
        .await
        .expect("Server exited with error");
}
