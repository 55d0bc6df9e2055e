use axum::{middleware as axum_mw, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::metrics::endpoint;
use crate::middleware::latency::request_latency_middleware;
use crate::AppState;

/// Builds the full Axum `Router` with all routes and middleware.
pub fn create_router(state: Arc<AppState>) -> Router {
    let observer = state.observer.clone();

    Router::new()
        // ── Demo endpoints ──────────────────────────────────────
        .route("/api/echo", get(handlers::echo::echo).post(handlers::echo::echo))
        .route("/api/health", get(handlers::health::health))
        // ── Metrics ─────────────────────────────────────────────
        .route("/api/metrics", get(endpoint::get_metrics))
        // ── Provide shared state to all routes above ────────────
        .with_state(state)
        // ── Global middleware (applied bottom-up) ───────────────
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        // Outermost, so `now` is read before any other layer runs
        .layer(axum_mw::from_fn_with_state(
            observer,
            request_latency_middleware,
        ))
}
