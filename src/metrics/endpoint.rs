use axum::{extract::State, Json};
use std::sync::Arc;

use super::RegistrySnapshot;
use crate::AppState;

// ─── GET /api/metrics ────────────────────────────────────────────
/// Returns every registered histogram as a single JSON snapshot.

pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Json<RegistrySnapshot> {
    Json(state.registry.snapshot())
}
