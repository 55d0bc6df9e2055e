use axum::{
    extract::Request,
    Json,
};
use serde::Serialize;

use crate::middleware::REQUEST_START_HEADER;

// ─── Response types ──────────────────────────────────────────────

/// What the handler actually received once the observer let the
/// request through.
#[derive(Debug, Clone, Serialize)]
pub struct EchoResponse {
    pub method: String,
    pub path: String,
    /// `X-Request-Start` exactly as forwarded, if present and textual
    pub request_start: Option<String>,
}

// ─── GET|POST /api/echo ──────────────────────────────────────────

pub async fn echo(req: Request) -> Json<EchoResponse> {
    let request_start = req
        .headers()
        .get(REQUEST_START_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    Json(EchoResponse {
        method: req.method().to_string(),
        path: req.uri().path().to_owned(),
        request_start,
    })
}
