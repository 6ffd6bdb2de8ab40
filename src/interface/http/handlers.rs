use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use rust_embed::RustEmbed;
use serde::Serialize;
use tracing::error;

use crate::application::PollStatus;
use crate::ports::MetricsSink;

pub const SERVICE_NAME: &str = "nvme_exporter";

#[derive(RustEmbed)]
#[folder = "src/interface/web/static/"]
struct StaticAssets;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub sink: Arc<dyn MetricsSink>,
    pub status: Arc<PollStatus>,
}

/// Response for /health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub last_success: Option<String>,
    pub consecutive_failures: u64,
}

/// Handler for GET /metrics
pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.sink.export() {
        Ok(body) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            error!("Failed to export metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Handler for GET /
pub async fn index_handler() -> Response {
    match StaticAssets::get("index.html") {
        Some(file) => Html(String::from_utf8_lossy(&file.data).into_owned()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let snapshot = state.status.snapshot();

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: if snapshot.is_healthy() { "healthy" } else { "degraded" },
            service: SERVICE_NAME,
            version: env!("CARGO_PKG_VERSION"),
            last_success: snapshot.last_success.map(|t| t.to_rfc3339()),
            consecutive_failures: snapshot.consecutive_failures,
        }),
    )
}
