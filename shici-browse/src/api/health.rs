//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Health check response: status, module name, version and loaded poem count
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    pub poems: usize,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let poems = state.library.read().await.poems().len();
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "shici-browse".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        poems,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
