//! Language mode setting

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::ApiError;
use crate::models::LanguageMode;
use crate::LoadReport;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct LanguageResponse {
    pub mode: LanguageMode,
    /// Present when the change triggered a reload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reload: Option<LoadReport>,
}

#[derive(Debug, Deserialize)]
pub struct LanguageRequest {
    pub mode: LanguageMode,
}

/// GET /api/lang
pub async fn get_language(State(state): State<AppState>) -> Json<LanguageResponse> {
    let mode = state.library.read().await.language();
    Json(LanguageResponse { mode, reload: None })
}

/// PUT /api/lang {"mode": "cn" | "tw"}
///
/// Persists the mode and reloads the library in the new script. Readers wait on
/// the write lock until the reload completes.
pub async fn set_language(
    State(state): State<AppState>,
    request: Result<Json<LanguageRequest>, JsonRejection>,
) -> Result<Json<LanguageResponse>, ApiError> {
    let Json(request) = request?;
    let mut library = state.library.write().await;
    let reload = library.set_language(request.mode).await?;
    if let Some(report) = &reload {
        info!(mode = request.mode.as_flag(), poems = report.poems, "Language mode applied");
    }
    Ok(Json(LanguageResponse {
        mode: library.language(),
        reload,
    }))
}
