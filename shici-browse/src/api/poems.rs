//! Poem detail and daily recommendation endpoints

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use serde::Serialize;
use shici_common::time;

use super::ApiError;
use crate::models::Poem;
use crate::recommend::{carousel, daily_poem, CAROUSEL_SIZE};
use crate::search::excerpt;
use crate::AppState;

/// Lines of each poem shown on a carousel slide
const CAROUSEL_LINES: usize = 2;

#[derive(Debug, Serialize)]
pub struct CarouselItem {
    pub id: usize,
    pub title: String,
    pub author: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DailyResponse {
    /// `YYYY-MM-DD`, local date the pick was made for
    pub date: String,
    /// `None` while no poems are loaded
    pub poem: Option<Poem>,
    pub carousel: Vec<CarouselItem>,
}

/// GET /api/daily
pub async fn daily(State(state): State<AppState>) -> Json<DailyResponse> {
    let today = time::today();
    let library = state.library.read().await;
    let poems = library.poems();

    let slides = carousel(poems, today, CAROUSEL_SIZE)
        .into_iter()
        .map(|p| CarouselItem {
            id: p.id,
            title: p.title.clone(),
            author: p.author.clone(),
            lines: excerpt(p, CAROUSEL_LINES),
        })
        .collect();

    Json(DailyResponse {
        date: today.format("%Y-%m-%d").to_string(),
        poem: daily_poem(poems, today).cloned(),
        carousel: slides,
    })
}

/// GET /api/poems/:id
///
/// A non-numeric id is a 400 in the API error shape.
pub async fn poem_detail(
    State(state): State<AppState>,
    id: Result<Path<usize>, PathRejection>,
) -> Result<Json<Poem>, ApiError> {
    let Path(id) = id?;
    let library = state.library.read().await;
    library
        .poem(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Poem {} not found", id)))
}

/// GET /api/poems/by-fingerprint/:fingerprint
///
/// Lookup that stays valid across reloads, unlike positional ids.
pub async fn poem_by_fingerprint(
    State(state): State<AppState>,
    Path(fingerprint): Path<String>,
) -> Result<Json<Poem>, ApiError> {
    let library = state.library.read().await;
    library
        .poem_by_fingerprint(&fingerprint)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Poem {} not found", fingerprint)))
}
