//! Live filter and dynasty filter endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::{default_page, PoemSummary, ResultPage};
use crate::search::{dynasties, filter_by_dynasty};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LiveFilterQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct DynastyQuery {
    /// Dynasty tag without brackets; absent or empty shows everything
    pub tag: Option<String>,

    #[serde(default = "default_page")]
    pub page: usize,
}

/// GET /api/filter?q=TEXT
///
/// Matches title, author or tags as the user types. Unpaginated.
pub async fn live_filter(
    State(state): State<AppState>,
    Query(query): Query<LiveFilterQuery>,
) -> Json<ResultPage> {
    let library = state.library.read().await;
    let matches = crate::search::live_filter(library.poems(), &query.q)
        .into_iter()
        .map(PoemSummary::new)
        .collect();
    Json(ResultPage::single(matches))
}

/// GET /api/dynasty?tag=唐&page=N
pub async fn by_dynasty(
    State(state): State<AppState>,
    Query(query): Query<DynastyQuery>,
) -> Json<ResultPage> {
    let library = state.library.read().await;
    let matches: Vec<PoemSummary> =
        filter_by_dynasty(library.poems(), query.tag.as_deref(), state.untagged_policy)
            .into_iter()
            .map(PoemSummary::new)
            .collect();
    Json(ResultPage::paginate(&matches, query.page))
}

/// GET /api/dynasties
pub async fn list_dynasties(State(state): State<AppState>) -> Json<Vec<String>> {
    let library = state.library.read().await;
    Json(dynasties(library.poems()))
}
