//! Keyword search endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::{default_page, ApiError, PoemSummary, ResultPage};
use crate::search::{search, TOP_RESULTS};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Keyword; blank is rejected
    #[serde(default)]
    pub q: String,

    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: usize,

    /// Return only the best results on one page
    #[serde(default)]
    pub top: bool,
}

/// GET /api/search?q=KEYWORD&page=N[&top=true]
///
/// Ranked by score, ties in library order. An empty keyword is a 400 carrying
/// the prompt message; no matches is a 200 with `no_results`.
pub async fn search_poems(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ResultPage>, ApiError> {
    let library = state.library.read().await;
    let ranked = search(library.poems(), &query.q)?;

    let summaries: Vec<PoemSummary> = ranked
        .iter()
        .map(|r| PoemSummary::scored(r.poem, r.score))
        .collect();

    if query.top {
        let top = summaries.into_iter().take(TOP_RESULTS).collect();
        return Ok(Json(ResultPage::single(top)));
    }

    Ok(Json(ResultPage::paginate(&summaries, query.page)))
}
