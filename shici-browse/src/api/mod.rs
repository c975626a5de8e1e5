//! HTTP API handlers for shici-browse

pub mod buildinfo;
pub mod error;
pub mod filters;
pub mod health;
pub mod poems;
pub mod search;
pub mod settings;

use serde::Serialize;

use crate::models::Poem;
use crate::pagination::{calculate_pagination, PAGE_SIZE};
use crate::search::preview;

pub use buildinfo::get_build_info;
pub use error::ApiError;
pub use filters::{by_dynasty, list_dynasties, live_filter};
pub use health::health_routes;
pub use poems::{daily, poem_by_fingerprint, poem_detail};
pub use search::search_poems;
pub use settings::{get_language, set_language};

fn default_page() -> usize {
    1
}

/// Result card: enough to render a list entry without the full text
#[derive(Debug, Clone, Serialize)]
pub struct PoemSummary {
    pub id: usize,
    pub fingerprint: String,
    pub title: String,
    pub author: String,
    pub preview: String,
    /// Present on ranked search results only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<usize>,
}

impl PoemSummary {
    pub fn new(poem: &Poem) -> Self {
        Self {
            id: poem.id,
            fingerprint: poem.fingerprint.clone(),
            title: poem.title.clone(),
            author: poem.author.clone(),
            preview: preview(poem),
            score: None,
        }
    }

    pub fn scored(poem: &Poem, score: usize) -> Self {
        Self {
            score: Some(score),
            ..Self::new(poem)
        }
    }
}

/// One page of a result list
#[derive(Debug, Serialize)]
pub struct ResultPage {
    pub total_results: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    /// Set when the list is empty so the client can show its "no results" state
    pub no_results: bool,
    pub results: Vec<PoemSummary>,
}

impl ResultPage {
    /// Paginate an already ordered list
    pub fn paginate(items: &[PoemSummary], requested_page: usize) -> Self {
        let pagination = calculate_pagination(items.len(), requested_page);
        Self {
            total_results: items.len(),
            page: pagination.page,
            page_size: PAGE_SIZE,
            total_pages: pagination.total_pages,
            no_results: items.is_empty(),
            results: pagination.slice(items).to_vec(),
        }
    }

    /// Single page holding every item
    pub fn single(items: Vec<PoemSummary>) -> Self {
        Self {
            total_results: items.len(),
            page: 1,
            page_size: items.len(),
            total_pages: usize::from(!items.is_empty()),
            no_results: items.is_empty(),
            results: items,
        }
    }
}
