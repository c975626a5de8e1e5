//! shici-browse library - classical Chinese poetry browser
//!
//! Loads sharded poem datasets, normalizes them into one script, caches the
//! result on disk, and serves search, filtering and daily picks over HTTP.

use axum::Router;
use shici_common::config::UntaggedPolicy;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod library;
pub mod models;
pub mod pagination;
pub mod recommend;
pub mod search;
pub mod services;

pub use library::{LibraryConfig, LoadReport, PoemLibrary};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded poems; a language toggle reloads under the write lock
    pub library: Arc<RwLock<PoemLibrary>>,
    /// How the dynasty filter treats authors without a `[tag]` prefix
    pub untagged_policy: UntaggedPolicy,
}

impl AppState {
    pub fn new(library: PoemLibrary, untagged_policy: UntaggedPolicy) -> Self {
        Self {
            library: Arc::new(RwLock::new(library)),
            untagged_policy,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let poems = Router::new()
        .route("/api/daily", get(api::daily))
        .route("/api/search", get(api::search_poems))
        .route("/api/filter", get(api::live_filter))
        .route("/api/dynasty", get(api::by_dynasty))
        .route("/api/dynasties", get(api::list_dynasties))
        .route("/api/poems/:id", get(api::poem_detail))
        .route("/api/poems/by-fingerprint/:fingerprint", get(api::poem_by_fingerprint))
        .route("/api/lang", get(api::get_language).put(api::set_language));

    let public = Router::new()
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes());

    Router::new()
        .merge(poems)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
