//! Integration tests for the shici-browse HTTP API
//!
//! The router runs against an in-memory shard source and storage, so no
//! network or filesystem access is needed.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use shici_browse::models::RawPoem;
use shici_browse::services::{FetchError, ShardFetcher, ShardId, ShardSource};
use shici_browse::{build_router, AppState, LibraryConfig, PoemLibrary};
use shici_common::config::{
    ConversionMode, PlaceholderConfig, ShardSetConfig, UntaggedPolicy,
};
use shici_common::storage::{KeyValueStore, MemoryStore, LANG_SLOT};
use shici_common::time;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt; // for `oneshot` method

/// Serves fixed shards keyed `<category>_<page>`; anything else fails
struct StaticSource {
    shards: HashMap<String, Vec<RawPoem>>,
}

#[async_trait]
impl ShardSource for StaticSource {
    async fn fetch(&self, shard: &ShardId) -> Result<Vec<RawPoem>, FetchError> {
        self.shards
            .get(&shard.key())
            .cloned()
            .ok_or_else(|| FetchError::HttpError(404, "Not Found".to_string()))
    }
}

fn raw(title: Option<&str>, author: Option<&str>, lines: &[&str]) -> RawPoem {
    RawPoem {
        title: title.map(str::to_string),
        author: author.map(str::to_string),
        paragraphs: Some(lines.iter().map(|l| l.to_string()).collect()),
        tags: None,
    }
}

fn catalog() -> Vec<ShardSetConfig> {
    vec![
        ShardSetConfig {
            category: "唐诗".to_string(),
            directory: "json".to_string(),
            file_prefix: "poet.tang".to_string(),
            count: 2,
            stride: 1000,
        },
        ShardSetConfig {
            category: "宋词".to_string(),
            directory: "ci".to_string(),
            file_prefix: "ci.song".to_string(),
            count: 1,
            stride: 1000,
        },
    ]
}

/// 唐诗_1000 is missing so every load carries one failed shard
fn source() -> StaticSource {
    let mut shards = HashMap::new();
    shards.insert(
        "唐诗_0".to_string(),
        vec![
            raw(Some("靜夜思"), Some("[唐] 李白"), &["床前明月光，疑是地上霜。", "舉頭望明月，低頭思故鄉。"]),
            raw(Some("月下獨酌"), Some("[唐] 李白"), &["花間一壺酒，獨酌無相親。"]),
            raw(Some("春曉"), Some("[唐] 孟浩然"), &["春眠不覺曉，處處聞啼鳥。"]),
        ],
    );
    shards.insert(
        "宋词_0".to_string(),
        vec![
            raw(Some("水調歌頭"), Some("[宋] 蘇軾"), &["明月幾時有？把酒問青天。"]),
            raw(None, None, &["月落烏啼霜滿天"]),
        ],
    );
    StaticSource { shards }
}

async fn setup_app_with(store: Arc<dyn KeyValueStore>) -> axum::Router {
    let config = LibraryConfig {
        catalog: catalog(),
        placeholders: PlaceholderConfig::default(),
        conversion: ConversionMode::TraditionalToSimplified,
        cache_ttl: Duration::from_secs(24 * 3600),
    };
    let mut library = PoemLibrary::new(config, ShardFetcher::new(Arc::new(source())), store);
    library.load().await.expect("Library should load");
    build_router(AppState::new(library, UntaggedPolicy::Exclude))
}

async fn setup_app() -> axum::Router {
    setup_app_with(Arc::new(MemoryStore::new())).await
}

fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Percent-encode a query value (CJK keywords are multi-byte)
fn encode(value: &str) -> String {
    value.bytes().map(|b| format!("%{:02X}", b)).collect()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app.clone().oneshot(test_request("GET", uri)).await.unwrap();
    let status = response.status();
    (status, extract_json(response.into_body()).await)
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app().await;
    let (status, body) = get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "shici-browse");
    assert!(body["version"].is_string());
    assert_eq!(body["poems"], 5);
}

#[tokio::test]
async fn test_buildinfo_endpoint() {
    let app = setup_app().await;
    let (status, body) = get_json(&app, "/api/buildinfo").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["git_hash"].is_string());
    assert!(body["build_profile"].is_string());
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_search_ranks_results() {
    let app = setup_app().await;
    let uri = format!("/api/search?q={}", encode("月"));
    let (status, body) = get_json(&app, &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["no_results"], false);
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 10);

    let results = body["results"].as_array().unwrap();
    let scores: Vec<u64> = results.iter().map(|r| r["score"].as_u64().unwrap()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    // 月下独酌 has the keyword in its title
    assert_eq!(results[0]["title"], "月下独酌");
    assert_eq!(results[0]["score"], 3);
}

#[tokio::test]
async fn test_search_empty_keyword_is_400_with_prompt() {
    let app = setup_app().await;
    let (status, body) = get_json(&app, "/api/search?q=%20%20").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "EMPTY_KEYWORD");
    assert_eq!(body["error"]["message"], "请输入搜索关键词！");
}

#[tokio::test]
async fn test_search_no_matches() {
    let app = setup_app().await;
    let uri = format!("/api/search?q={}", encode("雪"));
    let (status, body) = get_json(&app, &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["no_results"], true);
    assert_eq!(body["total_results"], 0);
    assert!(body["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_top_variant() {
    let app = setup_app().await;
    let uri = format!("/api/search?q={}&top=true", encode("月"));
    let (status, body) = get_json(&app, &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_pages"], 1);
    assert!(body["results"].as_array().unwrap().len() <= 10);
}

// =============================================================================
// Filters
// =============================================================================

#[tokio::test]
async fn test_live_filter_matches_author() {
    let app = setup_app().await;
    let uri = format!("/api/filter?q={}", encode("李白"));
    let (_, body) = get_json(&app, &uri).await;

    let titles: Vec<&str> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["静夜思", "月下独酌"]);
}

#[tokio::test]
async fn test_live_filter_empty_shows_all() {
    let app = setup_app().await;
    let (_, body) = get_json(&app, "/api/filter?q=").await;
    assert_eq!(body["total_results"], 5);
}

#[tokio::test]
async fn test_dynasty_filter() {
    let app = setup_app().await;
    let uri = format!("/api/dynasty?tag={}", encode("宋"));
    let (status, body) = get_json(&app, &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_results"], 1);
    assert_eq!(body["results"][0]["author"], "[宋] 苏轼");
}

#[tokio::test]
async fn test_dynasty_filter_without_tag_shows_all() {
    let app = setup_app().await;
    let (_, body) = get_json(&app, "/api/dynasty").await;
    assert_eq!(body["total_results"], 5);
}

#[tokio::test]
async fn test_dynasties_list() {
    let app = setup_app().await;
    let (_, body) = get_json(&app, "/api/dynasties").await;
    assert_eq!(body, json!(["唐", "宋"]));
}

// =============================================================================
// Detail and daily
// =============================================================================

#[tokio::test]
async fn test_poem_detail() {
    let app = setup_app().await;
    let (status, body) = get_json(&app, "/api/poems/4").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 4);
    assert_eq!(body["title"], "无题");
    assert_eq!(body["author"], "未知");
    assert_eq!(body["paragraphs"][0], "月落乌啼霜满天");
}

#[tokio::test]
async fn test_poem_detail_not_found() {
    let app = setup_app().await;
    let (status, body) = get_json(&app, "/api/poems/99").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_poem_detail_non_numeric_id() {
    let app = setup_app().await;
    let (status, body) = get_json(&app, "/api/poems/abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn test_poem_by_fingerprint() {
    let app = setup_app().await;
    let (_, detail) = get_json(&app, "/api/poems/2").await;
    let fingerprint = detail["fingerprint"].as_str().unwrap().to_string();

    let (status, body) = get_json(&app, &format!("/api/poems/by-fingerprint/{}", fingerprint)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "春晓");
}

#[tokio::test]
async fn test_daily_is_date_seeded() {
    let app = setup_app().await;
    let (status, body) = get_json(&app, "/api/daily").await;
    assert_eq!(status, StatusCode::OK);

    let expected = shici_browse::recommend::daily_index(time::today(), 5).unwrap();
    assert_eq!(body["poem"]["id"], expected);

    let carousel = body["carousel"].as_array().unwrap();
    assert_eq!(carousel.len(), 5);
    assert_eq!(carousel[0]["id"], expected);

    // Same request again: same pick
    let (_, again) = get_json(&app, "/api/daily").await;
    assert_eq!(again["poem"]["id"], body["poem"]["id"]);
}

// =============================================================================
// Language mode
// =============================================================================

#[tokio::test]
async fn test_language_toggle_reloads_in_traditional() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let app = setup_app_with(Arc::clone(&store)).await;

    let (_, body) = get_json(&app, "/api/lang").await;
    assert_eq!(body["mode"], "cn");

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/lang", json!({"mode": "tw"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["mode"], "tw");
    assert_eq!(body["reload"]["poems"], 5);
    assert_eq!(body["reload"]["failed"][0]["key"], "唐诗_1000");

    assert_eq!(store.get(LANG_SLOT).unwrap().as_deref(), Some("tw"));

    let (_, detail) = get_json(&app, "/api/poems/0").await;
    assert_eq!(detail["title"], "靜夜思");
}

#[tokio::test]
async fn test_language_unchanged_has_no_reload() {
    let app = setup_app().await;
    let response = app
        .oneshot(json_request("PUT", "/api/lang", json!({"mode": "cn"})))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;

    assert_eq!(body["mode"], "cn");
    assert!(body.get("reload").is_none());
}

#[tokio::test]
async fn test_language_invalid_mode_is_400() {
    let app = setup_app().await;
    let response = app
        .oneshot(json_request("PUT", "/api/lang", json!({"mode": "klingon"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}
