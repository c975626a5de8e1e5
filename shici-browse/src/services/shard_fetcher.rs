//! Dataset shard retrieval
//!
//! Every shard of a load is requested at once and the batch settles only when
//! all requests have finished. A failed shard does not fail the batch: it is
//! reported as [`ShardOutcome::Failed`] with the reason and contributes no
//! records. There is no retry and no concurrency limit.

use crate::models::RawPoem;
use async_trait::async_trait;
use futures::future::join_all;
use shici_common::config::ShardSetConfig;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("shici-browse/", env!("CARGO_PKG_VERSION"));

/// Shard retrieval errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP error {0}: {1}")]
    HttpError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// One shard file: `<directory>/<file_prefix>.<page>.json`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShardId {
    pub category: String,
    pub directory: String,
    pub file_prefix: String,
    pub page: u32,
}

impl ShardId {
    /// Cache key, `<category>_<page>`
    pub fn key(&self) -> String {
        format!("{}_{}", self.category, self.page)
    }

    /// Path relative to the base URL
    pub fn path(&self) -> String {
        if self.directory.is_empty() {
            format!("{}.{}.json", self.file_prefix, self.page)
        } else {
            format!("{}/{}.{}.json", self.directory, self.file_prefix, self.page)
        }
    }

    pub fn url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.path())
    }
}

/// Expand a catalog into its shards, in catalog order
pub fn shard_ids(catalog: &[ShardSetConfig]) -> Vec<ShardId> {
    catalog
        .iter()
        .flat_map(|set| {
            (0..set.count).map(move |i| ShardId {
                category: set.category.clone(),
                directory: set.directory.clone(),
                file_prefix: set.file_prefix.clone(),
                page: i * set.stride,
            })
        })
        .collect()
}

/// Source of raw shard records
#[async_trait]
pub trait ShardSource: Send + Sync {
    async fn fetch(&self, shard: &ShardId) -> Result<Vec<RawPoem>, FetchError>;
}

/// Fetches shards from a static-file HTTP endpoint
pub struct HttpShardSource {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpShardSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.to_string(),
        })
    }
}

#[async_trait]
impl ShardSource for HttpShardSource {
    async fn fetch(&self, shard: &ShardId) -> Result<Vec<RawPoem>, FetchError> {
        let url = shard.url(&self.base_url);
        debug!(shard = %shard.key(), url = %url, "Requesting shard");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(FetchError::HttpError(status.as_u16(), error_text));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::NetworkError(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| FetchError::ParseError(e.to_string()))
    }
}

/// Result of one shard retrieval
#[derive(Debug, Clone, PartialEq)]
pub enum ShardOutcome {
    Loaded(Vec<RawPoem>),
    Failed(FetchError),
}

#[derive(Debug, Clone)]
pub struct ShardReport {
    pub shard: ShardId,
    pub outcome: ShardOutcome,
}

/// Settled results of a batch, in request order
#[derive(Debug, Clone, Default)]
pub struct FetchBatch {
    pub reports: Vec<ShardReport>,
}

impl FetchBatch {
    pub fn loaded_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, ShardOutcome::Loaded(_)))
            .count()
    }

    /// Shards that failed, with their reasons
    pub fn failures(&self) -> Vec<(&ShardId, &FetchError)> {
        self.reports
            .iter()
            .filter_map(|r| match &r.outcome {
                ShardOutcome::Failed(e) => Some((&r.shard, e)),
                ShardOutcome::Loaded(_) => None,
            })
            .collect()
    }
}

/// Issues all shard requests of a batch concurrently
#[derive(Clone)]
pub struct ShardFetcher {
    source: Arc<dyn ShardSource>,
}

impl ShardFetcher {
    pub fn new(source: Arc<dyn ShardSource>) -> Self {
        Self { source }
    }

    /// Fetch every shard; resolves once all have settled
    pub async fn fetch_all(&self, shards: &[ShardId]) -> FetchBatch {
        let futures = shards.iter().map(|shard| {
            let source = Arc::clone(&self.source);
            async move {
                let outcome = match source.fetch(shard).await {
                    Ok(records) => {
                        debug!(shard = %shard.key(), records = records.len(), "Shard loaded");
                        ShardOutcome::Loaded(records)
                    }
                    Err(e) => {
                        warn!(shard = %shard.key(), error = %e, "Shard failed, treating as empty");
                        ShardOutcome::Failed(e)
                    }
                };
                ShardReport {
                    shard: shard.clone(),
                    outcome,
                }
            }
        });

        let batch = FetchBatch {
            reports: join_all(futures).await,
        };

        info!(
            requested = shards.len(),
            loaded = batch.loaded_count(),
            failed = shards.len() - batch.loaded_count(),
            "Shard batch settled"
        );

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct StaticSource {
        shards: HashMap<String, Vec<RawPoem>>,
    }

    #[async_trait]
    impl ShardSource for StaticSource {
        async fn fetch(&self, shard: &ShardId) -> Result<Vec<RawPoem>, FetchError> {
            self.shards
                .get(&shard.key())
                .cloned()
                .ok_or_else(|| FetchError::HttpError(404, shard.path()))
        }
    }

    fn titled(title: &str) -> RawPoem {
        RawPoem {
            title: Some(title.to_string()),
            ..RawPoem::default()
        }
    }

    fn tang_set(count: u32) -> ShardSetConfig {
        ShardSetConfig {
            category: "唐诗".to_string(),
            directory: "json".to_string(),
            file_prefix: "poet.tang".to_string(),
            count,
            stride: 1000,
        }
    }

    #[test]
    fn test_shard_url_template() {
        let shard = &shard_ids(&[tang_set(3)])[2];
        assert_eq!(shard.page, 2000);
        assert_eq!(shard.key(), "唐诗_2000");
        assert_eq!(
            shard.url("https://example.org/data/"),
            "https://example.org/data/json/poet.tang.2000.json"
        );
    }

    #[test]
    fn test_shard_path_without_directory() {
        let shard = ShardId {
            category: "宋诗".to_string(),
            directory: String::new(),
            file_prefix: "poet.song".to_string(),
            page: 1000,
        };
        assert_eq!(shard.path(), "poet.song.1000.json");
    }

    #[test]
    fn test_shard_ids_follow_catalog_order() {
        let mut song = tang_set(2);
        song.category = "宋词".to_string();
        let ids = shard_ids(&[tang_set(2), song]);
        let keys: Vec<String> = ids.iter().map(|s| s.key()).collect();
        assert_eq!(keys, vec!["唐诗_0", "唐诗_1000", "宋词_0", "宋词_1000"]);
    }

    #[tokio::test]
    async fn test_fetch_all_isolates_failures() {
        let mut shards = HashMap::new();
        shards.insert("唐诗_0".to_string(), vec![titled("a"), titled("b")]);
        shards.insert("唐诗_2000".to_string(), vec![titled("c")]);
        let fetcher = ShardFetcher::new(Arc::new(StaticSource { shards }));

        let ids = shard_ids(&[tang_set(3)]);
        let batch = fetcher.fetch_all(&ids).await;

        assert_eq!(batch.reports.len(), 3);
        assert_eq!(batch.loaded_count(), 2);
        let failures = batch.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0.page, 1000);
        assert!(matches!(failures[0].1, FetchError::HttpError(404, _)));

        // Request order is preserved
        match &batch.reports[2].outcome {
            ShardOutcome::Loaded(records) => assert_eq!(records[0].title.as_deref(), Some("c")),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_all_empty_request() {
        let fetcher = ShardFetcher::new(Arc::new(StaticSource {
            shards: HashMap::new(),
        }));
        let batch = fetcher.fetch_all(&[]).await;
        assert!(batch.reports.is_empty());
        assert_eq!(batch.loaded_count(), 0);
    }

    #[test]
    fn test_http_source_creation() {
        let source = HttpShardSource::new("https://example.org", Duration::from_secs(5));
        assert!(source.is_ok());
    }
}
