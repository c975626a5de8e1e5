//! Normalized shard cache mirrored to durable storage
//!
//! Entries are keyed `<category>_<page>`. Freshness is judged against one
//! timestamp shared by the whole blob, so any `put` refreshes every entry and an
//! expired blob drops every entry at once. The blob is rewritten in full after
//! each `put`.

use crate::models::{LanguageMode, Poem};
use serde::{Deserialize, Serialize};
use shici_common::storage::{KeyValueStore, CACHE_SLOT};
use shici_common::{time, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Persisted form: `{ data, timestamp, mode }`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheBlob {
    data: HashMap<String, Vec<Poem>>,
    /// Epoch milliseconds of the last `put`
    timestamp: i64,
    /// Language mode the shards were normalized under
    #[serde(default)]
    mode: LanguageMode,
}

pub fn cache_key(category: &str, page: u32) -> String {
    format!("{}_{}", category, page)
}

pub struct ShardCache {
    entries: HashMap<String, Vec<Poem>>,
    timestamp: i64,
    ttl: Duration,
    mode: LanguageMode,
    store: Arc<dyn KeyValueStore>,
}

impl ShardCache {
    /// Empty cache that will persist into `store`
    pub fn empty(store: Arc<dyn KeyValueStore>, ttl: Duration, mode: LanguageMode) -> Self {
        Self {
            entries: HashMap::new(),
            timestamp: time::now_millis(),
            ttl,
            mode,
            store,
        }
    }

    /// Load the persisted blob if present, fresh and built for `mode`
    pub fn hydrate(store: Arc<dyn KeyValueStore>, ttl: Duration, mode: LanguageMode) -> Self {
        Self::hydrate_at(store, ttl, mode, time::now_millis())
    }

    pub fn hydrate_at(
        store: Arc<dyn KeyValueStore>,
        ttl: Duration,
        mode: LanguageMode,
        now_ms: i64,
    ) -> Self {
        let mut cache = Self::empty(Arc::clone(&store), ttl, mode);
        cache.timestamp = now_ms;

        let content = match store.get(CACHE_SLOT) {
            Ok(Some(content)) => content,
            Ok(None) => {
                debug!("No persisted shard cache");
                return cache;
            }
            Err(e) => {
                warn!(error = %e, "Could not read shard cache, starting empty");
                return cache;
            }
        };

        let blob: CacheBlob = match serde_json::from_str(&content) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "Discarding corrupt shard cache");
                return cache;
            }
        };

        if !is_fresh(blob.timestamp, ttl, now_ms) {
            info!(age_ms = now_ms - blob.timestamp, "Discarding expired shard cache");
            return cache;
        }

        if blob.mode != mode {
            info!(
                cached = blob.mode.as_flag(),
                current = mode.as_flag(),
                "Discarding shard cache built for another language mode"
            );
            return cache;
        }

        info!(entries = blob.data.len(), "Hydrated shard cache");
        cache.entries = blob.data;
        cache.timestamp = blob.timestamp;
        cache
    }

    pub fn get(&self, category: &str, page: u32) -> Option<&[Poem]> {
        self.get_at(category, page, time::now_millis())
    }

    /// Cached shard, or `None` on a miss or when the blob has expired
    pub fn get_at(&self, category: &str, page: u32, now_ms: i64) -> Option<&[Poem]> {
        if !is_fresh(self.timestamp, self.ttl, now_ms) {
            return None;
        }
        self.entries
            .get(&cache_key(category, page))
            .map(|poems| poems.as_slice())
    }

    pub fn put(&mut self, category: &str, page: u32, data: Vec<Poem>) -> Result<()> {
        self.put_at(category, page, data, time::now_millis())
    }

    /// Insert or overwrite an entry, refresh the shared timestamp, persist the blob
    ///
    /// The in-memory entry is kept even when persisting fails.
    pub fn put_at(&mut self, category: &str, page: u32, data: Vec<Poem>, now_ms: i64) -> Result<()> {
        self.insert_at(category, page, data, now_ms);
        self.save()
    }

    /// Insert or overwrite an entry in memory only; `save` writes it out
    pub fn insert(&mut self, category: &str, page: u32, data: Vec<Poem>) {
        self.insert_at(category, page, data, time::now_millis())
    }

    pub fn insert_at(&mut self, category: &str, page: u32, data: Vec<Poem>, now_ms: i64) {
        self.entries.insert(cache_key(category, page), data);
        self.timestamp = now_ms;
    }

    /// Drop every entry and persist the empty blob
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.timestamp = time::now_millis();
        self.save()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn mode(&self) -> LanguageMode {
        self.mode
    }

    /// Rewrite the persisted blob from the in-memory entries
    pub fn save(&self) -> Result<()> {
        let blob = CacheBlob {
            data: self.entries.clone(),
            timestamp: self.timestamp,
            mode: self.mode,
        };
        let json = serde_json::to_string(&blob)?;
        self.store.set(CACHE_SLOT, &json)
    }
}

fn is_fresh(timestamp: i64, ttl: Duration, now_ms: i64) -> bool {
    // A timestamp ahead of the clock is not trusted
    if timestamp > now_ms {
        return false;
    }
    let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
    now_ms - timestamp < ttl_ms
}
