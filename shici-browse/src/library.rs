//! Poem library: owns the merged poem sequence and the load pipeline
//!
//! A load walks the shard catalog in order. Fresh cache entries are used
//! as-is; every miss is fetched in one concurrent batch, normalized, and put
//! into the cache. The merged sequence is renumbered so `id` equals position.

use crate::models::{LanguageMode, Poem};
use crate::services::{
    assign_ids, shard_ids, Normalizer, ScriptConverter, ShardCache, ShardFetcher, ShardOutcome,
};
use serde::Serialize;
use shici_common::config::{ConversionMode, PlaceholderConfig, ShardSetConfig, TomlConfig};
use shici_common::storage::{KeyValueStore, LANG_SLOT};
use shici_common::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Library settings taken from the bootstrap config
#[derive(Debug, Clone)]
pub struct LibraryConfig {
    pub catalog: Vec<ShardSetConfig>,
    pub placeholders: PlaceholderConfig,
    pub conversion: ConversionMode,
    pub cache_ttl: Duration,
}

impl From<&TomlConfig> for LibraryConfig {
    fn from(config: &TomlConfig) -> Self {
        Self {
            catalog: config.catalog.clone(),
            placeholders: config.placeholders.clone(),
            conversion: config.conversion,
            cache_ttl: Duration::from_secs(config.cache_ttl_hours.saturating_mul(3600)),
        }
    }
}

/// Shard that contributed nothing to a load
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FailedShard {
    pub key: String,
    pub reason: String,
}

/// Summary of one load
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub poems: usize,
    pub cache_hits: usize,
    pub fetched: usize,
    pub failed: Vec<FailedShard>,
}

pub struct PoemLibrary {
    poems: Vec<Poem>,
    cache: ShardCache,
    fetcher: ShardFetcher,
    normalizer: Normalizer,
    config: LibraryConfig,
    store: Arc<dyn KeyValueStore>,
    language: LanguageMode,
}

/// Language mode saved in the `langMode` slot, default simplified
pub fn read_language(store: &dyn KeyValueStore) -> LanguageMode {
    match store.get(LANG_SLOT) {
        Ok(Some(flag)) => LanguageMode::from_flag(&flag),
        Ok(None) => LanguageMode::default(),
        Err(e) => {
            warn!(error = %e, "Could not read language mode, using default");
            LanguageMode::default()
        }
    }
}

fn converter_for(language: LanguageMode, conversion: ConversionMode) -> ScriptConverter {
    match language {
        LanguageMode::Simplified => ScriptConverter::new(conversion),
        LanguageMode::Traditional => ScriptConverter::identity(),
    }
}

impl PoemLibrary {
    /// Restore the saved language mode and hydrate the cache; nothing is fetched yet
    pub fn new(config: LibraryConfig, fetcher: ShardFetcher, store: Arc<dyn KeyValueStore>) -> Self {
        let language = read_language(store.as_ref());
        let cache = ShardCache::hydrate(Arc::clone(&store), config.cache_ttl, language);
        let normalizer = Normalizer::new(
            converter_for(language, config.conversion),
            config.placeholders.clone(),
        );

        info!(language = language.as_flag(), cached_shards = cache.len(), "Library initialized");

        Self {
            poems: Vec::new(),
            cache,
            fetcher,
            normalizer,
            config,
            store,
            language,
        }
    }

    /// Run the load pipeline over the whole catalog
    ///
    /// Fails with [`Error::NothingLoaded`] only when no poem is available and
    /// at least one shard failed; the previously loaded poems are kept then.
    pub async fn load(&mut self) -> Result<LoadReport> {
        let pass = run_pipeline(
            &self.config.catalog,
            &self.fetcher,
            &self.normalizer,
            &mut self.cache,
        )
        .await;

        if pass.nothing_loaded() {
            error!(failed = pass.report.failed.len(), "Poem data failed to load");
            return Err(Error::NothingLoaded {
                failed: pass.report.failed.len(),
            });
        }

        if pass.report.fetched > 0 {
            if let Err(e) = self.cache.save() {
                warn!(error = %e, "Could not persist shard cache");
            }
        }

        let report = pass.report;
        self.poems = pass.poems;
        info!(
            poems = report.poems,
            cache_hits = report.cache_hits,
            fetched = report.fetched,
            failed = report.failed.len(),
            "Poem data loaded"
        );
        Ok(report)
    }

    pub fn poems(&self) -> &[Poem] {
        &self.poems
    }

    /// Detail lookup by session id
    pub fn poem(&self, id: usize) -> Option<&Poem> {
        self.poems.get(id)
    }

    pub fn poem_by_fingerprint(&self, fingerprint: &str) -> Option<&Poem> {
        self.poems.iter().find(|p| p.fingerprint == fingerprint)
    }

    pub fn language(&self) -> LanguageMode {
        self.language
    }

    pub fn cache(&self) -> &ShardCache {
        &self.cache
    }

    /// Rebuild the library under a new language mode and persist the mode
    ///
    /// Returns `None` when the mode is unchanged. The new poems are loaded into
    /// a fresh cache; the mode, cache and poems are replaced only when that
    /// load succeeds, so a failed reload leaves the current state untouched.
    pub async fn set_language(&mut self, language: LanguageMode) -> Result<Option<LoadReport>> {
        if language == self.language {
            return Ok(None);
        }

        info!(language = language.as_flag(), "Language mode changing, reloading");
        let normalizer = Normalizer::new(
            converter_for(language, self.config.conversion),
            self.config.placeholders.clone(),
        );
        let mut cache = ShardCache::empty(Arc::clone(&self.store), self.config.cache_ttl, language);

        let pass = run_pipeline(&self.config.catalog, &self.fetcher, &normalizer, &mut cache).await;
        if pass.nothing_loaded() {
            warn!(
                language = language.as_flag(),
                failed = pass.report.failed.len(),
                "Reload failed, keeping current language mode"
            );
            return Err(Error::NothingLoaded {
                failed: pass.report.failed.len(),
            });
        }

        self.store.set(LANG_SLOT, language.as_flag())?;
        if let Err(e) = cache.save() {
            warn!(error = %e, "Could not persist shard cache");
        }

        self.language = language;
        self.normalizer = normalizer;
        self.cache = cache;
        self.poems = pass.poems;
        Ok(Some(pass.report))
    }
}

/// Poems and report of one pipeline run, not yet committed to the library
struct LoadPass {
    poems: Vec<Poem>,
    report: LoadReport,
}

impl LoadPass {
    fn nothing_loaded(&self) -> bool {
        self.report.poems == 0 && !self.report.failed.is_empty()
    }
}

/// Fill `cache` from its fresh entries and the network, merge in catalog order
///
/// Fetched shards are inserted in memory only; the caller decides whether to save.
async fn run_pipeline(
    catalog: &[ShardSetConfig],
    fetcher: &ShardFetcher,
    normalizer: &Normalizer,
    cache: &mut ShardCache,
) -> LoadPass {
    let shards = shard_ids(catalog);

    let cached: Vec<Option<Vec<Poem>>> = shards
        .iter()
        .map(|s| cache.get(&s.category, s.page).map(|p| p.to_vec()))
        .collect();

    let misses: Vec<_> = shards
        .iter()
        .zip(&cached)
        .filter(|(_, hit)| hit.is_none())
        .map(|(shard, _)| shard.clone())
        .collect();

    let mut report = LoadReport {
        cache_hits: shards.len() - misses.len(),
        ..LoadReport::default()
    };

    let mut outcomes: HashMap<String, ShardOutcome> = fetcher
        .fetch_all(&misses)
        .await
        .reports
        .into_iter()
        .map(|r| (r.shard.key(), r.outcome))
        .collect();

    let mut merged: Vec<Poem> = Vec::new();
    for (shard, hit) in shards.iter().zip(cached) {
        if let Some(poems) = hit {
            merged.extend(poems);
            continue;
        }

        match outcomes.remove(&shard.key()) {
            Some(ShardOutcome::Loaded(records)) => {
                let poems = normalizer.normalize_shard(&records, merged.len());
                cache.insert(&shard.category, shard.page, poems.clone());
                merged.extend(poems);
                report.fetched += 1;
            }
            Some(ShardOutcome::Failed(e)) => report.failed.push(FailedShard {
                key: shard.key(),
                reason: e.to_string(),
            }),
            None => report.failed.push(FailedShard {
                key: shard.key(),
                reason: "no result".to_string(),
            }),
        }
    }

    assign_ids(&mut merged);
    report.poems = merged.len();
    LoadPass {
        poems: merged,
        report,
    }
}
