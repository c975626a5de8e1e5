//! Load pipeline services
//!
//! Fetcher → Normalizer → Cache. The converter is a leaf used by the normalizer.

pub mod normalizer;
pub mod script_converter;
pub mod shard_cache;
pub mod shard_fetcher;

pub use normalizer::{assign_ids, Normalizer};
pub use script_converter::ScriptConverter;
pub use shard_cache::ShardCache;
pub use shard_fetcher::{
    shard_ids, FetchBatch, FetchError, HttpShardSource, ShardFetcher, ShardId, ShardOutcome,
    ShardSource,
};
