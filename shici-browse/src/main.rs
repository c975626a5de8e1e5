//! shici-browse - classical Chinese poetry browser service
//!
//! Loads the poem catalog at startup (cache first, network for the rest) and
//! serves it over a local JSON API.

use anyhow::{Context, Result};
use clap::Parser;
use shici_common::config::{
    load_toml_config, CompiledDefaults, RootFolderInitializer, RootFolderResolver,
};
use shici_common::storage::{FileStore, KeyValueStore};
use shici_browse::services::{HttpShardSource, ShardFetcher};
use shici_browse::{build_router, AppState, LibraryConfig, PoemLibrary};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shici-browse", version, about = "Browse classical Chinese poetry")]
struct Args {
    /// HTTP port (overrides config)
    #[arg(long, env = "SHICI_PORT")]
    port: Option<u16>,

    /// Folder for cache and preferences (overrides env and config)
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// Config file (default: ~/.config/shici/config.toml)
    #[arg(long, env = "SHICI_CONFIG")]
    config: Option<PathBuf>,

    /// Shard endpoint base URL (overrides config)
    #[arg(long, env = "SHICI_BASE_URL")]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing so its logging level can seed the filter
    let config_result = load_toml_config(args.config.as_deref());
    let level = config_result
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| CompiledDefaults::for_current_platform().log_level);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level)),
        )
        .init();

    info!(
        "Starting shici-browse v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let mut config = config_result.context("Failed to load configuration")?;
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    let port = args.port.unwrap_or(config.port);

    let root_folder = RootFolderResolver::new("shici-browse")
        .with_cli_arg(args.root_folder)
        .with_toml(&config)
        .resolve();
    let initializer = RootFolderInitializer::new(root_folder);
    initializer.ensure_directory_exists()?;

    let storage_path = initializer.storage_path();
    info!("Storage path: {}", storage_path.display());
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&storage_path)?);

    let source = HttpShardSource::new(&config.base_url, Duration::from_secs(config.timeout_secs))
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;
    info!(base_url = %config.base_url, timeout_secs = config.timeout_secs, "Shard source ready");

    let mut library = PoemLibrary::new(
        LibraryConfig::from(&config),
        ShardFetcher::new(Arc::new(source)),
        store,
    );

    match library.load().await {
        Ok(report) => {
            if !report.failed.is_empty() {
                warn!(
                    failed = report.failed.len(),
                    "Some shards failed to load; browsing the rest"
                );
            }
            info!("✓ Loaded {} poems", report.poems);
        }
        Err(e) => {
            error!("数据加载失败: {}", e);
            return Err(e.into());
        }
    }

    let state = AppState::new(library, config.untagged_policy);
    let app = build_router(state);

    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("shici-browse listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
