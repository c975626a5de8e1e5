//! Configuration loading and root folder resolution
//!
//! Bootstrap configuration comes from an optional TOML file. A missing default
//! config file is not an error: a warning is logged and compiled defaults apply.
//!
//! Root folder priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`SHICI_ROOT_FOLDER`, then `SHICI_ROOT`)
//! 3. TOML config file (`root_folder`)
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default remote base for the chinese-poetry dataset shards
pub const DEFAULT_BASE_URL: &str = "https://cdn.jsdelivr.net/gh/chinese-poetry/chinese-poetry";

/// Default HTTP port for the browse service
pub const DEFAULT_PORT: u16 = 5730;

/// Compiled defaults used when nothing else is configured
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
    pub port: u16,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            log_level: default_log_level(),
            port: DEFAULT_PORT,
        }
    }
}

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the persisted cache and preference slots
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// HTTP port for the JSON API
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL of the shard endpoint (no trailing slash needed)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout for shard retrievals
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Expiry window of the persisted shard cache
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: u64,

    /// Script conversion applied when the language mode is simplified
    #[serde(default)]
    pub conversion: ConversionMode,

    /// How the dynasty filter treats authors without a `[tag]` prefix
    #[serde(default)]
    pub untagged_policy: UntaggedPolicy,

    #[serde(default)]
    pub placeholders: PlaceholderConfig,

    /// Shard sets to load, in merge order
    #[serde(default = "default_catalog")]
    pub catalog: Vec<ShardSetConfig>,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            logging: LoggingConfig::default(),
            port: default_port(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_hours: default_cache_ttl_hours(),
            conversion: ConversionMode::default(),
            untagged_policy: UntaggedPolicy::default(),
            placeholders: PlaceholderConfig::default(),
            catalog: default_catalog(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Character conversion applied to poem text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConversionMode {
    /// Traditional → simplified
    #[default]
    #[serde(rename = "t2s")]
    TraditionalToSimplified,
    /// Hong Kong variant → mainland simplified
    #[serde(rename = "hk2cn")]
    HongKongToMainland,
    /// Taiwan variant → mainland simplified
    #[serde(rename = "tw2cn")]
    TaiwanToMainland,
    /// Pass text through unchanged
    #[serde(rename = "none")]
    Identity,
}

/// Treatment of authors lacking a bracketed dynasty tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UntaggedPolicy {
    #[default]
    Exclude,
    Include,
}

/// Strings substituted for missing record fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderConfig {
    #[serde(default = "default_title_placeholder")]
    pub title: String,
    #[serde(default = "default_author_placeholder")]
    pub author: String,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            title: default_title_placeholder(),
            author: default_author_placeholder(),
        }
    }
}

/// One family of shards, e.g. the Tang poems split into ten files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardSetConfig {
    /// Display category, also the first half of the cache key
    pub category: String,
    /// Remote directory under the base URL
    pub directory: String,
    /// File name prefix, e.g. `poet.tang`
    pub file_prefix: String,
    /// Number of shards in the set
    pub count: u32,
    /// Page offset step between consecutive shards
    #[serde(default = "default_stride")]
    pub stride: u32,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_cache_ttl_hours() -> u64 {
    24
}

fn default_title_placeholder() -> String {
    "无题".to_string()
}

fn default_author_placeholder() -> String {
    "未知".to_string()
}

fn default_stride() -> u32 {
    1000
}

/// Tang poems then Song ci, ten shards each
pub fn default_catalog() -> Vec<ShardSetConfig> {
    vec![
        ShardSetConfig {
            category: "唐诗".to_string(),
            directory: "json".to_string(),
            file_prefix: "poet.tang".to_string(),
            count: 10,
            stride: default_stride(),
        },
        ShardSetConfig {
            category: "宋词".to_string(),
            directory: "ci".to_string(),
            file_prefix: "ci.song".to_string(),
            count: 10,
            stride: default_stride(),
        },
    ]
}

/// Default location of the TOML config file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("shici").join("config.toml"))
}

/// Load bootstrap configuration
///
/// An explicitly requested file must exist and parse. When no path is given the
/// platform default is tried; if it is missing, defaults are returned.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!("Config file not found: {}", path.display())));
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            other => {
                warn!(
                    "No config file found{}; using compiled defaults",
                    other
                        .map(|p| format!(" at {}", p.display()))
                        .unwrap_or_default()
                );
                return Ok(TomlConfig::default());
            }
        },
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
    let config = parse_toml_config(&content)?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Parse and validate TOML configuration text
pub fn parse_toml_config(content: &str) -> Result<TomlConfig> {
    let config: TomlConfig =
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &TomlConfig) -> Result<()> {
    if config.base_url.trim().is_empty() {
        return Err(Error::Config("base_url must not be empty".to_string()));
    }
    if config.timeout_secs == 0 {
        return Err(Error::Config("timeout_secs must be positive".to_string()));
    }
    for set in &config.catalog {
        if set.category.trim().is_empty() || set.file_prefix.trim().is_empty() {
            return Err(Error::Config(format!(
                "Shard set needs a category and file_prefix: {:?}",
                set
            )));
        }
    }
    Ok(())
}

/// Resolves the root folder following the priority order in the module docs
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_arg: None,
            toml_root: None,
        }
    }

    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    pub fn with_toml(mut self, config: &TomlConfig) -> Self {
        self.toml_root = config.root_folder.clone();
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            info!(module = %self.module_name, "Root folder from command line: {}", path.display());
            return path.clone();
        }

        for var in ["SHICI_ROOT_FOLDER", "SHICI_ROOT"] {
            if let Ok(path) = std::env::var(var) {
                if !path.trim().is_empty() {
                    info!(module = %self.module_name, "Root folder from {}: {}", var, path);
                    return PathBuf::from(path);
                }
            }
        }

        if let Some(path) = &self.toml_root {
            info!(module = %self.module_name, "Root folder from TOML: {}", path.display());
            return path.clone();
        }

        let path = CompiledDefaults::for_current_platform().root_folder;
        info!(module = %self.module_name, "Root folder (default): {}", path.display());
        path
    }
}

/// Creates the root folder on first run
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            info!("Creating root folder: {}", self.root_folder.display());
            std::fs::create_dir_all(&self.root_folder)?;
        }
        Ok(())
    }

    /// Directory holding the persisted storage slots
    pub fn storage_path(&self) -> PathBuf {
        self.root_folder.join("storage")
    }
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("shici"))
        .unwrap_or_else(|| PathBuf::from("./shici_data"))
}
