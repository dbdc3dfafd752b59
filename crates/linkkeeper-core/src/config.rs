use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::analysis::apply::ApplyStrategy;
use crate::analysis::catalog::CategoryPattern;
use crate::storage::models::{BOOKMARKS_BAR, DEFAULT_FOLDER};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: String,
    pub scan: ScanConfig,
    pub bundling: BundlingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Simulated latency of one liveness probe.
    pub delay_ms: u64,
    pub estimate_per_item_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BundlingConfig {
    pub min_score: u32,
    pub default_folders: Vec<String>,
    pub apply_strategy: ApplyStrategy,
    pub extra_categories: Vec<CategoryPattern>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: "linkkeeper.db".to_string(),
            scan: ScanConfig::default(),
            bundling: BundlingConfig::default(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            delay_ms: 0,
            estimate_per_item_ms: 150,
        }
    }
}

impl ScanConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for BundlingConfig {
    fn default() -> Self {
        Self {
            min_score: 2,
            default_folders: vec![DEFAULT_FOLDER.to_string(), BOOKMARKS_BAR.to_string()],
            apply_strategy: ApplyStrategy::default(),
            extra_categories: Vec::new(),
        }
    }
}

impl BundlingConfig {
    /// A folder counts as unbundled when it is empty or exactly one of the
    /// generic defaults. A user folder named `other bookmarks` is specific.
    pub fn is_generic_folder(&self, folder: &str) -> bool {
        folder.is_empty() || self.default_folders.iter().any(|name| name == folder)
    }
}

/// Load `LinkKeeper.toml` from the working directory (optional), then overlay
/// `LINKKEEPER_*` environment variables (`__` separates nested keys).
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("LinkKeeper").required(false))
        .add_source(env_source())
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

pub fn load_configuration_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::from(path).required(true))
        .add_source(env_source())
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

fn env_source() -> Environment {
    Environment::with_prefix("LINKKEEPER")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
