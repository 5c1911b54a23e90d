use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ui::list::{FailurePolicy, DEFAULT_PAGE_SIZE};

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub paging: PagingConfig,
    #[serde(default)]
    pub favorites: FavoritesConfig,
}

/// Remote collection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the API (e.g., "https://pokeapi.co/api/v2").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
    /// Detail lookups allowed in flight per page (default: 8).
    #[serde(default = "default_max_concurrent_details")]
    pub max_concurrent_details: usize,
}

/// Pagination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Creatures requested per page (default: 20).
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// What a failed page fetch does: "retry" (default) or "exhaust".
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

/// Favorites persistence settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FavoritesConfig {
    /// Path of the favorites file. Defaults to the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_base_url() -> String {
    "https://pokeapi.co/api/v2".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_max_concurrent_details() -> usize {
    8
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_seconds))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.connect_timeout_seconds))
    }
}

impl FavoritesConfig {
    /// Resolved favorites file path.
    ///
    /// Uses `~/.local/share/creaturedex/favorites.json` on Linux, or the
    /// equivalent via `dirs::data_dir()`. Falls back to the current directory.
    pub fn resolved_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }
        let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        data_dir.join("creaturedex").join("favorites.json")
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            max_concurrent_details: default_max_concurrent_details(),
        }
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            failure_policy: FailurePolicy::default(),
        }
    }
}
