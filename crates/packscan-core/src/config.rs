//! Configuration structures for the packscan pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PackscanConfig {
    /// Product API configuration.
    pub api: ApiConfig,

    /// Insight store configuration.
    pub store: StoreConfig,
}

/// Product API endpoints and credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the product database API.
    pub product_base_url: String,

    /// Base URL of the static file host serving per-image OCR JSON.
    pub static_base_url: String,

    /// Account used for product updates.
    pub user_id: String,

    /// Password for `user_id`.
    pub password: String,

    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,

    /// How many times a timed-out or refused request is retried.
    pub max_retries: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            product_base_url: "https://world.openfoodfacts.org".to_string(),
            static_base_url: "https://static.openfoodfacts.org".to_string(),
            user_id: "packscan-app".to_string(),
            password: String::new(),
            timeout_secs: 10,
            max_retries: 3,
        }
    }
}

/// Insight store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the SQLite database file.
    pub db_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("packscan.db"),
        }
    }
}

impl PackscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
