//! Store settings loaded from `config.toml`.
//!
//! Every field has a default, and a missing file means "all defaults", so the
//! store runs without any configuration. Secrets (bot token, API key) never
//! live here; they come from the environment.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Default path of the settings file, overridable with `STORE_CONFIG`.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Top-level store settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Shown in the settings summary
    pub store_name: String,
    /// Products with `0 < stock <= low_stock_threshold` count as at risk
    pub low_stock_threshold: u32,
    /// Sampling limits for AI insights
    pub insights: InsightsConfig,
    /// Gemini endpoint and models
    pub gemini: GeminiConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_name: "My Sari-Sari Store".to_string(),
            low_stock_threshold: 5,
            insights: InsightsConfig::default(),
            gemini: GeminiConfig::default(),
        }
    }
}

/// How much data is sent to the insights collaborator.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InsightsConfig {
    /// Number of products, from the start of the catalog
    pub product_sample: usize,
    /// Number of most recent sales
    pub sales_sample: usize,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            product_sample: 20,
            sales_sample: 50,
        }
    }
}

/// Gemini API settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeminiConfig {
    /// API root, without trailing slash
    pub base_url: String,
    /// Model used for product photo analysis
    pub vision_model: String,
    /// Model used for dashboard insights
    pub insights_model: String,
    /// Request timeout
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            vision_model: "gemini-2.5-flash-image".to_string(),
            insights_model: "gemini-2.5-pro".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Loads store settings from a TOML file.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<StoreConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!("No settings file at {:?}, using defaults", path);
        return Ok(StoreConfig::default());
    }

    tracing::debug!("Loading settings from {:?}", path);
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path:?}: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config file {path:?}: {e}"),
    })
}

/// Loads store settings from `STORE_CONFIG`, or `./config.toml` when unset.
///
/// # Errors
/// See [`load_config`].
pub fn load_default_config() -> Result<StoreConfig> {
    let path = std::env::var("STORE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            store_name = "Aling Nena's"
            low_stock_threshold = 3

            [insights]
            product_sample = 10
            sales_sample = 25

            [gemini]
            insights_model = "gemini-2.5-flash"
            timeout_secs = 30
        "#;

        let config: StoreConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.store_name, "Aling Nena's");
        assert_eq!(config.low_stock_threshold, 3);
        assert_eq!(config.insights.product_sample, 10);
        assert_eq!(config.insights.sales_sample, 25);
        assert_eq!(config.gemini.insights_model, "gemini-2.5-flash");
        assert_eq!(config.gemini.timeout_secs, 30);
        // Unset fields keep their defaults
        assert_eq!(config.gemini.vision_model, "gemini-2.5-flash-image");
    }

    #[test]
    fn test_empty_config_is_all_defaults() {
        let config: StoreConfig = toml::from_str("").unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.low_stock_threshold, 5);
    }

    #[test]
    fn test_missing_file_is_all_defaults() {
        let config = load_config("definitely/not/here/config.toml").unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = std::env::temp_dir().join(format!("sari-pos-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "low_stock_threshold = \"many\"").unwrap();

        let result = load_config(&path);
        assert!(matches!(result, Err(Error::Config { .. })));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
