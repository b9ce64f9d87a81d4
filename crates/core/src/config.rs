//! # Configuration
//!
//! Runtime settings stored as `config.json` in the runtime directory
//! (`.switchd`, or `SWITCHD_RUNTIME_PATH` when set). A missing or unreadable
//! file falls back to defaults.

use crate::engine::reservation::DEFAULT_PICKUP_WINDOW_DAYS;
use crate::models::ModelConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

const CONFIG_FILE: &str = "config.json";

/// Get the runtime directory path (.switchd)
pub fn runtime_path() -> PathBuf {
    if let Ok(path) = std::env::var("SWITCHD_RUNTIME_PATH") {
        return PathBuf::from(path);
    }

    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".switchd")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SwitchdConfig {
    /// Provider and model for similar-item suggestions
    pub model: ModelConfig,
    /// Flat price of a reserved item at checkout, in credits
    pub item_price: u64,
    /// Length of the pickup window after an item's availability date
    pub pickup_window_days: u32,
    /// Upper bound on a single suggestion request
    pub suggestion_timeout_secs: u64,
}

impl Default for SwitchdConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            item_price: 5,
            pickup_window_days: DEFAULT_PICKUP_WINDOW_DAYS,
            suggestion_timeout_secs: 30,
        }
    }
}

/// Partial update, as sent by `PATCH /config`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_price: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_window_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion_timeout_secs: Option<u64>,
}

impl SwitchdConfig {
    pub fn config_path(runtime_dir: &Path) -> PathBuf {
        runtime_dir.join(CONFIG_FILE)
    }

    /// Load from `runtime_dir/config.json`
    pub async fn load(runtime_dir: &Path) -> Self {
        let path = Self::config_path(runtime_dir);
        match fs::read_to_string(&path).await {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Ignoring malformed config: {}", e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub async fn save(&self, runtime_dir: &Path) -> Result<()> {
        fs::create_dir_all(runtime_dir)
            .await
            .with_context(|| format!("Failed to create runtime directory: {:?}", runtime_dir))?;
        let path = Self::config_path(runtime_dir);
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write config: {:?}", path))
    }

    pub fn merge(&mut self, patch: ConfigPatch) {
        if let Some(model) = patch.model {
            self.model = model;
        }
        if let Some(price) = patch.item_price {
            self.item_price = price;
        }
        if let Some(days) = patch.pickup_window_days {
            self.pickup_window_days = days;
        }
        if let Some(secs) = patch.suggestion_timeout_secs {
            self.suggestion_timeout_secs = secs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LlmProvider;

    #[test]
    fn test_defaults() {
        let config = SwitchdConfig::default();
        assert_eq!(config.item_price, 5);
        assert_eq!(config.pickup_window_days, 3);
        assert_eq!(config.suggestion_timeout_secs, 30);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: SwitchdConfig = serde_json::from_str(r#"{"item_price": 7}"#).unwrap();
        assert_eq!(config.item_price, 7);
        assert_eq!(config.pickup_window_days, 3);
    }

    #[test]
    fn test_merge_only_touches_given_fields() {
        let mut config = SwitchdConfig::default();
        config.merge(ConfigPatch {
            model: Some(ModelConfig::with_provider(LlmProvider::Gemini, "gemini-2.0-flash")),
            suggestion_timeout_secs: Some(10),
            ..Default::default()
        });

        assert_eq!(config.model.provider, LlmProvider::Gemini);
        assert_eq!(config.suggestion_timeout_secs, 10);
        assert_eq!(config.item_price, 5);
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("switchd-config-{}", std::process::id()));
        let mut config = SwitchdConfig::default();
        config.item_price = 9;
        config.save(&dir).await.unwrap();

        let loaded = SwitchdConfig::load(&dir).await;
        assert_eq!(loaded, config);

        let _ = fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let dir = std::env::temp_dir().join("switchd-config-does-not-exist");
        assert_eq!(SwitchdConfig::load(&dir).await, SwitchdConfig::default());
    }
}
