//! Bridge configuration
//!
//! Read from `tether.toml` next to the page bundle:
//!
//! ```toml
//! namespace = "shiny_leptos_showcase"
//! incident_capacity = 64
//! log_filter = "tether=debug"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name looked up by [`BridgeConfig::load_from_dir`]
pub const CONFIG_FILE: &str = "tether.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BridgeConfig {
    /// Prefix of every discovery class: `.{namespace}-{kind}-container`
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Incidents retained per binding before the oldest are dropped
    #[serde(default = "default_incident_capacity")]
    pub incident_capacity: usize,

    /// `tracing` filter directive; `RUST_LOG` wins when set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_namespace() -> String {
    "shiny_leptos_showcase".to_string()
}

fn default_incident_capacity() -> usize {
    64
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            incident_capacity: default_incident_capacity(),
            log_filter: default_log_filter(),
        }
    }
}

impl BridgeConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse tether config")
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Load `tether.toml` from a directory, falling back to defaults when absent
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            tracing::debug!(dir = %dir.display(), "no {}, using defaults", CONFIG_FILE);
            Ok(Self::default())
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize tether config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_missing_keys() {
        let config = BridgeConfig::from_toml_str("").unwrap();
        assert_eq!(config, BridgeConfig::default());
        assert_eq!(config.namespace, "shiny_leptos_showcase");
        assert_eq!(config.incident_capacity, 64);
    }

    #[test]
    fn test_partial_config() {
        let config = BridgeConfig::from_toml_str(
            r#"
            namespace = "demo"
            log_filter = "tether=debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.namespace, "demo");
        assert_eq!(config.log_filter, "tether=debug");
        assert_eq!(config.incident_capacity, 64);
    }

    #[test]
    fn test_invalid_config() {
        assert!(BridgeConfig::from_toml_str("incident_capacity = \"many\"").is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = BridgeConfig::default().with_namespace("roundtrip");
        let text = config.to_toml().unwrap();
        assert_eq!(BridgeConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_from_missing_dir_uses_defaults() {
        let dir = std::env::temp_dir().join("tether-config-test-does-not-exist");
        let config = BridgeConfig::load_from_dir(&dir).unwrap();
        assert_eq!(config, BridgeConfig::default());
    }
}
