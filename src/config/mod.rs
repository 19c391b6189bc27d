use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::countries::graphql::DEFAULT_ENDPOINT;
use crate::countries::FilterMode;
use crate::selection::DEFAULT_SELECTION_LIMIT;

/// How the selected row is marked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightStyle {
    /// Background rotates through the selection palette
    #[default]
    Palette,
    /// Fixed "selected" marker
    Marker,
}

/// Optional `#RRGGBB` overrides for the UI colors
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ThemeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_dim: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub danger: Option<String>,
    /// Replaces the four-color selection palette, in rotation order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub palette: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// GraphQL endpoint serving the countries query
    pub endpoint: String,

    /// Request timeout for the countries fetch
    pub timeout_secs: u64,

    /// Default selection picks entry min(len, limit) - 1
    pub default_selection_limit: usize,

    /// Field the search term is matched against
    pub filter_mode: FilterMode,

    pub highlight: HighlightStyle,

    pub theme: ThemeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 10,
            default_selection_limit: DEFAULT_SELECTION_LIMIT,
            filter_mode: FilterMode::default(),
            highlight: HighlightStyle::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join(env!("CARGO_PKG_NAME"));

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(AppConfig::default()),
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match Self::parse(&content) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", path.display());
                        return Ok(config);
                    }
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
            return Ok(AppConfig::default());
        }

        let config = AppConfig::default();
        if let Err(e) = config.save() {
            tracing::warn!("Could not write default config: {}", e);
        }
        Ok(config)
    }

    /// Parse a TOML document; missing keys take their defaults
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: AppConfig = toml::from_str(content)?;
        if config.endpoint.trim().is_empty() {
            config.endpoint = DEFAULT_ENDPOINT.to_string();
        }
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig {
            endpoint: "http://localhost:4000/graphql".to_string(),
            timeout_secs: 3,
            default_selection_limit: 5,
            filter_mode: FilterMode::GroupField,
            highlight: HighlightStyle::Marker,
            theme: ThemeConfig {
                accent: Some("#ffc107".to_string()),
                palette: vec!["#add8e6".to_string(), "#90ee90".to_string()],
                ..Default::default()
            },
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized = AppConfig::parse(&serialized).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = AppConfig::parse("filter_mode = \"group_field\"\n").unwrap();
        assert_eq!(config.filter_mode, FilterMode::GroupField);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.default_selection_limit, 10);
        assert_eq!(config.highlight, HighlightStyle::Palette);
    }

    #[test]
    fn test_blank_endpoint_falls_back() {
        let config = AppConfig::parse("endpoint = \"  \"\n").unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(AppConfig::parse("highlight = \"sparkles\"\n").is_err());
        assert!(AppConfig::parse("timeout_secs = \"soon\"\n").is_err());
    }

    #[test]
    fn test_timeout_never_zero() {
        let config = AppConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(1));
    }
}
