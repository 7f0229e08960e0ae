// ABOUTME: Configuration file loading, validation, and hierarchical merging for way2enjoy CLI
// ABOUTME: Supports TOML config files with XDG Base Directory specification compliance

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::constants::{config_files, resize_methods};

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub app_identifier: Option<String>,
    #[serde(default)]
    pub proxy: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default, deserialize_with = "validate_method")]
    pub resize_method: Option<String>,
    #[serde(default)]
    pub store: Option<ConfigStore>,
}

/// Store defaults, applied when `--store` names the same service
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConfigStore {
    pub service: String,
    #[serde(flatten)]
    pub options: BTreeMap<String, String>,
}

impl Config {
    /// Load configuration from standard XDG-compliant locations
    pub fn load() -> Result<Self> {
        let paths = Self::get_config_paths();
        // Standard paths are listed highest precedence first
        Self::load_from_paths(&paths.iter().rev().map(|p| p.as_str()).collect::<Vec<_>>())
    }

    /// Load configuration from specific file paths in order of precedence
    pub fn load_from_paths(paths: &[&str]) -> Result<Self> {
        let mut config = Config::default();

        for path in paths {
            // Apply in order - later paths override earlier ones
            if !Path::new(path).exists() {
                continue;
            }
            let file_config = Self::load_from_file(path)?;
            config = config.merge(file_config);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse TOML config file: {}",
                path.as_ref().display()
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get standard config file paths in order of precedence (highest first)
    pub fn get_config_paths() -> Vec<String> {
        let mut paths = Vec::new();

        // 1. Project-specific config (highest precedence)
        if let Ok(current_dir) = std::env::current_dir() {
            paths.push(
                current_dir
                    .join(config_files::PROJECT_FILE)
                    .to_string_lossy()
                    .to_string(),
            );
        }

        // 2. XDG config home
        if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
            let path = PathBuf::from(config_home)
                .join(config_files::APP_DIR)
                .join(config_files::USER_FILE);
            paths.push(path.to_string_lossy().to_string());
        }

        // 3. User config directory fallback
        if let Some(home_dir) = dirs::home_dir() {
            let path = home_dir
                .join(".config")
                .join(config_files::APP_DIR)
                .join(config_files::USER_FILE);
            paths.push(path.to_string_lossy().to_string());
        }

        paths
    }

    /// Merge this config with another, giving precedence to the other config
    pub fn merge(self, other: Config) -> Config {
        Config {
            api_key: other.api_key.or(self.api_key),
            app_identifier: other.app_identifier.or(self.app_identifier),
            proxy: other.proxy.or(self.proxy),
            api_url: other.api_url.or(self.api_url),
            resize_method: other.resize_method.or(self.resize_method),
            store: match (self.store, other.store) {
                (Some(base), Some(other)) => Some(base.merge(other)),
                (Some(base), None) => Some(base),
                (None, Some(other)) => Some(other),
                (None, None) => None,
            },
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.as_deref() == Some("") {
            return Err(anyhow!("api_key must not be empty"));
        }

        if let Some(ref proxy) = self.proxy {
            if !proxy.contains("://") {
                return Err(anyhow!(
                    "Invalid proxy '{}'. Expected scheme://[user:pass@]host[:port]",
                    proxy
                ));
            }
        }

        if let Some(ref store) = self.store {
            store.validate().context("Invalid store configuration")?;
        }

        Ok(())
    }
}

impl ConfigStore {
    /// Merge store settings. A different service replaces the whole table.
    pub fn merge(mut self, other: ConfigStore) -> ConfigStore {
        if self.service != other.service {
            return other;
        }
        self.options.extend(other.options);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.service.trim().is_empty() {
            return Err(anyhow!("Store service must not be empty"));
        }
        if self.options.contains_key("service") {
            return Err(anyhow!("Store option 'service' is reserved"));
        }
        Ok(())
    }
}

// Custom deserializer for resize method validation
fn validate_method<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value: Option<String> = Option::deserialize(deserializer)?;

    if let Some(ref method) = value {
        if resize_methods::ALL.contains(&method.as_str()) {
            Ok(value)
        } else {
            Err(D::Error::custom(format!(
                "Invalid resize method '{}'. Must be one of: {}",
                method,
                resize_methods::ALL.join(", ")
            )))
        }
    } else {
        Ok(None)
    }
}
