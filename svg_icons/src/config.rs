use crate::api::{AssetFetcher, IconFetcher, LocalAssetFetcher};
use crate::cache::IconCache;
use crate::error::{ConfigError, ConfigResult, IconResult};
use crate::utils::DEFAULT_EXTENSION;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Where icons come from and how they are requested
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    /// Origin serving the front-end assets
    pub base_url: String,
    /// Directory of icons below `base_url`
    pub icon_path: String,
    /// Icon file extension, without the dot
    pub extension: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Read icons from this directory instead of over HTTP
    pub asset_root: Option<PathBuf>,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4200".to_string(),
            icon_path: "assets/icons".to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            user_agent: "SvgIcons/0.1".to_string(),
            timeout_secs: 10,
            asset_root: None,
        }
    }
}

impl IconConfig {
    /// Default config location: `<config dir>/svg_icons/config.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("svg_icons")
            .join("config.json")
    }

    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: IconConfig = serde_json::from_str(&content)?;
        config.validate()?;
        log::info!("Loaded icon config from {:?}", path);
        Ok(config)
    }

    /// Load a config file, falling back to defaults when it is missing or invalid
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No icon config at {:?}, using defaults", path);
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring icon config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::Invalid("extension must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be positive".to_string()));
        }
        if self.asset_root.is_none() {
            reqwest::Url::parse(&self.base_url).map_err(|e| {
                ConfigError::Invalid(format!("base_url '{}': {}", self.base_url, e))
            })?;
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the fetch collaborator this config describes
    pub fn build_fetcher(&self) -> IconResult<Arc<dyn IconFetcher>> {
        match &self.asset_root {
            Some(root) => {
                log::info!("Serving icons from directory {:?}", root);
                Ok(Arc::new(LocalAssetFetcher::new(root.clone(), &self.extension)))
            }
            None => {
                log::info!("Serving icons from {}/{}", self.base_url, self.icon_path);
                Ok(Arc::new(AssetFetcher::with_layout(
                    &self.base_url,
                    &self.icon_path,
                    &self.extension,
                    &self.user_agent,
                    self.timeout(),
                )?))
            }
        }
    }

    /// Build an empty cache backed by [`IconConfig::build_fetcher`]
    pub fn build_cache(&self) -> IconResult<IconCache> {
        Ok(IconCache::with_extension(
            self.build_fetcher()?,
            &self.extension,
        ))
    }
}
