//! Server configuration storage
//!
//! Bind address, endpoint paths and folder restrictions, stored as JSON.

use std::path::{Path, PathBuf};

use image_browser::FolderPolicy;
use image_browser_http::EndpointConfig;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::constants::{defaults, endpoints, hosts, paths, ports};

/// Full server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Path of the folder listing endpoint
    pub images_endpoint: String,
    /// Path of the image view endpoint
    pub view_endpoint: String,
    /// Folders that may be browsed; empty allows any folder
    pub allowed_roots: Vec<PathBuf>,
    /// `max-age` sent with served images
    pub cache_max_age_secs: u64,
    /// Node height (px) below which the browser collapses
    pub min_browser_height: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: hosts::LOCAL.to_string(),
            port: ports::SERVER,
            images_endpoint: endpoints::IMAGES.to_string(),
            view_endpoint: endpoints::VIEW.to_string(),
            allowed_roots: Vec::new(),
            cache_max_age_secs: defaults::CACHE_MAX_AGE_SECS,
            min_browser_height: defaults::MIN_BROWSER_HEIGHT,
        }
    }
}

impl ServerConfig {
    /// Default config file location under the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(paths::CONFIG_DIR).join(paths::CONFIG_FILE))
    }

    /// Load configuration from disk; a missing file yields the defaults
    pub async fn load(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            log::info!("No configuration at {:?}, using defaults", config_path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(config_path)
            .await
            .map_err(ConfigError::Io)?;

        serde_json::from_str(&contents).map_err(ConfigError::Parse)
    }

    /// Save configuration to disk
    pub async fn save(&self, config_path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).await.map_err(ConfigError::Io)?;
        }

        let contents = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        fs::write(config_path, contents)
            .await
            .map_err(ConfigError::Io)?;

        log::info!("Configuration saved to {:?}", config_path);
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn endpoints(&self) -> EndpointConfig {
        EndpointConfig {
            images_endpoint: self.images_endpoint.clone(),
            view_endpoint: self.view_endpoint.clone(),
            cache_max_age_secs: self.cache_max_age_secs,
        }
    }

    pub fn folder_policy(&self) -> FolderPolicy {
        if self.allowed_roots.is_empty() {
            FolderPolicy::unrestricted()
        } else {
            FolderPolicy::with_roots(&self.allowed_roots)
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(serde_json::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(serde_json::Error),
}
