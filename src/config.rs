//! Toolkit configuration persistence
//!
//! Stores user preferences in `~/.config/miniwin/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dom::LayoutMetrics;
use crate::error::ConfigError;

/// Where per-window heights are persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistenceBackend {
    /// `window-state.json` in the config directory
    #[default]
    File,
    /// Process-lifetime only
    Memory,
}

/// Toolkit configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolkitConfig {
    /// Sizes used by the layout pass
    #[serde(default)]
    pub layout: LayoutMetrics,

    /// Smallest height a resize drag may produce
    #[serde(default = "default_min_window_height")]
    pub min_window_height: f32,

    /// Largest height as a fraction of the viewport height
    #[serde(default = "default_max_height_fraction")]
    pub max_height_fraction: f32,

    /// Prefix for generated window ids
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    #[serde(default)]
    pub persistence: PersistenceBackend,
}

fn default_min_window_height() -> f32 {
    240.0
}

fn default_max_height_fraction() -> f32 {
    0.9
}

fn default_id_prefix() -> String {
    "mw-".to_string()
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            layout: LayoutMetrics::default(),
            min_window_height: default_min_window_height(),
            max_height_fraction: default_max_height_fraction(),
            id_prefix: default_id_prefix(),
            persistence: PersistenceBackend::default(),
        }
    }
}

impl ToolkitConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path, reporting every failure
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = serde_yaml::from_str(&content)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = crate::config_paths::config_file().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Clamp a requested window height to the configured bounds
    pub fn clamp_height(&self, height: f32) -> f32 {
        let max = (self.layout.viewport_height * self.max_height_fraction)
            .max(self.min_window_height);
        height.clamp(self.min_window_height, max)
    }
}
