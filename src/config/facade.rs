//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::EngineConfig;
use crate::error::ApiError;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file, an optional explicit file
    /// and the environment.
    pub fn load(explicit: Option<&Path>) -> Result<EngineConfig, ConfigError> {
        MergeService::load(explicit)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<EngineConfig, ConfigError> {
        MergeService::load_from_file(path)
    }

    /// Create default configuration.
    pub fn default() -> EngineConfig {
        EngineConfig::default()
    }

    /// Write the default configuration as TOML, creating parent directories.
    pub fn write_default(path: &Path) -> Result<(), ApiError> {
        let rendered = toml::to_string_pretty(&EngineConfig::default())
            .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ApiError::ConfigError(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        std::fs::write(path, rendered).map_err(|e| {
            ApiError::ConfigError(format!("Failed to write {}: {}", path.display(), e))
        })?;
        tracing::info!(path = %path.display(), "Wrote default config");
        Ok(())
    }
}
