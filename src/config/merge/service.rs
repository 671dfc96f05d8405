//! MergeService: orchestrates sources, applies merge policy, deserializes to EngineConfig.

use super::merge_policy;
use crate::config::sources::{environment, explicit_file, global_file};
use crate::config::EngineConfig;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Map};
use std::path::Path;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: defaults (lowest) -> global file -> explicit file -> environment (highest).
    pub fn load(explicit: Option<&Path>) -> Result<EngineConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = match explicit {
            Some(path) => explicit_file::add_to_builder(builder, path)?,
            None => builder,
        };
        Self::finish(builder, None)
    }

    /// Load a single file with environment overlay, skipping the global file.
    pub fn load_from_file(path: &Path) -> Result<EngineConfig, ConfigError> {
        Self::load_from_file_with_env(path, None)
    }

    /// As `load_from_file`, reading the overlay from `vars` instead of the
    /// process environment when given.
    pub fn load_from_file_with_env(
        path: &Path,
        vars: Option<Map<String, String>>,
    ) -> Result<EngineConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = explicit_file::add_to_builder(builder, path)?;
        Self::finish(builder, vars)
    }

    fn finish(
        builder: ConfigBuilder<DefaultState>,
        vars: Option<Map<String, String>>,
    ) -> Result<EngineConfig, ConfigError> {
        let builder = environment::add_to_builder(builder, vars)?;
        let config: EngineConfig = builder.build()?.try_deserialize()?;
        config
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        Ok(config)
    }
}
