//! Base layer for every merge: the serialized built-in defaults.

use crate::config::EngineConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(Config::builder().add_source(Config::try_from(&EngineConfig::default())?))
}
