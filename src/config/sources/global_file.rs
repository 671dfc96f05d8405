//! Global config file source: `$XDG_CONFIG_HOME/warroom/config.toml`

use crate::config::xdg;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};

/// Add the global config file when it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    match xdg::global_config_path() {
        Ok(path) if path.exists() => {
            tracing::debug!(path = %path.display(), "Using global config file");
            Ok(builder.add_source(File::from(path).required(false)))
        }
        _ => Ok(builder),
    }
}
