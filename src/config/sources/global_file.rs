//! Global config file source: $XDG_CONFIG_HOME/ctxlog/config.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use directories::BaseDirs;
use std::path::PathBuf;
use tracing::warn;

/// Path to the global config file, when a config directory can be resolved.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.config_dir().join("ctxlog").join("config.toml"))
}

/// Add the global config file to the builder if it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    add_path_to_builder(builder, global_config_path())
}

fn add_path_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: Option<PathBuf>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    match path {
        Some(path) if path.exists() => {
            Ok(builder.add_source(File::from(path.as_path()).required(false)))
        }
        Some(path) => {
            warn!(
                config_path = %path.display(),
                "Global configuration file not found, using defaults"
            );
            Ok(builder)
        }
        None => Ok(builder),
    }
}
