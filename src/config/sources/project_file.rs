//! Project config file source: <root>/ctxlog.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::{Path, PathBuf};

pub const PROJECT_FILE_NAME: &str = "ctxlog.toml";

pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_FILE_NAME)
}

/// Add the project config file to the builder if it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    project_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = project_config_path(project_root);
    if path.exists() {
        Ok(builder.add_source(File::from(path.as_path()).required(false)))
    } else {
        Ok(builder)
    }
}
