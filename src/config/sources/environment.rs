//! Environment source: CTXLOG_LEVEL, CTXLOG_DIAGNOSTICS__FORMAT, ...

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

pub const ENV_PREFIX: &str = "CTXLOG";

/// Add `CTXLOG_*` variables; `__` separates nested keys.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__"),
    ))
}
