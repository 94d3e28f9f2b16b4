//! Merge rules: built-in defaults underneath every other source.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("env", "pro")?
        .set_default("level", "debug")?
        .set_default("output", "stdout")?
        .set_default("success_msg", "success")?
        .set_default("failure_msg", "failed")?
        .set_default("suppress_errors", false)?
        .set_default("diagnostics.level", "warn")?
        .set_default("diagnostics.format", "text")
}
