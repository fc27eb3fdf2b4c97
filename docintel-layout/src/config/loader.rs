//! Configuration loading from files and environment variables.

use ::config::{Config, Environment, File};

use crate::error::ConfigError;

use super::static_config::PluginConfig;

/// Prefix for configuration environment variables (`DOCINTEL__SERVER__PORT`)
const ENV_PREFIX: &str = "DOCINTEL";

/// Load configuration from an optional `config` file and env vars
pub fn load_config() -> Result<PluginConfig, ConfigError> {
    Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| ConfigError {
            message: format!("Failed to build config: {}", e),
        })?
        .try_deserialize()
        .map_err(|e| ConfigError {
            message: format!("Failed to deserialize config: {}", e),
        })
}
