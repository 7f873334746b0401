//! Configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate.
//! Each sub-module represents a logical configuration section.

pub mod logging;
pub mod registry;

use serde::{Deserialize, Serialize};

use self::logging::LoggingConfig;
use self::registry::RegistryConfig;

use crate::error::HookError;

/// Root configuration.
///
/// Deserialization target for the merged sources (default file,
/// environment overlay file, `HOOKLINE__*` environment variables).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HookConfig {
    /// Hook registry defaults.
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HookConfig {
    /// Load configuration.
    ///
    /// Merges `config/default` with an environment-specific overlay and
    /// environment variables prefixed with `HOOKLINE`. Missing files are
    /// skipped, so an empty environment yields the defaults.
    pub fn load(env: &str) -> Result<Self, HookError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("HOOKLINE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| HookError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| HookError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(source: &str) -> Result<Self, HookError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
