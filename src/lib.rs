//! Hookline — named, priority-ordered filter and action hooks.
//!
//! Facade over the workspace crates, plus the wiring a host application
//! needs at startup: loading configuration, installing a tracing subscriber
//! and creating the process-wide registry.

use tracing_subscriber::{EnvFilter, fmt};

pub use hookline_core::config::HookConfig;
pub use hookline_core::config::logging::LoggingConfig;
pub use hookline_core::config::registry::RegistryConfig;
pub use hookline_core::{ErrorKind, HookError, HookResult};
pub use hookline_registry::{ALL_HOOK, Callback, CallbackFn, HookRegistry, global, init_global};
pub use serde_json::Value;

/// Installs a tracing subscriber from `config`.
///
/// `RUST_LOG` takes precedence over the configured level. Fails if a global
/// subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> HookResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let installed = match config.format.as_str() {
        "json" => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .try_init(),
        _ => fmt()
            .pretty()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
    };

    installed.map_err(|e| HookError::internal(format!("Failed to install subscriber: {e}")))
}

/// Loads configuration for `env`, installs logging and creates the global
/// registry.
///
/// Logging failures are reported but not fatal, so a host that already
/// installed its own subscriber can still bootstrap.
pub fn bootstrap(env: &str) -> HookResult<&'static HookRegistry> {
    let config = HookConfig::load(env)?;

    if let Err(e) = init_logging(&config.logging) {
        tracing::warn!("Logging not initialized: {}", e);
    }

    if !init_global(config.registry) {
        tracing::warn!("Global hook registry already initialized, keeping existing configuration");
    }
    tracing::info!("Hookline v{} ready (env: {})", env!("CARGO_PKG_VERSION"), env);

    Ok(global())
}
