//! Process-wide registry instance.
//!
//! Host applications that want a single shared registry use [`global`];
//! everything else can construct and pass around its own [`HookRegistry`].

use std::sync::OnceLock;

use hookline_core::config::registry::RegistryConfig;
use tracing::info;

use crate::hooks::registry::HookRegistry;

static GLOBAL: OnceLock<HookRegistry> = OnceLock::new();

/// Returns the process-wide registry, creating it with defaults on first use.
pub fn global() -> &'static HookRegistry {
    GLOBAL.get_or_init(HookRegistry::new)
}

/// Creates the process-wide registry with `config`.
///
/// Returns `false` if it already exists, in which case `config` is ignored.
pub fn init_global(config: RegistryConfig) -> bool {
    let installed = GLOBAL.set(HookRegistry::with_config(config)).is_ok();
    if installed {
        info!(
            default_priority = config.default_priority,
            default_accepted_args = config.default_accepted_args,
            "Global hook registry initialized"
        );
    }
    installed
}
