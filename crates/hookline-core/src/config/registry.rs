//! Hook registry configuration.

use serde::{Deserialize, Serialize};

/// Defaults applied by the short registration forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Priority used when none is given (lower runs earlier).
    #[serde(default = "default_priority")]
    pub default_priority: i32,
    /// Number of leading arguments passed when no arity is given.
    #[serde(default = "default_accepted_args")]
    pub default_accepted_args: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_priority: default_priority(),
            default_accepted_args: default_accepted_args(),
        }
    }
}

fn default_priority() -> i32 {
    10
}

fn default_accepted_args() -> usize {
    1
}
