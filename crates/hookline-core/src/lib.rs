//! # hookline-core
//!
//! Core crate for Hookline. Contains the unified error system, the result
//! alias and the configuration schemas consumed by the hook registry.
//!
//! This crate has **no** internal dependencies on other Hookline crates.

pub mod config;
pub mod error;
pub mod result;

pub use config::HookConfig;
pub use error::{ErrorKind, HookError};
pub use result::HookResult;
