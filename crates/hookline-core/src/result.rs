//! Convenience result type alias for Hookline.

use crate::error::HookError;

/// A specialized `Result` type for hook callbacks and dispatch.
///
/// Callbacks return `HookResult<Value>`; a dispatch forwards the first
/// `Err` it sees to its caller unchanged.
pub type HookResult<T> = Result<T, HookError>;
