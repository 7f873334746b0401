//! # hookline-registry
//!
//! Process-wide callback registry for named, priority-ordered hooks.
//!
//! - Filters thread a value through every registered callback
//! - Actions run callbacks for side effects and count their invocations
//! - Callbacks are identified deterministically so they can be
//!   deduplicated, looked up and removed
//! - Dispatch is reentrant: a callback may register, remove or trigger
//!   any hook, including the one currently running

pub mod global;
pub mod hooks;

pub use global::{global, init_global};
pub use hooks::callback::{Callback, CallbackFn};
pub use hooks::registry::{ALL_HOOK, HookRegistry};
