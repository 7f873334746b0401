//! Hook system — callback identities, the hook table and dispatch.

pub mod callback;
pub mod dispatcher;
pub mod identity;
pub mod registry;
pub mod table;

pub use callback::{Callback, CallbackFn};
pub use registry::{ALL_HOOK, HookRegistry};
