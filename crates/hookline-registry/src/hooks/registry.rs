//! Hook registry — registration, lookup, removal and introspection.
//!
//! Filters and actions share one table: an action is a filter whose
//! return value is discarded, so every `*_action` method here is an alias
//! of its `*_filter` counterpart. Dispatch lives in [`super::dispatcher`].

use std::cell::RefCell;
use std::collections::HashMap;

use hookline_core::config::registry::RegistryConfig;
use parking_lot::ReentrantMutex;
use tracing::debug;

use super::callback::Callback;
use super::identity::ObjectTokens;
use super::table::{CallbackEntry, HookTable};

/// Reserved hook whose callbacks run before every other hook's dispatch.
pub const ALL_HOOK: &str = "all";

/// Mutable tables behind the registry lock.
#[derive(Debug, Default)]
pub(crate) struct RegistryState {
    pub(crate) table: HookTable,
    pub(crate) tokens: ObjectTokens,
    pub(crate) action_counts: HashMap<String, u64>,
    /// Hooks currently being dispatched, innermost last.
    pub(crate) stack: Vec<String>,
}

/// Registry of filter and action callbacks.
///
/// Every public operation holds a single reentrant lock for its whole
/// duration. A callback running inside a dispatch re-enters the lock on the
/// same thread, so it may freely register, remove or trigger hooks; other
/// threads wait until the outermost operation returns.
pub struct HookRegistry {
    pub(crate) state: ReentrantMutex<RefCell<RegistryState>>,
    config: RegistryConfig,
}

impl HookRegistry {
    /// Creates an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates an empty registry using `config` for the short registration forms.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            state: ReentrantMutex::new(RefCell::new(RegistryState::default())),
            config,
        }
    }

    /// Returns the registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut RegistryState) -> R) -> R {
        let guard = self.state.lock();
        let mut state = guard.borrow_mut();
        f(&mut state)
    }

    /// Registers `callback` on `hook` at the default priority and arity.
    pub fn register_filter(&self, hook: &str, callback: Callback) -> String {
        self.register_filter_with(
            hook,
            callback,
            self.config.default_priority,
            self.config.default_accepted_args,
        )
    }

    /// Registers `callback` on `hook` and returns its identity.
    ///
    /// Registering the same identity again at the same priority overwrites
    /// the stored arity and keeps its position. A different priority creates
    /// a second, independent entry.
    pub fn register_filter_with(
        &self,
        hook: &str,
        callback: Callback,
        priority: i32,
        accepted_args: usize,
    ) -> String {
        self.with_state(|state| {
            let identity = state.tokens.assign(&callback);
            debug!(
                hook = %hook,
                identity = %identity,
                kind = callback.kind(),
                priority = priority,
                accepted_args = accepted_args,
                "Callback registered"
            );
            state.table.insert(
                hook,
                priority,
                identity.clone(),
                CallbackEntry {
                    callback,
                    accepted_args,
                },
            );
            identity
        })
    }

    /// Returns `true` if any callback is registered on `hook`.
    pub fn has_filter(&self, hook: &str) -> bool {
        self.with_state(|state| state.table.has_callbacks(hook))
    }

    /// Lowest priority at which `callback` is registered on `hook`.
    ///
    /// `None` also covers receivers that were never registered anywhere.
    pub fn filter_priority(&self, hook: &str, callback: &Callback) -> Option<i32> {
        self.with_state(|state| {
            let identity = state.tokens.resolve(callback)?;
            state.table.priority_of(hook, &identity)
        })
    }

    /// Removes `callback` from `hook` at `priority`.
    ///
    /// Returns whether an entry was removed.
    pub fn unregister_filter(&self, hook: &str, callback: &Callback, priority: i32) -> bool {
        self.with_state(|state| {
            let Some(identity) = state.tokens.resolve(callback) else {
                return false;
            };
            let removed = state.table.remove(hook, priority, &identity);
            if removed {
                debug!(
                    hook = %hook,
                    identity = %identity,
                    priority = priority,
                    "Callback unregistered"
                );
            }
            removed
        })
    }

    /// Removes every callback on `hook`, or only those at `priority`.
    pub fn unregister_all_filters(&self, hook: &str, priority: Option<i32>) {
        self.with_state(|state| state.table.clear(hook, priority));
        debug!(hook = %hook, priority = ?priority, "Callbacks cleared");
    }

    /// Alias of [`Self::register_filter`].
    pub fn register_action(&self, hook: &str, callback: Callback) -> String {
        self.register_filter(hook, callback)
    }

    /// Alias of [`Self::register_filter_with`].
    pub fn register_action_with(
        &self,
        hook: &str,
        callback: Callback,
        priority: i32,
        accepted_args: usize,
    ) -> String {
        self.register_filter_with(hook, callback, priority, accepted_args)
    }

    /// Alias of [`Self::has_filter`].
    pub fn has_action(&self, hook: &str) -> bool {
        self.has_filter(hook)
    }

    /// Alias of [`Self::filter_priority`].
    pub fn action_priority(&self, hook: &str, callback: &Callback) -> Option<i32> {
        self.filter_priority(hook, callback)
    }

    /// Alias of [`Self::unregister_filter`].
    pub fn unregister_action(&self, hook: &str, callback: &Callback, priority: i32) -> bool {
        self.unregister_filter(hook, callback, priority)
    }

    /// Alias of [`Self::unregister_all_filters`].
    pub fn unregister_all_actions(&self, hook: &str, priority: Option<i32>) {
        self.unregister_all_filters(hook, priority)
    }

    /// Number of times `hook` was triggered as an action.
    pub fn times_triggered(&self, hook: &str) -> u64 {
        self.with_state(|state| state.action_counts.get(hook).copied().unwrap_or(0))
    }

    /// Innermost hook currently being dispatched.
    pub fn current_hook(&self) -> Option<String> {
        self.with_state(|state| state.stack.last().cloned())
    }

    /// With `None`, whether any hook is being dispatched; otherwise whether
    /// `hook` appears anywhere in the dispatch stack.
    pub fn is_dispatching(&self, hook: Option<&str>) -> bool {
        self.with_state(|state| match hook {
            None => !state.stack.is_empty(),
            Some(hook) => state.stack.iter().any(|active| active == hook),
        })
    }

    /// Number of entries stored for `hook` across all priorities.
    pub fn callback_count(&self, hook: &str) -> usize {
        self.with_state(|state| state.table.callback_count(hook))
    }

    /// Every hook name that has ever had a callback registered, sorted.
    pub fn registered_hooks(&self) -> Vec<String> {
        self.with_state(|state| state.table.hook_names())
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.state.lock();
        match guard.try_borrow() {
            Ok(state) => f
                .debug_struct("HookRegistry")
                .field("hooks", &state.table.hook_names())
                .field("stack", &state.stack)
                .field("config", &self.config)
                .finish(),
            Err(_) => f
                .debug_struct("HookRegistry")
                .field("config", &self.config)
                .finish_non_exhaustive(),
        }
    }
}
