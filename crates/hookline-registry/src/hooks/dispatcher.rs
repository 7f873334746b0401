//! Hook dispatch — runs registered callbacks in priority order.
//!
//! - The `all` hook's callbacks run first on every dispatch, receiving the
//!   hook name followed by the full argument list. Their results are ignored.
//! - Target callbacks then run by ascending priority, then registration
//!   order, each receiving at most `accepted_args` leading arguments.
//! - The walk is a live cursor over the table rather than a snapshot:
//!   callbacks added mid-dispatch at positions not yet visited are run in the
//!   same pass, callbacks added at already-visited positions are not.
//! - The first callback error ends the dispatch and is returned unchanged.
//!   Nothing already run is rolled back.

use std::cell::RefCell;

use serde_json::Value;
use tracing::{debug, trace, warn};

use hookline_core::HookResult;

use super::registry::{ALL_HOOK, HookRegistry, RegistryState};
use super::table::Cursor;

/// How the argument list is handed to each target callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgPassing {
    /// Fresh copy per callback; the return value replaces `args[0]`.
    Filter,
    /// Fresh copy per callback; the return value is dropped.
    ActionCopied,
    /// The caller's slice itself; mutations are visible to later callbacks
    /// and to the caller.
    ActionShared,
}

/// Keeps a hook name on the dispatch stack for as long as it is alive.
///
/// The pop happens in `Drop`, so the stack is restored on normal return,
/// on a callback error and while unwinding from a callback panic.
struct StackFrame<'a> {
    state: &'a RefCell<RegistryState>,
}

impl<'a> StackFrame<'a> {
    fn push(state: &'a RefCell<RegistryState>, hook: &str) -> Self {
        state.borrow_mut().stack.push(hook.to_string());
        Self { state }
    }
}

impl Drop for StackFrame<'_> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.stack.pop();
        }
    }
}

impl HookRegistry {
    /// Runs `value` through every callback registered on `hook`.
    ///
    /// Callbacks receive `[value, extra...]` truncated to their arity and
    /// each return value becomes the value passed to the next callback.
    /// With no callbacks registered `value` is returned unchanged.
    pub fn apply_filter(&self, hook: &str, value: Value, extra: Vec<Value>) -> HookResult<Value> {
        let mut args = Vec::with_capacity(extra.len() + 1);
        args.push(value);
        args.extend(extra);
        self.apply_filters_with_args(hook, args)
    }

    /// Like [`Self::apply_filter`], with the value to filter at `args[0]`.
    ///
    /// An empty `args` filters `Value::Null`.
    pub fn apply_filters_with_args(&self, hook: &str, mut args: Vec<Value>) -> HookResult<Value> {
        if args.is_empty() {
            args.push(Value::Null);
        }
        let guard = self.state.lock();
        dispatch(&guard, hook, &mut args, ArgPassing::Filter)?;
        Ok(args.swap_remove(0))
    }

    /// Triggers the action `hook`.
    ///
    /// The trigger count is bumped even if nothing is registered. When
    /// `args` holds exactly one JSON object, every callback works on the
    /// caller's object itself, so changes made by one callback are seen by
    /// the next and by the caller. Otherwise each callback gets its own copy.
    pub fn trigger_action(&self, hook: &str, args: &mut [Value]) -> HookResult<()> {
        let passing = match args {
            [single] if single.is_object() => ArgPassing::ActionShared,
            _ => ArgPassing::ActionCopied,
        };
        let guard = self.state.lock();
        count_trigger(&guard, hook);
        dispatch(&guard, hook, args, passing)
    }

    /// Triggers the action `hook` with pre-packed arguments.
    ///
    /// Unlike [`Self::trigger_action`], arguments are always copied.
    pub fn trigger_action_with_args(&self, hook: &str, mut args: Vec<Value>) -> HookResult<()> {
        let guard = self.state.lock();
        count_trigger(&guard, hook);
        dispatch(&guard, hook, &mut args, ArgPassing::ActionCopied)
    }
}

fn count_trigger(state: &RefCell<RegistryState>, hook: &str) {
    *state
        .borrow_mut()
        .action_counts
        .entry(hook.to_string())
        .or_insert(0) += 1;
}

/// Runs the `all` pre-pass and then `hook`'s callbacks.
///
/// The caller holds the registry lock for the whole call.
fn dispatch(
    state: &RefCell<RegistryState>,
    hook: &str,
    args: &mut [Value],
    passing: ArgPassing,
) -> HookResult<()> {
    let (run_all, run_target) = {
        let state = state.borrow();
        let run_all = hook != ALL_HOOK && state.table.has_callbacks(ALL_HOOK);
        (run_all, state.table.has_callbacks(hook))
    };
    if !run_all && !run_target {
        return Ok(());
    }

    let _frame = StackFrame::push(state, hook);
    debug!(hook = %hook, all = run_all, "Dispatching hook");

    if run_all {
        let mut all_args = Vec::with_capacity(args.len() + 1);
        all_args.push(Value::String(hook.to_string()));
        all_args.extend(args.iter().cloned());

        let mut cursor: Option<Cursor> = None;
        loop {
            let next = state.borrow().table.next_after(ALL_HOOK, cursor.as_ref());
            let Some((position, entry)) = next else {
                break;
            };
            trace!(hook = %hook, identity = %position.identity, "Running all-hook callback");

            let mut call_args = all_args.clone();
            entry
                .callback
                .invoke(&mut call_args)
                .inspect_err(|e| log_failure(ALL_HOOK, &position, e))?;
            cursor = Some(position);
        }
    }

    // The pre-pass may have registered the first callbacks on `hook`.
    if !state.borrow().table.has_callbacks(hook) {
        return Ok(());
    }

    let mut cursor: Option<Cursor> = None;
    loop {
        let next = state.borrow().table.next_after(hook, cursor.as_ref());
        let Some((position, entry)) = next else {
            break;
        };
        let take = entry.accepted_args.min(args.len());
        trace!(
            hook = %hook,
            identity = %position.identity,
            priority = position.priority,
            args = take,
            "Running callback"
        );

        let result = match passing {
            ArgPassing::ActionShared => entry.callback.invoke(&mut args[..take]),
            ArgPassing::Filter | ArgPassing::ActionCopied => {
                let mut call_args = args[..take].to_vec();
                entry.callback.invoke(&mut call_args)
            }
        };
        let returned = result.inspect_err(|e| log_failure(hook, &position, e))?;
        if passing == ArgPassing::Filter {
            args[0] = returned;
        }
        cursor = Some(position);
    }

    Ok(())
}

fn log_failure(hook: &str, position: &Cursor, error: &hookline_core::HookError) {
    warn!(
        hook = %hook,
        identity = %position.identity,
        priority = position.priority,
        error = %error,
        "Callback failed, aborting dispatch"
    );
}
