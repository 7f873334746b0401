//! Identity keys for callbacks.
//!
//! Named callbacks derive their key from their names. Receiver-bound
//! callbacks need a per-object token: one is assigned from a monotonically
//! increasing counter the first time the object is registered and reused
//! afterwards. Lookups never assign tokens, so an object that was never
//! registered cannot be resolved.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

use super::callback::Callback;

/// Token cache for receiver objects, keyed by allocation address.
///
/// The `Weak` guards against address reuse: once the original object is
/// gone its slot no longer resolves, and a new object at the same address
/// gets a fresh token.
#[derive(Debug, Default)]
pub struct ObjectTokens {
    next: u64,
    tokens: HashMap<usize, (Weak<dyn Any + Send + Sync>, u64)>,
}

impl ObjectTokens {
    /// Creates an empty token table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the identity of `callback`, assigning a token if needed.
    pub fn assign(&mut self, callback: &Callback) -> String {
        match callback.receiver() {
            Some((object, method)) => {
                let token = match self.lookup(object) {
                    Some(token) => token,
                    None => self.insert(object),
                };
                receiver_key(token, method)
            }
            None => named_key(callback),
        }
    }

    /// Computes the identity of `callback` without assigning a token.
    ///
    /// Returns `None` for a receiver that was never registered.
    pub fn resolve(&self, callback: &Callback) -> Option<String> {
        match callback.receiver() {
            Some((object, method)) => self
                .lookup(object)
                .map(|token| receiver_key(token, method)),
            None => Some(named_key(callback)),
        }
    }

    /// Number of live receivers holding a token.
    pub fn len(&self) -> usize {
        self.tokens
            .values()
            .filter(|(weak, _)| weak.strong_count() > 0)
            .count()
    }

    /// Returns `true` if no live receiver holds a token.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, object: &Arc<dyn Any + Send + Sync>) -> Option<u64> {
        let (weak, token) = self.tokens.get(&address(object))?;
        (weak.strong_count() > 0).then_some(*token)
    }

    fn insert(&mut self, object: &Arc<dyn Any + Send + Sync>) -> u64 {
        self.tokens.retain(|_, (weak, _)| weak.strong_count() > 0);

        self.next += 1;
        self.tokens
            .insert(address(object), (Arc::downgrade(object), self.next));
        self.next
    }
}

fn address(object: &Arc<dyn Any + Send + Sync>) -> usize {
    Arc::as_ptr(object).cast::<()>() as usize
}

/// Receiver keys are `#` followed by a digit.
fn receiver_key(token: u64, method: &str) -> String {
    format!("{RECEIVER_PREFIX}{token}::{method}")
}

/// Named keys starting with `#` get a second `#`, so they never look like
/// a receiver key.
fn named_key(callback: &Callback) -> String {
    let key = match callback {
        Callback::Function { name, .. } => name.clone(),
        Callback::Static { class, method, .. } => format!("{class}::{method}"),
        Callback::Method { method, .. } => method.clone(),
        Callback::Closure { .. } => Callback::CLOSURE_METHOD.to_string(),
    };
    if key.starts_with(RECEIVER_PREFIX) {
        format!("{RECEIVER_PREFIX}{key}")
    } else {
        key
    }
}

const RECEIVER_PREFIX: char = '#';
