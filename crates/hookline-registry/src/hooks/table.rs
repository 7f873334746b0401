//! Hook table — hook name → priority → insertion-ordered callback bucket.
//!
//! Priorities live in a `BTreeMap`, so iterating a hook's buckets always
//! yields ascending priority. Buckets are `IndexMap`s keyed by identity:
//! re-inserting an identity overwrites in place and keeps its position.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use indexmap::IndexMap;

use super::callback::Callback;

/// A registered callback.
#[derive(Debug, Clone)]
pub struct CallbackEntry {
    /// The callable.
    pub callback: Callback,
    /// Maximum number of leading arguments passed on invocation.
    pub accepted_args: usize,
}

/// Callbacks sharing one priority, in registration order.
pub type PriorityBucket = IndexMap<String, CallbackEntry>;

/// Position of the last callback visited by a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    /// Priority of the bucket being walked.
    pub priority: i32,
    /// Index the visited entry had when it was fetched.
    pub index: usize,
    /// Identity of the visited entry.
    pub identity: String,
}

/// Storage for every hook's callbacks.
#[derive(Debug, Default)]
pub struct HookTable {
    hooks: HashMap<String, BTreeMap<i32, PriorityBucket>>,
}

impl HookTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the entry for `identity` at `hook`/`priority`.
    pub fn insert(&mut self, hook: &str, priority: i32, identity: String, entry: CallbackEntry) {
        self.hooks
            .entry(hook.to_string())
            .or_default()
            .entry(priority)
            .or_default()
            .insert(identity, entry);
    }

    /// Returns `true` if at least one bucket of `hook` holds an entry.
    pub fn has_callbacks(&self, hook: &str) -> bool {
        self.hooks
            .get(hook)
            .is_some_and(|buckets| buckets.values().any(|bucket| !bucket.is_empty()))
    }

    /// Lowest priority at which `identity` is registered for `hook`.
    pub fn priority_of(&self, hook: &str, identity: &str) -> Option<i32> {
        self.hooks.get(hook)?.iter().find_map(|(priority, bucket)| {
            bucket.contains_key(identity).then_some(*priority)
        })
    }

    /// Removes `identity` from `hook`/`priority`.
    ///
    /// A bucket left empty is dropped; the hook itself stays in the table.
    pub fn remove(&mut self, hook: &str, priority: i32, identity: &str) -> bool {
        let Some(buckets) = self.hooks.get_mut(hook) else {
            return false;
        };
        let Some(bucket) = buckets.get_mut(&priority) else {
            return false;
        };

        let removed = bucket.shift_remove(identity).is_some();
        if bucket.is_empty() {
            buckets.remove(&priority);
        }
        removed
    }

    /// Drops every bucket of `hook`, or only the one at `priority`.
    pub fn clear(&mut self, hook: &str, priority: Option<i32>) {
        let Some(buckets) = self.hooks.get_mut(hook) else {
            return;
        };
        match priority {
            Some(priority) => {
                buckets.remove(&priority);
            }
            None => buckets.clear(),
        }
    }

    /// Number of entries stored for `hook` across all priorities.
    pub fn callback_count(&self, hook: &str) -> usize {
        self.hooks
            .get(hook)
            .map(|buckets| buckets.values().map(IndexMap::len).sum())
            .unwrap_or(0)
    }

    /// Every hook name with a table entry, sorted.
    pub fn hook_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.hooks.keys().cloned().collect();
        names.sort();
        names
    }

    /// Fetches the entry following `cursor` against the table as it is now.
    ///
    /// Within the cursor's bucket the visited identity is looked up again:
    /// if it is still present the walk continues right after it, if it was
    /// removed the walk continues at the index it used to occupy. Once the
    /// bucket is exhausted the walk moves on to the first bucket whose
    /// priority is strictly greater. Entries added at unvisited positions
    /// are therefore seen; changes to visited positions are not revisited.
    pub fn next_after(
        &self,
        hook: &str,
        cursor: Option<&Cursor>,
    ) -> Option<(Cursor, CallbackEntry)> {
        let buckets = self.hooks.get(hook)?;

        let lower = match cursor {
            None => Bound::Unbounded,
            Some(cursor) => {
                if let Some(bucket) = buckets.get(&cursor.priority) {
                    let index = match bucket.get_index_of(&cursor.identity) {
                        Some(position) => position + 1,
                        None => cursor.index,
                    };
                    if let Some(found) = entry_at(cursor.priority, bucket, index) {
                        return Some(found);
                    }
                }
                Bound::Excluded(cursor.priority)
            }
        };

        buckets
            .range((lower, Bound::Unbounded))
            .find_map(|(priority, bucket)| entry_at(*priority, bucket, 0))
    }
}

fn entry_at(priority: i32, bucket: &PriorityBucket, index: usize) -> Option<(Cursor, CallbackEntry)> {
    let (identity, entry) = bucket.get_index(index)?;
    Some((
        Cursor {
            priority,
            index,
            identity: identity.clone(),
        },
        entry.clone(),
    ))
}
