//! Per-task action guard
//!
//! Tracks which task ids currently have an in-flight mutation so
//! overlapping actions on the same task are rejected while actions on
//! different tasks run concurrently. The permit removes its id on drop,
//! so no exit path can leak a permanently blocked id.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

type Ids = Arc<Mutex<HashSet<i64>>>;

fn lock(ids: &Ids) -> std::sync::MutexGuard<'_, HashSet<i64>> {
    ids.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Shared set of task ids under mutation
#[derive(Debug, Clone, Default)]
pub struct ActionGuard {
    ids: Ids,
}

impl ActionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a mutation for the given id
    ///
    /// Returns `None` when a mutation for this id is already in
    /// flight; the caller must skip the new call.
    pub fn begin(&self, id: i64) -> Option<ActionPermit> {
        let mut ids = lock(&self.ids);
        if !ids.insert(id) {
            return None;
        }
        Some(ActionPermit {
            id,
            ids: Arc::clone(&self.ids),
        })
    }

    /// Whether a mutation for this id is in flight (used by the
    /// presentation layer to disable per-task controls)
    pub fn contains(&self, id: i64) -> bool {
        lock(&self.ids).contains(&id)
    }

    pub fn len(&self) -> usize {
        lock(&self.ids).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.ids).is_empty()
    }
}

/// RAII permit for one in-flight mutation
#[derive(Debug)]
pub struct ActionPermit {
    id: i64,
    ids: Ids,
}

impl Drop for ActionPermit {
    fn drop(&mut self) {
        lock(&self.ids).remove(&self.id);
    }
}
