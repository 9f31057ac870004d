//! Scan registry: which targets are being scanned and which are done.

use log::debug;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::ScanError;

#[derive(Debug, Default)]
struct RegistryState {
    active: HashSet<String>,
    completed: HashSet<String>,
}

/// Active and completed identifier sets behind one lock.
///
/// An identifier is in at most one set, and once completed it never becomes active again.
/// Cheap to clone; clones share state.
#[derive(Clone, Debug, Default)]
pub struct ScanRegistry {
    inner: Arc<Mutex<RegistryState>>,
}

impl ScanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, RegistryState> {
        // State is two sets updated in single statements; a poisoned lock still holds consistent data.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Reserve `id` for scanning. Returns false if it is already active or completed.
    /// Check and insert happen under one lock, so concurrent callers get `true` at most once.
    pub fn try_reserve(&self, id: &str) -> bool {
        let mut state = self.state();
        if state.active.contains(id) || state.completed.contains(id) {
            return false;
        }
        state.active.insert(id.to_string());
        debug!("Registry: {} active ({} total)", id, state.active.len());
        true
    }

    /// Move `id` from active to completed.
    pub fn mark_complete(&self, id: &str) -> Result<(), ScanError> {
        let mut state = self.state();
        if !state.active.remove(id) {
            return Err(ScanError::RegistryConsistency { id: id.to_string() });
        }
        state.completed.insert(id.to_string());
        debug!(
            "Registry: {} completed ({} still active)",
            id,
            state.active.len()
        );
        Ok(())
    }

    /// Drop a reservation whose scan never started. Returns false if `id` was not active.
    pub fn release(&self, id: &str) -> bool {
        let released = self.state().active.remove(id);
        if released {
            debug!("Registry: {} released", id);
        }
        released
    }

    pub fn active_count(&self) -> usize {
        self.state().active.len()
    }

    pub fn completed_count(&self) -> usize {
        self.state().completed.len()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.state().active.contains(id)
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.state().completed.contains(id)
    }

    /// Snapshot of the active identifiers, sorted.
    pub fn active_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.state().active.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Snapshot of the completed identifiers, sorted.
    pub fn completed_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.state().completed.iter().cloned().collect();
        ids.sort();
        ids
    }
}
