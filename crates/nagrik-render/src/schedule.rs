//! Per-frame coalescing of recomputation requests.
//!
//! Each trigger source owns at most one pending request. Scheduling again before the frame
//! fires replaces the earlier request, so a burst of events costs one recomputation.

use indexmap::IndexMap;
use std::hash::Hash;

/// Identifies one scheduled request; stale once replaced, cancelled or drained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

#[derive(Debug, Clone)]
pub struct FrameScheduler<K> {
    pending: IndexMap<K, FrameHandle>,
    next_id: u64,
}

impl<K> Default for FrameScheduler<K> {
    fn default() -> Self {
        Self {
            pending: IndexMap::new(),
            next_id: 0,
        }
    }
}

impl<K: Hash + Eq + Clone> FrameScheduler<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests work for `key` on the next frame, replacing any pending request for it.
    pub fn schedule(&mut self, key: K) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.insert(key, handle);
        handle
    }

    pub fn cancel(&mut self, key: &K) -> bool {
        self.pending.shift_remove(key).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.values().any(|h| *h == handle)
    }

    /// Drains the pending requests in the order their keys were first scheduled.
    pub fn take_due(&mut self) -> Vec<K> {
        self.pending.drain(..).map(|(k, _)| k).collect()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}
