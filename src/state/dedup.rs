//! Concurrent visited/enqueued bookkeeping
//!
//! A key moves `Unseen -> Enqueued -> Visited`, or from `Enqueued` back to
//! `Unseen` when an enqueue is rolled back or a queued task is dropped before
//! it starts. Once `Visited`, a key never leaves that state. Both logical sets
//! live behind one `RwLock` so every transition is atomic.

use crate::url::CanonicalKey;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Where a key currently sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Membership {
    Unseen,
    Enqueued,
    Visited,
}

/// Thread-safe dedup set shared by every crawl worker
#[derive(Debug, Default)]
pub struct DedupSet {
    keys: RwLock<HashMap<CanonicalKey, Membership>>,
}

impl DedupSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<CanonicalKey, Membership>> {
        self.keys.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<CanonicalKey, Membership>> {
        self.keys.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the current membership of a key
    pub fn membership(&self, key: &CanonicalKey) -> Membership {
        self.read().get(key).copied().unwrap_or(Membership::Unseen)
    }

    /// Returns true if the key is enqueued or visited
    pub fn contains(&self, key: &CanonicalKey) -> bool {
        self.read().contains_key(key)
    }

    /// Returns true if processing of the key has started
    pub fn is_visited(&self, key: &CanonicalKey) -> bool {
        self.membership(key) == Membership::Visited
    }

    /// Returns true if the key is queued but not yet started
    pub fn is_enqueued(&self, key: &CanonicalKey) -> bool {
        self.membership(key) == Membership::Enqueued
    }

    /// Adds an unseen key to `enqueued`
    ///
    /// Returns false, leaving the set untouched, when the key is already
    /// enqueued or visited.
    pub fn add_enqueued(&self, key: CanonicalKey) -> bool {
        let mut keys = self.write();
        if keys.contains_key(&key) {
            return false;
        }
        keys.insert(key, Membership::Enqueued);
        true
    }

    /// Removes a key from `enqueued`
    ///
    /// Visited keys are never removed. Returns true if the key was enqueued.
    pub fn remove_enqueued(&self, key: &CanonicalKey) -> bool {
        let mut keys = self.write();
        if keys.get(key) == Some(&Membership::Enqueued) {
            keys.remove(key);
            return true;
        }
        false
    }

    /// Check-and-set into `visited`
    ///
    /// Returns true if this call moved the key into `visited` (removing it from
    /// `enqueued`), false if it was already visited.
    pub fn add_visited(&self, key: CanonicalKey) -> bool {
        let mut keys = self.write();
        match keys.get(&key) {
            Some(Membership::Visited) => false,
            _ => {
                keys.insert(key, Membership::Visited);
                true
            }
        }
    }

    /// Number of visited keys
    pub fn visited_len(&self) -> usize {
        self.read()
            .values()
            .filter(|m| **m == Membership::Visited)
            .count()
    }

    /// Number of keys currently enqueued
    pub fn enqueued_len(&self) -> usize {
        self.read()
            .values()
            .filter(|m| **m == Membership::Enqueued)
            .count()
    }

    /// Sorted snapshot of the visited keys
    pub fn visited(&self) -> Vec<CanonicalKey> {
        let mut out: Vec<CanonicalKey> = self
            .read()
            .iter()
            .filter(|(_, m)| **m == Membership::Visited)
            .map(|(k, _)| k.clone())
            .collect();
        out.sort();
        out
    }
}
