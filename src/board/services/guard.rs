//! In-flight guards for per-key and single-flight operations.
//!
//! Guards release on drop, so an entry never outlives the operation that
//! took it, whether the operation succeeds, fails, or is cancelled.

use std::collections::{BTreeSet, HashSet};
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Set of keys with an operation in flight.
#[derive(Debug)]
pub struct BusySet<K> {
    keys: Arc<Mutex<HashSet<K>>>,
}

impl<K> Clone for BusySet<K> {
    fn clone(&self) -> Self {
        Self {
            keys: Arc::clone(&self.keys),
        }
    }
}

impl<K> Default for BusySet<K> {
    fn default() -> Self {
        Self {
            keys: Arc::new(Mutex::new(HashSet::new())),
        }
    }
}

impl<K> BusySet<K>
where
    K: Eq + Hash + Clone + Ord,
{
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<K>> {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks `key` busy, or returns `None` if it already is.
    #[must_use]
    pub fn try_acquire(&self, key: K) -> Option<BusyGuard<K>> {
        if !self.lock().insert(key.clone()) {
            return None;
        }
        Some(BusyGuard {
            keys: Arc::clone(&self.keys),
            key,
        })
    }

    /// Returns `true` when `key` has an operation in flight.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.lock().contains(key)
    }

    /// Returns the busy keys in order.
    #[must_use]
    pub fn snapshot(&self) -> BTreeSet<K> {
        self.lock().iter().cloned().collect()
    }
}

/// Releases its key from the [`BusySet`] on drop.
#[derive(Debug)]
pub struct BusyGuard<K>
where
    K: Eq + Hash,
{
    keys: Arc<Mutex<HashSet<K>>>,
    key: K,
}

impl<K> BusyGuard<K>
where
    K: Eq + Hash,
{
    /// Returns the guarded key.
    pub const fn key(&self) -> &K {
        &self.key
    }
}

impl<K> Drop for BusyGuard<K>
where
    K: Eq + Hash,
{
    fn drop(&mut self) {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

/// Allows one holder at a time.
#[derive(Debug, Clone, Default)]
pub struct SingleFlight {
    running: Arc<AtomicBool>,
}

impl SingleFlight {
    /// Creates an idle flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters the flight, or returns `None` if another holder is inside.
    #[must_use]
    pub fn try_enter(&self) -> Option<FlightGuard> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard {
                running: Arc::clone(&self.running),
            })
    }

    /// Returns `true` while a holder is inside.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Leaves the [`SingleFlight`] on drop.
#[derive(Debug)]
pub struct FlightGuard {
    running: Arc<AtomicBool>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}
