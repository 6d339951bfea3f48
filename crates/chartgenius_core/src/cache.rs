//! crates/chartgenius_core/src/cache.rs
//!
//! Memoisation of analysis results, keyed by the verbatim trimmed input text.
//! Entries live for the lifetime of the process only.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use crate::domain::ContentBlock;

/// A get/put cache of block sequences.
pub trait AnalysisCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Vec<ContentBlock>>;

    /// Overwrites any existing entry for `key`.
    fn put(&self, key: String, blocks: Vec<ContentBlock>);
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic while holding the lock cannot leave a half-written entry behind.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

//=========================================================================================
// Unbounded
//=========================================================================================

/// A plain map that never evicts.
#[derive(Default)]
pub struct UnboundedCache {
    entries: Mutex<HashMap<String, Vec<ContentBlock>>>,
}

impl UnboundedCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnalysisCache for UnboundedCache {
    fn get(&self, key: &str) -> Option<Vec<ContentBlock>> {
        lock(&self.entries).get(key).cloned()
    }

    fn put(&self, key: String, blocks: Vec<ContentBlock>) {
        lock(&self.entries).insert(key, blocks);
    }
}

//=========================================================================================
// Bounded LRU
//=========================================================================================

#[derive(Default)]
struct LruState {
    entries: HashMap<String, (u64, Vec<ContentBlock>)>,
    // recency tick -> key, oldest first
    order: BTreeMap<u64, String>,
    tick: u64,
}

impl LruState {
    fn touch(&mut self, key: &str) -> Option<u64> {
        let (old_tick, _) = self.entries.get(key)?;
        let old_tick = *old_tick;
        self.order.remove(&old_tick);
        self.tick += 1;
        self.order.insert(self.tick, key.to_string());
        Some(self.tick)
    }
}

/// A cache holding at most `capacity` entries, evicting the least recently
/// used one. A capacity of zero stores nothing.
pub struct LruCache {
    capacity: usize,
    state: Mutex<LruState>,
}

impl LruCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(LruState::default()),
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.state).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AnalysisCache for LruCache {
    fn get(&self, key: &str) -> Option<Vec<ContentBlock>> {
        let mut state = lock(&self.state);
        let tick = state.touch(key)?;
        let entry = state.entries.get_mut(key)?;
        entry.0 = tick;
        Some(entry.1.clone())
    }

    fn put(&self, key: String, blocks: Vec<ContentBlock>) {
        if self.capacity == 0 {
            return;
        }
        let mut state = lock(&self.state);
        if let Some((old_tick, _)) = state.entries.remove(&key) {
            state.order.remove(&old_tick);
        }
        state.tick += 1;
        let tick = state.tick;
        state.order.insert(tick, key.clone());
        state.entries.insert(key, (tick, blocks));

        while state.entries.len() > self.capacity {
            let Some((_, oldest)) = state.order.pop_first() else {
                break;
            };
            state.entries.remove(&oldest);
        }
    }
}
