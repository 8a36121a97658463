//! Keyed debouncing on an explicit millisecond timeline

use std::collections::HashMap;
use std::hash::Hash;

/// Remembers the last accepted time per key and rejects events that arrive
/// inside that key's window.
#[derive(Debug, Clone)]
pub struct Debouncer<K> {
    last_fired: HashMap<K, u64>,
}

impl<K: Eq + Hash + Copy> Debouncer<K> {
    pub fn new() -> Self {
        Self {
            last_fired: HashMap::new(),
        }
    }

    /// True if `key` has never fired or its window has fully elapsed
    pub fn is_ready(&self, key: K, now_ms: u64, window_ms: u64) -> bool {
        match self.last_fired.get(&key) {
            Some(&last) => now_ms.saturating_sub(last) >= window_ms,
            None => true,
        }
    }

    pub fn record(&mut self, key: K, now_ms: u64) {
        self.last_fired.insert(key, now_ms);
    }

    /// Check and record in one step; returns whether the event passed
    pub fn try_fire(&mut self, key: K, now_ms: u64, window_ms: u64) -> bool {
        if self.is_ready(key, now_ms, window_ms) {
            self.record(key, now_ms);
            true
        } else {
            false
        }
    }

    pub fn last_fired(&self, key: K) -> Option<u64> {
        self.last_fired.get(&key).copied()
    }

    pub fn clear(&mut self) {
        self.last_fired.clear();
    }
}

impl<K: Eq + Hash + Copy> Default for Debouncer<K> {
    fn default() -> Self {
        Self::new()
    }
}
