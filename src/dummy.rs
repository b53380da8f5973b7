//! A trivial [`Container`] implementation used for tests and as a baseline
//! in the demos: FIFO eviction over a fixed-capacity `Vec`, no priority
//! tracking, no splay, no heap.
//!
//! Useful for exercising [`crate::cache::Cache`] itself (invocation timing,
//! `UserFunctionFailed` propagation, event counting) without also exercising
//! one of the real eviction policies.

extern crate alloc;

use crate::container::Container;
use alloc::collections::VecDeque;
use alloc::vec::Vec;

/// First-in-first-out fixed-capacity container.
#[derive(Debug)]
pub struct DummyContainer<K, V> {
    cap: usize,
    order: VecDeque<K>,
    entries: Vec<(K, V)>,
}

impl<K: PartialEq + Clone, V> DummyContainer<K, V> {
    /// Builds an empty container holding at most `cap` entries.
    pub fn new(cap: usize) -> Self {
        DummyContainer {
            cap,
            order: VecDeque::new(),
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq + Clone, V> Container<K, V> for DummyContainer<K, V> {
    fn find(&mut self, key: &K) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    fn insert(&mut self, key: K, value: V, _initial_priority: u32) -> Option<(K, V)> {
        let evicted = if self.entries.len() >= self.cap {
            let oldest = self.order.pop_front()?;
            let idx = self.entries.iter().position(|(k, _)| *k == oldest)?;
            Some(self.entries.remove(idx))
        } else {
            None
        };
        self.order.push_back(key.clone());
        self.entries.push((key, value));
        evicted
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        let (k, v) = self.entries.remove(idx);
        if let Some(pos) = self.order.iter().position(|o| *o == k) {
            self.order.remove(pos);
        }
        Some(v)
    }

    fn capacity(&self) -> usize {
        self.cap
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_insertion_first() {
        let mut c = DummyContainer::<u32, &str>::new(2);
        assert!(c.insert(1, "a", 1).is_none());
        assert!(c.insert(2, "b", 1).is_none());
        let evicted = c.insert(3, "c", 1).unwrap();
        assert_eq!(evicted.0, 1);
        assert!(c.find(&1).is_none());
        assert!(c.find(&2).is_some());
        assert!(c.find(&3).is_some());
    }

    #[test]
    fn remove_drops_entry_and_order_tracking() {
        let mut c = DummyContainer::<u32, &str>::new(2);
        c.insert(1, "a", 1);
        c.insert(2, "b", 1);
        assert_eq!(c.remove(&1), Some("a"));
        assert_eq!(c.len(), 1);
        // Freed capacity, so a new insert should not evict 2.
        assert!(c.insert(3, "c", 1).is_none());
        assert!(c.find(&2).is_some());
    }
}
