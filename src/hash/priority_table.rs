//! Priority hash table (§4.4): an open-chained hash table whose chains are
//! kept sorted by key, coupled to a parallel binary min-heap keyed by
//! priority. Each node records its own position in the heap array so the
//! heap side of an access (`topDownHeapify`/`bottomUpHeapify` in the
//! original) never needs a linear scan to find the node it just touched.
//!
//! Ported from `hash_table/fixed_hashtable_binary_heap.h`.

extern crate alloc;

use crate::config::priority_table::PriorityTableConfig;
use crate::container::Container;
use crate::error::CacheError;
use crate::priority::{Priority, PriorityScore};
use alloc::vec;
use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash, Hasher};

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

struct Node<K, V> {
    key: K,
    value: V,
    priority: Priority,
    /// Index of this node's slot in `heap`. Kept in sync on every swap so a
    /// node can be resifted in `O(log n)` without a linear search.
    heap_idx: usize,
}

/// A fixed-capacity hash table whose eviction candidate is always the
/// lowest-priority entry, tracked via an embedded binary min-heap.
pub struct PriorityHashTable<K, V, S = DefaultHashBuilder> {
    hasher: S,
    buckets: Vec<Vec<usize>>,
    arena: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    heap: Vec<usize>,
    degradation_rate: u32,
    cap: usize,
}

impl<K: Hash + Ord + Clone, V> PriorityHashTable<K, V, DefaultHashBuilder> {
    /// Builds a table sized from `config`, using the default hasher.
    pub fn new(config: PriorityTableConfig) -> Result<Self, CacheError> {
        Self::with_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K: Hash + Ord + Clone, V, S: BuildHasher> PriorityHashTable<K, V, S> {
    /// Builds a table sized from `config` with an explicit hasher.
    pub fn with_hasher(config: PriorityTableConfig, hasher: S) -> Result<Self, CacheError> {
        let element_size = core::mem::size_of::<Node<K, V>>() + core::mem::size_of::<usize>() * 2;
        let cap =
            crate::config::max_elem_count_for_capacity(config.memory_budget, element_size, config.load_factor);
        if cap == 0 {
            return Err(CacheError::InsufficientMemory);
        }
        if config.use_short_index && cap > (u32::MAX - 1) as usize {
            return Err(CacheError::CapacityExceeded);
        }
        let bucket_count = ((cap as f64 * config.load_factor).ceil() as usize).max(1);
        Ok(PriorityHashTable {
            hasher,
            buckets: vec![Vec::new(); bucket_count],
            arena: Vec::with_capacity(cap),
            free: Vec::new(),
            heap: Vec::with_capacity(cap),
            degradation_rate: config.degradation_rate,
            cap,
        })
    }

    fn bucket_index(&self, key: &K) -> usize {
        let mut hasher = self.hasher.build_hasher();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.buckets.len()
    }

    fn chain_search(&self, chain: &[usize], key: &K) -> Result<usize, usize> {
        chain.binary_search_by(|&idx| {
            self.arena[idx]
                .as_ref()
                .expect("chain entries are always occupied")
                .key
                .cmp(key)
        })
    }

    fn alloc_node(&mut self, node: Node<K, V>) -> usize {
        if let Some(idx) = self.free.pop() {
            self.arena[idx] = Some(node);
            idx
        } else {
            self.arena.push(Some(node));
            self.arena.len() - 1
        }
    }

    fn heap_parent(i: usize) -> Option<usize> {
        if i == 0 {
            None
        } else {
            Some((i - 1) / 2)
        }
    }

    fn heap_children(i: usize) -> (usize, usize) {
        (2 * i + 1, 2 * i + 2)
    }

    fn heap_priority(&self, heap_pos: usize) -> &Priority {
        let idx = self.heap[heap_pos];
        &self.arena[idx].as_ref().unwrap().priority
    }

    fn heap_swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        let idx_a = self.heap[a];
        let idx_b = self.heap[b];
        self.arena[idx_a].as_mut().unwrap().heap_idx = a;
        self.arena[idx_b].as_mut().unwrap().heap_idx = b;
    }

    fn sift_up(&mut self, mut pos: usize) {
        while let Some(parent) = Self::heap_parent(pos) {
            if self.heap_priority(parent) > self.heap_priority(pos) {
                self.heap_swap(parent, pos);
                pos = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        loop {
            let (l, r) = Self::heap_children(pos);
            let mut smallest = pos;
            if l < self.heap.len() && self.heap_priority(l) < self.heap_priority(smallest) {
                smallest = l;
            }
            if r < self.heap.len() && self.heap_priority(r) < self.heap_priority(smallest) {
                smallest = r;
            }
            if smallest == pos {
                break;
            }
            self.heap_swap(pos, smallest);
            // Pass-by decay: the node that just moved up into the vacated
            // parent slot is, in effect, passed over by the sift and ages
            // slightly, matching `topDownHeapify`'s degradation of the
            // promoted node. Decay can shrink it below its new parent, so
            // it gets a chance to rise further before the descent resumes.
            if self.degradation_rate > 0 {
                let idx = self.heap[pos];
                self.arena[idx].as_mut().unwrap().priority.visit(self.degradation_rate);
                self.sift_up(pos);
            }
            pos = smallest;
        }
    }

    fn resift(&mut self, heap_pos: usize) {
        self.sift_down(heap_pos);
        self.sift_up(heap_pos);
    }

    fn heap_push(&mut self, idx: usize) {
        let pos = self.heap.len();
        self.heap.push(idx);
        self.arena[idx].as_mut().unwrap().heap_idx = pos;
        self.sift_up(pos);
    }

    fn heap_remove_at(&mut self, pos: usize) {
        let last = self.heap.len() - 1;
        if pos != last {
            self.heap_swap(pos, last);
        }
        self.heap.pop();
        if pos < self.heap.len() {
            self.resift(pos);
        }
    }

    fn evict_min(&mut self) -> Option<(K, V)> {
        let idx = *self.heap.first()?;
        self.heap_remove_at(0);
        let bucket = self.bucket_index(&self.arena[idx].as_ref().unwrap().key);
        let chain = &mut self.buckets[bucket];
        let key_pos = chain
            .iter()
            .position(|&i| i == idx)
            .expect("evicted node must be present in its bucket chain");
        chain.remove(key_pos);
        let node = self.arena[idx].take().unwrap();
        self.free.push(idx);
        Some((node.key, node.value))
    }
}

#[cfg(feature = "std")]
impl<K: Hash + Ord + Clone + core::fmt::Debug, V, S: BuildHasher> PriorityHashTable<K, V, S> {
    /// Renders the heap array (eviction order) and bucket chain lengths as
    /// text, for inspecting eviction order while debugging.
    ///
    /// Ported from `hash_table/fixed_hashtable_binary_heap.h::dump`.
    pub fn debug_dump(&self) -> alloc::string::String {
        use core::fmt::Write;
        let mut out = alloc::string::String::new();
        let _ = writeln!(out, "heap (index order, key:priority):");
        for (pos, &idx) in self.heap.iter().enumerate() {
            let node = self.arena[idx].as_ref().unwrap();
            let _ = writeln!(out, "  [{pos}] {:?}: {}", node.key, node.priority.value());
        }
        let _ = writeln!(out, "bucket chain lengths:");
        for (b, chain) in self.buckets.iter().enumerate() {
            if !chain.is_empty() {
                let _ = writeln!(out, "  [{b}]: {}", chain.len());
            }
        }
        out
    }
}

impl<K: Hash + Ord + Clone, V, S: BuildHasher> Container<K, V> for PriorityHashTable<K, V, S> {
    fn find(&mut self, key: &K) -> Option<&V> {
        let bucket = self.bucket_index(key);
        let pos = self.chain_search(&self.buckets[bucket], key).ok()?;
        let idx = self.buckets[bucket][pos];
        let heap_pos = {
            let node = self.arena[idx].as_mut().unwrap();
            node.priority.access();
            node.heap_idx
        };
        self.resift(heap_pos);
        Some(&self.arena[idx].as_ref().unwrap().value)
    }

    fn insert(&mut self, key: K, value: V, initial_priority: u32) -> Option<(K, V)> {
        let bucket = self.bucket_index(&key);
        if let Ok(pos) = self.chain_search(&self.buckets[bucket], &key) {
            let idx = self.buckets[bucket][pos];
            let heap_pos = {
                let node = self.arena[idx].as_mut().unwrap();
                node.priority.access();
                node.heap_idx
            };
            self.resift(heap_pos);
            return None;
        }

        let evicted = if self.len() >= self.cap {
            self.evict_min()
        } else {
            None
        };

        let node = Node {
            key: key.clone(),
            value,
            priority: Priority::new(initial_priority),
            heap_idx: 0,
        };
        let idx = self.alloc_node(node);
        let bucket = self.bucket_index(&key);
        let chain = &mut self.buckets[bucket];
        let pos = chain
            .binary_search_by(|&i| self.arena[i].as_ref().unwrap().key.cmp(&key))
            .unwrap_or_else(|pos| pos);
        chain.insert(pos, idx);
        self.heap_push(idx);

        evicted
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let bucket = self.bucket_index(key);
        let pos = self.chain_search(&self.buckets[bucket], key).ok()?;
        let idx = self.buckets[bucket].remove(pos);
        let heap_pos = self.arena[idx].as_ref().unwrap().heap_idx;
        self.heap_remove_at(heap_pos);
        let node = self.arena[idx].take().unwrap();
        self.free.push(idx);
        Some(node.value)
    }

    fn capacity(&self) -> usize {
        self.cap
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(cap_hint_bytes: usize) -> PriorityHashTable<u32, &'static str> {
        let mut config = PriorityTableConfig::new(cap_hint_bytes);
        config.load_factor = 1.0;
        PriorityHashTable::new(config).unwrap()
    }

    #[test]
    #[cfg(feature = "std")]
    fn debug_dump_lists_every_key_in_the_heap_section() {
        let mut t = table(4096);
        t.insert(1, "a", 10);
        t.insert(2, "b", 20);
        let dump = t.debug_dump();
        assert_eq!(dump.matches('1').count(), 1);
        assert_eq!(dump.matches('2').count(), 1);
    }

    #[test]
    fn insert_and_find_round_trip() {
        let mut t = table(4096);
        t.insert(1, "a", 10);
        t.insert(2, "b", 20);
        assert_eq!(t.find(&1), Some(&"a"));
        assert_eq!(t.find(&2), Some(&"b"));
        assert_eq!(t.find(&3), None);
    }

    #[test]
    fn evicts_lowest_priority_first() {
        let element_size =
            core::mem::size_of::<Node<u32, &str>>() + core::mem::size_of::<usize>() * 2;
        let mut config = PriorityTableConfig::new(element_size * 3);
        config.load_factor = 1.0;
        let mut t: PriorityHashTable<u32, &str> = PriorityHashTable::new(config).unwrap();
        assert_eq!(t.capacity(), 3);
        t.insert(1, "low", 1);
        t.insert(2, "mid", 10);
        t.insert(3, "high", 254);
        let evicted = t.insert(4, "new", 50);
        assert_eq!(evicted.map(|(k, _)| k), Some(1));
        assert!(t.find(&2).is_some());
        assert!(t.find(&3).is_some());
        assert!(t.find(&4).is_some());
    }

    #[test]
    fn accessing_an_entry_protects_it_from_eviction() {
        let element_size =
            core::mem::size_of::<Node<u32, &str>>() + core::mem::size_of::<usize>() * 2;
        let mut config = PriorityTableConfig::new(element_size * 2);
        config.load_factor = 1.0;
        let mut t: PriorityHashTable<u32, &str> = PriorityHashTable::new(config).unwrap();
        t.insert(1, "a", 5);
        t.insert(2, "b", 5);
        // Repeated access boosts 1's priority well above 2's.
        for _ in 0..5 {
            t.find(&1);
        }
        let evicted = t.insert(3, "c", 5);
        assert_eq!(evicted.map(|(k, _)| k), Some(2));
    }

    #[test]
    fn re_insert_of_a_present_key_does_not_duplicate_the_entry() {
        let mut t = table(4096);
        t.insert(1, "a", 1);
        t.insert(2, "b", 250);
        assert_eq!(t.find(&1), Some(&"a"));
        // Re-inserting 1 must not overwrite its value or plant a second
        // node; it should only bump 1's priority the way a `find` would.
        let evicted = t.insert(1, "a-replacement", 1);
        assert_eq!(evicted, None);
        assert_eq!(t.find(&1), Some(&"a"));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn re_insert_of_a_present_key_protects_it_from_eviction_like_a_find() {
        let element_size =
            core::mem::size_of::<Node<u32, &str>>() + core::mem::size_of::<usize>() * 2;
        let mut config = PriorityTableConfig::new(element_size * 2);
        config.load_factor = 1.0;
        let mut t: PriorityHashTable<u32, &str> = PriorityHashTable::new(config).unwrap();
        t.insert(1, "a", 5);
        t.insert(2, "b", 5);
        for _ in 0..5 {
            t.insert(1, "ignored", 5);
        }
        let evicted = t.insert(3, "c", 5);
        assert_eq!(evicted.map(|(k, _)| k), Some(2));
    }

    #[test]
    fn heap_stays_min_ordered_after_repeated_decay() {
        let mut config = PriorityTableConfig::new(4096);
        config.load_factor = 1.0;
        config.degradation_rate = 3;
        let mut t: PriorityHashTable<u32, u32> = PriorityHashTable::new(config).unwrap();
        for k in 0..16u32 {
            t.insert(k, k, 200);
        }
        // Repeatedly searching past the same keys exercises `sift_down`'s
        // decay path on whichever node is promoted at each level.
        for _ in 0..50 {
            for k in 0..16u32 {
                t.find(&k);
            }
        }
        for pos in 0..t.heap.len() {
            for child in [2 * pos + 1, 2 * pos + 2] {
                if child < t.heap.len() {
                    assert!(
                        t.heap_priority(pos) <= t.heap_priority(child),
                        "min-heap property violated at parent {pos}, child {child}"
                    );
                }
            }
        }
    }

    #[test]
    fn insufficient_memory_is_rejected() {
        let config = PriorityTableConfig::new(0);
        assert!(matches!(
            PriorityHashTable::<u32, u32>::new(config),
            Err(CacheError::InsufficientMemory)
        ));
    }
}
