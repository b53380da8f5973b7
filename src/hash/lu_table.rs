//! Hash table delegating eviction to an LU (least-used) strategy list
//! instead of a priority heap (component 5, §4.3+§4.5).
//!
//! Ported from `hash_table/fixed_hashtable_fair_lu.h`: the table owns the
//! chains and a free-list arena exactly like
//! [`crate::hash::priority_table::PriorityHashTable`], but the "which node
//! is least used" question is delegated to a pluggable [`LuStrategy`]
//! (backed by [`crate::lru_list::LruList`] or [`crate::lfu_list::LfuList`])
//! instead of a heap.

extern crate alloc;

use crate::container::Container;
use crate::error::CacheError;
use crate::lfu_list::{LfuList, LfuNode};
use crate::lru_list::LruList;
use alloc::vec;
use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash, Hasher};
use core::num::NonZeroUsize;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// A pluggable "which entry is least used" policy, implemented by the LRU
/// and fair-LFU list backends.
pub trait LuStrategy<K> {
    /// Opaque per-key handle the strategy hands back.
    type Handle: Copy;

    /// Builds a strategy with room for `cap` keys.
    fn new(cap: NonZeroUsize) -> Self;
    /// Records a brand-new key, returning its handle.
    fn insert(&mut self, key: K) -> Option<Self::Handle>;
    /// Records that `key` (identified by `handle`) was just accessed,
    /// returning the (possibly updated) handle to store back.
    ///
    /// # Safety
    /// `handle` must be live and owned by this strategy instance.
    unsafe fn touch(&mut self, handle: Self::Handle) -> Self::Handle;
    /// Evicts and returns the least-used key.
    fn evict(&mut self) -> Option<K>;
    /// Removes a specific key ahead of its natural eviction.
    ///
    /// # Safety
    /// `handle` must be live and owned by this strategy instance.
    unsafe fn remove(&mut self, handle: Self::Handle) -> Option<K>;
}

/// [`LuStrategy`] backed by [`LruList`]: eviction removes the
/// least-recently-used key.
pub struct LruStrategy<K> {
    list: LruList<K>,
}

impl<K> LuStrategy<K> for LruStrategy<K> {
    type Handle = *mut crate::list::Entry<K>;

    fn new(cap: NonZeroUsize) -> Self {
        LruStrategy { list: LruList::new(cap) }
    }
    fn insert(&mut self, key: K) -> Option<Self::Handle> {
        self.list.insert(key)
    }
    unsafe fn touch(&mut self, handle: Self::Handle) -> Self::Handle {
        // SAFETY: forwarded caller obligation.
        unsafe { self.list.touch(handle) };
        handle
    }
    fn evict(&mut self) -> Option<K> {
        self.list.least_used()
    }
    unsafe fn remove(&mut self, handle: Self::Handle) -> Option<K> {
        // SAFETY: forwarded caller obligation.
        unsafe { self.list.remove(handle) }
    }
}

/// [`LuStrategy`] backed by [`LfuList`]: eviction removes the
/// least-frequently-used key, ties broken by recency.
pub struct LfuStrategy<K> {
    list: LfuList<K>,
}

impl<K> LuStrategy<K> for LfuStrategy<K> {
    type Handle = LfuNode<K>;

    fn new(cap: NonZeroUsize) -> Self {
        LfuStrategy { list: LfuList::new(cap) }
    }
    fn insert(&mut self, key: K) -> Option<Self::Handle> {
        self.list.insert(key)
    }
    unsafe fn touch(&mut self, handle: Self::Handle) -> Self::Handle {
        // SAFETY: forwarded caller obligation.
        unsafe { self.list.touch(handle) }
    }
    fn evict(&mut self) -> Option<K> {
        self.list.least_used()
    }
    unsafe fn remove(&mut self, handle: Self::Handle) -> Option<K> {
        // SAFETY: forwarded caller obligation.
        unsafe { self.list.remove(handle) }
    }
}

struct Node<V, H> {
    value: V,
    handle: H,
}

/// A fixed-capacity hash table whose eviction candidate comes from an
/// [`LuStrategy`] (LRU or fair LFU) rather than a priority heap.
pub struct LuTable<K, V, L: LuStrategy<K>, S = DefaultHashBuilder> {
    hasher: S,
    buckets: Vec<Vec<(K, usize)>>,
    arena: Vec<Option<Node<V, L::Handle>>>,
    free: Vec<usize>,
    strategy: L,
    cap: usize,
}

impl<K, V, L> LuTable<K, V, L, DefaultHashBuilder>
where
    K: Hash + Eq + Clone,
    L: LuStrategy<K>,
{
    /// Builds a table with room for `cap` keys, using the default hasher.
    pub fn new(cap: usize) -> Result<Self, CacheError> {
        Self::with_hasher(cap, DefaultHashBuilder::default())
    }
}

impl<K, V, L, S> LuTable<K, V, L, S>
where
    K: Hash + Eq + Clone,
    L: LuStrategy<K>,
    S: BuildHasher,
{
    /// Builds a table with room for `cap` keys and an explicit hasher.
    pub fn with_hasher(cap: usize, hasher: S) -> Result<Self, CacheError> {
        let cap_nz = NonZeroUsize::new(cap).ok_or(CacheError::InsufficientMemory)?;
        let bucket_count = (cap * 2).max(1);
        Ok(LuTable {
            hasher,
            buckets: vec![Vec::new(); bucket_count],
            arena: Vec::with_capacity(cap),
            free: Vec::new(),
            strategy: L::new(cap_nz),
            cap,
        })
    }

    fn bucket_index(&self, key: &K) -> usize {
        let mut hasher = self.hasher.build_hasher();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.buckets.len()
    }

    fn alloc_node(&mut self, node: Node<V, L::Handle>) -> usize {
        if let Some(idx) = self.free.pop() {
            self.arena[idx] = Some(node);
            idx
        } else {
            self.arena.push(Some(node));
            self.arena.len() - 1
        }
    }

    fn occupied_count(&self) -> usize {
        self.arena.len() - self.free.len()
    }

    fn remove_from_bucket(&mut self, key: &K) -> Option<usize> {
        let b = self.bucket_index(key);
        let pos = self.buckets[b].iter().position(|(k, _)| k == key)?;
        Some(self.buckets[b].remove(pos).1)
    }
}

impl<K, V, L, S> Container<K, V> for LuTable<K, V, L, S>
where
    K: Hash + Eq + Clone,
    L: LuStrategy<K>,
    S: BuildHasher,
{
    fn find(&mut self, key: &K) -> Option<&V> {
        let b = self.bucket_index(key);
        let idx = self.buckets[b].iter().find(|(k, _)| k == key)?.1;
        let handle = self.arena[idx].as_ref().unwrap().handle;
        // SAFETY: handle was produced by this table's strategy and is live.
        let new_handle = unsafe { self.strategy.touch(handle) };
        self.arena[idx].as_mut().unwrap().handle = new_handle;
        Some(&self.arena[idx].as_ref().unwrap().value)
    }

    fn insert(&mut self, key: K, value: V, _initial_priority: u32) -> Option<(K, V)> {
        let b = self.bucket_index(&key);
        if let Some(&(_, idx)) = self.buckets[b].iter().find(|(k, _)| *k == key) {
            let handle = self.arena[idx].as_ref().unwrap().handle;
            // SAFETY: handle was produced by this table's strategy and is live.
            let new_handle = unsafe { self.strategy.touch(handle) };
            self.arena[idx].as_mut().unwrap().handle = new_handle;
            return None;
        }

        let evicted = if self.occupied_count() >= self.cap {
            let evicted_key = self.strategy.evict()?;
            let idx = self.remove_from_bucket(&evicted_key)?;
            let node = self.arena[idx].take().unwrap();
            self.free.push(idx);
            Some((evicted_key, node.value))
        } else {
            None
        };

        let handle = self
            .strategy
            .insert(key.clone())
            .expect("strategy must accept an insert after eviction made room");
        let idx = self.alloc_node(Node { value, handle });
        self.buckets[b].push((key, idx));

        evicted
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.remove_from_bucket(key)?;
        let node = self.arena[idx].take().unwrap();
        self.free.push(idx);
        // SAFETY: handle was produced by this table's strategy and is live.
        unsafe { self.strategy.remove(node.handle) };
        Some(node.value)
    }

    fn capacity(&self) -> usize {
        self.cap
    }

    fn len(&self) -> usize {
        self.occupied_count()
    }
}

/// A hash table evicting by least-recently-used order.
pub type LruHashTable<K, V, S = DefaultHashBuilder> = LuTable<K, V, LruStrategy<K>, S>;
/// A hash table evicting by least-frequently-used order (ties by recency).
pub type LfuHashTable<K, V, S = DefaultHashBuilder> = LuTable<K, V, LfuStrategy<K>, S>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lru_hash_table_evicts_least_recently_used() {
        let mut t: LruHashTable<u32, &str> = LruHashTable::new(2).unwrap();
        t.insert(1, "a", 1);
        t.insert(2, "b", 1);
        t.find(&1);
        let evicted = t.insert(3, "c", 1);
        assert_eq!(evicted.map(|(k, _)| k), Some(2));
    }

    #[test]
    fn lfu_hash_table_evicts_least_frequently_used() {
        let mut t: LfuHashTable<u32, &str> = LfuHashTable::new(2).unwrap();
        t.insert(1, "a", 1);
        t.insert(2, "b", 1);
        t.find(&1);
        t.find(&1);
        let evicted = t.insert(3, "c", 1);
        assert_eq!(evicted.map(|(k, _)| k), Some(2));
    }

    #[test]
    fn lru_re_insert_of_a_present_key_does_not_duplicate_and_touches_recency() {
        let mut t: LruHashTable<u32, &str> = LruHashTable::new(2).unwrap();
        t.insert(1, "a", 1);
        t.insert(2, "b", 1);
        let evicted = t.insert(1, "a-replacement", 1);
        assert_eq!(evicted, None);
        assert_eq!(t.len(), 2);
        assert_eq!(t.find(&1), Some(&"a"));
        // Re-inserting 1 should have made it the most-recently-used entry,
        // so 2 is evicted next rather than 1.
        let evicted = t.insert(3, "c", 1);
        assert_eq!(evicted.map(|(k, _)| k), Some(2));
    }

    #[test]
    fn lfu_re_insert_of_a_present_key_does_not_duplicate_and_touches_frequency() {
        let mut t: LfuHashTable<u32, &str> = LfuHashTable::new(2).unwrap();
        t.insert(1, "a", 1);
        t.insert(2, "b", 1);
        t.insert(1, "a-replacement", 1);
        assert_eq!(t.len(), 2);
        assert_eq!(t.find(&1), Some(&"a"));
        let evicted = t.insert(3, "c", 1);
        assert_eq!(evicted.map(|(k, _)| k), Some(2));
    }
}
