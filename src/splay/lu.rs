//! List-backed splay tree eviction variants (§4.5): the tree itself only
//! does BST search/insert/splay; an auxiliary [`LruList`]/[`LfuList`] picks
//! the eviction candidate instead of a pseudo-random descent.
//!
//! There is no single original header for this pairing — the thesis source
//! only wires the splay tree to bottom-node eviction
//! (`splay_tree_random_bottom_node.h`). This variant is grounded on the
//! same "hash/splay table + LU strategy" pairing
//! `hash_table/fixed_hashtable_fair_lu.h` uses for the hash table, applied
//! to the splay tree base instead — the spec names LRU/LFU-list-backed
//! splay eviction as a sibling of the bottom-node variant (§4.5).

extern crate alloc;

use crate::config::splay::SplayConfig;
use crate::container::Container;
use crate::error::CacheError;
use crate::lfu_list::{LfuList, LfuNode};
use crate::lru_list::LruList;
use crate::splay::strategy::SplayStrategy;
use crate::splay::tree::SplayTree;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// A splay tree whose eviction candidate is the least-recently-used key,
/// tracked by an auxiliary [`LruList`].
pub struct LruSplayTree<K, V, S, H = DefaultHashBuilder> {
    tree: SplayTree<K, V, S, H>,
    list: LruList<K>,
    handles: alloc::collections::BTreeMap<K, *mut crate::list::Entry<K>>,
}

impl<K, V, S, H> LruSplayTree<K, V, S, H>
where
    K: Ord + Hash + Clone,
    S: SplayStrategy,
    H: BuildHasher,
{
    /// Builds a tree sized from `config` with an explicit hasher.
    pub fn with_hasher(config: SplayConfig, hasher: H) -> Result<Self, CacheError> {
        let tree = SplayTree::with_hasher(config, hasher)?;
        let cap = NonZeroUsize::new(tree.capacity()).ok_or(CacheError::InsufficientMemory)?;
        Ok(LruSplayTree {
            tree,
            list: LruList::new(cap),
            handles: alloc::collections::BTreeMap::new(),
        })
    }
}

impl<K: Ord + Hash + Clone, V, S: SplayStrategy> LruSplayTree<K, V, S, DefaultHashBuilder> {
    /// Builds a tree sized from `config`, using the default hasher.
    pub fn new(config: SplayConfig) -> Result<Self, CacheError> {
        Self::with_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K, V, S, H> Container<K, V> for LruSplayTree<K, V, S, H>
where
    K: Ord + Hash + Clone,
    S: SplayStrategy,
    H: BuildHasher,
{
    fn find(&mut self, key: &K) -> Option<&V> {
        self.tree.peek(key)?;
        if let Some(&handle) = self.handles.get(key) {
            // SAFETY: handle was produced by this list for this key and is
            // still live, since removal always clears `handles` too.
            unsafe { self.list.touch(handle) };
        }
        self.tree.peek(key)
    }

    fn insert(&mut self, key: K, value: V, _initial_priority: u32) -> Option<(K, V)> {
        if let Some(&handle) = self.handles.get(&key) {
            // SAFETY: handle was produced by this list for this key and is
            // still live, since removal always clears `handles` too.
            unsafe { self.list.touch(handle) };
            return None;
        }

        let evicted = if self.tree.len() >= self.tree.capacity() {
            let lru_key = self.list.least_used()?;
            self.handles.remove(&lru_key);
            self.tree.remove_entry(&lru_key)
        } else {
            None
        };

        self.tree.insert_raw(key.clone(), value);
        let handle = self
            .list
            .insert(key.clone())
            .expect("auxiliary list must have room after eviction");
        self.handles.insert(key, handle);

        evicted
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let (k, v) = self.tree.remove_entry(key)?;
        if let Some(handle) = self.handles.remove(&k) {
            // SAFETY: handle was produced by this list for this key and is
            // still live.
            unsafe { self.list.remove(handle) };
        }
        Some(v)
    }

    fn capacity(&self) -> usize {
        self.tree.capacity()
    }

    fn len(&self) -> usize {
        self.tree.len()
    }
}

/// A splay tree whose eviction candidate is the least-frequently-used key
/// (ties by recency), tracked by an auxiliary [`LfuList`].
pub struct LfuSplayTree<K, V, S, H = DefaultHashBuilder> {
    tree: SplayTree<K, V, S, H>,
    list: LfuList<K>,
    handles: alloc::collections::BTreeMap<K, LfuNode<K>>,
}

impl<K, V, S, H> LfuSplayTree<K, V, S, H>
where
    K: Ord + Hash + Clone,
    S: SplayStrategy,
    H: BuildHasher,
{
    /// Builds a tree sized from `config` with an explicit hasher.
    pub fn with_hasher(config: SplayConfig, hasher: H) -> Result<Self, CacheError> {
        let tree = SplayTree::with_hasher(config, hasher)?;
        let cap = NonZeroUsize::new(tree.capacity()).ok_or(CacheError::InsufficientMemory)?;
        Ok(LfuSplayTree {
            tree,
            list: LfuList::new(cap),
            handles: alloc::collections::BTreeMap::new(),
        })
    }
}

impl<K: Ord + Hash + Clone, V, S: SplayStrategy> LfuSplayTree<K, V, S, DefaultHashBuilder> {
    /// Builds a tree sized from `config`, using the default hasher.
    pub fn new(config: SplayConfig) -> Result<Self, CacheError> {
        Self::with_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K, V, S, H> Container<K, V> for LfuSplayTree<K, V, S, H>
where
    K: Ord + Hash + Clone,
    S: SplayStrategy,
    H: BuildHasher,
{
    fn find(&mut self, key: &K) -> Option<&V> {
        if let Some(&handle) = self.handles.get(key) {
            // SAFETY: handle was produced by this list for this key and is
            // still live.
            let new_handle = unsafe { self.list.touch(handle) };
            self.handles.insert(key.clone(), new_handle);
        }
        self.tree.peek(key)
    }

    fn insert(&mut self, key: K, value: V, _initial_priority: u32) -> Option<(K, V)> {
        if let Some(&handle) = self.handles.get(&key) {
            // SAFETY: handle was produced by this list for this key and is
            // still live.
            let new_handle = unsafe { self.list.touch(handle) };
            self.handles.insert(key, new_handle);
            return None;
        }

        let evicted = if self.tree.len() >= self.tree.capacity() {
            let lfu_key = self.list.least_used()?;
            self.handles.remove(&lfu_key);
            self.tree.remove_entry(&lfu_key)
        } else {
            None
        };

        self.tree.insert_raw(key.clone(), value);
        let handle = self
            .list
            .insert(key.clone())
            .expect("auxiliary list must have room after eviction");
        self.handles.insert(key, handle);

        evicted
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let (k, v) = self.tree.remove_entry(key)?;
        if let Some(handle) = self.handles.remove(&k) {
            // SAFETY: handle was produced by this list for this key and is
            // still live.
            unsafe { self.list.remove(handle) };
        }
        Some(v)
    }

    fn capacity(&self) -> usize {
        self.tree.capacity()
    }

    fn len(&self) -> usize {
        self.tree.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splay::strategy::CanonicalSplayStrategy;

    #[test]
    fn lru_splay_tree_evicts_least_recently_used() {
        let element_size = 128;
        let mut t: LruSplayTree<u32, &str, CanonicalSplayStrategy> =
            LruSplayTree::new(SplayConfig::new(element_size * 2)).unwrap();
        t.insert(1, "a", 1);
        t.insert(2, "b", 1);
        t.find(&1);
        let evicted = t.insert(3, "c", 1);
        assert_eq!(evicted.map(|(k, _)| k), Some(2));
    }

    #[test]
    fn lfu_splay_tree_evicts_least_frequently_used() {
        let element_size = 128;
        let mut t: LfuSplayTree<u32, &str, CanonicalSplayStrategy> =
            LfuSplayTree::new(SplayConfig::new(element_size * 2)).unwrap();
        t.insert(1, "a", 1);
        t.insert(2, "b", 1);
        t.find(&1);
        t.find(&1);
        let evicted = t.insert(3, "c", 1);
        assert_eq!(evicted.map(|(k, _)| k), Some(2));
    }

    #[test]
    fn lru_splay_re_insert_of_a_present_key_does_not_duplicate_and_touches_recency() {
        let element_size = 128;
        let mut t: LruSplayTree<u32, &str, CanonicalSplayStrategy> =
            LruSplayTree::new(SplayConfig::new(element_size * 2)).unwrap();
        t.insert(1, "a", 1);
        t.insert(2, "b", 1);
        let evicted = t.insert(1, "a-replacement", 1);
        assert_eq!(evicted, None);
        assert_eq!(t.len(), 2);
        assert_eq!(t.find(&1), Some(&"a"));
        let evicted = t.insert(3, "c", 1);
        assert_eq!(evicted.map(|(k, _)| k), Some(2));
    }

    #[test]
    fn lfu_splay_re_insert_of_a_present_key_does_not_duplicate_and_touches_frequency() {
        let element_size = 128;
        let mut t: LfuSplayTree<u32, &str, CanonicalSplayStrategy> =
            LfuSplayTree::new(SplayConfig::new(element_size * 2)).unwrap();
        t.insert(1, "a", 1);
        t.insert(2, "b", 1);
        t.insert(1, "ignored", 1);
        assert_eq!(t.len(), 2);
        assert_eq!(t.find(&1), Some(&"a"));
        let evicted = t.insert(3, "c", 1);
        assert_eq!(evicted.map(|(k, _)| k), Some(2));
    }
}
