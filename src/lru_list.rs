//! LRU eviction backend: an intrusive doubly linked list ordered by recency
//! of use (§4.3).
//!
//! Built on the arena-backed [`List`] shared with [`crate::lfu_list`]. A
//! hash table or splay tree that delegates eviction to this backend stores a
//! `*mut Entry<K>` alongside each entry and calls [`LruList::touch`] on every
//! access and [`LruList::insert`] on every new entry; eviction always comes
//! from [`LruList::least_used`].

use crate::list::{Entry, List};
use core::num::NonZeroUsize;

/// A recency-ordered list of keys, most-recently-used at the front.
#[derive(Debug)]
pub struct LruList<K> {
    list: List<K>,
}

impl<K> LruList<K> {
    /// Builds an empty list with room for `cap` keys.
    pub fn new(cap: NonZeroUsize) -> Self {
        LruList { list: List::new(cap) }
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Whether the list is tracking zero keys.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Inserts `key` at the most-recently-used position.
    ///
    /// Returns `None` if the list is already at capacity; the caller is
    /// expected to evict via [`LruList::least_used`] first.
    pub fn insert(&mut self, key: K) -> Option<*mut Entry<K>> {
        self.list.add(key)
    }

    /// Marks `node` as just accessed, moving it to the most-recently-used
    /// position.
    ///
    /// # Safety
    ///
    /// `node` must be a live node previously returned by [`LruList::insert`]
    /// on this list and not yet removed.
    pub unsafe fn touch(&mut self, node: *mut Entry<K>) {
        // SAFETY: forwarded caller obligation.
        unsafe { self.list.move_to_front(node) };
    }

    /// Removes and returns the least-recently-used key, if any.
    pub fn least_used(&mut self) -> Option<K> {
        self.list.remove_last().map(|boxed| {
            // SAFETY: the entry returned by remove_last is a non-sigil node
            // carrying an initialized value.
            unsafe { boxed.into_value() }
        })
    }

    /// Removes a specific node from the list ahead of its natural eviction,
    /// returning its key.
    ///
    /// # Safety
    ///
    /// `node` must be a live node previously returned by [`LruList::insert`]
    /// on this list and not yet removed.
    pub unsafe fn remove(&mut self, node: *mut Entry<K>) -> Option<K> {
        // SAFETY: forwarded caller obligation.
        unsafe { self.list.remove(node) }.map(|boxed| {
            // SAFETY: the entry is a non-sigil node carrying an initialized value.
            unsafe { boxed.into_value() }
        })
    }
}
