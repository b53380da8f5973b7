//! LFU eviction backend: a two-dimensional, frequency-bucketed list (§4.3,
//! "fair LFU").
//!
//! Keys sharing the same access count live together in one recency-ordered
//! [`List`] bucket; buckets are indexed by access count starting at 1. A
//! touch moves a key from its current bucket to the next one up, creating it
//! on demand. Eviction always pops from the lowest populated bucket, and
//! within that bucket from the least-recently-touched end — the "fair" part
//! of fair LFU: ties in frequency break by recency instead of by
//! insertion/hash order, matching
//! `hash_table/fixed_hashtable_fair_lu.h`'s delegation to a LU strategy.
//!
//! This is the O(1)-amortized frequency-list design (bucket-per-frequency,
//! lazily grown, a tracked minimum) rather than the naive "rescan on every
//! touch" approach.

extern crate alloc;

use crate::list::{Entry, List};
use alloc::vec::Vec;
use core::num::NonZeroUsize;

/// A handle to a key tracked by an [`LfuList`]. Opaque to callers; pass it
/// back into [`LfuList::touch`] or [`LfuList::remove`].
#[derive(Debug, Clone, Copy)]
pub struct LfuNode<K> {
    bucket: usize,
    entry: *mut Entry<K>,
}

/// A frequency-bucketed list of keys, ordered for LFU-with-recency-tiebreak
/// eviction.
#[derive(Debug)]
pub struct LfuList<K> {
    cap: NonZeroUsize,
    len: usize,
    /// `buckets[i]` holds keys that have been accessed `i + 1` times.
    buckets: Vec<List<K>>,
    min_bucket: usize,
}

impl<K> LfuList<K> {
    /// Builds an empty list with room for `cap` keys.
    pub fn new(cap: NonZeroUsize) -> Self {
        LfuList {
            cap,
            len: 0,
            buckets: Vec::new(),
            min_bucket: 0,
        }
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the list is tracking zero keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn ensure_bucket(&mut self, index: usize) {
        while self.buckets.len() <= index {
            self.buckets.push(List::new(self.cap));
        }
    }

    /// Inserts `key` at frequency 1.
    ///
    /// Returns `None` if the list is already at capacity; the caller is
    /// expected to evict via [`LfuList::least_used`] first.
    pub fn insert(&mut self, key: K) -> Option<LfuNode<K>> {
        if self.len == self.cap.get() {
            return None;
        }
        self.ensure_bucket(0);
        let entry = self.buckets[0].add_unchecked(key);
        self.len += 1;
        self.min_bucket = 0;
        Some(LfuNode { bucket: 0, entry })
    }

    /// Marks `node` as accessed, bumping it to the next frequency bucket.
    ///
    /// # Safety
    ///
    /// `node` must be a live handle previously returned by
    /// [`LfuList::insert`] or [`LfuList::touch`] on this list, not yet
    /// removed.
    pub unsafe fn touch(&mut self, node: LfuNode<K>) -> LfuNode<K> {
        let LfuNode { bucket, entry } = node;
        // SAFETY: caller guarantees entry is live in buckets[bucket].
        let boxed = unsafe { self.buckets[bucket].remove(entry) }
            .expect("lfu node must be present in its recorded bucket");
        // SAFETY: boxed was just detached from a non-sigil position.
        let key = unsafe { boxed.into_value() };

        let next = bucket + 1;
        self.ensure_bucket(next);
        let new_entry = self.buckets[next].add_unchecked(key);

        if self.buckets[bucket].is_empty() && self.min_bucket == bucket {
            self.min_bucket = self.lowest_nonempty_from(bucket);
        }

        LfuNode {
            bucket: next,
            entry: new_entry,
        }
    }

    fn lowest_nonempty_from(&self, start: usize) -> usize {
        for i in start..self.buckets.len() {
            if !self.buckets[i].is_empty() {
                return i;
            }
        }
        start
    }

    /// Removes and returns the least-frequently-used key (ties broken by
    /// recency), if any.
    pub fn least_used(&mut self) -> Option<K> {
        if self.is_empty() {
            return None;
        }
        while self.min_bucket < self.buckets.len() && self.buckets[self.min_bucket].is_empty() {
            self.min_bucket += 1;
        }
        let bucket = self.buckets.get_mut(self.min_bucket)?;
        let removed = bucket.remove_last()?;
        self.len -= 1;
        // SAFETY: remove_last returns a non-sigil, initialized entry.
        Some(unsafe { removed.into_value() })
    }

    /// Removes a specific node from the list ahead of its natural eviction,
    /// returning its key.
    ///
    /// # Safety
    ///
    /// `node` must be a live handle previously returned by
    /// [`LfuList::insert`] or [`LfuList::touch`] on this list, not yet
    /// removed.
    pub unsafe fn remove(&mut self, node: LfuNode<K>) -> Option<K> {
        // SAFETY: forwarded caller obligation.
        let removed = unsafe { self.buckets[node.bucket].remove(node.entry) }?;
        self.len -= 1;
        if self.buckets[node.bucket].is_empty() && self.min_bucket == node.bucket {
            self.min_bucket = self.lowest_nonempty_from(node.bucket);
        }
        // SAFETY: removed is a non-sigil, initialized entry.
        Some(unsafe { removed.into_value() })
    }
}
