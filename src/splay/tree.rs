//! The splay tree base (§4.5): a binary search tree ordered by key, with
//! rotations on access gated by a pluggable [`SplayStrategy`] and eviction
//! by pseudo-random bottom-node descent.
//!
//! Ported from `splay_tree/splay_tree_base.h` (the node shape, abortable
//! splay) and `splay_tree/splay_tree_random_bottom_node.h` (eviction).
//! Arena-indexed (`Option<usize>` child/parent links into a `Vec`) rather
//! than pointer-based, the idiomatic translation of the original's raw
//! node pointers.

extern crate alloc;

use crate::config::splay::SplayConfig;
use crate::container::Container;
use crate::error::CacheError;
use crate::splay::strategy::SplayStrategy;
use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash, Hasher};

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

struct Node<K, V, S> {
    key: K,
    value: V,
    strategy: S,
    left: Option<usize>,
    right: Option<usize>,
    parent: Option<usize>,
}

/// A fixed-capacity splay tree, generic over the [`SplayStrategy`] that
/// decides how aggressively accesses move nodes toward the root.
///
/// Evicts by pseudo-random bottom-node descent (§4.5's "bottom node"
/// variant) — see [`crate::splay::bottom_node`] for the list-backed
/// alternatives.
pub struct SplayTree<K, V, S, H = DefaultHashBuilder> {
    arena: Vec<Option<Node<K, V, S>>>,
    free: Vec<usize>,
    root: Option<usize>,
    cap: usize,
    len: usize,
    hasher: H,
    eviction_tick: u64,
}

impl<K: Ord + Hash + Clone, V, S: SplayStrategy> SplayTree<K, V, S, DefaultHashBuilder> {
    /// Builds a tree sized from `config`, using the default hasher for the
    /// bottom-node eviction's pseudo-random descent.
    pub fn new(config: SplayConfig) -> Result<Self, CacheError> {
        Self::with_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K: Ord + Hash + Clone, V, S: SplayStrategy, H: BuildHasher> SplayTree<K, V, S, H> {
    /// Builds a tree sized from `config` with an explicit hasher.
    pub fn with_hasher(config: SplayConfig, hasher: H) -> Result<Self, CacheError> {
        let element_size = core::mem::size_of::<Node<K, V, S>>();
        let cap = crate::config::max_elem_count_for_capacity(config.memory_budget, element_size, 1.0);
        if cap == 0 {
            return Err(CacheError::InsufficientMemory);
        }
        if config.use_short_index && cap > (u32::MAX - 1) as usize {
            return Err(CacheError::CapacityExceeded);
        }
        Ok(SplayTree {
            arena: Vec::with_capacity(cap),
            free: Vec::new(),
            root: None,
            cap,
            len: 0,
            hasher,
            eviction_tick: 0,
        })
    }

    fn node(&self, idx: usize) -> &Node<K, V, S> {
        self.arena[idx].as_ref().unwrap()
    }
    fn node_mut(&mut self, idx: usize) -> &mut Node<K, V, S> {
        self.arena[idx].as_mut().unwrap()
    }

    fn rotate_left(&mut self, x: usize) {
        let y = self.node(x).right.expect("rotate_left requires a right child");
        let b = self.node(y).left;
        self.node_mut(x).right = b;
        if let Some(b) = b {
            self.node_mut(b).parent = Some(x);
        }
        let parent = self.node(x).parent;
        self.node_mut(y).parent = parent;
        match parent {
            None => self.root = Some(y),
            Some(p) if self.node(p).left == Some(x) => self.node_mut(p).left = Some(y),
            Some(p) => self.node_mut(p).right = Some(y),
        }
        self.node_mut(y).left = Some(x);
        self.node_mut(x).parent = Some(y);
    }

    fn rotate_right(&mut self, x: usize) {
        let y = self.node(x).left.expect("rotate_right requires a left child");
        let b = self.node(y).right;
        self.node_mut(x).left = b;
        if let Some(b) = b {
            self.node_mut(b).parent = Some(x);
        }
        let parent = self.node(x).parent;
        self.node_mut(y).parent = parent;
        match parent {
            None => self.root = Some(y),
            Some(p) if self.node(p).left == Some(x) => self.node_mut(p).left = Some(y),
            Some(p) => self.node_mut(p).right = Some(y),
        }
        self.node_mut(y).right = Some(x);
        self.node_mut(x).parent = Some(y);
    }

    /// One rotation step toward the root, gated by the strategy. Returns
    /// `false` once the node reaches the root or the strategy aborts the
    /// splay.
    fn splay_step(&mut self, idx: usize) -> bool {
        let Some(parent) = self.node(idx).parent else {
            return false;
        };
        if !self.node(idx).strategy.should_splay(&self.node(parent).strategy) {
            return false;
        }
        let grandparent = self.node(parent).parent;
        let idx_is_left = self.node(parent).left == Some(idx);
        match grandparent {
            None => {
                if idx_is_left {
                    self.rotate_right(parent);
                } else {
                    self.rotate_left(parent);
                }
            }
            Some(g) => {
                let parent_is_left = self.node(g).left == Some(parent);
                if parent_is_left == idx_is_left {
                    // zig-zig
                    if idx_is_left {
                        self.rotate_right(g);
                        self.rotate_right(parent);
                    } else {
                        self.rotate_left(g);
                        self.rotate_left(parent);
                    }
                } else {
                    // zig-zag
                    if idx_is_left {
                        self.rotate_right(parent);
                        self.rotate_left(g);
                    } else {
                        self.rotate_left(parent);
                        self.rotate_right(g);
                    }
                }
            }
        }
        true
    }

    fn splay(&mut self, idx: usize) {
        while self.splay_step(idx) {}
    }

    fn find_index(&mut self, key: &K) -> Option<usize> {
        let mut cur = self.root?;
        loop {
            match key.cmp(&self.node(cur).key) {
                core::cmp::Ordering::Equal => {
                    self.node_mut(cur).strategy.accessed();
                    self.splay(cur);
                    return Some(cur);
                }
                core::cmp::Ordering::Less => {
                    self.node_mut(cur).strategy.visited();
                    match self.node(cur).left {
                        Some(l) => cur = l,
                        None => return None,
                    }
                }
                core::cmp::Ordering::Greater => {
                    self.node_mut(cur).strategy.visited();
                    match self.node(cur).right {
                        Some(r) => cur = r,
                        None => return None,
                    }
                }
            }
        }
    }

    fn alloc(&mut self, node: Node<K, V, S>) -> usize {
        if let Some(idx) = self.free.pop() {
            self.arena[idx] = Some(node);
            idx
        } else {
            self.arena.push(Some(node));
            self.arena.len() - 1
        }
    }

    /// Inserts a brand-new key into the BST. The caller must have already
    /// established that `key` is absent (I2: exactly one entry per live
    /// key); a duplicate here would plant an orphaned second node that
    /// `find_index`/`peek` can never reach, since they stop at the first
    /// match on the way down.
    fn insert_bst(&mut self, key: K, value: V) -> usize {
        let new_node = Node {
            key,
            value,
            strategy: S::default(),
            left: None,
            right: None,
            parent: None,
        };
        let Some(mut cur) = self.root else {
            let idx = self.alloc(new_node);
            self.root = Some(idx);
            self.len += 1;
            return idx;
        };
        loop {
            match new_node.key.cmp(&self.node(cur).key) {
                core::cmp::Ordering::Less => match self.node(cur).left {
                    Some(l) => cur = l,
                    None => {
                        let idx = self.alloc(new_node);
                        self.node_mut(idx).parent = Some(cur);
                        self.node_mut(cur).left = Some(idx);
                        self.len += 1;
                        return idx;
                    }
                },
                core::cmp::Ordering::Equal => {
                    unreachable!("insert_bst called with a key already present in the tree")
                }
                core::cmp::Ordering::Greater => match self.node(cur).right {
                    Some(r) => cur = r,
                    None => {
                        let idx = self.alloc(new_node);
                        self.node_mut(idx).parent = Some(cur);
                        self.node_mut(cur).right = Some(idx);
                        self.len += 1;
                        return idx;
                    }
                },
            }
        }
    }

    fn remove_index(&mut self, idx: usize) -> (K, V) {
        self.splay(idx);
        debug_assert_eq!(self.root, Some(idx), "splay must bring removed node to root (I1)");

        let left = self.node(idx).left;
        let right = self.node(idx).right;

        let new_root = match (left, right) {
            (None, None) => None,
            (Some(l), None) => {
                self.node_mut(l).parent = None;
                Some(l)
            }
            (None, Some(r)) => {
                self.node_mut(r).parent = None;
                Some(r)
            }
            (Some(l), Some(r)) => {
                self.node_mut(l).parent = None;
                self.root = Some(l);
                // Splay the maximum of the left subtree to its root so it
                // has no right child, then hang `r` off it.
                let mut cur = l;
                while let Some(next) = self.node(cur).right {
                    cur = next;
                }
                self.splay(cur);
                self.node_mut(cur).right = Some(r);
                self.node_mut(r).parent = Some(cur);
                Some(cur)
            }
        };
        self.root = new_root;
        self.len -= 1;

        let node = self.arena[idx].take().unwrap();
        self.free.push(idx);
        (node.key, node.value)
    }

    fn next_pseudo_random_bit(&mut self, key: &K) -> bool {
        let mut hasher = self.hasher.build_hasher();
        key.hash(&mut hasher);
        self.eviction_tick.hash(&mut hasher);
        self.eviction_tick = self.eviction_tick.wrapping_add(1);
        hasher.finish() & 1 == 1
    }

    /// Picks an eviction candidate by descending from the root, at each
    /// step choosing a present child according to a pseudo-random bit
    /// derived from that node's key: both children present prefers the
    /// left child when the bit is set, otherwise whichever child exists.
    /// Stops at the first node with no children.
    fn pick_bottom_node(&mut self) -> Option<usize> {
        let mut cur = self.root?;
        loop {
            let key = self.arena[cur].as_ref().unwrap().key.clone();
            let bit = self.next_pseudo_random_bit(&key);
            let (l, r) = (self.node(cur).left, self.node(cur).right);
            cur = match (l, r) {
                (None, None) => return Some(cur),
                (Some(l), None) => l,
                (None, Some(r)) => r,
                (Some(l), Some(r)) => {
                    if bit {
                        l
                    } else {
                        r
                    }
                }
            };
        }
    }

    /// Evicts the bottom-node candidate, returning its key and value.
    pub fn evict_bottom_node(&mut self) -> Option<(K, V)> {
        let idx = self.pick_bottom_node()?;
        Some(self.remove_index(idx))
    }

    /// Looks up `key` without splaying or touching the strategy state —
    /// used by the list-backed eviction variants
    /// ([`crate::splay::lu`]), which track usage in their own auxiliary
    /// list rather than in the tree's node strategy.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let mut cur = self.root?;
        loop {
            match key.cmp(&self.node(cur).key) {
                core::cmp::Ordering::Equal => return Some(&self.node(cur).value),
                core::cmp::Ordering::Less => cur = self.node(cur).left?,
                core::cmp::Ordering::Greater => cur = self.node(cur).right?,
            }
        }
    }

    /// Inserts without evicting; the caller is responsible for making room
    /// first. Used by the list-backed eviction variants.
    pub fn insert_raw(&mut self, key: K, value: V) {
        let idx = self.insert_bst(key, value);
        self.splay(idx);
    }

    /// Removes `key`, returning both the key and value, if present. Used
    /// by the list-backed eviction variants, which need the key back to
    /// evict the matching entry from their auxiliary list.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let idx = self.find_index(key)?;
        Some(self.remove_index(idx))
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds zero entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of entries the tree can hold.
    pub fn capacity(&self) -> usize {
        self.cap
    }
}

impl<K: Ord + Hash + Clone, V, S: SplayStrategy, H: BuildHasher> Container<K, V> for SplayTree<K, V, S, H> {
    fn find(&mut self, key: &K) -> Option<&V> {
        let idx = self.find_index(key)?;
        Some(&self.node(idx).value)
    }

    fn insert(&mut self, key: K, value: V, _initial_priority: u32) -> Option<(K, V)> {
        if self.find_index(&key).is_some() {
            return None;
        }
        let evicted = if self.len >= self.cap {
            self.evict_bottom_node()
        } else {
            None
        };
        let idx = self.insert_bst(key, value);
        self.splay(idx);
        evicted
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.find_index(key)?;
        Some(self.remove_index(idx).1)
    }

    fn capacity(&self) -> usize {
        self.cap
    }

    fn len(&self) -> usize {
        self.len
    }
}
