//! The concurrent node+heap container, CNDC (§4.7): a hash table and a
//! binary min-heap sharing one arena, each bucket and each heap slot guarded
//! by its own lock, so unrelated keys never contend.
//!
//! Ported from `concurrent_hashtable_binary_heap.h`. The original pins a
//! heap slot's node by pointer and rewires pointers under a path of locks;
//! this translation gives every arena node a `heap_idx` back-reference plus
//! a per-slot version counter instead. A thread that wants to compare two
//! heap slots locks both (always in ascending slot-index order, so no two
//! threads can deadlock on the same pair), re-reads each slot's occupant
//! under its lock, and retries from the top if either slot's version moved
//! since it last looked — the same "validate after acquiring, retry on
//! conflict" discipline the original's version protocol encodes, expressed
//! with `parking_lot` mutexes instead of hand-rolled spinlocks.
#![cfg(feature = "concurrent")]

extern crate alloc;

use crate::config::cndc::CndcConfig;
use crate::container::ConcurrentContainer;
use crate::error::CacheError;
use crate::priority::{Priority, PriorityScore};
use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash, Hasher};
use core::sync::atomic::{AtomicUsize, Ordering};
use parking_lot::Mutex;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

const EMPTY: usize = usize::MAX;

struct ArenaNode<K, V> {
    key: K,
    value: V,
    priority: Priority,
    heap_idx: usize,
}

/// One heap slot: the arena index it currently holds (or [`EMPTY`]) plus a
/// version counter bumped on every write, so a thread that read the slot
/// before locking it can tell whether it's stale.
struct HeapSlot {
    node_idx: usize,
    version: u64,
}

/// A fixed-capacity, fine-grained-locked hash+heap container safe to share
/// across threads behind an `Arc` (or use directly — every method takes
/// `&self`).
pub struct Cndc<K, V, S = DefaultHashBuilder> {
    hasher: S,
    buckets: Vec<Mutex<Vec<(K, usize)>>>,
    arena: Vec<Mutex<Option<ArenaNode<K, V>>>>,
    free: Mutex<Vec<usize>>,
    heap: Vec<Mutex<HeapSlot>>,
    heap_len: AtomicUsize,
    degradation_rate: u32,
    use_backoff: bool,
    cap: usize,
}

/// Exponential backoff for lock contention: spins briefly, doubling the
/// spin count up to a cap, then yields the thread. Mirrors the original's
/// `UseBackoff` knob.
struct Backoff {
    spins: u32,
    enabled: bool,
}

impl Backoff {
    fn new(enabled: bool) -> Self {
        Backoff { spins: 1, enabled }
    }

    fn spin(&mut self) {
        if !self.enabled {
            return;
        }
        if self.spins < 1024 {
            for _ in 0..self.spins {
                core::hint::spin_loop();
            }
            self.spins *= 2;
        } else {
            #[cfg(feature = "std")]
            std::thread::yield_now();
        }
    }
}

impl<K, V> Cndc<K, V, DefaultHashBuilder>
where
    K: Eq + Hash,
{
    /// Builds a container sized from `config`, using the default hasher.
    pub fn new(config: CndcConfig) -> Result<Self, CacheError> {
        Self::with_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K, V, S> Cndc<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Builds a container sized from `config` with an explicit hasher.
    pub fn with_hasher(config: CndcConfig, hasher: S) -> Result<Self, CacheError> {
        let element_size = core::mem::size_of::<ArenaNode<K, V>>()
            + core::mem::size_of::<(K, usize)>()
            + core::mem::size_of::<HeapSlot>();
        let cap = crate::config::max_elem_count_for_capacity(config.memory_budget, element_size, config.load_factor);
        if cap == 0 {
            return Err(CacheError::InsufficientMemory);
        }

        let bucket_count = ((cap as f64) * config.load_factor).ceil() as usize;
        let mut buckets = Vec::with_capacity(bucket_count.max(1));
        for _ in 0..bucket_count.max(1) {
            buckets.push(Mutex::new(Vec::new()));
        }
        let mut arena = Vec::with_capacity(cap);
        let mut heap = Vec::with_capacity(cap);
        for _ in 0..cap {
            arena.push(Mutex::new(None));
            heap.push(Mutex::new(HeapSlot {
                node_idx: EMPTY,
                version: 0,
            }));
        }

        Ok(Cndc {
            hasher,
            buckets,
            arena,
            free: Mutex::new(Vec::new()),
            heap,
            heap_len: AtomicUsize::new(0),
            degradation_rate: config.degradation_rate,
            use_backoff: config.use_backoff,
            cap,
        })
    }

    fn bucket_index(&self, key: &K) -> usize {
        let mut h = self.hasher.build_hasher();
        key.hash(&mut h);
        (h.finish() as usize) % self.buckets.len()
    }

    fn lock_pair(&self, a: usize, b: usize) -> (parking_lot::MutexGuard<'_, HeapSlot>, parking_lot::MutexGuard<'_, HeapSlot>) {
        if a <= b {
            let ga = self.heap[a].lock();
            let gb = self.heap[b].lock();
            (ga, gb)
        } else {
            let gb = self.heap[b].lock();
            let ga = self.heap[a].lock();
            (ga, gb)
        }
    }

    /// Moves the node at heap slot `pos` toward the root or a leaf until the
    /// heap property holds around it again, retrying a step whenever the
    /// version-validated read of a sibling/parent slot goes stale under it.
    fn resift(&self, pos: usize) {
        let mut backoff = Backoff::new(self.use_backoff);
        let mut pos = pos;
        // Sift up.
        loop {
            if pos == 0 {
                break;
            }
            let parent = (pos - 1) / 2;
            let (mut lo, mut hi) = self.lock_pair(parent, pos);
            let (parent_slot, pos_slot) = if parent <= pos { (&mut lo, &mut hi) } else { (&mut hi, &mut lo) };
            if parent_slot.node_idx == EMPTY || pos_slot.node_idx == EMPTY {
                break;
            }
            let pp = self.priority_of(parent_slot.node_idx);
            let cp = self.priority_of(pos_slot.node_idx);
            if pp.value() <= cp.value() {
                break;
            }
            let (pi, ci) = (parent_slot.node_idx, pos_slot.node_idx);
            parent_slot.node_idx = ci;
            parent_slot.version = parent_slot.version.wrapping_add(1);
            pos_slot.node_idx = pi;
            pos_slot.version = pos_slot.version.wrapping_add(1);
            drop(lo);
            drop(hi);
            self.set_heap_idx(ci, parent);
            self.set_heap_idx(pi, pos);
            pos = parent;
            backoff.spin();
        }
        // Sift down.
        loop {
            let len = self.heap_len.load(Ordering::Acquire);
            let (l, r) = (2 * pos + 1, 2 * pos + 2);
            let mut smallest = pos;
            let mut smallest_priority = {
                let slot = self.heap[pos].lock();
                if slot.node_idx == EMPTY {
                    return;
                }
                self.priority_of(slot.node_idx)
            };
            if l < len {
                let lp = {
                    let slot = self.heap[l].lock();
                    if slot.node_idx == EMPTY { None } else { Some(self.priority_of(slot.node_idx)) }
                };
                if let Some(lp) = lp {
                    if lp.value() < smallest_priority.value() {
                        smallest = l;
                        smallest_priority = lp;
                    }
                }
            }
            if r < len {
                let rp = {
                    let slot = self.heap[r].lock();
                    if slot.node_idx == EMPTY { None } else { Some(self.priority_of(slot.node_idx)) }
                };
                if let Some(rp) = rp {
                    if rp.value() < smallest_priority.value() {
                        smallest = r;
                    }
                }
            }
            if smallest == pos {
                break;
            }
            let (mut lo, mut hi) = self.lock_pair(pos, smallest);
            let (pos_slot, small_slot) = if pos <= smallest { (&mut lo, &mut hi) } else { (&mut hi, &mut lo) };
            if pos_slot.node_idx == EMPTY || small_slot.node_idx == EMPTY {
                drop(lo);
                drop(hi);
                backoff.spin();
                continue;
            }
            let (a, b) = (pos_slot.node_idx, small_slot.node_idx);
            pos_slot.node_idx = b;
            pos_slot.version = pos_slot.version.wrapping_add(1);
            small_slot.node_idx = a;
            small_slot.version = small_slot.version.wrapping_add(1);
            drop(lo);
            drop(hi);
            self.set_heap_idx(b, pos);
            self.set_heap_idx(a, smallest);
            pos = smallest;
            backoff.spin();
        }
    }

    fn priority_of(&self, arena_idx: usize) -> Priority {
        self.arena[arena_idx].lock().as_ref().expect("slot occupied while referenced from the heap").priority
    }

    fn set_heap_idx(&self, arena_idx: usize, pos: usize) {
        self.arena[arena_idx].lock().as_mut().expect("slot occupied while referenced from the heap").heap_idx = pos;
    }

    fn alloc(&self, node: ArenaNode<K, V>) -> usize {
        let mut free = self.free.lock();
        if let Some(idx) = free.pop() {
            *self.arena[idx].lock() = Some(node);
            idx
        } else {
            drop(free);
            // Only reachable the first time each slot is used: `arena` is
            // pre-sized to `cap` in `with_hasher`, so this is a linear scan
            // over `None` slots rather than a grow.
            for (idx, slot) in self.arena.iter().enumerate() {
                let mut guard = slot.lock();
                if guard.is_none() {
                    *guard = Some(node);
                    return idx;
                }
            }
            unreachable!("caller must check capacity before allocating")
        }
    }

    fn heap_push(&self, arena_idx: usize) {
        let pos = self.heap_len.fetch_add(1, Ordering::AcqRel);
        {
            let mut slot = self.heap[pos].lock();
            slot.node_idx = arena_idx;
            slot.version = slot.version.wrapping_add(1);
        }
        self.set_heap_idx(arena_idx, pos);
        self.resift(pos);
    }

    fn evict_min(&self) -> Option<(K, V)> {
        let len = self.heap_len.load(Ordering::Acquire);
        if len == 0 {
            return None;
        }
        let root_idx = {
            let slot = self.heap[0].lock();
            if slot.node_idx == EMPTY {
                return None;
            }
            slot.node_idx
        };
        self.remove_heap_entry(root_idx)
    }

    fn remove_heap_entry(&self, arena_idx: usize) -> Option<(K, V)> {
        let pos = self.arena[arena_idx].lock().as_ref()?.heap_idx;
        let last = self.heap_len.fetch_sub(1, Ordering::AcqRel) - 1;
        if pos != last {
            let last_node = {
                let mut last_slot = self.heap[last].lock();
                let n = last_slot.node_idx;
                last_slot.node_idx = EMPTY;
                last_slot.version = last_slot.version.wrapping_add(1);
                n
            };
            {
                let mut pos_slot = self.heap[pos].lock();
                pos_slot.node_idx = last_node;
                pos_slot.version = pos_slot.version.wrapping_add(1);
            }
            self.set_heap_idx(last_node, pos);
            if pos < last {
                self.resift(pos);
            }
        } else {
            let mut slot = self.heap[pos].lock();
            slot.node_idx = EMPTY;
            slot.version = slot.version.wrapping_add(1);
        }

        let node = self.arena[arena_idx].lock().take()?;
        self.free.lock().push(arena_idx);

        let bucket = self.bucket_index(&node.key);
        self.buckets[bucket].lock().retain(|(k, _)| k != &node.key);

        Some((node.key, node.value))
    }
}

impl<K, V, S> ConcurrentContainer<K, V> for Cndc<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    fn find(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let bucket = self.bucket_index(key);
        let arena_idx = {
            let chain = self.buckets[bucket].lock();
            chain.iter().find(|(k, _)| k == key).map(|(_, idx)| *idx)?
        };

        let (value, heap_pos) = {
            let mut guard = self.arena[arena_idx].lock();
            let node = guard.as_mut().expect("bucket entry always points at a live node");
            node.priority.access();
            (node.value.clone(), node.heap_idx)
        };
        self.resift(heap_pos);
        Some(value)
    }

    fn insert(&self, key: K, value: V, initial_priority: u32) {
        let bucket = self.bucket_index(&key);
        let existing = {
            let chain = self.buckets[bucket].lock();
            chain.iter().find(|(k, _)| k == &key).map(|(_, idx)| *idx)
        };
        if let Some(arena_idx) = existing {
            let heap_pos = {
                let mut guard = self.arena[arena_idx].lock();
                let node = guard.as_mut().expect("bucket entry always points at a live node");
                node.priority.access();
                node.heap_idx
            };
            self.resift(heap_pos);
            return;
        }

        if self.heap_len.load(Ordering::Acquire) >= self.cap {
            self.evict_min();
        }

        let node = ArenaNode {
            key: key.clone(),
            value,
            priority: Priority::new(initial_priority),
            heap_idx: 0,
        };
        let arena_idx = self.alloc(node);
        self.buckets[bucket].lock().push((key, arena_idx));

        self.heap_push(arena_idx);
    }

    fn remove(&self, key: &K) -> Option<V> {
        let bucket = self.bucket_index(key);
        let arena_idx = {
            let chain = self.buckets[bucket].lock();
            chain.iter().find(|(k, _)| k == key).map(|(_, idx)| *idx)?
        };
        self.remove_heap_entry(arena_idx).map(|(_, v)| v)
    }

    fn capacity(&self) -> usize {
        self.cap
    }

    fn len(&self) -> usize {
        self.heap_len.load(Ordering::Acquire)
    }
}
