#![doc = include_str!("../README.md")]
#![no_std]

//! # Modules
//!
//! - [`priority`]: the decaying priority score and its AVL-balance-embedded variant
//! - [`generator`]: maps observed invocation cost to an initial priority
//! - [`list`]: the intrusive arena-backed doubly linked list underlying the LRU/LFU lists
//! - [`lru_list`] / [`lfu_list`]: recency and frequency eviction lists usable standalone
//! - [`hash`]: the priority hash table and the LRU/LFU-backed hash table
//! - [`splay`]: the strategy-driven splay tree and its eviction variants
//! - [`wst`]: the Weighted Search Tree (AVL tree + heap sharing one node array)
//! - [`cndc`]: the fine-grained-locked concurrent hash+heap container (requires `concurrent`)
//! - [`cache`]: the memoizing `Cache` front end
//! - [`wrappers`]: `CoarseLock`/`Sharded` adapters from `Container` to `ConcurrentContainer` (requires `concurrent`)
//! - [`counter`]: event counters reporting retrievals, misses, and derived cache efficiency
//! - [`error`]: construction-time error kinds
//! - [`config`]: per-container configuration structures
//! - [`container`]: the `Container`/`ConcurrentContainer` traits every eviction policy implements
//! - [`dummy`]: a FIFO baseline container for exercising `Cache` itself

extern crate alloc;

/// The decaying two-field priority score, and its AVL-balance-embedded variant.
pub mod priority;

/// Maps observed user-function invocation cost to an initial priority.
pub mod generator;

/// Intrusive arena-backed doubly linked list.
///
/// **Note**: internal infrastructure backing [`lru_list`] and [`lfu_list`].
/// Exposes unsafe raw-pointer operations; prefer the higher-level lists.
pub(crate) mod list;

/// A fixed-capacity least-recently-used eviction list.
pub mod lru_list;

/// A fixed-capacity least-frequently-used eviction list (frequency-bucketed,
/// O(1) amortized).
pub mod lfu_list;

/// The priority hash table and the LRU/LFU-strategy hash table.
pub mod hash;

/// The strategy-driven splay tree family: bottom-node, LRU-list-backed, and
/// LFU-list-backed eviction.
pub mod splay;

/// The Weighted Search Tree: an AVL tree and a binary min-heap sharing one
/// node array.
pub mod wst;

/// The fine-grained-locked concurrent hash+heap container.
///
/// Available when the `concurrent` feature is enabled.
#[cfg(feature = "concurrent")]
pub mod cndc;

/// The memoizing cache front end.
pub mod cache;

/// `CoarseLock`/`Sharded` adapters from [`container::Container`] to
/// [`container::ConcurrentContainer`].
///
/// Available when the `concurrent` feature is enabled.
#[cfg(feature = "concurrent")]
pub mod wrappers;

/// Event counters: hits, misses, user-function invocations, derived
/// cache efficiency.
pub mod counter;

/// Construction-time error kinds.
pub mod error;

/// Per-container configuration structures.
pub mod config;

/// The `Container`/`ConcurrentContainer` capability traits.
pub mod container;

/// A trivial FIFO container for exercising [`cache::Cache`] on its own.
pub mod dummy;

// Re-exports for the common entry points.
pub use cache::Cache;
pub use container::{ConcurrentContainer, Container};
pub use counter::{BasicCounter, EmptyCounter, EventCounter};
pub use error::CacheError;
pub use generator::{InitialPriorityGenerator, MinMaxPriorityGenerator, RatioPriorityGenerator};
pub use hash::{LfuHashTable, LruHashTable, PriorityHashTable};
pub use priority::{AvlPriority, Priority, PriorityScore};
pub use splay::{LfuSplayTree, LruSplayTree, SplayTree};
pub use wst::WeightedSearchTree;

#[cfg(feature = "concurrent")]
pub use cndc::Cndc;
#[cfg(feature = "concurrent")]
pub use wrappers::{CoarseLock, Sharded};
