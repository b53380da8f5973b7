//! Configuration structs for every container (§10.5).
//!
//! Every container is built from a config rather than bare constructor
//! arguments, following the teacher's per-algorithm `config::*Config`
//! convention. Every config carries a `memory_budget` (bytes) and, for
//! hash-based containers, a `load_factor`; the container computes its own
//! capacity from these via `max_elem_count_for_capacity`, mirroring
//! `maxElemCountForCapacity` in every `numdb` container header.
//!
//! # Sizing
//!
//! `memory_budget` is a byte budget for the whole container, not per entry.
//! Given `load_factor` (default 2.0, meaning roughly 2 bucket slots per
//! element for a hash table, to keep chains short) and the known per-element
//! footprint of the target container, `max_elem_count_for_capacity` divides
//! the budget by `element_size * load_factor` to get the element count the
//! container is constructed with. Containers that fail to fit even one
//! element return [`crate::error::CacheError::InsufficientMemory`].

pub mod cndc;
pub mod priority_table;
pub mod sharded;
pub mod splay;
pub mod wst;

pub use cndc::CndcConfig;
pub use priority_table::PriorityTableConfig;
pub use sharded::ShardedConfig;
pub use splay::SplayConfig;
pub use wst::WstConfig;

/// Default ratio of bucket slots to elements for hash-based containers.
pub const DEFAULT_LOAD_FACTOR: f64 = 2.0;

/// Whether a container uses a narrow `u32` index (`UseShortIndex` in the
/// original) or a full-width `usize` index internally (§4.8).
///
/// Expressed as a sealed trait over two marker types rather than a runtime
/// `bool`, so the index width is picked at compile time per the C++
/// source's `std::conditional_t<UseShortIndex, uint32_t, size_t>` —
/// monomorphization instead of a branch on every pointer-sized access.
pub trait IndexKind: private::Sealed {
    /// The index type this `IndexKind` selects.
    type Idx: Copy
        + Eq
        + TryFrom<usize>
        + Into<usize>
        + core::fmt::Debug
        + Send
        + Sync
        + 'static;

    /// The largest element count this index width can address.
    const MAX_CAPACITY: usize;
}

/// Selects a 32-bit index, halving node size on 64-bit targets at the cost
/// of a `u32::MAX - 1` capacity ceiling
/// ([`crate::error::CacheError::CapacityExceeded`] past that).
#[derive(Debug, Clone, Copy)]
pub struct ShortIndex;

/// Selects a full-width `usize` index with no extra capacity ceiling.
#[derive(Debug, Clone, Copy)]
pub struct FullIndex;

impl IndexKind for ShortIndex {
    type Idx = u32;
    const MAX_CAPACITY: usize = (u32::MAX - 1) as usize;
}

impl IndexKind for FullIndex {
    type Idx = usize;
    const MAX_CAPACITY: usize = usize::MAX;
}

mod private {
    pub trait Sealed {}
    impl Sealed for super::ShortIndex {}
    impl Sealed for super::FullIndex {}
}

/// Computes the element count a `memory_budget`-byte allocation affords,
/// given each element's footprint and the desired load factor.
///
/// Mirrors `maxElemCountForCapacity(bytes)` from the `numdb` container
/// headers: `bytes / (element_size * load_factor)`, floored.
pub fn max_elem_count_for_capacity(
    memory_budget: usize,
    element_size: usize,
    load_factor: f64,
) -> usize {
    if element_size == 0 || load_factor <= 0.0 {
        return 0;
    }
    let denom = element_size as f64 * load_factor;
    ((memory_budget as f64) / denom) as usize
}
