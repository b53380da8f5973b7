//! Configuration for the priority hash table (§4.4) and the LU-strategy
//! hash table (§4.3/§4.5).

use super::DEFAULT_LOAD_FACTOR;

/// Configuration for [`crate::hash::priority_table::PriorityHashTable`].
#[derive(Debug, Clone, Copy)]
pub struct PriorityTableConfig {
    /// Byte budget for the chain array + heap array combined.
    pub memory_budget: usize,
    /// Target ratio of bucket slots to elements. 2.0 keeps chains short at
    /// the cost of doubling the bucket-head array versus a load factor of
    /// 1.0.
    pub load_factor: f64,
    /// Pass-by decay rate applied to a node's priority every time the heap
    /// sift passes over it without matching. Zero disables decay entirely
    /// (§4.4's `DegradationRate` template parameter).
    pub degradation_rate: u32,
    /// Whether to use a 32-bit node index instead of `usize` (§4.8).
    pub use_short_index: bool,
}

impl PriorityTableConfig {
    /// Builds a config with the default load factor (2.0) and decay
    /// disabled.
    pub fn new(memory_budget: usize) -> Self {
        PriorityTableConfig {
            memory_budget,
            load_factor: DEFAULT_LOAD_FACTOR,
            degradation_rate: 0,
            use_short_index: false,
        }
    }
}
