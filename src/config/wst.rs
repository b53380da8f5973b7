//! Configuration for the Weighted Search Tree (§4.6).

/// Configuration for [`crate::wst::WeightedSearchTree`].
#[derive(Debug, Clone, Copy)]
pub struct WstConfig {
    /// Byte budget for the single node array backing both the AVL tree and
    /// the binary min-heap.
    pub memory_budget: usize,
    /// Pass-by decay rate applied while `find` descends past a node without
    /// matching it (§9's resolved "visit on pass-through" rule).
    pub degradation_rate: u32,
    /// Whether to use a 32-bit node index instead of `usize` (§4.8).
    pub use_short_index: bool,
}

impl WstConfig {
    /// Builds a config with decay disabled.
    pub fn new(memory_budget: usize) -> Self {
        WstConfig {
            memory_budget,
            degradation_rate: 0,
            use_short_index: false,
        }
    }
}
