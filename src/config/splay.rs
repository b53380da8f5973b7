//! Configuration for the splay tree family (§4.5).

/// Which eviction policy a splay tree uses once it reaches capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplayEviction {
    /// Pseudo-random hash-guided descent to a leaf-ish node (§4.5's
    /// "bottom node" variant): no auxiliary structure, O(depth) eviction.
    BottomNode,
    /// An auxiliary LRU list picks the eviction candidate.
    Lru,
    /// An auxiliary fair-LFU list picks the eviction candidate.
    Lfu,
}

/// Configuration for [`crate::splay::tree::SplayTree`].
#[derive(Debug, Clone, Copy)]
pub struct SplayConfig {
    /// Byte budget for the node array.
    pub memory_budget: usize,
    /// Eviction policy used once the tree is full.
    pub eviction: SplayEviction,
    /// Whether to use a 32-bit node index instead of `usize` (§4.8).
    pub use_short_index: bool,
}

impl SplayConfig {
    /// Builds a config using bottom-node eviction, the variant requiring no
    /// auxiliary list.
    pub fn new(memory_budget: usize) -> Self {
        SplayConfig {
            memory_budget,
            eviction: SplayEviction::BottomNode,
            use_short_index: false,
        }
    }
}
