//! The splay tree family (§4.5): an abortable, strategy-driven splay tree
//! base plus its eviction variants.

pub mod bottom_node;
pub mod lu;
pub mod strategy;
pub mod tree;

pub use lu::{LfuSplayTree, LruSplayTree};
pub use strategy::{
    AccessCountSplayStrategy, CanonicalSplayStrategy, ParametrizedAccessCountSplayStrategy,
    PriorityStrategy, SplayStrategy,
};
pub use tree::SplayTree;
