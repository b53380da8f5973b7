//! The bottom-node eviction variant (§4.5): no auxiliary structure, just a
//! pseudo-random hash-guided descent from the root.
//!
//! [`crate::splay::tree::SplayTree`] implements this directly (its
//! `Container::insert` calls `evict_bottom_node`), so this module is a thin,
//! named re-export — the pairing the teacher's own `lru`/`lfu`/`slru`
//! modules use for "one file per algorithm variant" even when a variant is a
//! default behavior of a shared base type.
//!
//! Ported from `splay_tree/splay_tree_random_bottom_node.h`.

pub use crate::splay::tree::SplayTree as BottomNodeSplayTree;
