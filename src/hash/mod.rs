//! Hash-table-backed containers (§4.4, §4.3+§4.5 combined as "hash table +
//! LU strategy").
//!
//! [`priority_table`] couples an open-chained hash table with a parallel
//! binary min-heap, grounded on
//! `hash_table/fixed_hashtable_binary_heap.h`. [`lu_table`] delegates
//! eviction to an [`crate::lru_list::LruList`] or
//! [`crate::lfu_list::LfuList`] instead of a heap, grounded on
//! `hash_table/fixed_hashtable_fair_lu.h`.

pub mod lu_table;
pub mod priority_table;

pub use lu_table::{LfuHashTable, LruHashTable, LuStrategy, LuTable};
pub use priority_table::PriorityHashTable;
