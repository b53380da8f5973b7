// Regression coverage for the intrusive list's raw-pointer bookkeeping.
//
// list.rs/lru_list.rs/lfu_list.rs thread `*mut Entry<K>` handles out to
// callers (LuTable, LruSplayTree, LfuSplayTree) and mutate through them on
// every touch/remove. The pattern that's easy to get wrong here is reading
// a field through one handle and then mutably touching the list through a
// second path derived from it (e.g. a key clone) — that's exactly the shape
// Stacked Borrows flags. These tests exercise that access pattern directly;
// run under `cargo +nightly miri test --test test_miri_stacked_borrows` to
// confirm no violation.
#![cfg(test)]

use memo_cache::config::splay::SplayConfig;
use memo_cache::hash::lu_table::{LfuHashTable, LruHashTable};
use memo_cache::splay::lu::{LfuSplayTree, LruSplayTree};
use memo_cache::splay::strategy::CanonicalSplayStrategy;
use memo_cache::Container;

#[test]
fn lru_hash_table_repeated_touch_does_not_alias_the_list_and_the_bucket() {
    let mut t: LruHashTable<String, i32> = LruHashTable::new(4).unwrap();
    for i in 0..4 {
        t.insert(format!("key{i}"), i, 1);
    }
    for _ in 0..10 {
        for i in 0..4 {
            assert_eq!(t.find(&format!("key{i}")), Some(&i));
        }
    }
}

#[test]
fn lfu_hash_table_repeated_touch_does_not_alias_the_list_and_the_bucket() {
    let mut t: LfuHashTable<String, i32> = LfuHashTable::new(4).unwrap();
    for i in 0..4 {
        t.insert(format!("key{i}"), i, 1);
    }
    for _ in 0..10 {
        for i in 0..4 {
            assert_eq!(t.find(&format!("key{i}")), Some(&i));
        }
    }
}

#[test]
fn lru_splay_tree_handle_map_and_list_stay_consistent_under_eviction() {
    let mut t: LruSplayTree<u32, &str, CanonicalSplayStrategy> =
        LruSplayTree::new(SplayConfig::new(256 * 4)).unwrap();
    for round in 0..20u32 {
        t.insert(round, "v", 1);
        if round > 3 {
            assert!(t.find(&(round - 1)).is_some() || t.find(&(round - 2)).is_some());
        }
    }
}

#[test]
fn lfu_splay_tree_handle_map_and_list_stay_consistent_under_eviction() {
    let mut t: LfuSplayTree<u32, &str, CanonicalSplayStrategy> =
        LfuSplayTree::new(SplayConfig::new(256 * 4)).unwrap();
    for round in 0..20u32 {
        t.insert(round, "v", 1);
        t.find(&round);
    }
    assert!(t.len() <= 4);
}
