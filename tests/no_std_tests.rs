#![no_std]

extern crate alloc;
extern crate memo_cache;

use alloc::format;
use alloc::string::String;
use memo_cache::config::priority_table::PriorityTableConfig;
use memo_cache::config::wst::WstConfig;
use memo_cache::hash::lu_table::LruHashTable;
use memo_cache::hash::priority_table::PriorityHashTable;
use memo_cache::wst::WeightedSearchTree;
use memo_cache::Container;

#[test]
fn priority_hash_table_works_under_no_std() {
    let mut t: PriorityHashTable<String, i32> =
        PriorityHashTable::new(PriorityTableConfig::new(4096)).unwrap();

    let key1 = String::from("key1");
    let key2 = String::from("key2");

    t.insert(key1.clone(), 1, 10);
    t.insert(key2.clone(), 2, 254);

    assert_eq!(t.find(&key1), Some(&1));
    assert_eq!(t.find(&key2), Some(&2));
}

#[test]
fn weighted_search_tree_works_under_no_std() {
    let mut t: WeightedSearchTree<String, i32> = WeightedSearchTree::new(WstConfig::new(4096)).unwrap();

    for i in 0..5 {
        t.insert(format!("key{i}"), i, 100);
    }
    assert_eq!(t.find(&String::from("key3")), Some(&3));
}

#[test]
fn lru_hash_table_works_under_no_std_with_heap_allocated_keys() {
    let mut t: LruHashTable<String, i32> = LruHashTable::new(2).unwrap();

    let key1 = String::from("key1");
    let key2 = String::from("key2");
    let key3 = String::from("key3");

    t.insert(key1.clone(), 1, 1);
    t.insert(key2.clone(), 2, 1);
    t.find(&key1);

    let evicted = t.insert(key3.clone(), 3, 1);
    assert_eq!(evicted.map(|(k, _)| k), Some(key2));
    assert_eq!(t.find(&key1), Some(&1));
    assert_eq!(t.find(&key3), Some(&3));
}
