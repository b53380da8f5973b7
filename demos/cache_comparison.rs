//! Compares how each container's eviction policy responds to the same
//! access pattern: fill to capacity, repeatedly favor one key, then force
//! an eviction and see which key survives.

use memo_cache::config::priority_table::PriorityTableConfig;
use memo_cache::config::splay::SplayConfig;
use memo_cache::config::wst::WstConfig;
use memo_cache::hash::lu_table::{LfuHashTable, LruHashTable};
use memo_cache::hash::priority_table::PriorityHashTable;
use memo_cache::splay::strategy::CanonicalSplayStrategy;
use memo_cache::splay::tree::SplayTree;
use memo_cache::wst::WeightedSearchTree;
use memo_cache::Container;

const FRUITS: [&str; 4] = ["apple", "banana", "cherry", "date"];
const ELEMENT_SIZE: usize = 256;

fn main() {
    println!("Container eviction comparison");
    println!("==============================");
    println!("Capacity 3, fill with apple/banana/cherry, favor apple, then insert date.\n");

    run("PriorityHashTable", || {
        let mut c: PriorityHashTable<&str, usize> =
            PriorityHashTable::new(PriorityTableConfig::new(ELEMENT_SIZE * 3)).unwrap();
        fill_and_evict(&mut c)
    });

    run("WeightedSearchTree", || {
        let mut c: WeightedSearchTree<&str, usize> = WeightedSearchTree::new(WstConfig::new(ELEMENT_SIZE * 3)).unwrap();
        fill_and_evict(&mut c)
    });

    run("SplayTree (bottom-node)", || {
        let mut c: SplayTree<&str, usize, CanonicalSplayStrategy> =
            SplayTree::new(SplayConfig::new(ELEMENT_SIZE * 3)).unwrap();
        fill_and_evict(&mut c)
    });

    run("LruHashTable", || {
        let mut c: LruHashTable<&str, usize> = LruHashTable::new(3).unwrap();
        fill_and_evict(&mut c)
    });

    run("LfuHashTable", || {
        let mut c: LfuHashTable<&str, usize> = LfuHashTable::new(3).unwrap();
        fill_and_evict(&mut c)
    });
}

fn fill_and_evict<C: Container<&'static str, usize>>(c: &mut C) -> Option<&'static str> {
    for (i, name) in FRUITS[..3].iter().enumerate() {
        c.insert(name, i, 100);
    }
    for _ in 0..5 {
        c.find(&"apple");
    }
    c.insert(FRUITS[3], 3, 100).map(|(k, _)| k)
}

fn run(name: &str, body: impl FnOnce() -> Option<&'static str>) {
    match body() {
        Some(evicted) => println!("{name:<24} evicted {evicted:?} when 'date' was inserted"),
        None => println!("{name:<24} had spare capacity, nothing evicted"),
    }
}
