//! Concurrent container usage examples.
//!
//! Run with: cargo run --features concurrent --bin concurrent_usage
//! (after copying this file into a `[[bin]]` target, since `demos/` is not
//! an auto-discovered Cargo directory).

use memo_cache::cndc::Cndc;
use memo_cache::config::cndc::CndcConfig;
use memo_cache::config::sharded::ShardedConfig;
use memo_cache::dummy::DummyContainer;
use memo_cache::wrappers::{CoarseLock, Sharded};
use memo_cache::ConcurrentContainer;
use std::sync::Arc;
use std::thread;

fn main() {
    println!("Concurrent container usage");
    println!("===========================\n");

    println!("1. Cndc: fine-grained-locked hash+heap, 8 threads inserting disjoint key ranges");
    let cndc = Arc::new(Cndc::<u32, u32>::new(CndcConfig::new(64 * 4096)).unwrap());
    let mut handles = Vec::new();
    for t in 0..8u32 {
        let cndc = Arc::clone(&cndc);
        handles.push(thread::spawn(move || {
            for i in 0..256u32 {
                let key = t * 256 + i;
                cndc.insert(key, key * key, 100);
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }
    println!("   inserted {} entries concurrently\n", cndc.len());

    println!("2. CoarseLock: a single mutex around a DummyContainer, simplest possible adapter");
    let coarse = Arc::new(CoarseLock::new(DummyContainer::<u32, u32>::new(1024)));
    coarse.insert(1, 10, 1);
    println!("   find(1) = {:?}\n", coarse.find(&1));

    println!("3. Sharded: 16 independent coarse-locked shards, routed by key hash");
    let sharded: Arc<Sharded<DummyContainer<u32, u32>>> =
        Arc::new(Sharded::new(ShardedConfig::new(16), || DummyContainer::new(64)).unwrap());
    let mut handles = Vec::new();
    for t in 0..16u32 {
        let sharded = Arc::clone(&sharded);
        handles.push(thread::spawn(move || {
            for i in 0..32u32 {
                sharded.insert(t * 32 + i, i, 1);
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }
    println!("   inserted {} entries across shards", sharded.len());
}
