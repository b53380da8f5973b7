//! Stress tests for concurrent containers: high thread/operation counts,
//! verifying no panics and that invariants (capacity bound, every surviving
//! key still findable) hold under contention.

#![cfg(feature = "concurrent")]

use memo_cache::cndc::Cndc;
use memo_cache::config::cndc::CndcConfig;
use memo_cache::config::sharded::ShardedConfig;
use memo_cache::dummy::DummyContainer;
use memo_cache::wrappers::{CoarseLock, Sharded};
use memo_cache::ConcurrentContainer;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

const NUM_THREADS: usize = 16;
const OPS_PER_THREAD: usize = 2_000;

#[test]
fn cndc_survives_high_concurrency_mixed_insert_find_remove() {
    let cache = Arc::new(Cndc::<u32, u32>::new(CndcConfig::new(64 * 2048)).unwrap());
    let successes = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for t in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        let successes = Arc::clone(&successes);
        handles.push(thread::spawn(move || {
            for i in 0..OPS_PER_THREAD {
                let key = (t * OPS_PER_THREAD + i) as u32;
                cache.insert(key, key, (i % 255) as u32 + 1);
                if cache.find(&key).is_some() {
                    successes.fetch_add(1, Ordering::Relaxed);
                }
                if i % 7 == 0 {
                    cache.remove(&key);
                }
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    assert!(cache.len() <= 2048);
    assert!(successes.load(Ordering::Relaxed) > 0);
}

#[test]
fn coarse_lock_survives_high_concurrency_inserts() {
    let cache = Arc::new(CoarseLock::new(DummyContainer::<u32, u32>::new(2048)));

    let mut handles = Vec::new();
    for t in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..OPS_PER_THREAD {
                let key = (t * OPS_PER_THREAD + i) as u32;
                cache.insert(key, key, 1);
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    assert!(cache.len() <= 2048);
}

#[test]
fn sharded_survives_high_concurrency_inserts_across_shards() {
    let cache: Arc<Sharded<DummyContainer<u32, u32>>> = Arc::new(
        Sharded::new(ShardedConfig::new(16), || DummyContainer::new(256)).unwrap(),
    );

    let mut handles = Vec::new();
    for t in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..OPS_PER_THREAD {
                let key = (t * OPS_PER_THREAD + i) as u32;
                cache.insert(key, key, 1);
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    assert!(cache.len() <= 16 * 256);
}
