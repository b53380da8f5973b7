// filepath: demos/metrics_demo.rs
//! Demonstrates the event counter and generator-derived priorities exposed
//! through the `Cache` front end.
//!
//! Run with: cargo run --bin metrics_demo (after copying this file into a
//! `[[bin]]` target, since `demos/` is not an auto-discovered Cargo
//! directory).

use memo_cache::cache::Cache;
use memo_cache::config::priority_table::PriorityTableConfig;
use memo_cache::generator::RatioPriorityGenerator;
use memo_cache::hash::priority_table::PriorityHashTable;

fn expensive(n: u64) -> Result<u64, std::convert::Infallible> {
    std::thread::sleep(std::time::Duration::from_micros(n));
    Ok(n * n)
}

fn main() {
    println!("Cache metrics demonstration");
    println!("===========================\n");

    let container: PriorityHashTable<u64, u64> =
        PriorityHashTable::new(PriorityTableConfig::new(4096)).unwrap();
    let generator = RatioPriorityGenerator::new(254);
    let mut cache = Cache::with_clock_and_counter(
        expensive,
        container,
        generator,
        memo_cache::cache::StdClock,
        memo_cache::counter::BasicCounter::new(),
    );

    for n in [1, 2, 1, 3, 1, 2, 4] {
        let value = *cache.invoke(n).unwrap();
        println!("invoke({n}) = {value}");
    }

    println!("\nretrievals:            {}", cache.counter().retrievals());
    println!("user function calls:   {}", cache.counter().user_func_invocations());
    println!("cache efficiency:      {:.2}%", cache.counter().cache_efficiency() * 100.0);
    println!("element size overhead: {:.2}%", cache.element_size_overhead() * 100.0);
}
