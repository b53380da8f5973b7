//! The cache front end (§4.3): wraps a user function, a [`Container`], an
//! [`EventCounter`], and an [`InitialPriorityGenerator`] into a single
//! memoizing call surface.
//!
//! Ported from `memoizing_cache.h::Cache`: `invoke` looks the key up first,
//! and on a miss times the user function, maps the timing to an initial
//! priority, and inserts the result.

use crate::counter::EventCounter;
use crate::error::CacheError;
use crate::generator::InitialPriorityGenerator;
use core::hash::Hash;

use crate::container::Container;

#[cfg(feature = "std")]
use std::time::Instant;

/// Measures the wall-clock cost of a user-function invocation, in
/// microseconds.
///
/// Behind a trait so tests can supply a deterministic clock instead of
/// `std::time::Instant`, which isn't available under `no_std`.
pub trait Clock {
    /// An opaque instant produced by [`Clock::now`].
    type Instant: Copy;
    /// The current instant.
    fn now(&self) -> Self::Instant;
    /// Elapsed microseconds between `start` and now.
    fn elapsed_micros(&self, start: Self::Instant) -> u64;
}

/// [`Clock`] backed by [`std::time::Instant`]. Only available with the
/// `std` feature; under plain `no_std` + `alloc`, callers supply their own
/// [`Clock`] (e.g. backed by a hardware cycle counter).
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone, Copy)]
pub struct StdClock;

#[cfg(feature = "std")]
impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed_micros(&self, start: Instant) -> u64 {
        start.elapsed().as_micros() as u64
    }
}

/// A memoizing cache over a user function `F: Fn(K) -> Result<V, E>`.
///
/// `invoke` is the only steady-state operation: on a cache hit it returns
/// the stored value without calling `F` again; on a miss it calls `F`,
/// times the call, derives an initial priority from the timing via `G`, and
/// inserts the result into `C` before returning it.
pub struct Cache<K, V, E, F, C, G, N = EmptyClock, Cnt = crate::counter::BasicCounter> {
    func: F,
    container: C,
    generator: G,
    counter: Cnt,
    clock: N,
    _marker: core::marker::PhantomData<(K, V, E)>,
}

/// A [`Clock`] that always reports zero cost, for `no_std` builds or tests
/// that don't care about timing-derived priority.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyClock;

impl Clock for EmptyClock {
    type Instant = ();
    fn now(&self) {}
    fn elapsed_micros(&self, _start: ()) -> u64 {
        0
    }
}

impl<K, V, E, F, C, G> Cache<K, V, E, F, C, G, EmptyClock, crate::counter::BasicCounter>
where
    K: Eq + Hash + Clone,
    F: Fn(K) -> Result<V, E>,
    C: Container<K, V>,
    G: InitialPriorityGenerator,
{
    /// Builds a cache with the default (no-op) clock and a [`BasicCounter`](crate::counter::BasicCounter).
    pub fn new(func: F, container: C, generator: G) -> Self {
        Cache {
            func,
            container,
            generator,
            counter: crate::counter::BasicCounter::new(),
            clock: EmptyClock,
            _marker: core::marker::PhantomData,
        }
    }
}

/// Runs the clock stop and priority-generator call on every exit out of the
/// block it guards, including the user function propagating a failure (by
/// `?` or by unwinding) — porting the original's `DEFERRED` scope guard
/// around the timing block (§9).
struct PriorityFinalizer<'a, N: Clock, G: InitialPriorityGenerator> {
    clock: &'a N,
    start: N::Instant,
    generator: &'a mut G,
    priority: &'a mut u32,
}

impl<'a, N: Clock, G: InitialPriorityGenerator> Drop for PriorityFinalizer<'a, N, G> {
    fn drop(&mut self) {
        let cost_micros = self.clock.elapsed_micros(self.start);
        *self.priority = self.generator.observe(cost_micros);
    }
}

impl<K, V, E, F, C, G, N, Cnt> Cache<K, V, E, F, C, G, N, Cnt>
where
    K: Eq + Hash + Clone,
    F: Fn(K) -> Result<V, E>,
    C: Container<K, V>,
    G: InitialPriorityGenerator,
    N: Clock,
    Cnt: EventCounter,
{
    /// Builds a cache with an explicit clock and counter, e.g.
    /// [`StdClock`](crate::cache::StdClock) plus an
    /// [`AtomicCounter`](crate::counter::AtomicCounter) for a wrapped
    /// concurrent container.
    pub fn with_clock_and_counter(func: F, container: C, generator: G, clock: N, counter: Cnt) -> Self {
        Cache {
            func,
            container,
            generator,
            counter,
            clock,
            _marker: core::marker::PhantomData,
        }
    }

    /// Looks up `key`; on a miss, calls the wrapped function, derives an
    /// initial priority from how long the call took, and inserts the
    /// result before returning it.
    ///
    /// Returns [`CacheError::UserFunctionFailed`] if the function itself
    /// errors; nothing is inserted in that case.
    pub fn invoke(&mut self, key: K) -> Result<&V, CacheError<E>> {
        self.counter.record_retrieval();

        if let Some(value) = self.container.find(&key) {
            return Ok(value);
        }

        self.counter.record_user_func_invocation();

        let mut priority = 0u32;
        let result = {
            let _finalizer = PriorityFinalizer {
                clock: &self.clock,
                start: self.clock.now(),
                generator: &mut self.generator,
                priority: &mut priority,
            };
            (self.func)(key.clone())
            // `_finalizer` drops here, stopping the clock and observing the
            // cost regardless of whether `result` is `Ok` or `Err`.
        };
        let value = result.map_err(CacheError::UserFunctionFailed)?;
        self.container.insert(key.clone(), value, priority);

        Ok(self.container.find(&key).expect("just inserted"))
    }

    /// The event counter backing this cache's hit/miss/efficiency stats.
    pub fn counter(&self) -> &Cnt {
        &self.counter
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        self.container.len()
    }

    /// Whether the cache holds zero entries.
    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }

    /// Removes `key` from the cache, if present.
    pub fn evict(&mut self, key: &K) -> Option<V> {
        self.container.remove(key)
    }

    /// Fraction of a stored element's footprint that is container
    /// bookkeeping rather than the key+value payload itself — e.g. heap
    /// index, tree links, priority score.
    ///
    /// Ported from `function_cache.h::elementSizeOverhead`. Every container
    /// in this crate keeps its bookkeeping in a fixed-size arena slot
    /// alongside the key and value, so this is approximated from `K`/`V`'s
    /// sizes against a nominal per-node bookkeeping cost (two arena links
    /// plus one priority word) rather than asking the concrete container,
    /// which doesn't expose its node layout.
    pub fn element_size_overhead(&self) -> f64 {
        const BOOKKEEPING_BYTES: usize = 2 * core::mem::size_of::<usize>() + core::mem::size_of::<u32>();
        let payload = core::mem::size_of::<K>() + core::mem::size_of::<V>();
        let total = payload + BOOKKEEPING_BYTES;
        BOOKKEEPING_BYTES as f64 / total as f64
    }
}
