//! Event counters (§4.9): observers the cache front end reports hits,
//! misses, and user-function invocations to.
//!
//! Ported from `event_counter.h`'s `EventCounter` (total retrieves / user
//! function calls, with a derived cache efficiency) plus a no-op and an
//! atomic variant for the concurrent wrappers.

use core::cell::Cell;
#[cfg(feature = "concurrent")]
use core::sync::atomic::{AtomicU64, Ordering};

/// Something [`crate::cache::Cache`] reports retrieval and invocation
/// events to.
pub trait EventCounter {
    /// Records that the cache was asked for a value (hit or miss).
    fn record_retrieval(&self);
    /// Records that the user function had to be invoked (a miss).
    fn record_user_func_invocation(&self);
    /// Total number of retrievals recorded so far.
    fn retrievals(&self) -> u64;
    /// Total number of user-function invocations recorded so far.
    fn user_func_invocations(&self) -> u64;

    /// Fraction of retrievals satisfied without invoking the user function,
    /// in `[0.0, 1.0]`. Returns `1.0` when no retrievals have happened yet:
    /// an empty cache hasn't missed on anything.
    fn cache_efficiency(&self) -> f64 {
        let retrievals = self.retrievals();
        if retrievals == 0 {
            1.0
        } else {
            1.0 - (self.user_func_invocations() as f64 / retrievals as f64)
        }
    }
}

/// Discards every event. Zero-sized, for callers who don't want the
/// bookkeeping overhead.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyCounter;

impl EventCounter for EmptyCounter {
    fn record_retrieval(&self) {}
    fn record_user_func_invocation(&self) {}
    fn retrievals(&self) -> u64 {
        0
    }
    fn user_func_invocations(&self) -> u64 {
        0
    }
    fn cache_efficiency(&self) -> f64 {
        1.0
    }
}

/// Plain, non-atomic counter for single-threaded containers.
///
/// Uses a [`Cell`] rather than a plain `u64` so it implements the shared
/// `&self`-based [`EventCounter`] trait the same way [`AtomicCounter`] does;
/// there is no cross-thread sharing to guard against here; `Cell` is enough.
#[derive(Debug, Default)]
pub struct BasicCounter {
    retrievals: Cell<u64>,
    user_func_invocations: Cell<u64>,
}

impl BasicCounter {
    /// Builds a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventCounter for BasicCounter {
    fn record_retrieval(&self) {
        self.retrievals.set(self.retrievals.get() + 1);
    }
    fn record_user_func_invocation(&self) {
        self.user_func_invocations
            .set(self.user_func_invocations.get() + 1);
    }
    fn retrievals(&self) -> u64 {
        self.retrievals.get()
    }
    fn user_func_invocations(&self) -> u64 {
        self.user_func_invocations.get()
    }
}

/// Atomic counter for the concurrent containers and wrappers, where
/// multiple threads report events through a shared `&self`.
#[cfg(feature = "concurrent")]
#[derive(Debug, Default)]
pub struct AtomicCounter {
    retrievals: AtomicU64,
    user_func_invocations: AtomicU64,
}

#[cfg(feature = "concurrent")]
impl AtomicCounter {
    /// Builds a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "concurrent")]
impl EventCounter for AtomicCounter {
    fn record_retrieval(&self) {
        self.retrievals.fetch_add(1, Ordering::Relaxed);
    }
    fn record_user_func_invocation(&self) {
        self.user_func_invocations.fetch_add(1, Ordering::Relaxed);
    }
    fn retrievals(&self) -> u64 {
        self.retrievals.load(Ordering::Relaxed)
    }
    fn user_func_invocations(&self) -> u64 {
        self.user_func_invocations.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_counter_reports_full_efficiency() {
        let c = EmptyCounter;
        c.record_retrieval();
        c.record_user_func_invocation();
        assert_eq!(c.retrievals(), 0);
        assert_eq!(c.cache_efficiency(), 1.0);
    }

    #[test]
    fn basic_counter_tracks_efficiency() {
        let c = BasicCounter::new();
        c.record_retrieval();
        c.record_retrieval();
        c.record_user_func_invocation();
        assert_eq!(c.retrievals(), 2);
        assert_eq!(c.user_func_invocations(), 1);
        assert!((c.cache_efficiency() - 0.5).abs() < f64::EPSILON);
    }

    #[cfg(feature = "concurrent")]
    #[test]
    fn atomic_counter_tracks_efficiency() {
        let c = AtomicCounter::new();
        c.record_retrieval();
        c.record_retrieval();
        c.record_retrieval();
        c.record_retrieval();
        c.record_user_func_invocation();
        assert_eq!(c.retrievals(), 4);
        assert!((c.cache_efficiency() - 0.75).abs() < f64::EPSILON);
    }
}
