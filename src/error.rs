//! Construction-time error kinds.
//!
//! Steady-state operations (`find`/`insert`/`erase`) are total: a well-formed
//! cache never fails at runtime except by propagating the user function's own
//! error. Only constructors return `Result`.

extern crate alloc;

use core::fmt;

/// Errors that can occur while constructing a container or cache.
///
/// `UserFunctionFailed` is the only kind raised after construction, and only
/// from [`crate::cache::Cache::invoke`] when the wrapped function itself
/// fails; no entry is inserted in that case.
#[derive(Debug)]
pub enum CacheError<E = core::convert::Infallible> {
    /// The computed capacity is zero: the memory budget is too small to hold
    /// even one entry (or, for hash-based containers, one bucket head).
    InsufficientMemory,
    /// `use_short_index` was requested but the computed capacity exceeds
    /// `u32::MAX - 1`. Disable short indices or raise the budget.
    CapacityExceeded,
    /// The sharded wrapper was asked to build zero shards.
    InvalidShardCount,
    /// The user function itself returned an error; propagated unchanged.
    UserFunctionFailed(E),
}

impl<E: fmt::Debug> fmt::Display for CacheError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::InsufficientMemory => {
                write!(f, "memory budget is too small to hold a single entry")
            }
            CacheError::CapacityExceeded => write!(
                f,
                "capacity exceeds the short-index range (2^32 - 2); disable use_short_index"
            ),
            CacheError::InvalidShardCount => write!(f, "shard count must be non-zero"),
            CacheError::UserFunctionFailed(e) => write!(f, "user function failed: {e:?}"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for CacheError<E> {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn display_messages_mention_the_kind() {
        assert!(format!("{}", CacheError::<()>::InsufficientMemory).contains("memory"));
        assert!(format!("{}", CacheError::<()>::CapacityExceeded).contains("capacity"));
        assert!(format!("{}", CacheError::<()>::InvalidShardCount).contains("shard"));
        assert!(format!("{}", CacheError::UserFunctionFailed("boom")).contains("boom"));
    }
}
