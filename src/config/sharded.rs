//! Configuration for the [`crate::wrappers::Sharded`] wrapper (§4.8).

/// Configuration for [`crate::wrappers::Sharded`].
#[derive(Debug, Clone, Copy)]
pub struct ShardedConfig {
    /// Number of independent, coarse-locked inner containers to route
    /// across by key hash. Must be non-zero
    /// ([`crate::error::CacheError::InvalidShardCount`] otherwise).
    pub bin_count: usize,
}

impl ShardedConfig {
    /// Builds a config with the given shard count.
    pub fn new(bin_count: usize) -> Self {
        ShardedConfig { bin_count }
    }
}
