//! Configuration for the concurrent node+heap container (§4.7).

use super::DEFAULT_LOAD_FACTOR;

/// Configuration for [`crate::cndc::Cndc`].
#[derive(Debug, Clone, Copy)]
pub struct CndcConfig {
    /// Byte budget for the bucket array + heap array combined.
    pub memory_budget: usize,
    /// Target ratio of bucket slots to elements.
    pub load_factor: f64,
    /// Pass-by decay rate applied during concurrent heap sifting.
    pub degradation_rate: u32,
    /// Whether lock acquisition backs off exponentially under contention
    /// (`UseBackoff` in the original) rather than spinning.
    pub use_backoff: bool,
}

impl CndcConfig {
    /// Builds a config with the default load factor (2.0), decay disabled,
    /// and backoff enabled.
    pub fn new(memory_budget: usize) -> Self {
        CndcConfig {
            memory_budget,
            load_factor: DEFAULT_LOAD_FACTOR,
            degradation_rate: 0,
            use_backoff: true,
        }
    }
}
