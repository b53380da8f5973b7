//! Initial-priority generators (§4.2).
//!
//! A generator observes the wall-clock cost of user-function invocations and
//! maps each observed duration to a bounded initial priority for the entry
//! about to be inserted. Both variants here keep a running window of
//! observations and periodically fold it into a baseline so the mapping
//! tracks a workload whose cost distribution drifts over time.

extern crate alloc;

/// Something that turns an observed invocation cost into an initial
/// priority value in `1..=max_priority`.
pub trait InitialPriorityGenerator {
    /// Records one observed invocation cost, in microseconds, and returns
    /// the initial priority to assign to the entry that triggered it.
    fn observe(&mut self, cost_micros: u64) -> u32;
}

/// Default generator (§4.2): tracks a running sum/count of observed costs
/// and assigns priority as a ratio of the observed cost to the running
/// mean, scaled into `1..=max_priority`.
///
/// Ported from `initial_priority_generator.h::RatioPriorityGenerator`. The
/// running sum is reset every `decay_window` observations (exponential
/// forgetting in discrete steps rather than a continuous EMA, matching the
/// original) so a workload whose cost shifts over time is not anchored to
/// its first `decay_window` observations forever. Until `warmup`
/// observations have been made, every cost maps to the midpoint priority:
/// there isn't yet a meaningful baseline to compare against.
#[derive(Debug, Clone)]
pub struct RatioPriorityGenerator {
    max_priority: u32,
    warmup: u32,
    decay_window: u32,
    sum: u64,
    count: u32,
}

impl RatioPriorityGenerator {
    /// Default number of observations before the generator starts
    /// comparing costs against a baseline rather than returning the
    /// midpoint priority.
    pub const DEFAULT_WARMUP: u32 = 100;
    /// Default number of observations folded into the running baseline
    /// before it resets.
    pub const DEFAULT_DECAY_WINDOW: u32 = 10240;

    /// Builds a generator with the given ceiling and the default warmup
    /// (100) and decay window (10240).
    pub fn new(max_priority: u32) -> Self {
        Self::with_params(max_priority, Self::DEFAULT_WARMUP, Self::DEFAULT_DECAY_WINDOW)
    }

    /// Builds a generator with explicit warmup and decay-window parameters.
    ///
    /// # Panics
    ///
    /// Panics if `max_priority` is zero or `decay_window` is zero.
    pub fn with_params(max_priority: u32, warmup: u32, decay_window: u32) -> Self {
        assert!(max_priority > 0, "max_priority must be non-zero");
        assert!(decay_window > 0, "decay_window must be non-zero");
        RatioPriorityGenerator {
            max_priority,
            warmup,
            decay_window,
            sum: 0,
            count: 0,
        }
    }

    fn midpoint(&self) -> u32 {
        (self.max_priority / 2).max(1)
    }

    fn mean(&self) -> u64 {
        if self.count == 0 {
            0
        } else {
            self.sum / u64::from(self.count)
        }
    }
}

impl InitialPriorityGenerator for RatioPriorityGenerator {
    fn observe(&mut self, cost_micros: u64) -> u32 {
        let priority = if self.count < self.warmup {
            self.midpoint()
        } else {
            let mean = self.mean().max(1);
            let ratio = cost_micros.saturating_mul(u64::from(self.max_priority)) / (mean * 2);
            (ratio + 1).min(u64::from(self.max_priority - 1)).max(1) as u32
        };

        self.sum = self.sum.saturating_add(cost_micros);
        self.count += 1;
        if self.count >= self.decay_window {
            self.sum /= 2;
            self.count /= 2;
        }

        priority
    }
}

/// Deprecated-in-the-original min/max interpolation generator, kept for
/// comparison against [`RatioPriorityGenerator`] (§11).
///
/// Ported from
/// `initial_priority_generator.h::MinMaxInterpolationPriorityGenerator`:
/// tracks the minimum and maximum observed cost and linearly interpolates
/// the current cost between them. Degenerates to the midpoint priority
/// while `min == max` (including during warmup, when only one distinct
/// cost may have been observed).
#[derive(Debug, Clone)]
pub struct MinMaxPriorityGenerator {
    max_priority: u32,
    warmup: u32,
    decay_window: u32,
    min: u64,
    max: u64,
    count: u32,
}

impl MinMaxPriorityGenerator {
    /// Builds a generator with the given ceiling and the default warmup
    /// (100) and decay window (10240).
    pub fn new(max_priority: u32) -> Self {
        Self::with_params(
            max_priority,
            RatioPriorityGenerator::DEFAULT_WARMUP,
            RatioPriorityGenerator::DEFAULT_DECAY_WINDOW,
        )
    }

    /// Builds a generator with explicit warmup and decay-window parameters.
    ///
    /// # Panics
    ///
    /// Panics if `max_priority` is zero or `decay_window` is zero.
    pub fn with_params(max_priority: u32, warmup: u32, decay_window: u32) -> Self {
        assert!(max_priority > 0, "max_priority must be non-zero");
        assert!(decay_window > 0, "decay_window must be non-zero");
        MinMaxPriorityGenerator {
            max_priority,
            warmup,
            decay_window,
            min: u64::MAX,
            max: 0,
            count: 0,
        }
    }

    fn midpoint(&self) -> u32 {
        (self.max_priority / 2).max(1)
    }
}

impl InitialPriorityGenerator for MinMaxPriorityGenerator {
    fn observe(&mut self, cost_micros: u64) -> u32 {
        self.min = self.min.min(cost_micros);
        self.max = self.max.max(cost_micros);

        let priority = if self.count < self.warmup || self.max == self.min {
            self.midpoint()
        } else {
            let span = self.max - self.min;
            let offset = cost_micros.saturating_sub(self.min);
            ((offset.saturating_mul(u64::from(self.max_priority))) / span)
                .clamp(1, u64::from(self.max_priority)) as u32
        };

        self.count += 1;
        if self.count >= self.decay_window {
            // Forget the extremes so a workload shift isn't anchored to the
            // first decay_window observations' range forever.
            self.min = cost_micros;
            self.max = cost_micros;
            self.count = 0;
        }

        priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_generator_returns_midpoint_during_warmup() {
        let mut gen = RatioPriorityGenerator::with_params(254, 5, 10240);
        for _ in 0..5 {
            assert_eq!(gen.observe(1000), 127);
        }
    }

    #[test]
    fn ratio_generator_scores_above_average_cost_higher() {
        let mut gen = RatioPriorityGenerator::with_params(254, 0, 10240);
        for _ in 0..50 {
            gen.observe(100);
        }
        let low = gen.observe(10);
        let high = gen.observe(1000);
        assert!(high > low);
    }

    #[test]
    fn ratio_generator_never_exceeds_max_priority() {
        let mut gen = RatioPriorityGenerator::with_params(254, 0, 10240);
        gen.observe(1);
        let p = gen.observe(u64::MAX);
        assert!(p < 254, "generator output must stay strictly below max_priority");
        assert!(p >= 1);
    }

    #[test]
    fn ratio_generator_resets_window_at_decay_boundary() {
        let mut gen = RatioPriorityGenerator::with_params(254, 0, 4);
        for _ in 0..10 {
            gen.observe(50);
        }
        assert!(gen.count < 4);
    }

    #[test]
    fn min_max_generator_returns_midpoint_until_range_is_nonzero() {
        let mut gen = MinMaxPriorityGenerator::with_params(254, 0, 10240);
        assert_eq!(gen.observe(100), 127);
        assert_eq!(gen.observe(100), 127);
    }

    #[test]
    fn min_max_generator_interpolates_within_observed_range() {
        let mut gen = MinMaxPriorityGenerator::with_params(254, 0, 10240);
        gen.observe(0);
        gen.observe(100);
        let mid = gen.observe(50);
        assert!(mid > 1 && mid < 254);
    }

    #[test]
    fn min_max_generator_forgets_range_at_decay_boundary() {
        let mut gen = MinMaxPriorityGenerator::with_params(254, 0, 2);
        gen.observe(0);
        gen.observe(1000);
        gen.observe(1000);
        assert_eq!(gen.min, 1000);
        assert_eq!(gen.max, 1000);
    }
}
