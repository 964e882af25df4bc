//! Capacity growth policy
//!
//! When a full sequence needs one more slot it asks its [`GrowthPolicy`] for
//! the next capacity. The policy is geometric:
//!
//! ```text
//! next(c) = max(min_capacity, c + max(1, ceil(c * (factor - 1))))
//! ```
//!
//! With `factor >= 1.5` the total number of element relocations performed by
//! `N` consecutive pushes is bounded by `N / (factor - 1)`, i.e. push is
//! amortized O(1), and the number of reallocations is O(log N).

use crate::config::growth::{MAX_GROWTH_FACTOR, MIN_GROWTH_FACTOR};
use crate::config::{Config, GrowthConfig};
use crate::error::{MemlabError, Result};

/// Deterministic, strictly increasing capacity growth policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthPolicy {
    factor: f64,
    min_capacity: usize,
}

impl GrowthPolicy {
    /// Doubling from a single slot: 1, 2, 4, 8, ...
    pub const DOUBLING: Self = Self {
        factor: 2.0,
        min_capacity: 1,
    };

    /// Grow by half the current capacity: 1, 2, 3, 5, 8, 12, ...
    pub const ONE_AND_A_HALF: Self = Self {
        factor: 1.5,
        min_capacity: 1,
    };

    /// Create a policy, validating the factor and first capacity.
    pub fn new(factor: f64, min_capacity: usize) -> Result<Self> {
        if !(MIN_GROWTH_FACTOR..=MAX_GROWTH_FACTOR).contains(&factor) {
            return Err(MemlabError::configuration(format!(
                "growth factor {} outside [{}, {}]",
                factor, MIN_GROWTH_FACTOR, MAX_GROWTH_FACTOR
            )));
        }
        if min_capacity == 0 {
            return Err(MemlabError::configuration("min_capacity must be at least 1"));
        }
        Ok(Self {
            factor,
            min_capacity,
        })
    }

    /// Build a policy from a validated [`GrowthConfig`].
    pub fn from_config(config: &GrowthConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.growth_factor, config.min_capacity)
    }

    /// Multiplicative growth factor
    #[inline]
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Capacity of the first allocation
    #[inline]
    pub fn min_capacity(&self) -> usize {
        self.min_capacity
    }

    /// Capacity that follows `current` when a full sequence grows.
    ///
    /// Always strictly greater than `current` (saturating at `usize::MAX`).
    pub fn next_capacity(&self, current: usize) -> usize {
        let extra = ((current as f64) * (self.factor - 1.0)).ceil() as usize;
        let grown = current.saturating_add(extra.max(1));
        grown.max(self.min_capacity)
    }

    /// Capacity to acquire when at least `required` slots are needed and the
    /// current capacity is `current`.
    #[inline]
    pub fn target_capacity(&self, current: usize, required: usize) -> usize {
        required.max(self.next_capacity(current))
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::DOUBLING
    }
}
