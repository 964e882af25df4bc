//! Growth configuration for growable sequences and bump pools.

use super::{parse_env_var, Config, ValidationError};
use crate::error::{MemlabError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Smallest growth factor that still keeps append amortized O(1) with a
/// reasonable constant.
pub const MIN_GROWTH_FACTOR: f64 = 1.5;

/// Largest accepted growth factor.
pub const MAX_GROWTH_FACTOR: f64 = 4.0;

/// Default size of a [`BumpPool`](crate::memory::BumpPool) block (1 MiB).
pub const DEFAULT_POOL_SIZE: usize = 1024 * 1024;

/// Settings that drive capacity growth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthConfig {
    /// Multiplicative growth factor applied when a full sequence grows (1.5-4.0)
    pub growth_factor: f64,

    /// Capacity of the first storage region acquired by an empty sequence
    pub min_capacity: usize,

    /// Capacity reserved when a sequence is created (0 = allocate lazily)
    pub initial_capacity: usize,

    /// Size in bytes of bump pool blocks
    pub pool_size: usize,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            growth_factor: 2.0,
            min_capacity: 1,
            initial_capacity: 0,
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

impl Config for GrowthConfig {
    fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if !(MIN_GROWTH_FACTOR..=MAX_GROWTH_FACTOR).contains(&self.growth_factor) {
            errors.push(
                ValidationError::new(
                    "growth_factor",
                    &self.growth_factor.to_string(),
                    "growth factor must be between 1.5 and 4.0",
                )
                .with_suggestion("typical values: 1.5, 2.0"),
            );
        }

        if self.min_capacity == 0 {
            errors.push(
                ValidationError::new(
                    "min_capacity",
                    &self.min_capacity.to_string(),
                    "first allocation must hold at least one element",
                )
                .with_suggestion("typical values: 1, 4, 8"),
            );
        }

        if self.pool_size == 0 {
            errors.push(ValidationError::new(
                "pool_size",
                &self.pool_size.to_string(),
                "pool size must be greater than 0",
            ));
        }

        if !errors.is_empty() {
            return Err(MemlabError::configuration(format!(
                "Growth configuration validation failed: {}",
                errors
                    .into_iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; ")
            )));
        }

        Ok(())
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let mut config = Self::default();

        config.growth_factor = parse_env_var(&format!("{}GROWTH_FACTOR", prefix), config.growth_factor);
        config.min_capacity = parse_env_var(&format!("{}GROWTH_MIN_CAPACITY", prefix), config.min_capacity);
        config.initial_capacity =
            parse_env_var(&format!("{}GROWTH_INITIAL_CAPACITY", prefix), config.initial_capacity);
        config.pool_size = parse_env_var(&format!("{}GROWTH_POOL_SIZE", prefix), config.pool_size);

        config.validate()?;
        Ok(config)
    }

    fn performance_preset() -> Self {
        Self {
            growth_factor: 2.0,
            min_capacity: 8,
            initial_capacity: 64,
            pool_size: 16 * DEFAULT_POOL_SIZE,
        }
    }

    fn memory_preset() -> Self {
        Self {
            growth_factor: MIN_GROWTH_FACTOR,
            min_capacity: 1,
            initial_capacity: 0,
            pool_size: 64 * 1024,
        }
    }

    fn realtime_preset() -> Self {
        // Storage sized up front so steady-state pushes never reallocate.
        Self {
            growth_factor: 2.0,
            min_capacity: 16,
            initial_capacity: 4096,
            pool_size: 4 * DEFAULT_POOL_SIZE,
        }
    }

    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)
            .map_err(|e| MemlabError::configuration(format!("Failed to serialize growth config: {}", e)))?;

        std::fs::write(path, serialized)
            .map_err(|e| MemlabError::configuration(format!("Failed to write growth config file: {}", e)))?;

        Ok(())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MemlabError::configuration(format!("Failed to read growth config file: {}", e)))?;

        let config: Self = serde_json::from_str(&content)
            .map_err(|e| MemlabError::configuration(format!("Failed to parse growth config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }
}

impl GrowthConfig {
    /// Create a new growth configuration builder.
    pub fn builder() -> GrowthConfigBuilder {
        GrowthConfigBuilder::new()
    }
}

/// Builder for constructing growth configurations.
#[derive(Debug, Clone)]
pub struct GrowthConfigBuilder {
    config: GrowthConfig,
}

impl GrowthConfigBuilder {
    /// Create a new builder starting from the default configuration.
    pub fn new() -> Self {
        Self {
            config: GrowthConfig::default(),
        }
    }

    /// Set the growth factor.
    pub fn growth_factor(mut self, factor: f64) -> Self {
        self.config.growth_factor = factor;
        self
    }

    /// Set the capacity of the first allocation.
    pub fn min_capacity(mut self, capacity: usize) -> Self {
        self.config.min_capacity = capacity;
        self
    }

    /// Set the capacity reserved at construction.
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_capacity = capacity;
        self
    }

    /// Set the bump pool block size.
    pub fn pool_size(mut self, size: usize) -> Self {
        self.config.pool_size = size;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<GrowthConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for GrowthConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
