//! Configuration APIs for memlab
//!
//! Configuration types implement the [`Config`] trait, which provides
//! validation, environment initialization, presets and JSON file persistence.
//!
//! # Builder Patterns
//!
//! ```rust
//! use memlab::config::GrowthConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GrowthConfig::builder()
//!     .growth_factor(1.5)
//!     .min_capacity(4)
//!     .build()?;
//! assert_eq!(config.min_capacity, 4);
//! # Ok(())
//! # }
//! ```
//!
//! # Environment Initialization
//!
//! ```rust
//! use memlab::config::{Config, GrowthConfig};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Reads MEMLAB_GROWTH_FACTOR, MEMLAB_GROWTH_MIN_CAPACITY, ...
//! let config = GrowthConfig::from_env()?;
//!
//! // Same keys with a custom prefix
//! let config = GrowthConfig::from_env_with_prefix("MYAPP_")?;
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use std::env;
use std::fmt;
use std::path::Path;

pub mod growth;


pub use growth::GrowthConfig;

/// Common configuration trait providing validation, environment initialization,
/// and preset management functionality.
pub trait Config: Clone + fmt::Debug {
    /// Validate the configuration for correctness and consistency.
    fn validate(&self) -> Result<()>;

    /// Initialize configuration from environment variables.
    ///
    /// Environment variables use the format `MEMLAB_{COMPONENT}_{FIELD}`,
    /// for example `MEMLAB_GROWTH_FACTOR=1.5`.
    fn from_env() -> Result<Self>
    where
        Self: Default,
    {
        Self::from_env_with_prefix("MEMLAB_")
    }

    /// Initialize configuration from environment variables with a custom prefix.
    fn from_env_with_prefix(prefix: &str) -> Result<Self>
    where
        Self: Default;

    /// Preset favoring fewer reallocations over memory footprint.
    fn performance_preset() -> Self;

    /// Preset favoring a small memory footprint over reallocation count.
    fn memory_preset() -> Self;

    /// Preset with predictable behavior: storage is sized up front.
    fn realtime_preset() -> Self;

    /// Balanced preset, the default configuration.
    fn balanced_preset() -> Self
    where
        Self: Default,
    {
        Self::default()
    }

    /// Save configuration to a JSON file.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    /// Load and validate configuration from a JSON file.
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self>;
}

/// Configuration validation error details.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// The invalid value
    pub value: String,
    /// Description of why the value is invalid
    pub reason: String,
    /// Suggested valid values or ranges
    pub suggestion: Option<String>,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(field: &str, value: &str, reason: &str) -> Self {
        Self {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
            suggestion: None,
        }
    }

    /// Add a suggestion for valid values.
    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid configuration for field '{}': value '{}' is invalid ({})",
            self.field, self.value, self.reason
        )?;

        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". Suggested values: {}", suggestion)?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Parse an environment variable, falling back to `default` when it is unset
/// or does not parse.
pub fn parse_env_var<T>(var_name: &str, default: T) -> T
where
    T: std::str::FromStr + Clone,
{
    env::var(var_name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Parse a boolean environment variable.
///
/// Accepts "true", "1", "yes", "on" (case-insensitive) as true,
/// everything else as false.
pub fn parse_env_bool(var_name: &str, default: bool) -> bool {
    env::var(var_name)
        .ok()
        .map(|s| {
            let s = s.to_lowercase();
            matches!(s.as_str(), "true" | "1" | "yes" | "on")
        })
        .unwrap_or(default)
}
