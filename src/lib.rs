//! # Memlab: Observable Growable Storage and Bit-Level Helpers
//!
//! This crate makes the memory behaviour of a growable contiguous container
//! visible and safe to experiment with.
//!
//! ## Key Features
//!
//! - **GrowableSeq**: vector-like container with a configurable geometric
//!   growth policy, explicit reallocation accounting and binding `shrink_to_fit`
//! - **Generation-tagged handles**: slot references that report
//!   [`MemlabError::StaleHandle`] instead of dangling after a reallocation,
//!   shifting insert or removal
//! - **Pluggable storage**: the system heap or a non-reclaiming [`BumpPool`]
//! - **Observation harness**: growth traces and invalidation probes
//! - **Bits**: single-bit and packed-field helpers plus typed render flags
//! - **Maps**: ordered vs hashed insertion timing
//!
//! ## Quick Start
//!
//! ```rust
//! use memlab::{BumpPool, GrowableSeq, GrowthPolicy};
//! use memlab::harness::trace_appends;
//!
//! // Growth is observable
//! let trace = trace_appends(64, GrowthPolicy::DOUBLING)?;
//! assert_eq!(trace.capacities(), vec![1, 2, 4, 8, 16, 32, 64]);
//!
//! // Handles detect invalidation
//! let mut seq = GrowableSeq::with_capacity(2)?;
//! seq.push(1)?;
//! seq.push(2)?;
//! let first = seq.handle(0)?;
//! seq.push(3)?;
//! assert!(seq.resolve(&first).is_err());
//!
//! // Storage can come from a bump pool
//! let pool = BumpPool::new(1024)?;
//! let mut pooled = GrowableSeq::new_in(&pool);
//! for i in 0..10 {
//!     pooled.push(i)?;
//! }
//! assert_eq!(pool.used_bytes(), 124);
//! # Ok::<(), memlab::MemlabError>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod bits;
pub mod config;
pub mod containers;
pub mod error;
pub mod harness;
pub mod maps;
pub mod math;
pub mod memory;

// Re-export core types
pub use config::{Config, GrowthConfig, ValidationError};
pub use containers::{GrowableSeq, GrowthPolicy, SeqHandle};
pub use error::{MemlabError, Result};
pub use memory::{BumpPool, BumpStats, Global, StorageAlloc};

pub use bits::{BitField, RenderFlags};
pub use harness::{GrowthEvent, GrowthObserver, GrowthTrace, InvalidationProbe, ProbeReport};
pub use maps::{compare_map_inserts, MapComparison, MapKind, MapTiming};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library (currently only logs the version)
pub fn init() {
    log::debug!("Initializing memlab v{}", VERSION);
}
