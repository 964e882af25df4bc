//! Container types
//!
//! - **`GrowableSeq<T, A>`** - growable contiguous sequence over a pluggable
//!   [`StorageAlloc`](crate::memory::StorageAlloc), with observable reallocation
//! - **`GrowthPolicy`** - geometric capacity growth used by `GrowableSeq`
//! - **`SeqHandle`** - generation-tagged slot reference that detects invalidation

mod growable;
mod growth;
mod handle;

pub use growable::GrowableSeq;
pub use growth::GrowthPolicy;
pub use handle::SeqHandle;
