//! Memory management utilities and allocators
//!
//! Containers obtain storage through the [`StorageAlloc`] trait. Two sources
//! are provided: the system heap ([`Global`]) and a non-reclaiming
//! [`BumpPool`].

pub mod alloc;
pub mod bump;

pub use alloc::{array_layout, Global, StorageAlloc};
pub use bump::{BumpPool, BumpStats, BUMP_BLOCK_ALIGN};
