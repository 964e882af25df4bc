//! Storage allocators for growable containers
//!
//! A [`GrowableSeq`](crate::containers::GrowableSeq) does not talk to the
//! global allocator directly. It asks a [`StorageAlloc`] for raw regions,
//! which lets the same container run on the system heap ([`Global`]) or
//! inside a [`BumpPool`](super::BumpPool).

use crate::error::{MemlabError, Result};
use std::alloc::{self, Layout};
use std::mem;
use std::ptr::NonNull;

/// Source of raw storage regions for containers.
pub trait StorageAlloc {
    /// Allocate a region described by `layout`.
    ///
    /// Zero-sized layouts must succeed and return a dangling pointer aligned
    /// to `layout.align()`.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>>;

    /// Release a region previously returned by [`allocate`](Self::allocate).
    ///
    /// # Safety
    ///
    /// `ptr` must come from `self.allocate(layout)` with the same `layout`,
    /// and must not be used after this call.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

impl<A: StorageAlloc + ?Sized> StorageAlloc for &A {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>> {
        (**self).allocate(layout)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { (**self).deallocate(ptr, layout) }
    }
}

/// The system allocator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Global;

impl StorageAlloc for Global {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>> {
        if layout.size() == 0 {
            return Ok(dangling(layout));
        }

        let ptr = unsafe { alloc::alloc(layout) };
        NonNull::new(ptr).ok_or_else(|| MemlabError::out_of_memory(layout.size()))
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
        }
    }
}

/// Aligned, non-null pointer that must never be dereferenced as more than
/// zero bytes.
#[inline]
pub(crate) fn dangling(layout: Layout) -> NonNull<u8> {
    // Alignment is always a non-zero power of two.
    unsafe { NonNull::new_unchecked(layout.align() as *mut u8) }
}

/// Layout of `count` contiguous values of `T`, reporting overflow as an
/// allocation failure.
#[inline]
pub fn array_layout<T>(count: usize) -> Result<Layout> {
    Layout::array::<T>(count)
        .map_err(|_| MemlabError::out_of_memory(count.saturating_mul(mem::size_of::<T>())))
}
