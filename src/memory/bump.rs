//! Bump pool for sequential, never-individually-freed allocations
//!
//! A [`BumpPool`] reserves one block up front and hands out consecutive,
//! aligned sub-regions of it by advancing an offset. Releasing a region is a
//! no-op: memory only comes back when the whole pool is [`reset`](BumpPool::reset)
//! or dropped.
//!
//! Because `&BumpPool` implements [`StorageAlloc`], a growable sequence can
//! take its storage from a pool. Every reallocation then leaves the old region
//! behind as dead space, which makes the cost of geometric growth visible:
//!
//! ```rust
//! use memlab::{BumpPool, GrowableSeq};
//!
//! let pool = BumpPool::new(1024 * 1024)?;
//! let mut seq = GrowableSeq::<i32, _>::new_in(&pool);
//! for i in 0..10 {
//!     seq.push(i)?;
//! }
//! // Regions of 1, 2, 4, 8 and 16 ints were carved out: 31 * 4 bytes.
//! assert_eq!(pool.used_bytes(), 124);
//! # Ok::<(), memlab::MemlabError>(())
//! ```

use super::alloc::{dangling, StorageAlloc};
use crate::error::{MemlabError, Result};
use std::alloc::{alloc, dealloc, Layout};
use std::cell::Cell;
use std::ptr::NonNull;

/// Alignment of the pool's backing block.
pub const BUMP_BLOCK_ALIGN: usize = 16;

/// A pool that allocates memory sequentially from one large block
pub struct BumpPool {
    buffer: NonNull<u8>,
    layout: Layout,
    current: Cell<usize>,
    allocated_bytes: Cell<usize>,
    allocations: Cell<usize>,
    ignored_frees: Cell<usize>,
}

impl BumpPool {
    /// Create a new bump pool with the specified capacity in bytes
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(MemlabError::invalid_data("capacity cannot be zero"));
        }

        let layout = Layout::from_size_align(capacity, BUMP_BLOCK_ALIGN)
            .map_err(|_| MemlabError::invalid_data("invalid layout for bump pool"))?;

        let ptr = unsafe { alloc(layout) };
        let buffer = NonNull::new(ptr).ok_or_else(|| MemlabError::out_of_memory(capacity))?;

        log::debug!("bump pool reserved {} bytes at {:p}", capacity, buffer.as_ptr());

        Ok(Self {
            buffer,
            layout,
            current: Cell::new(0),
            allocated_bytes: Cell::new(0),
            allocations: Cell::new(0),
            ignored_frees: Cell::new(0),
        })
    }

    /// Allocate memory for an object of type T
    pub fn alloc<T>(&self) -> Result<NonNull<T>> {
        let size = std::mem::size_of::<T>();
        let align = std::mem::align_of::<T>();
        self.alloc_bytes(size, align).map(|ptr| ptr.cast())
    }

    /// Allocate a slice of objects of type T
    pub fn alloc_slice<T>(&self, count: usize) -> Result<NonNull<[T]>> {
        let size = std::mem::size_of::<T>()
            .checked_mul(count)
            .ok_or_else(|| MemlabError::out_of_memory(usize::MAX))?;
        let align = std::mem::align_of::<T>();
        let ptr = self.alloc_bytes(size, align)?;

        let slice_ptr = std::ptr::slice_from_raw_parts_mut(ptr.as_ptr() as *mut T, count);
        Ok(unsafe { NonNull::new_unchecked(slice_ptr) })
    }

    /// Allocate raw bytes with specified alignment
    pub fn alloc_bytes(&self, size: usize, align: usize) -> Result<NonNull<u8>> {
        if size == 0 {
            return Err(MemlabError::invalid_data("allocation size cannot be zero"));
        }

        if !align.is_power_of_two() {
            return Err(MemlabError::invalid_data("alignment must be a power of two"));
        }

        let aligned_offset = match self.aligned_offset(align) {
            Some(offset) => offset,
            None => return Err(self.exhausted(size)),
        };
        let new_offset = match aligned_offset.checked_add(size) {
            Some(end) if end <= self.capacity() => end,
            _ => return Err(self.exhausted(size)),
        };

        self.current.set(new_offset);
        self.allocated_bytes.set(self.allocated_bytes.get() + size);
        self.allocations.set(self.allocations.get() + 1);

        let ptr = unsafe { self.buffer.as_ptr().add(aligned_offset) };
        Ok(unsafe { NonNull::new_unchecked(ptr) })
    }

    /// Offset of the next address aligned to `align`, counted from the block start
    fn aligned_offset(&self, align: usize) -> Option<usize> {
        let base = self.buffer.as_ptr() as usize;
        let addr = base.checked_add(self.current.get())?;
        let aligned = addr.checked_add(align - 1)? & !(align - 1);
        Some(aligned - base)
    }

    fn exhausted(&self, size: usize) -> MemlabError {
        log::debug!(
            "bump pool exhausted: requested {} bytes, {} of {} used",
            size,
            self.current.get(),
            self.capacity()
        );
        MemlabError::out_of_memory(size)
    }

    /// Make all memory available again.
    ///
    /// Taking `&mut self` guarantees no container still borrows the pool.
    pub fn reset(&mut self) {
        self.current.set(0);
        self.allocated_bytes.set(0);
        self.allocations.set(0);
        self.ignored_frees.set(0);
    }

    /// Bytes consumed from the block so far, alignment padding included
    pub fn used_bytes(&self) -> usize {
        self.current.get()
    }

    /// Bytes handed out to callers, alignment padding excluded
    pub fn allocated_bytes(&self) -> usize {
        self.allocated_bytes.get()
    }

    /// Get the total capacity of the pool
    pub fn capacity(&self) -> usize {
        self.layout.size()
    }

    /// Get the number of bytes remaining
    pub fn remaining_bytes(&self) -> usize {
        self.capacity() - self.current.get()
    }

    /// Check if the pool can satisfy an allocation of the given size and alignment
    pub fn can_allocate(&self, size: usize, align: usize) -> bool {
        if !align.is_power_of_two() {
            return false;
        }
        self.aligned_offset(align)
            .and_then(|offset| offset.checked_add(size))
            .map_or(false, |end| end <= self.capacity())
    }

    /// Get allocation statistics
    pub fn stats(&self) -> BumpStats {
        BumpStats {
            allocated_bytes: self.allocated_bytes(),
            used_bytes: self.used_bytes(),
            capacity: self.capacity(),
            remaining_bytes: self.remaining_bytes(),
            allocations: self.allocations.get(),
            ignored_frees: self.ignored_frees.get(),
        }
    }
}

impl StorageAlloc for BumpPool {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>> {
        if layout.size() == 0 {
            return Ok(dangling(layout));
        }
        self.alloc_bytes(layout.size(), layout.align())
    }

    /// Individual frees are ignored; the region stays consumed until reset.
    unsafe fn deallocate(&self, _ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            self.ignored_frees.set(self.ignored_frees.get() + 1);
        }
    }
}

// The pool owns its block exclusively; the Cell counters keep it !Sync.
unsafe impl Send for BumpPool {}

impl Drop for BumpPool {
    fn drop(&mut self) {
        unsafe {
            dealloc(self.buffer.as_ptr(), self.layout);
        }
    }
}

impl std::fmt::Debug for BumpPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BumpPool")
            .field("capacity", &self.capacity())
            .field("used_bytes", &self.used_bytes())
            .field("allocations", &self.allocations.get())
            .finish()
    }
}

/// Statistics for bump pool usage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpStats {
    /// Bytes handed out to callers
    pub allocated_bytes: usize,
    /// Bytes consumed from the block, padding included
    pub used_bytes: usize,
    /// Total capacity of the pool
    pub capacity: usize,
    /// Number of bytes remaining
    pub remaining_bytes: usize,
    /// Number of successful allocations
    pub allocations: usize,
    /// Number of deallocation requests that were ignored
    pub ignored_frees: usize,
}

impl BumpStats {
    /// Get the utilization ratio (0.0 to 1.0)
    pub fn utilization(&self) -> f64 {
        self.used_bytes as f64 / self.capacity as f64
    }

    /// Check if the pool is nearly full (> 90% utilized)
    pub fn is_nearly_full(&self) -> bool {
        self.utilization() > 0.9
    }
}
