//! GrowableSeq: growable contiguous sequence with observable reallocation
//!
//! `GrowableSeq<T, A>` stores its elements in one contiguous region obtained
//! from a [`StorageAlloc`]. It keeps the usual vector invariants:
//!
//! - `len() <= capacity()` at all times;
//! - live elements occupy `storage[0..len)` in insertion order;
//! - pushing onto a full sequence acquires a new region of
//!   [`GrowthPolicy::next_capacity`] slots, relocates every element into it and
//!   releases the old region, so [`data_address`](GrowableSeq::data_address)
//!   changes. Growth never happens in place.
//!
//! On top of that it makes invalidation *observable*. Every mutation that
//! moves or destroys elements advances an internal generation counter, and
//! [`SeqHandle`]s taken earlier are detected as stale when resolved:
//!
//! | mutation | handles made stale |
//! |---|---|
//! | any reallocation (`push`, `insert_at`, `reserve`, `resize`, `shrink_to_fit`) | all |
//! | `insert_at(i, _)` without reallocation | slots `i..` |
//! | `remove(i)` | slots `i..` |
//! | `pop`, `truncate`, `clear`, shrinking `resize` | the removed slots |
//! | `as_mut_slice` | all (the caller may reorder) |
//!
//! Handles are tied to the sequence that issued them; resolving one against
//! any other sequence reports it as stale.
//!
//! `shrink_to_fit` is binding: it always reallocates to exactly `len()` slots
//! (or releases the storage when empty).
//!
//! # Examples
//!
//! ```rust
//! use memlab::GrowableSeq;
//!
//! let mut seq = GrowableSeq::new();
//! seq.reserve(8)?;
//! for i in 0..8 {
//!     seq.push(i)?;
//! }
//!
//! let third = seq.handle(3)?;
//! assert_eq!(*seq.resolve(&third)?, 3);
//!
//! // Full: inserting reallocates and shifts, so the handle is now stale.
//! seq.insert_at(2, 999)?;
//! assert!(seq.capacity() > 8);
//! assert!(seq.resolve(&third).is_err());
//! # Ok::<(), memlab::MemlabError>(())
//! ```

use super::growth::GrowthPolicy;
use super::handle::SeqHandle;
use crate::config::GrowthConfig;
use crate::error::{check_bounds, MemlabError, Result};
use crate::memory::{array_layout, Global, StorageAlloc};
use std::alloc::Layout;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, Index, IndexMut};
use std::ptr::{self, NonNull};
use std::slice;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SEQ_ID: AtomicU64 = AtomicU64::new(1);

/// Growable contiguous sequence with generation-tagged invalidation tracking.
///
/// Element access through [`get`](Self::get) / [`get_mut`](Self::get_mut) is
/// bounds-checked and returns [`MemlabError::OutOfBounds`]. The `Index`
/// operator panics on an out-of-range index, like slice indexing.
pub struct GrowableSeq<T, A: StorageAlloc = Global> {
    id: u64,
    ptr: Option<NonNull<T>>,
    len: usize,
    cap: usize,
    alloc: A,
    policy: GrowthPolicy,
    generation: u64,
    epoch: u64,
    stamps: Vec<u64>,
    reallocations: usize,
    _marker: PhantomData<T>,
}

impl<T> GrowableSeq<T> {
    /// Create an empty sequence on the system allocator. Nothing is allocated.
    #[inline]
    pub fn new() -> Self {
        Self::new_in(Global)
    }

    /// Create an empty sequence with a custom growth policy
    #[inline]
    pub fn with_policy(policy: GrowthPolicy) -> Self {
        Self::with_policy_in(policy, Global)
    }

    /// Create a sequence with exactly `cap` slots reserved
    pub fn with_capacity(cap: usize) -> Result<Self> {
        Self::with_capacity_in(cap, Global)
    }

    /// Create a sequence whose policy and initial capacity come from `config`
    pub fn from_config(config: &GrowthConfig) -> Result<Self> {
        let mut seq = Self::with_policy(GrowthPolicy::from_config(config)?);
        seq.reserve(config.initial_capacity)?;
        Ok(seq)
    }

    /// Create a sequence holding clones of `items`, with capacity `items.len()`
    pub fn from_slice(items: &[T]) -> Result<Self>
    where
        T: Clone,
    {
        let mut seq = Self::with_capacity(items.len())?;
        seq.extend_from_slice(items)?;
        Ok(seq)
    }
}

impl<T, A: StorageAlloc> GrowableSeq<T, A> {
    /// Create an empty sequence that takes its storage from `alloc`
    #[inline]
    pub fn new_in(alloc: A) -> Self {
        Self::with_policy_in(GrowthPolicy::default(), alloc)
    }

    /// Create an empty sequence with a custom policy and allocator
    pub fn with_policy_in(policy: GrowthPolicy, alloc: A) -> Self {
        Self {
            id: NEXT_SEQ_ID.fetch_add(1, Ordering::Relaxed),
            ptr: None,
            len: 0,
            cap: 0,
            alloc,
            policy,
            generation: 0,
            epoch: 0,
            stamps: Vec::new(),
            reallocations: 0,
            _marker: PhantomData,
        }
    }

    /// Create a sequence with exactly `cap` slots reserved from `alloc`
    pub fn with_capacity_in(cap: usize, alloc: A) -> Result<Self> {
        let mut seq = Self::new_in(alloc);
        seq.reserve(cap)?;
        Ok(seq)
    }

    /// Get the number of elements in the sequence
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the sequence is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the number of allocated slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Address of the backing storage, or 0 while none is held.
    ///
    /// Only meant for observing relocation; compare successive values, never
    /// turn it back into a pointer.
    #[inline]
    pub fn data_address(&self) -> usize {
        self.ptr.map_or(0, |p| p.as_ptr() as usize)
    }

    /// Current generation. Advances on every invalidating mutation.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of times the storage region was replaced by a new one
    #[inline]
    pub fn reallocations(&self) -> usize {
        self.reallocations
    }

    /// Growth policy in effect
    #[inline]
    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// Replace the growth policy. Takes effect at the next growth.
    pub fn set_policy(&mut self, policy: GrowthPolicy) {
        self.policy = policy;
    }

    /// Storage allocator backing this sequence
    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Get a pointer to the underlying data, null while no storage is held
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        match self.ptr {
            Some(ptr) => ptr.as_ptr(),
            None => ptr::null(),
        }
    }

    #[inline]
    fn as_mut_ptr(&mut self) -> *mut T {
        match self.ptr {
            Some(ptr) => ptr.as_ptr(),
            None => ptr::null_mut(),
        }
    }

    /// Get the sequence as a slice
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        match self.ptr {
            Some(ptr) => unsafe { slice::from_raw_parts(ptr.as_ptr(), self.len) },
            None => &[],
        }
    }

    /// Get the sequence as a mutable slice.
    ///
    /// Slice methods such as `sort` or `rotate_left` can move elements between
    /// slots, so every outstanding handle becomes stale. Use
    /// [`get_mut`](Self::get_mut) or `IndexMut` to write single slots without
    /// invalidating.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.invalidate_all();
        match self.ptr {
            Some(ptr) => unsafe { slice::from_raw_parts_mut(ptr.as_ptr(), self.len) },
            None => &mut [],
        }
    }

    /// Bounds-checked element access
    pub fn get(&self, index: usize) -> Result<&T> {
        check_bounds(index, self.len)?;
        Ok(unsafe { &*self.as_ptr().add(index) })
    }

    /// Bounds-checked mutable element access
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        check_bounds(index, self.len)?;
        Ok(unsafe { &mut *self.as_mut_ptr().add(index) })
    }

    /// Append `value`, reallocating first when the sequence is full.
    ///
    /// Reallocation makes every outstanding handle stale. On allocation
    /// failure the sequence is left unchanged and `value` is dropped.
    pub fn push(&mut self, value: T) -> Result<()> {
        if self.len == self.cap {
            let required = self
                .len
                .checked_add(1)
                .ok_or_else(|| MemlabError::out_of_memory(usize::MAX))?;
            self.grow_for(required)?;
        }

        unsafe {
            ptr::write(self.as_mut_ptr().add(self.len), value);
        }
        self.len += 1;
        Ok(())
    }

    /// Append the value produced by `make`, which runs only after room for it
    /// has been secured.
    ///
    /// If growth fails, `make` is never called.
    pub fn push_with<F>(&mut self, make: F) -> Result<()>
    where
        F: FnOnce() -> T,
    {
        if self.len == self.cap {
            let required = self
                .len
                .checked_add(1)
                .ok_or_else(|| MemlabError::out_of_memory(usize::MAX))?;
            self.grow_for(required)?;
        }

        unsafe {
            ptr::write(self.as_mut_ptr().add(self.len), make());
        }
        self.len += 1;
        Ok(())
    }

    /// Remove and return the last element
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;
        let value = unsafe { ptr::read(self.as_ptr().add(self.len)) };
        self.invalidate_slots(self.len, self.len + 1);
        Some(value)
    }

    /// Ensure `capacity() >= min_cap` without touching the elements.
    ///
    /// Grows to exactly `min_cap` (the growth policy is not applied) and never
    /// shrinks.
    pub fn reserve(&mut self, min_cap: usize) -> Result<()> {
        if min_cap <= self.cap {
            return Ok(());
        }
        self.relocate(min_cap)
    }

    /// Ensure room for `additional` more elements, growing by the policy.
    pub fn reserve_additional(&mut self, additional: usize) -> Result<()> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or_else(|| MemlabError::out_of_memory(usize::MAX))?;

        if required <= self.cap {
            return Ok(());
        }
        self.grow_for(required)
    }

    /// Resize to `new_len`, filling new slots with `T::default()`.
    ///
    /// Growing past the capacity reallocates through the growth policy (the
    /// result holds at least `new_len`). Shrinking drops the tail and keeps
    /// the capacity.
    pub fn resize(&mut self, new_len: usize) -> Result<()>
    where
        T: Default,
    {
        self.resize_with(new_len, T::default)
    }

    /// Resize to `new_len`, filling new slots with values produced by `f`
    pub fn resize_with<F>(&mut self, new_len: usize, mut f: F) -> Result<()>
    where
        F: FnMut() -> T,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }

        if new_len > self.cap {
            self.grow_for(new_len)?;
        }

        while self.len < new_len {
            unsafe {
                ptr::write(self.as_mut_ptr().add(self.len), f());
            }
            self.len += 1;
        }
        Ok(())
    }

    /// Insert `value` at `index`, shifting `index..` one slot to the right.
    ///
    /// `index == len()` appends. Handles to the shifted slots become stale even
    /// when no reallocation happens; handles before `index` survive unless the
    /// sequence was full and had to grow.
    pub fn insert_at(&mut self, index: usize, value: T) -> Result<()> {
        if index > self.len {
            return Err(MemlabError::out_of_bounds(index, self.len));
        }

        if self.len == self.cap {
            let required = self
                .len
                .checked_add(1)
                .ok_or_else(|| MemlabError::out_of_memory(usize::MAX))?;
            self.grow_for(required)?;
        }

        unsafe {
            let slot = self.as_mut_ptr().add(index);
            ptr::copy(slot, slot.add(1), self.len - index);
            ptr::write(slot, value);
        }

        if index < self.len {
            self.invalidate_slots(index, self.len);
        }
        self.len += 1;
        Ok(())
    }

    /// Remove and return the element at `index`, shifting the tail left
    pub fn remove(&mut self, index: usize) -> Result<T> {
        check_bounds(index, self.len)?;

        let old_len = self.len;
        let value = unsafe {
            let slot = self.as_mut_ptr().add(index);
            let value = ptr::read(slot);
            ptr::copy(slot.add(1), slot, old_len - index - 1);
            value
        };
        self.len -= 1;
        self.invalidate_slots(index, old_len);
        Ok(value)
    }

    /// Drop every element past `new_len`. Capacity is unchanged.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }

        let old_len = self.len;
        self.len = new_len;
        self.invalidate_slots(new_len, old_len);
        unsafe {
            let tail = ptr::slice_from_raw_parts_mut(self.as_mut_ptr().add(new_len), old_len - new_len);
            ptr::drop_in_place(tail);
        }
    }

    /// Clear all elements. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Reallocate to exactly `len()` slots.
    ///
    /// This implementation always honours the request: an empty sequence
    /// releases its storage, a non-empty one moves into a region of `len()`
    /// slots. Either way every handle becomes stale.
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        if self.cap == self.len {
            return Ok(());
        }

        if self.len == 0 {
            if let Some(old) = self.ptr.take() {
                unsafe { self.release(old, self.cap) };
            }
            log::debug!("released storage of {} slots", self.cap);
            self.cap = 0;
            self.invalidate_all();
            return Ok(());
        }

        self.relocate(self.len)
    }

    /// Append clones of every element of `items`
    pub fn extend_from_slice(&mut self, items: &[T]) -> Result<()>
    where
        T: Clone,
    {
        self.reserve_additional(items.len())?;

        for item in items {
            unsafe {
                ptr::write(self.as_mut_ptr().add(self.len), item.clone());
            }
            self.len += 1;
        }
        Ok(())
    }

    /// Copy into a new sequence with the same policy, sized exactly to `len()`
    pub fn try_clone(&self) -> Result<Self>
    where
        T: Clone,
        A: Clone,
    {
        let mut out = Self::with_policy_in(self.policy, self.alloc.clone());
        out.reserve(self.len)?;
        out.extend_from_slice(self.as_slice())?;
        Ok(out)
    }

    /// Take a handle to the element at `index`
    pub fn handle(&mut self, index: usize) -> Result<SeqHandle> {
        check_bounds(index, self.len)?;

        if self.stamps.len() <= index {
            self.stamps.resize(index + 1, 0);
        }

        Ok(SeqHandle {
            owner: self.id,
            index,
            generation: self.generation,
            epoch: self.epoch,
            stamp: self.stamps[index],
        })
    }

    /// Check whether `handle` still refers to the element it was taken for
    pub fn is_valid(&self, handle: &SeqHandle) -> bool {
        handle.owner == self.id
            && handle.epoch == self.epoch
            && handle.index < self.len
            && self.stamps.get(handle.index).copied().unwrap_or(0) == handle.stamp
    }

    /// Resolve a handle, failing with [`MemlabError::StaleHandle`] if the slot
    /// was moved or destroyed since the handle was taken
    pub fn resolve(&self, handle: &SeqHandle) -> Result<&T> {
        self.check_handle(handle)?;
        Ok(unsafe { &*self.as_ptr().add(handle.index) })
    }

    /// Mutable variant of [`resolve`](Self::resolve)
    pub fn resolve_mut(&mut self, handle: &SeqHandle) -> Result<&mut T> {
        self.check_handle(handle)?;
        Ok(unsafe { &mut *self.as_mut_ptr().add(handle.index) })
    }

    fn check_handle(&self, handle: &SeqHandle) -> Result<()> {
        if self.is_valid(handle) {
            return Ok(());
        }

        log::warn!(
            "stale handle to slot {} (taken at generation {}, now {})",
            handle.index,
            handle.generation,
            self.generation
        );
        Err(MemlabError::stale_handle(
            handle.index,
            handle.generation,
            self.generation,
        ))
    }

    fn grow_for(&mut self, required: usize) -> Result<()> {
        let target = self.policy.target_capacity(self.cap, required);
        self.relocate(target)
    }

    /// Move the elements into a fresh region of `new_cap` slots.
    ///
    /// The new region is acquired before anything is touched, so a failed
    /// allocation leaves the sequence as it was.
    fn relocate(&mut self, new_cap: usize) -> Result<()> {
        debug_assert!(new_cap >= self.len);

        let new_layout = array_layout::<T>(new_cap)?;
        let new_ptr = self.alloc.allocate(new_layout)?.cast::<T>();

        let old_address = self.data_address();
        let old_cap = self.cap;
        if let Some(old) = self.ptr.take() {
            unsafe {
                ptr::copy_nonoverlapping(old.as_ptr(), new_ptr.as_ptr(), self.len);
                self.release(old, old_cap);
            }
        }

        self.ptr = Some(new_ptr);
        self.cap = new_cap;
        self.reallocations += 1;
        self.invalidate_all();

        log::debug!(
            "relocated {} elements: capacity {} -> {}, storage {:#x} -> {:#x}",
            self.len,
            old_cap,
            new_cap,
            old_address,
            self.data_address()
        );
        Ok(())
    }

    /// # Safety
    ///
    /// `ptr` must be the current or former storage of this sequence, allocated
    /// with `cap` slots, and must not be used afterwards.
    unsafe fn release(&self, ptr: NonNull<T>, cap: usize) {
        if let Ok(layout) = Layout::array::<T>(cap) {
            unsafe { self.alloc.deallocate(ptr.cast(), layout) }
        }
    }

    fn invalidate_all(&mut self) {
        self.generation += 1;
        self.epoch = self.generation;
    }

    fn invalidate_slots(&mut self, start: usize, end: usize) {
        self.generation += 1;
        let end = end.min(self.stamps.len());
        if start < end {
            let generation = self.generation;
            self.stamps[start..end].iter_mut().for_each(|s| *s = generation);
        }
    }
}

impl<T> Default for GrowableSeq<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: StorageAlloc> Drop for GrowableSeq<T, A> {
    fn drop(&mut self) {
        if let Some(ptr) = self.ptr {
            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(ptr.as_ptr(), self.len));
                self.release(ptr, self.cap);
            }
        }
    }
}

impl<T, A: StorageAlloc> Deref for GrowableSeq<T, A> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, A: StorageAlloc> Index<usize> for GrowableSeq<T, A> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<T, A: StorageAlloc> IndexMut<usize> for GrowableSeq<T, A> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        let len = self.len;
        assert!(index < len, "index out of bounds: the len is {} but the index is {}", len, index);
        unsafe { &mut *self.as_mut_ptr().add(index) }
    }
}

impl<'a, T, A: StorageAlloc> IntoIterator for &'a GrowableSeq<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<T: fmt::Debug, A: StorageAlloc> fmt::Debug for GrowableSeq<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: PartialEq, A: StorageAlloc, B: StorageAlloc> PartialEq<GrowableSeq<T, B>> for GrowableSeq<T, A> {
    fn eq(&self, other: &GrowableSeq<T, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: StorageAlloc> Eq for GrowableSeq<T, A> {}

// Safety: the sequence owns its elements and its storage region exclusively.
unsafe impl<T: Send, A: StorageAlloc + Send> Send for GrowableSeq<T, A> {}

// Safety: shared access only hands out shared references to elements.
unsafe impl<T: Sync, A: StorageAlloc + Sync> Sync for GrowableSeq<T, A> {}
