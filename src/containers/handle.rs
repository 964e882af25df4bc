//! Generation-tagged handles into a [`GrowableSeq`](super::GrowableSeq)
//!
//! A handle is what a raw `&v[i]` pointer would be in a language without a
//! borrow checker: it names a slot and outlives mutations of the container.
//! Unlike a raw pointer, using it after the slot was moved or destroyed is
//! detected and reported as [`MemlabError::StaleHandle`](crate::MemlabError::StaleHandle).
//! A handle also remembers which sequence issued it and is stale everywhere else.

/// Copyable reference to one slot of one container at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeqHandle {
    pub(super) owner: u64,
    pub(super) index: usize,
    pub(super) generation: u64,
    pub(super) epoch: u64,
    pub(super) stamp: u64,
}

impl SeqHandle {
    /// Slot index the handle refers to
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Container generation when the handle was taken
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
