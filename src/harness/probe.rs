//! Handle survival across a single insert

use crate::containers::GrowableSeq;
use crate::error::{MemlabError, Result};
use std::fmt;

/// Replays "take a reference, insert, look again" against a sequence.
///
/// The sequence is reserved to `capacity + spare` slots and filled with
/// `0..capacity`, a handle is taken at `probe_index`, then `value` is
/// inserted at `insert_index`. With `spare == 0` the insert has to grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidationProbe {
    /// Number of elements to fill before inserting
    pub capacity: usize,
    /// Extra slots reserved beyond `capacity`
    pub spare: usize,
    /// Slot the handle is taken at
    pub probe_index: usize,
    /// Position of the insert
    pub insert_index: usize,
    /// Inserted value
    pub value: i64,
}

/// Outcome of an [`InvalidationProbe`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReport {
    /// Element seen through the handle before the insert
    pub value_before: i64,
    /// Capacity before the insert
    pub capacity_before: usize,
    /// Capacity after the insert
    pub capacity_after: usize,
    /// Whether the insert moved the storage
    pub reallocated: bool,
    /// Whether the handle still resolves after the insert
    pub handle_valid_after: bool,
    /// Element seen through the handle after the insert, if it still resolves
    pub value_after: Option<i64>,
}

impl InvalidationProbe {
    /// Probe a full sequence of `capacity` elements
    pub fn new(capacity: usize, probe_index: usize, insert_index: usize, value: i64) -> Self {
        Self {
            capacity,
            spare: 0,
            probe_index,
            insert_index,
            value,
        }
    }

    /// Leave `spare` free slots so the insert does not have to grow
    pub fn with_spare(mut self, spare: usize) -> Self {
        self.spare = spare;
        self
    }

    /// Run the probe
    pub fn run(&self) -> Result<ProbeReport> {
        let reserved = self
            .capacity
            .checked_add(self.spare)
            .ok_or_else(|| MemlabError::out_of_memory(usize::MAX))?;

        let mut seq = GrowableSeq::new();
        seq.reserve(reserved)?;
        for i in 0..self.capacity {
            seq.push(i as i64)?;
        }

        let handle = seq.handle(self.probe_index)?;
        let value_before = *seq.resolve(&handle)?;
        let capacity_before = seq.capacity();
        let address_before = seq.data_address();

        seq.insert_at(self.insert_index, self.value)?;

        let value_after = seq.resolve(&handle).ok().copied();
        let report = ProbeReport {
            value_before,
            capacity_before,
            capacity_after: seq.capacity(),
            reallocated: seq.data_address() != address_before,
            handle_valid_after: value_after.is_some(),
            value_after,
        };
        log::info!("{}", report);
        Ok(report)
    }
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "value {} before insert; capacity {} -> {}{}; handle {}",
            self.value_before,
            self.capacity_before,
            self.capacity_after,
            if self.reallocated { " (reallocated)" } else { "" },
            match self.value_after {
                Some(v) => format!("still valid, reads {}", v),
                None => "stale".to_string(),
            }
        )
    }
}
