//! Growth tracing
//!
//! [`GrowthObserver`] compares a sequence's capacity and storage address
//! between mutations; [`trace_appends`] drives a fresh sequence and collects
//! every change into a [`GrowthTrace`].

use crate::containers::{GrowableSeq, GrowthPolicy};
use crate::error::{MemlabError, Result};
use crate::memory::{Global, StorageAlloc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One observed change of a sequence's storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthEvent {
    /// Number of observations made when the change was seen
    pub step: usize,
    /// Length at observation time
    pub len: usize,
    /// Capacity after the change
    pub capacity: usize,
    /// Capacity before the change
    pub previous_capacity: usize,
    /// Storage address after the change (0 when no storage is held)
    pub address: usize,
    /// Whether previously held storage was abandoned for a new region
    pub relocated: bool,
}

impl fmt::Display for GrowthEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {:>6}: len {:>6}, capacity {:>6} -> {:>6}, data @ {:#x}{}",
            self.step,
            self.len,
            self.previous_capacity,
            self.capacity,
            self.address,
            if self.relocated { " (relocated)" } else { "" }
        )
    }
}

/// Snapshots a sequence's capacity and address between mutations.
#[derive(Debug, Clone)]
pub struct GrowthObserver {
    capacity: usize,
    address: usize,
    steps: usize,
}

impl GrowthObserver {
    /// Take the initial snapshot of `seq`
    pub fn new<T, A: StorageAlloc>(seq: &GrowableSeq<T, A>) -> Self {
        Self {
            capacity: seq.capacity(),
            address: seq.data_address(),
            steps: 0,
        }
    }

    /// Compare `seq` with the last snapshot.
    ///
    /// Returns an event when capacity or address changed, and moves the
    /// snapshot forward either way.
    pub fn observe<T, A: StorageAlloc>(&mut self, seq: &GrowableSeq<T, A>) -> Option<GrowthEvent> {
        self.steps += 1;

        let capacity = seq.capacity();
        let address = seq.data_address();
        if capacity == self.capacity && address == self.address {
            return None;
        }

        let event = GrowthEvent {
            step: self.steps,
            len: seq.len(),
            capacity,
            previous_capacity: self.capacity,
            address,
            relocated: self.address != 0 && address != self.address,
        };
        self.capacity = capacity;
        self.address = address;
        Some(event)
    }

    /// Number of observations made so far
    pub fn steps(&self) -> usize {
        self.steps
    }
}

/// Every growth event of a run, plus the final state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthTrace {
    events: Vec<GrowthEvent>,
    final_len: usize,
    final_capacity: usize,
}

impl GrowthTrace {
    /// Recorded events in order
    pub fn events(&self) -> &[GrowthEvent] {
        &self.events
    }

    /// Capacity after each event
    pub fn capacities(&self) -> Vec<usize> {
        self.events.iter().map(|e| e.capacity).collect()
    }

    /// Number of events that moved existing storage
    pub fn relocations(&self) -> usize {
        self.events.iter().filter(|e| e.relocated).count()
    }

    /// Length when the run ended
    pub fn final_len(&self) -> usize {
        self.final_len
    }

    /// Capacity when the run ended
    pub fn final_capacity(&self) -> usize {
        self.final_capacity
    }

    /// Serialize the trace as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MemlabError::invalid_data(format!("failed to serialize trace: {}", e)))
    }

    /// Human-readable summary, one line per event
    pub fn report(&self) -> String {
        let mut report = String::from("=== Growth Trace ===\n");
        for event in &self.events {
            report.push_str(&format!("  {}\n", event));
        }
        report.push_str(&format!(
            "Final: len {}, capacity {}, {} relocations\n",
            self.final_len,
            self.final_capacity,
            self.relocations()
        ));
        report
    }
}

/// Append `0..n` to a fresh sequence on the system heap and record every
/// growth event.
pub fn trace_appends(n: usize, policy: GrowthPolicy) -> Result<GrowthTrace> {
    trace_appends_in(n, policy, Global)
}

/// Same as [`trace_appends`], drawing storage from `alloc`.
pub fn trace_appends_in<A: StorageAlloc>(n: usize, policy: GrowthPolicy, alloc: A) -> Result<GrowthTrace> {
    let mut seq = GrowableSeq::with_policy_in(policy, alloc);
    let mut observer = GrowthObserver::new(&seq);
    let mut events = Vec::new();

    for i in 0..n {
        seq.push(i)?;
        if let Some(event) = observer.observe(&seq) {
            log::info!("{}", event);
            events.push(event);
        }
    }

    Ok(GrowthTrace {
        events,
        final_len: seq.len(),
        final_capacity: seq.capacity(),
    })
}
