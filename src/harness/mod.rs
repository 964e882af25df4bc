//! Observation harness for growth and invalidation
//!
//! These utilities drive a [`GrowableSeq`](crate::GrowableSeq) and record what
//! happened to its storage: when capacity changed, whether the region moved,
//! and whether outstanding handles survived a mutation.

mod observer;
mod probe;

pub use observer::{trace_appends, trace_appends_in, GrowthEvent, GrowthObserver, GrowthTrace};
pub use probe::{InvalidationProbe, ProbeReport};
