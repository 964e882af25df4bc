//! GrowableSeq growth and invalidation walkthrough
//!
//! Run with `RUST_LOG=debug` to see every relocation logged by the library.

use memlab::harness::{trace_appends, GrowthObserver, InvalidationProbe};
use memlab::{GrowableSeq, GrowthPolicy, Result};
use std::sync::atomic::{AtomicUsize, Ordering};

static COPIES: AtomicUsize = AtomicUsize::new(0);

/// Announces every explicit copy. Moves are plain memcpys and run no code.
struct Big {
    v: i32,
}

impl Clone for Big {
    fn clone(&self) -> Self {
        println!("copy");
        COPIES.fetch_add(1, Ordering::Relaxed);
        Big { v: self.v }
    }
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    memlab::init();

    println!("📈 GrowableSeq Growth Demonstration");
    println!("===================================");

    // Part 1: watch capacity and storage address while pushing
    let mut v = GrowableSeq::new();
    let mut observer = GrowthObserver::new(&v);
    println!(
        "start: len={} cap={} data={:#x}",
        v.len(),
        v.capacity(),
        v.data_address()
    );

    for i in 0..64 {
        v.push(i)?;
        if let Some(event) = observer.observe(&v) {
            println!(
                "grow @i={:>2} len={:>2} cap={:>2} data={:#x}{}",
                i,
                event.len,
                event.capacity,
                event.address,
                if event.relocated { "  (RELOCATED)" } else { "" }
            );
        }
    }

    // Part 2: reserve only affects capacity
    let mut a: GrowableSeq<i32> = GrowableSeq::new();
    a.reserve(100)?;
    println!("reserve only: len={} cap={}", a.len(), a.capacity());

    // Part 3: resize changes length, filling with defaults
    let mut b: GrowableSeq<i32> = GrowableSeq::new();
    b.resize(5)?;
    println!("resize: len={} cap={} contents={:?}", b.len(), b.capacity(), b);

    // Part 4: handles instead of raw pointers
    let mut w = GrowableSeq::new();
    w.reserve(8)?;
    for i in 0..8 {
        w.push(i)?;
    }
    let p = w.handle(3)?;
    println!("before insert: *p={}", w.resolve(&p)?);
    w.insert_at(2, 999)?;
    match w.resolve(&p) {
        Ok(value) => println!("after insert : *p={}", value),
        Err(e) => println!("after insert : {}", e),
    }

    // Same experiment with room to spare: no reallocation, the shift alone
    // invalidates the handle
    let report = InvalidationProbe::new(8, 3, 2, 999).with_spare(8).run()?;
    println!("with spare capacity: {}", report);
    let report = InvalidationProbe::new(8, 3, 5, 999).with_spare(8).run()?;
    println!("insert past handle : {}", report);

    // Part 5: push vs push_with, and where copies actually happen
    let mut bv = GrowableSeq::new();
    bv.reserve(4)?;
    bv.push(Big { v: 1 })?;
    bv.push_with(|| Big { v: 2 })?;
    for v in 3..=64 {
        bv.push(Big { v })?;
    }
    println!(
        "push vs push_with done, len={} reallocations={} copies={}",
        bv.len(),
        bv.reallocations(),
        COPIES.load(Ordering::Relaxed)
    );
    let copy = bv.try_clone()?;
    bv.extend_from_slice(&copy.as_slice()[..2])?;
    println!(
        "after try_clone + extend_from_slice: copies={} (last v={})",
        COPIES.load(Ordering::Relaxed),
        bv[bv.len() - 1].v
    );

    // Part 6: shrink_to_fit is binding
    let mut s = GrowableSeq::new();
    for i in 0..1000 {
        s.push(i)?;
    }
    println!("before shrink: len={} cap={}", s.len(), s.capacity());
    s.resize(10)?;
    println!("after  resize: len={} cap={}", s.len(), s.capacity());
    s.shrink_to_fit()?;
    println!("after shrink: len={} cap={}", s.len(), s.capacity());

    // Part 7: a gentler growth factor trades more reallocations for less slack
    for policy in [GrowthPolicy::DOUBLING, GrowthPolicy::ONE_AND_A_HALF] {
        let trace = trace_appends(1000, policy)?;
        println!(
            "factor {:.1}: {} reallocations, final cap {}",
            policy.factor(),
            trace.events().len(),
            trace.final_capacity()
        );
    }

    println!(
        "final: len={} cap={} data={:#x} reallocations={}",
        v.len(),
        v.capacity(),
        v.data_address(),
        v.reallocations()
    );
    Ok(())
}
