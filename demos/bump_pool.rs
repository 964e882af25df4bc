//! GrowableSeq backed by a bump pool
//!
//! The pool never reclaims: every abandoned region stays consumed.

use memlab::config::{Config, GrowthConfig};
use memlab::harness::trace_appends_in;
use memlab::{BumpPool, GrowableSeq, GrowthPolicy, Result};

fn main() -> Result<()> {
    pretty_env_logger::init();

    println!("🧱 Bump Pool Demonstration");
    println!("==========================");

    let config = GrowthConfig::from_env()?;
    let pool = BumpPool::new(config.pool_size)?;

    let mut v = GrowableSeq::<i32, _>::new_in(&pool);
    for i in 0..10 {
        v.push(i)?;
    }
    println!("used {} bytes", pool.used_bytes());

    let stats = pool.stats();
    println!(
        "allocations={} ignored frees={} utilization={:.4}%",
        stats.allocations,
        stats.ignored_frees,
        stats.utilization() * 100.0
    );
    drop(v);

    // Each growth step leaves the previous region behind.
    let small = BumpPool::new(1024)?;
    let trace = trace_appends_in(32, GrowthPolicy::DOUBLING, &small)?;
    println!(
        "32 usize pushes: capacities {:?}, {} of {} bytes used",
        trace.capacities(),
        small.used_bytes(),
        small.capacity()
    );

    // Exhaustion is an error, and the sequence keeps what it had.
    let tiny = BumpPool::new(64)?;
    let mut seq = GrowableSeq::<i32, _>::new_in(&tiny);
    let mut pushed = 0;
    while seq.push(pushed).is_ok() {
        pushed += 1;
    }
    println!(
        "64-byte pool exhausted after {} pushes (len={} cap={})",
        pushed,
        seq.len(),
        seq.capacity()
    );
    Ok(())
}
