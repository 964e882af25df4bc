//! Ordered map vs hash map insertion timing

use memlab::{compare_map_inserts, Result};

const N: usize = 100_000;

fn main() -> Result<()> {
    pretty_env_logger::init();

    let comparison = compare_map_inserts(N)?;
    println!("{}", comparison);
    Ok(())
}
