//! Ordered map vs hash map insertion timing
//!
//! [`compare_map_inserts`] inserts the same keys into a `BTreeMap`, a std
//! `HashMap` (SipHash) and a `HashMap` keyed by `ahash::RandomState`, timing
//! each run. The ordered map pays O(log n) comparisons per insert; the hash
//! maps pay one hash and amortized O(1) probing.

use crate::containers::GrowableSeq;
use crate::error::Result;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;
use std::time::{Duration, Instant};

/// Map implementations under comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapKind {
    /// `std::collections::BTreeMap`
    BTree,
    /// `std::collections::HashMap` with the default SipHash hasher
    StdHash,
    /// `std::collections::HashMap` with `ahash::RandomState`
    AHash,
}

impl MapKind {
    /// Every kind, in measurement order
    pub const ALL: [MapKind; 3] = [MapKind::BTree, MapKind::StdHash, MapKind::AHash];

    /// Short display name
    pub fn name(&self) -> &'static str {
        match self {
            MapKind::BTree => "BTreeMap",
            MapKind::StdHash => "HashMap<SipHash>",
            MapKind::AHash => "HashMap<ahash>",
        }
    }

    /// Whether iteration visits keys in sorted order
    pub fn is_ordered(&self) -> bool {
        matches!(self, MapKind::BTree)
    }
}

impl fmt::Display for MapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One timed insertion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapTiming {
    /// Map that was filled
    pub kind: MapKind,
    /// Wall time spent inserting
    pub elapsed: Duration,
    /// Number of entries in the map afterwards
    pub len: usize,
}

impl fmt::Display for MapTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<18} {:>6} entries in {:>8.3} ms",
            self.kind.name(),
            self.len,
            self.elapsed.as_secs_f64() * 1_000.0
        )
    }
}

/// Timings of every [`MapKind`] for one key count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapComparison {
    keys: usize,
    timings: Vec<MapTiming>,
}

impl MapComparison {
    /// Number of keys inserted per map
    pub fn keys(&self) -> usize {
        self.keys
    }

    /// All timings in measurement order
    pub fn timings(&self) -> &[MapTiming] {
        &self.timings
    }

    /// Timing of one map kind
    pub fn timing(&self, kind: MapKind) -> Option<&MapTiming> {
        self.timings.iter().find(|t| t.kind == kind)
    }

    /// Run with the smallest elapsed time
    pub fn fastest(&self) -> Option<&MapTiming> {
        self.timings.iter().min_by_key(|t| t.elapsed)
    }
}

impl fmt::Display for MapComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "inserting {} keys", self.keys)?;
        for timing in &self.timings {
            writeln!(f, "  {}", timing)?;
        }
        if let Some(fastest) = self.fastest() {
            write!(f, "fastest: {}", fastest.kind)?;
        }
        Ok(())
    }
}

/// Insert keys `0..n` (value = key) into every [`MapKind`] and time each.
pub fn compare_map_inserts(n: usize) -> Result<MapComparison> {
    let mut keys = GrowableSeq::with_capacity(n)?;
    let mut next = 0u64;
    keys.resize_with(n, || {
        let key = next;
        next += 1;
        key
    })?;

    let timings = MapKind::ALL
        .iter()
        .map(|&kind| time_inserts(kind, &keys))
        .collect::<Vec<_>>();

    for timing in &timings {
        log::info!("{}", timing);
    }

    Ok(MapComparison { keys: n, timings })
}

fn time_inserts(kind: MapKind, keys: &[u64]) -> MapTiming {
    let start = Instant::now();
    let len = match kind {
        MapKind::BTree => {
            let mut map = BTreeMap::new();
            for &key in keys {
                map.insert(key, key);
            }
            map.len()
        }
        MapKind::StdHash => fill_hash_map::<std::collections::hash_map::RandomState>(keys),
        MapKind::AHash => fill_hash_map::<ahash::RandomState>(keys),
    };

    MapTiming {
        kind,
        elapsed: start.elapsed(),
        len,
    }
}

fn fill_hash_map<S: BuildHasher + Default>(keys: &[u64]) -> usize {
    let mut map = HashMap::with_hasher(S::default());
    for &key in keys {
        map.insert(key, key);
    }
    map.len()
}
