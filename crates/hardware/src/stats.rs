//! Access statistics collection and reporting.
//!
//! Tracks the outcome of every access to one simulated structure:
//! hits, misses, and evictions of valid blocks.

use std::fmt;
use std::ops::AddAssign;

use serde::Serialize;

/// Hit/miss counters for one cache or TLB.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AccessStats {
    /// Total accesses.
    pub accesses: u64,
    /// Accesses whose tag was resident.
    pub hits: u64,
    /// Accesses that required a fill.
    pub misses: u64,
    /// Misses whose fill displaced a valid block.
    pub evictions: u64,
}

impl AccessStats {
    /// Records one access.
    pub const fn record(&mut self, hit: bool, evicted: bool) {
        self.accesses += 1;
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
            if evicted {
                self.evictions += 1;
            }
        }
    }

    /// Fraction of accesses that missed, or 0.0 before any access.
    pub fn miss_ratio(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.misses as f64 / self.accesses as f64
        }
    }

    /// Adds another structure's counters to these.
    pub const fn merge(&mut self, other: &Self) {
        self.accesses += other.accesses;
        self.hits += other.hits;
        self.misses += other.misses;
        self.evictions += other.evictions;
    }
}

impl AddAssign for AccessStats {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}

impl fmt::Display for AccessStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  accesses:   {}", self.accesses)?;
        writeln!(f, "  hits:       {}", self.hits)?;
        writeln!(f, "  misses:     {}", self.misses)?;
        writeln!(f, "  evictions:  {}", self.evictions)?;
        write!(f, "  miss ratio: {:.4}", self.miss_ratio())
    }
}
