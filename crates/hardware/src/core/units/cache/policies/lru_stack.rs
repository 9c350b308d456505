//! Recency-Stack LRU Replacement Policy.
//!
//! Each valid block's counter is its position in a recency stack: 0 is the
//! most recently used block and `k - 1` the least recently used of the `k`
//! valid blocks. The counters of the valid blocks of a set are always exactly
//! `{0, .., k-1}`.
//!
//! On an access the block moves to position 0 and every valid block that
//! was above its old position moves down by one. Invalid ways never take part
//! in the update, so they cannot carry stale positions into victim search.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `on_access()`: O(W) where W is the number of ways (associativity)
//!   - `choose_victim()`: O(W)
//! - **Space Complexity:** O(1) beyond the block counters
//! - **Best Case:** Accesses with good temporal locality
//! - **Worst Case:** Scanning patterns larger than the set (thrashing)

use super::ReplacementPolicy;
use crate::common::error::ConfigError;
use crate::core::units::cache::block::Block;

/// LRU stack policy state.
#[derive(Clone, Debug)]
pub struct LruStackPolicy {
    /// Associativity; doubles as the "infinite" old position of a miss.
    ways: usize,
    /// Set by `choose_victim`, consumed by the paired `on_access`.
    pending_miss: bool,
}

impl LruStackPolicy {
    /// Creates a new LRU stack policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroWays`] if `ways` is zero.
    pub fn new(ways: usize) -> Result<Self, ConfigError> {
        if ways == 0 {
            return Err(ConfigError::ZeroWays);
        }
        Ok(Self {
            ways,
            pending_miss: false,
        })
    }

    /// Whether a miss is recorded and awaiting its `on_access`.
    pub const fn pending_miss(&self) -> bool {
        self.pending_miss
    }
}

/// Whether the valid blocks of `set` hold exactly the positions `0..k`.
pub fn is_dense_stack(set: &[Block]) -> bool {
    let valid = set.iter().filter(|b| b.valid).count();
    let mut seen = vec![false; valid];
    for block in set.iter().filter(|b| b.valid) {
        let pos = block.counter as usize;
        if pos >= valid || seen[pos] {
            return false;
        }
        seen[pos] = true;
    }
    true
}

fn assert_dense_stack(set: &[Block], set_index: usize) {
    assert!(
        is_dense_stack(set),
        "LRU stack of set {set_index} is corrupt: {:?}",
        set.iter()
            .map(|b| (b.valid, b.counter))
            .collect::<Vec<_>>()
    );
}

impl ReplacementPolicy for LruStackPolicy {
    /// Returns the first invalid way, or else the way at the bottom of the
    /// stack.
    ///
    /// # Panics
    ///
    /// Panics if the set's counters do not form a dense stack.
    fn choose_victim(&mut self, set: &mut [Block], set_index: usize) -> usize {
        debug_assert_eq!(set.len(), self.ways);
        self.pending_miss = true;

        if let Some(way) = set.iter().position(|b| !b.valid) {
            return way;
        }

        assert_dense_stack(set, set_index);

        let mut victim = 0;
        let mut max_pos = set[0].counter;
        for (way, block) in set.iter().enumerate().skip(1) {
            if block.counter > max_pos {
                victim = way;
                max_pos = block.counter;
            }
        }
        victim
    }

    /// Moves `way` to the top of the stack.
    fn on_access(&mut self, set: &mut [Block], _set_index: usize, way: usize, is_hit: bool) {
        let miss = std::mem::take(&mut self.pending_miss) || !is_hit;
        let old = if miss {
            self.ways as u32
        } else {
            set[way].counter
        };

        set[way].counter = 0;
        for (i, block) in set.iter_mut().enumerate() {
            if i != way && block.valid && block.counter < old {
                block.counter += 1;
            }
        }
    }

    fn name(&self) -> &'static str {
        "lru"
    }
}
