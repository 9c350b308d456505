//! Re-Reference Interval Prediction (RRIP) Replacement Policy.
//!
//! Each block carries a re-reference prediction value (RRPV). Hits reset the
//! RRPV to the near-immediate value; the victim is the leftmost block with the
//! largest RRPV. On every eviction the whole set is aged so that its largest
//! RRPV becomes the distant value.
//!
//! New lines are inserted by one of two policies:
//!
//! - **SRRIP**: always insert at the distant RRPV.
//! - **BRRIP**: insert at the long RRPV, except for one draw in 32 which
//!   inserts at the distant RRPV.
//!
//! A small sample of leader sets always uses one of the two. Misses in BRRIP
//! leaders raise the 10-bit selector `PSEL`, misses in SRRIP leaders lower it,
//! and follower sets use BRRIP while bit 9 of `PSEL` is set.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `on_access()`: O(1)
//!   - `choose_victim()`: O(W) where W is the number of ways
//! - **Space Complexity:** O(1) beyond the block counters
//! - **Best Case:** Mixed workloads where scans would flush an LRU cache
//! - **Worst Case:** Pure recency-friendly workloads, where LRU is exact

use std::fmt;

use super::ReplacementPolicy;
use super::rng::{ChaChaSource, InsertionRng};
use crate::common::error::ConfigError;
use crate::config::{PSEL_MAX, RripConfig};
use crate::core::units::cache::block::Block;

/// BRRIP leaders stop raising `PSEL` here.
const PSEL_BRRIP_CEILING: u32 = 0x1FF;

/// SRRIP leaders stop lowering `PSEL` here.
const PSEL_SRRIP_FLOOR: u32 = 0x200;

/// Bit of `PSEL` that selects BRRIP for follower sets.
const PSEL_MSB: u32 = 9;

/// BRRIP inserts at the distant RRPV once per this many draws.
const BRRIP_DRAW_BOUND: u32 = 32;

/// RRPV values derived from the counter width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RrpvConstants {
    /// Value written on a hit: reuse expected soon.
    pub near_imm: u32,
    /// Value written by SRRIP insertion and the target of aging.
    pub distant: u32,
    /// Largest representable value, used by BRRIP insertion.
    pub long: u32,
}

impl RrpvConstants {
    /// Derives the constants for a counter of `bits` bits.
    ///
    /// `bits` must be at least 2 so the three values are distinct.
    ///
    /// # Panics
    ///
    /// Panics if `bits` is outside `2..32`. Configured widths are limited to
    /// `2..=16` by [`RripConfig::validate`].
    pub const fn from_bits(bits: u32) -> Self {
        assert!(bits >= 2 && bits < u32::BITS, "RRPV counter width out of range");
        let long = (1 << bits) - 1;
        Self {
            near_imm: 0,
            distant: long - 1,
            long,
        }
    }
}

/// Role of a set in set-dueling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetRole {
    /// Always inserts with SRRIP; its misses lower `PSEL`.
    SrripLeader,
    /// Always inserts with BRRIP; its misses raise `PSEL`.
    BrripLeader,
    /// Inserts with whichever policy `PSEL` currently favours.
    Follower,
}

/// Insertion policy applied to a freshly evicted way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Insertion {
    /// Static RRIP.
    Srrip,
    /// Bimodal RRIP.
    Brrip,
}

/// RRIP policy state.
pub struct RripPolicy {
    rrpv: RrpvConstants,
    /// Width of the offset and constituency fields of a set index.
    leader_bits: u32,
    /// Saturating policy selector.
    psel: u32,
    /// Set by `choose_victim`, consumed by the paired `on_access`.
    pending_miss: bool,
    rng: Box<dyn InsertionRng>,
}

impl RripPolicy {
    /// Creates an RRIP policy whose BRRIP draws come from a ChaCha source
    /// seeded with `config.seed`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the counter width, leader width or initial
    /// selector is out of range.
    pub fn new(config: &RripConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, Box::new(ChaChaSource::new(config.seed)))
    }

    /// Creates an RRIP policy drawing BRRIP insertions from `rng`.
    ///
    /// # Errors
    ///
    /// Same as [`RripPolicy::new`].
    pub fn with_rng(config: &RripConfig, rng: Box<dyn InsertionRng>) -> Result<Self, ConfigError> {
        config.validate()?;
        let rrpv = RrpvConstants::from_bits(config.counter_bits);
        tracing::debug!(
            near_imm = rrpv.near_imm,
            distant = rrpv.distant,
            long = rrpv.long,
            leader_bits = config.leader_bits,
            psel = config.psel_init,
            "RRIP policy created"
        );
        Ok(Self {
            rrpv,
            leader_bits: config.leader_bits,
            psel: config.psel_init,
            pending_miss: false,
            rng,
        })
    }

    /// RRPV constants in use.
    pub const fn rrpv(&self) -> RrpvConstants {
        self.rrpv
    }

    /// Current policy selector value.
    pub const fn psel(&self) -> u32 {
        self.psel
    }

    /// Whether a miss is recorded and awaiting its `on_access`.
    pub const fn pending_miss(&self) -> bool {
        self.pending_miss
    }

    const fn leader_mask(&self) -> usize {
        (1 << self.leader_bits) - 1
    }

    const fn constituency(&self, set_index: usize) -> usize {
        (set_index >> self.leader_bits) & self.leader_mask()
    }

    /// Whether `set_index` is an SRRIP leader: its offset field equals its
    /// constituency field.
    pub const fn is_srrip_leader(&self, set_index: usize) -> bool {
        set_index & self.leader_mask() == self.constituency(set_index)
    }

    /// Whether `set_index` is a BRRIP leader: its complemented offset field
    /// equals its constituency field.
    pub const fn is_brrip_leader(&self, set_index: usize) -> bool {
        !set_index & self.leader_mask() == self.constituency(set_index)
    }

    /// Classifies a set for set-dueling.
    ///
    /// # Panics
    ///
    /// Panics if the set satisfies both leader predicates.
    pub fn set_role(&self, set_index: usize) -> SetRole {
        let srrip = self.is_srrip_leader(set_index);
        let brrip = self.is_brrip_leader(set_index);
        assert!(
            !(srrip && brrip),
            "set {set_index} is both an SRRIP and a BRRIP leader"
        );
        if srrip {
            SetRole::SrripLeader
        } else if brrip {
            SetRole::BrripLeader
        } else {
            SetRole::Follower
        }
    }

    /// Insertion policy a set of the given role uses under the current `PSEL`.
    pub const fn insertion_for(&self, role: SetRole) -> Insertion {
        match role {
            SetRole::SrripLeader => Insertion::Srrip,
            SetRole::BrripLeader => Insertion::Brrip,
            SetRole::Follower => {
                if (self.psel >> PSEL_MSB) & 1 == 1 {
                    Insertion::Brrip
                } else {
                    Insertion::Srrip
                }
            }
        }
    }

    fn update_psel(&mut self, role: SetRole) {
        match role {
            SetRole::BrripLeader if self.psel != PSEL_BRRIP_CEILING && self.psel < PSEL_MAX => {
                self.psel += 1;
            }
            SetRole::SrripLeader if self.psel != PSEL_SRRIP_FLOOR && self.psel > 0 => {
                self.psel -= 1;
            }
            _ => return,
        }
        tracing::trace!(psel = self.psel, ?role, "PSEL moved");
    }

    fn insertion_rrpv(&mut self, insertion: Insertion) -> u32 {
        match insertion {
            Insertion::Srrip => self.rrpv.distant,
            Insertion::Brrip => {
                if self.rng.draw(BRRIP_DRAW_BOUND) == 0 {
                    self.rrpv.distant
                } else {
                    self.rrpv.long
                }
            }
        }
    }
}

impl fmt::Debug for RripPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RripPolicy")
            .field("rrpv", &self.rrpv)
            .field("leader_bits", &self.leader_bits)
            .field("psel", &self.psel)
            .field("pending_miss", &self.pending_miss)
            .finish_non_exhaustive()
    }
}

impl ReplacementPolicy for RripPolicy {
    /// Picks the victim, ages the set, steers `PSEL` and assigns the
    /// insertion RRPV to the victim way.
    ///
    /// An invalid way is taken immediately with the long RRPV and no aging.
    ///
    /// # Panics
    ///
    /// Panics if `set` is empty.
    fn choose_victim(&mut self, set: &mut [Block], set_index: usize) -> usize {
        self.pending_miss = true;

        if let Some(way) = set.iter().position(|b| !b.valid) {
            set[way].counter = self.rrpv.long;
            return way;
        }

        let mut victim = None;
        let mut max_rrpv = 0;
        for (way, block) in set.iter().enumerate() {
            if victim.is_none() || block.counter > max_rrpv {
                victim = Some(way);
                max_rrpv = block.counter;
            }
        }
        let Some(victim) = victim else {
            panic!("RRIP victim search found no way in set {set_index}");
        };

        let delta = i64::from(self.rrpv.distant) - i64::from(max_rrpv);
        let long = i64::from(self.rrpv.long);
        for block in set.iter_mut() {
            block.counter = (i64::from(block.counter) + delta).clamp(0, long) as u32;
        }

        let role = self.set_role(set_index);
        self.update_psel(role);
        let insertion = self.insertion_for(role);
        set[victim].counter = self.insertion_rrpv(insertion);

        tracing::trace!(
            set = set_index,
            way = victim,
            ?insertion,
            rrpv = set[victim].counter,
            "RRIP insertion"
        );
        victim
    }

    /// Hits promote the block to the near-immediate RRPV. Misses were
    /// already assigned their RRPV during victim selection.
    fn on_access(&mut self, set: &mut [Block], _set_index: usize, way: usize, is_hit: bool) {
        let miss = std::mem::take(&mut self.pending_miss) || !is_hit;
        if !miss {
            set[way].counter = self.rrpv.near_imm;
        }
    }

    fn name(&self) -> &'static str {
        "rrip"
    }
}
