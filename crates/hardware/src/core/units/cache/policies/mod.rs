//! Cache Replacement Policies.
//!
//! Implements victim selection and per-block state updates for set-associative
//! caches and TLBs. Policies keep their per-block state in [`Block::counter`]
//! and any policy-wide state in their own struct, so independent structures
//! never share mutable state.
//!
//! # Policies
//!
//! - `Rrip`: Re-reference interval prediction with SRRIP/BRRIP set-dueling.
//! - `LruStack`: Recency stack held in the block counters.
//!
//! # Protocol
//!
//! For every access the owner probes the set for a tag hit. On a miss it
//! calls [`ReplacementPolicy::choose_victim`], installs the new tag in the
//! returned way, and then, hit or miss, calls
//! [`ReplacementPolicy::on_access`] for the resulting way.

/// Recency-stack LRU replacement policy.
pub mod lru_stack;

/// Seedable random source for the BRRIP insertion draw.
pub mod rng;

/// RRIP replacement policy with set-dueling.
pub mod rrip;

pub use lru_stack::{LruStackPolicy, is_dense_stack};
pub use rng::{ChaChaSource, InsertionRng};
pub use rrip::{Insertion, RripPolicy, RrpvConstants, SetRole};

use super::block::Block;
use crate::common::error::ConfigError;
use crate::config::{CacheConfig, ReplacementPolicy as PolicyType};

/// Trait for cache replacement policies.
///
/// Defines the two-call interface between a set-associative structure and
/// its eviction logic.
pub trait ReplacementPolicy: Send + Sync {
    /// Selects the way to fill on a miss.
    ///
    /// Any counter writes belonging to insertion are complete on return.
    ///
    /// # Arguments
    ///
    /// * `set` - The blocks of the set being filled.
    /// * `set_index` - The index of that set.
    ///
    /// # Returns
    ///
    /// The way to fill, in `0..set.len()`.
    fn choose_victim(&mut self, set: &mut [Block], set_index: usize) -> usize;

    /// Updates replacement state after an access.
    ///
    /// # Arguments
    ///
    /// * `set` - The blocks of the accessed set.
    /// * `set_index` - The index of that set.
    /// * `way` - The way that was hit, or the way returned by the preceding
    ///   `choose_victim` call on a miss.
    /// * `is_hit` - Outcome of the tag probe.
    fn on_access(&mut self, set: &mut [Block], set_index: usize, way: usize, is_hit: bool);

    /// Short policy name for reports.
    fn name(&self) -> &'static str;
}

/// Builds the policy selected by a cache configuration.
///
/// # Errors
///
/// Returns [`ConfigError`] if the RRIP parameters are invalid or the
/// associativity is zero.
pub fn build(config: &CacheConfig) -> Result<Box<dyn ReplacementPolicy>, ConfigError> {
    let policy: Box<dyn ReplacementPolicy> = match config.policy {
        PolicyType::RripDueling => Box::new(RripPolicy::new(&config.rrip)?),
        PolicyType::LruStack => Box::new(LruStackPolicy::new(config.ways)?),
    };
    tracing::debug!(policy = policy.name(), ways = config.ways, "replacement policy built");
    Ok(policy)
}
