//! Set-Associative Cache Simulator.
//!
//! This module implements a configurable set-associative structure driven by a
//! pluggable replacement policy. It models tag lookup, victim selection and
//! fills, and counts hits, misses and evictions. Timing is not modelled.

/// Per-way block state and the flat block arena.
pub mod block;

/// Cache replacement policy implementations (RRIP set-dueling, LRU stack).
pub mod policies;

use std::fmt;

use self::block::BlockStore;
use self::policies::ReplacementPolicy;
use crate::common::error::ConfigError;
use crate::config::CacheConfig;
use crate::stats::AccessStats;

/// Cache simulator implementing a set-associative cache with a configurable policy.
pub struct CacheSim {
    blocks: BlockStore,
    line_bytes: usize,
    policy: Box<dyn ReplacementPolicy>,
    stats: AccessStats,
}

impl CacheSim {
    /// Creates a new cache simulator with the specified configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Cache configuration specifying size, associativity,
    ///   line size and replacement policy
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the geometry or policy parameters are
    /// rejected.
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let policy = policies::build(config)?;
        Ok(Self::with_policy(config, policy))
    }

    /// Creates a cache around an already-built policy.
    ///
    /// `config` must already have passed [`CacheConfig::validate`].
    fn with_policy(config: &CacheConfig, policy: Box<dyn ReplacementPolicy>) -> Self {
        let num_sets = config.num_sets();
        tracing::debug!(
            sets = num_sets,
            ways = config.ways,
            line_bytes = config.line_bytes,
            policy = policy.name(),
            "cache created"
        );
        Self {
            blocks: BlockStore::new(num_sets, config.ways),
            line_bytes: config.line_bytes,
            policy,
            stats: AccessStats::default(),
        }
    }

    /// Set index of an address.
    pub const fn set_index(&self, addr: u64) -> usize {
        ((addr as usize) / self.line_bytes) % self.blocks.num_sets()
    }

    /// Tag of an address.
    pub const fn tag(&self, addr: u64) -> u64 {
        addr / (self.line_bytes * self.blocks.num_sets()) as u64
    }

    /// Checks if the cache contains the specified address.
    ///
    /// Does not touch replacement state or statistics.
    pub fn contains(&self, addr: u64) -> bool {
        self.blocks
            .find(self.set_index(addr), self.tag(addr))
            .is_some()
    }

    /// Accesses the cache for the specified address.
    ///
    /// On a miss the policy picks a victim way and the new tag is installed
    /// there. In both cases the policy is then told which way was accessed.
    ///
    /// # Returns
    ///
    /// `true` on a hit.
    pub fn access(&mut self, addr: u64) -> bool {
        let set_index = self.set_index(addr);
        let tag = self.tag(addr);

        let (way, hit, evicted) = match self.blocks.find(set_index, tag) {
            Some(way) => (way, true, false),
            None => {
                let set = self.blocks.set_mut(set_index);
                let way = self.policy.choose_victim(set, set_index);
                let victim = &mut set[way];
                let evicted = victim.valid;
                if evicted {
                    tracing::debug!(
                        set = set_index,
                        way,
                        old_tag = victim.tag,
                        new_tag = tag,
                        policy = self.policy.name(),
                        "evict"
                    );
                }
                victim.tag = tag;
                victim.valid = true;
                (way, false, evicted)
            }
        };

        self.policy
            .on_access(self.blocks.set_mut(set_index), set_index, way, hit);
        self.stats.record(hit, evicted);
        hit
    }

    /// Invalidates every block. Statistics and policy-wide state are kept.
    pub fn flush(&mut self) {
        self.blocks.invalidate_all();
    }

    /// Counters accumulated so far.
    pub const fn stats(&self) -> &AccessStats {
        &self.stats
    }

    /// Block state, for inspection.
    pub const fn blocks(&self) -> &BlockStore {
        &self.blocks
    }

    /// Name of the active replacement policy.
    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }
}

impl fmt::Debug for CacheSim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheSim")
            .field("sets", &self.blocks.num_sets())
            .field("ways", &self.blocks.ways())
            .field("line_bytes", &self.line_bytes)
            .field("policy", &self.policy.name())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
