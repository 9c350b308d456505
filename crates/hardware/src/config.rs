//! Configuration system for the replacement policy simulator.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the simulated structures. It provides:
//! 1. **Defaults:** Baseline geometry and RRIP constants.
//! 2. **Structures:** Config for the data cache, the TLB, and the RRIP policy.
//! 3. **Enums:** Replacement policy variant selection.
//! 4. **Validation:** Geometry and counter-width checks performed before construction.
//!
//! Configuration is supplied as JSON (for the CLI) or built with `SimConfig::default()`.

use serde::Deserialize;

use crate::common::error::ConfigError;

/// Default configuration constants for the simulator.
///
/// These values define the baseline structures when not explicitly
/// overridden in the JSON configuration.
mod defaults {
    /// Default cache size in bytes (32 KiB).
    pub const CACHE_SIZE: usize = 32 * 1024;

    /// Default cache line size in bytes (64 bytes).
    pub const CACHE_LINE: usize = 64;

    /// Default cache associativity.
    pub const CACHE_WAYS: usize = 8;

    /// Default TLB entry count.
    pub const TLB_ENTRIES: usize = 64;

    /// Default TLB associativity.
    pub const TLB_WAYS: usize = 4;

    /// Default page size in bytes (4 KiB).
    pub const PAGE_BYTES: usize = 4096;

    /// Default RRPV counter width (2 bits: near 0, distant 2, long 3).
    pub const RRPV_BITS: u32 = 2;

    /// Default leader sampling field width (5 bits = 32 leader groups per policy).
    pub const LEADER_BITS: u32 = 5;
}

/// Largest value of the 10-bit policy selector.
pub const PSEL_MAX: u32 = 0x3FF;

/// Replacement policy variants.
///
/// Specifies the algorithm used to select which way to evict when a new
/// block must be installed in a full set, and how per-block counters evolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ReplacementPolicy {
    /// Re-reference interval prediction with SRRIP/BRRIP set-dueling.
    ///
    /// Leader sets run a fixed insertion policy and steer a saturating
    /// selector that decides the policy of all follower sets.
    #[default]
    #[serde(alias = "RRIP", alias = "rrip")]
    RripDueling,
    /// Recency-stack LRU kept in per-block counters.
    ///
    /// Counter 0 is the most recently used block; the largest counter is
    /// the eviction candidate.
    #[serde(alias = "LRU", alias = "lru")]
    LruStack,
}

/// RRIP counter and set-dueling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RripConfig {
    /// RRPV counter width in bits. Determines the near/distant/long constants.
    #[serde(default = "RripConfig::default_counter_bits")]
    pub counter_bits: u32,

    /// Width of the offset and constituency fields used to pick leader sets.
    #[serde(default = "RripConfig::default_leader_bits")]
    pub leader_bits: u32,

    /// Initial value of the policy selector.
    #[serde(default)]
    pub psel_init: u32,

    /// Seed for the BRRIP insertion draw.
    #[serde(default)]
    pub seed: u64,
}

impl RripConfig {
    /// Returns the default RRPV counter width.
    fn default_counter_bits() -> u32 {
        defaults::RRPV_BITS
    }

    /// Returns the default leader sampling width.
    fn default_leader_bits() -> u32 {
        defaults::LEADER_BITS
    }

    /// Checks counter width, leader sampling width and the initial selector.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=16).contains(&self.counter_bits) {
            return Err(ConfigError::CounterWidth(self.counter_bits));
        }
        if !(1..=15).contains(&self.leader_bits) {
            return Err(ConfigError::LeaderBits(self.leader_bits));
        }
        if self.psel_init > PSEL_MAX {
            return Err(ConfigError::PselInit(self.psel_init));
        }
        Ok(())
    }
}

impl Default for RripConfig {
    fn default() -> Self {
        Self {
            counter_bits: defaults::RRPV_BITS,
            leader_bits: defaults::LEADER_BITS,
            psel_init: 0,
            seed: 0,
        }
    }
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use replsim_core::config::{ReplacementPolicy, SimConfig};
///
/// let config = SimConfig::default();
/// assert_eq!(config.cache.ways, 8);
/// assert_eq!(config.cache.policy, ReplacementPolicy::RripDueling);
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use replsim_core::config::{ReplacementPolicy, SimConfig};
///
/// let json = r#"{
///     "cache": {
///         "size_bytes": 4096,
///         "line_bytes": 64,
///         "ways": 4,
///         "policy": "LRU"
///     },
///     "tlb": {
///         "entries": 32,
///         "ways": 4,
///         "policy": "RRIP",
///         "rrip": { "counter_bits": 3, "seed": 7 }
///     }
/// }"#;
///
/// let config: SimConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.cache.policy, ReplacementPolicy::LruStack);
/// assert_eq!(config.tlb.rrip.counter_bits, 3);
/// assert_eq!(config.tlb.rrip.leader_bits, 5);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimConfig {
    /// Data cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// TLB configuration
    #[serde(default)]
    pub tlb: TlbConfig,
}

impl SimConfig {
    /// Validates every structure in the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cache.validate()?;
        self.tlb.validate()
    }
}

/// Set-associative cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Total cache size in bytes
    #[serde(default = "CacheConfig::default_size")]
    pub size_bytes: usize,

    /// Cache line size in bytes
    #[serde(default = "CacheConfig::default_line")]
    pub line_bytes: usize,

    /// Associativity (number of ways)
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Replacement policy
    #[serde(default)]
    pub policy: ReplacementPolicy,

    /// RRIP parameters (ignored by the LRU stack)
    #[serde(default)]
    pub rrip: RripConfig,
}

impl CacheConfig {
    /// Returns the default cache size in bytes.
    fn default_size() -> usize {
        defaults::CACHE_SIZE
    }

    /// Returns the default cache line size in bytes.
    fn default_line() -> usize {
        defaults::CACHE_LINE
    }

    /// Returns the default associativity.
    fn default_ways() -> usize {
        defaults::CACHE_WAYS
    }

    /// Number of sets implied by the geometry.
    ///
    /// Only meaningful after [`CacheConfig::validate`] succeeds.
    pub const fn num_sets(&self) -> usize {
        match self.line_bytes.checked_mul(self.ways) {
            Some(set_bytes) if set_bytes != 0 => self.size_bytes / set_bytes,
            _ => 0,
        }
    }

    /// Checks geometry and policy parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroWays`], [`ConfigError::LineSize`],
    /// [`ConfigError::Geometry`], or an RRIP parameter error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ways == 0 {
            return Err(ConfigError::ZeroWays);
        }
        if !self.line_bytes.is_power_of_two() {
            return Err(ConfigError::LineSize(self.line_bytes));
        }
        let geometry = || ConfigError::Geometry {
            size_bytes: self.size_bytes,
            line_bytes: self.line_bytes,
            ways: self.ways,
        };
        let set_bytes = self.line_bytes.checked_mul(self.ways).ok_or_else(geometry)?;
        if self.size_bytes == 0 || self.size_bytes % set_bytes != 0 {
            return Err(geometry());
        }
        if self.policy == ReplacementPolicy::RripDueling {
            self.rrip.validate()?;
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            size_bytes: defaults::CACHE_SIZE,
            line_bytes: defaults::CACHE_LINE,
            ways: defaults::CACHE_WAYS,
            policy: ReplacementPolicy::default(),
            rrip: RripConfig::default(),
        }
    }
}

/// Set-associative TLB configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TlbConfig {
    /// Total entry count
    #[serde(default = "TlbConfig::default_entries")]
    pub entries: usize,

    /// Associativity (number of ways)
    #[serde(default = "TlbConfig::default_ways")]
    pub ways: usize,

    /// Page size in bytes
    #[serde(default = "TlbConfig::default_page")]
    pub page_bytes: usize,

    /// Replacement policy
    #[serde(default)]
    pub policy: ReplacementPolicy,

    /// RRIP parameters (ignored by the LRU stack)
    #[serde(default)]
    pub rrip: RripConfig,
}

impl TlbConfig {
    /// Returns the default TLB entry count.
    fn default_entries() -> usize {
        defaults::TLB_ENTRIES
    }

    /// Returns the default TLB associativity.
    fn default_ways() -> usize {
        defaults::TLB_WAYS
    }

    /// Returns the default page size.
    fn default_page() -> usize {
        defaults::PAGE_BYTES
    }

    /// Checks entry count, page size and policy parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroWays`], [`ConfigError::LineSize`],
    /// [`ConfigError::TlbGeometry`], or an RRIP parameter error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ways == 0 {
            return Err(ConfigError::ZeroWays);
        }
        if !self.page_bytes.is_power_of_two() {
            return Err(ConfigError::LineSize(self.page_bytes));
        }
        if self.entries == 0
            || self.entries % self.ways != 0
            || self.entries.checked_mul(self.page_bytes).is_none()
        {
            return Err(ConfigError::TlbGeometry {
                entries: self.entries,
                ways: self.ways,
            });
        }
        if self.policy == ReplacementPolicy::RripDueling {
            self.rrip.validate()?;
        }
        Ok(())
    }

    /// Equivalent cache geometry: one page per line.
    ///
    /// The size saturates when `entries * page_bytes` overflows, which
    /// [`TlbConfig::validate`] rejects.
    pub const fn as_cache(&self) -> CacheConfig {
        CacheConfig {
            size_bytes: self.entries.saturating_mul(self.page_bytes),
            line_bytes: self.page_bytes,
            ways: self.ways,
            policy: self.policy,
            rrip: self.rrip,
        }
    }
}

impl Default for TlbConfig {
    fn default() -> Self {
        Self {
            entries: defaults::TLB_ENTRIES,
            ways: defaults::TLB_WAYS,
            page_bytes: defaults::PAGE_BYTES,
            policy: ReplacementPolicy::default(),
            rrip: RripConfig::default(),
        }
    }
}
