//! Translation Lookaside Buffer (TLB).
//!
//! A set-associative cache of virtual page numbers. Each way holds one page
//! translation; the replacement policy decides which translation is dropped
//! when a set is full. Only residency is modelled, not the translated frame.

use std::fmt;

use crate::common::error::ConfigError;
use crate::config::TlbConfig;
use crate::core::units::cache::CacheSim;
use crate::stats::AccessStats;

/// Translation Lookaside Buffer structure.
pub struct Tlb {
    /// Page-granular cache; one line per page.
    entries: CacheSim,
    /// Page size in bytes.
    page_bytes: usize,
}

impl Tlb {
    /// Creates a new TLB.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the entry count, page size or policy
    /// parameters are rejected.
    pub fn new(config: &TlbConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            entries: CacheSim::new(&config.as_cache())?,
            page_bytes: config.page_bytes,
        })
    }

    /// Virtual page number of an address.
    pub const fn vpn(&self, vaddr: u64) -> u64 {
        vaddr / self.page_bytes as u64
    }

    /// Looks up the page of `vaddr`, filling it on a miss.
    ///
    /// # Returns
    ///
    /// `true` if the translation was resident.
    pub fn lookup(&mut self, vaddr: u64) -> bool {
        self.entries.access(vaddr)
    }

    /// Whether the page of `vaddr` is resident, without updating any state.
    pub fn contains(&self, vaddr: u64) -> bool {
        self.entries.contains(vaddr)
    }

    /// Drops every translation.
    ///
    /// Called on address-space switches.
    pub fn flush(&mut self) {
        self.entries.flush();
    }

    /// Name of the active replacement policy.
    pub fn policy_name(&self) -> &'static str {
        self.entries.policy_name()
    }

    /// Page-granular cache backing the translations.
    pub(crate) fn cache_mut(&mut self) -> &mut CacheSim {
        &mut self.entries
    }

    /// Counters accumulated so far.
    pub const fn stats(&self) -> &AccessStats {
        self.entries.stats()
    }
}

impl fmt::Debug for Tlb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tlb")
            .field("page_bytes", &self.page_bytes)
            .field("entries", &self.entries)
            .finish()
    }
}
