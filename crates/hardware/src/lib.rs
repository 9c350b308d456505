//! Set-associative replacement policy simulator library.
//!
//! This crate models how a cache or TLB chooses victims and ages replacement
//! state with the following:
//! 1. **Policies:** RRIP with SRRIP/BRRIP set-dueling, and a recency-stack LRU.
//! 2. **Structures:** A flat block store, a set-associative cache and a TLB.
//! 3. **Simulation:** Trace parsing, configuration loading and replay.
//! 4. **Statistics:** Hit, miss and eviction counters.

/// Common types (error taxonomy).
pub mod common;
/// Simulator configuration (defaults, policy selection, validation).
pub mod config;
/// Simulated structures (cache, TLB) and replacement policies.
pub mod core;
/// Trace loading and replay.
pub mod sim;
/// Access statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `SimConfig::default()` or deserialize from JSON.
pub use crate::config::SimConfig;
/// Set-associative cache driven by a replacement policy.
pub use crate::core::CacheSim;
/// Page-granular TLB built on `CacheSim`.
pub use crate::core::Tlb;
/// Hit/miss counters.
pub use crate::stats::AccessStats;
