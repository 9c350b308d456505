//! Simulated hardware structures.
//!
//! This module contains the functional units whose replacement behaviour is
//! simulated: caches and TLBs.

/// Functional units (cache, MMU).
pub mod units;

pub use self::units::cache::CacheSim;
pub use self::units::mmu::Tlb;
