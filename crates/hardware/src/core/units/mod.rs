//! Memory-side functional units.
//!
//! This module contains the set-associative cache with its replacement
//! policies and the TLB built on top of it.

/// Set-associative cache with pluggable replacement policies.
pub mod cache;

/// Memory management structures (TLB).
pub mod mmu;
