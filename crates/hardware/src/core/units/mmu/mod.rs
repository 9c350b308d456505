//! Memory Management Unit (MMU) structures.
//!
//! Holds the translation lookaside buffer, which shares the block store and
//! replacement policies of the cache simulator.

/// Translation Lookaside Buffer (TLB) for caching virtual page numbers.
pub mod tlb;

pub use self::tlb::Tlb;
