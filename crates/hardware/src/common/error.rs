//! Error definitions.
//!
//! This module defines the recoverable errors of the simulator. It provides:
//! 1. **Configuration Errors:** Geometry and policy parameters rejected before any access.
//! 2. **Trace Errors:** I/O and parse failures while reading an address trace.
//!
//! Internal-consistency failures (a broken recency stack, a set classified as
//! both SRRIP and BRRIP leader) are not represented here: they abort the run
//! with a panic naming the set and the counters observed.

use thiserror::Error;

/// Rejected configuration parameters.
///
/// Returned by the constructors of caches, TLBs and replacement policies
/// before any block state is allocated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Associativity must be at least one way.
    #[error("associativity must be positive")]
    ZeroWays,

    /// Line (or page) size must be a non-zero power of two.
    #[error("line size must be a non-zero power of two, got {0}")]
    LineSize(usize),

    /// Capacity does not divide into a whole, non-zero number of sets.
    #[error("{size_bytes} bytes cannot be split into sets of {ways} ways x {line_bytes}-byte lines")]
    Geometry {
        /// Total capacity in bytes.
        size_bytes: usize,
        /// Line size in bytes.
        line_bytes: usize,
        /// Associativity.
        ways: usize,
    },

    /// TLB entry count does not divide into a whole, non-zero number of sets.
    #[error("{entries} TLB entries cannot be split into sets of {ways} ways")]
    TlbGeometry {
        /// Total entry count.
        entries: usize,
        /// Associativity.
        ways: usize,
    },

    /// RRPV counter width cannot hold distinct near, distant and long values.
    #[error("RRPV counter width must be between 2 and 16 bits, got {0}")]
    CounterWidth(u32),

    /// Leader-set sampling field width is out of range.
    #[error("leader sampling width must be between 1 and 15 bits, got {0}")]
    LeaderBits(u32),

    /// Initial policy selector does not fit the 10-bit PSEL counter.
    #[error("initial PSEL {0} exceeds the 10-bit selector range")]
    PselInit(u32),
}

/// Failures while loading a configuration or replaying an address trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Underlying reader failed.
    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be parsed as an address.
    #[error("line {line}: cannot parse `{text}` as an address")]
    Parse {
        /// One-based line number.
        line: usize,
        /// Offending text, trimmed.
        text: String,
    },

    /// Configuration JSON was malformed.
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration was well-formed but rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
