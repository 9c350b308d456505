//! Simulation utilities.
//!
//! Provides trace parsing, configuration loading and the access-replay loop
//! that drives a simulated structure.

/// Trace parsing and replay.
pub mod trace;

pub use trace::{load_config, parse_address, parse_trace, replay, replay_tlb};
