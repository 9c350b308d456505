//! Address Trace Loading and Replay.
//!
//! This module provides utilities for feeding recorded accesses to a simulated structure. It performs:
//! 1. **Trace parsing:** One address per line, hexadecimal (`0x` prefix) or decimal; `#` comments and blank lines are skipped.
//! 2. **Configuration loading:** JSON into [`SimConfig`], validated before use.
//! 3. **Replay:** Accesses are applied strictly in trace order.

use std::io::{BufRead, Read};

use crate::common::error::TraceError;
use crate::config::SimConfig;
use crate::core::units::cache::CacheSim;
use crate::core::units::mmu::Tlb;
use crate::stats::AccessStats;

/// Parses a single trace token into an address.
///
/// # Returns
///
/// `None` if the token is neither `0x`-prefixed hexadecimal nor decimal.
pub fn parse_address(token: &str) -> Option<u64> {
    let token = token.trim();
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16).ok()
    } else {
        token.parse().ok()
    }
}

/// Reads a whole trace.
///
/// # Errors
///
/// Returns [`TraceError::Io`] if reading fails and [`TraceError::Parse`]
/// for the first malformed line.
pub fn parse_trace<R: BufRead>(reader: R) -> Result<Vec<u64>, TraceError> {
    let mut addrs = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let addr = parse_address(text).ok_or_else(|| TraceError::Parse {
            line: idx + 1,
            text: text.to_string(),
        })?;
        addrs.push(addr);
    }
    Ok(addrs)
}

/// Reads and validates a JSON configuration.
///
/// # Errors
///
/// Returns [`TraceError::Json`] for malformed JSON and
/// [`TraceError::Config`] for rejected parameters.
pub fn load_config<R: Read>(reader: R) -> Result<SimConfig, TraceError> {
    let config: SimConfig = serde_json::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}

/// Replays `addrs` against `cache` in order.
///
/// # Returns
///
/// The counters accumulated by this replay alone.
pub fn replay<I>(cache: &mut CacheSim, addrs: I) -> AccessStats
where
    I: IntoIterator<Item = u64>,
{
    let before = *cache.stats();
    for addr in addrs {
        let _hit = cache.access(addr);
    }
    let after = cache.stats();
    let stats = AccessStats {
        accesses: after.accesses - before.accesses,
        hits: after.hits - before.hits,
        misses: after.misses - before.misses,
        evictions: after.evictions - before.evictions,
    };
    tracing::debug!(
        accesses = stats.accesses,
        misses = stats.misses,
        policy = cache.policy_name(),
        "replay finished"
    );
    stats
}

/// Replays `addrs` as virtual addresses through `tlb` in order.
///
/// # Returns
///
/// The counters accumulated by this replay alone.
pub fn replay_tlb<I>(tlb: &mut Tlb, addrs: I) -> AccessStats
where
    I: IntoIterator<Item = u64>,
{
    replay(tlb.cache_mut(), addrs)
}
