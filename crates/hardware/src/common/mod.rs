//! Common types shared across the simulator.
//!
//! This module currently holds the error taxonomy used by configuration
//! validation and trace loading.

/// Error types for configuration and trace handling.
pub mod error;

pub use error::{ConfigError, TraceError};
