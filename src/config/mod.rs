//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, scoring ceilings, thresholds)
//! - CLI option types and parsing
//! - Resolver settings for the DNS adapter

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel, OutputFormat, ResolverSettings};
