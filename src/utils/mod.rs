//! Utility functions shared by the analyzers.
//!
//! This module provides:
//! - All-settle joining of spawned analysis tasks

mod settle;

pub use settle::{settle, settle_all, Settled};
