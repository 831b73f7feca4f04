//! Main application modules.
//!
//! This module provides domain input handling and report rendering used by
//! the CLI.

pub mod domain;
pub mod input;
pub mod output;

// Re-export public API
pub use domain::{normalize_all, normalize_domain};
pub use input::read_domain_file;
pub use output::{json_report, summary_line};
