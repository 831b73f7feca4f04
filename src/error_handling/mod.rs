//! Error handling.
//!
//! Errors are split by where they surface:
//! - **Initialization**: logger or resolver setup failed
//! - **DNS**: a resolver fault (absence of records is never an error)
//! - **Domain input**: a user-supplied domain could not be normalized
//! - **Key check**: the best-effort DKIM key check could not complete
//!
//! Analyzer operations never return these to their callers; they fold them
//! into a failed `ProtocolReport` instead.

mod types;

// Re-export public API
pub use types::{DnsError, DomainError, InitializationError, KeyCheckError};
