//! DNS resolution adapter.
//!
//! Analyzers talk to DNS through the [`DnsResolver`] trait:
//! - TXT records (SPF, DKIM, DMARC), with multi-string records joined
//! - MX records as `(priority, exchange)` pairs
//! - A / AAAA records for SPF `a` and `mx` mechanism probes
//!
//! "No records" and NXDOMAIN come back as an empty `Ok` result. Only genuine
//! resolver faults are reported as [`DnsError`](crate::error_handling::DnsError),
//! so callers can tell "record absent" apart from "resolution failed".

mod hickory;
mod mock;

use std::future::Future;
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::error_handling::DnsError;

// Re-export public API
pub use hickory::HickoryResolver;
pub use mock::MockResolver;

/// Async DNS lookups used by the analyzers.
pub trait DnsResolver: Clone + Send + Sync + 'static {
    /// TXT records for `name`, one string per record.
    fn lookup_txt(&self, name: &str) -> impl Future<Output = Result<Vec<String>, DnsError>> + Send;

    /// MX records for `name` as `(priority, exchange)` in resolver order.
    fn lookup_mx(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Vec<(u16, String)>, DnsError>> + Send;

    /// IPv4 addresses for `name`.
    fn lookup_a(&self, name: &str) -> impl Future<Output = Result<Vec<Ipv4Addr>, DnsError>> + Send;

    /// IPv6 addresses for `name`.
    fn lookup_aaaa(&self, name: &str)
        -> impl Future<Output = Result<Vec<Ipv6Addr>, DnsError>> + Send;
}

/// Canonical form of a queried name: lower-case, no trailing dot.
pub(crate) fn canonical_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests;
