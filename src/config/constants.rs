//! Configuration constants.
//!
//! This module defines the thresholds, ceilings and defaults used by the
//! analyzers, the DNS adapter and the admission ledger.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

// Network operation timeouts
/// DNS query timeout in seconds
/// Most DNS queries complete in <1s, 3s provides good buffer while failing fast
pub const DNS_TIMEOUT_SECS: u64 = 3;
/// Number of attempts per upstream before a query is reported as failed
pub const DNS_ATTEMPTS: usize = 2;

/// Default upstream resolver pair (Google, Cloudflare).
///
/// The adapter never falls back to system configuration; these two servers are
/// used unless `--dns-servers` overrides them.
pub const DEFAULT_DNS_SERVERS: [IpAddr; 2] = [
    IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)),
    IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)),
];

/// Default DKIM selector when the caller does not supply one
pub const DEFAULT_DKIM_SELECTOR: &str = "default";

// SPF
/// RFC 7208 §4.6.4 hard cap on DNS-querying mechanisms
pub const SPF_MAX_LOOKUPS: usize = 10;
/// Above this count the record is reported as approaching the cap
pub const SPF_LOOKUP_WARNING_THRESHOLD: usize = 8;
/// Above this count a monitoring note is emitted
pub const SPF_LOOKUP_NOTICE_THRESHOLD: usize = 5;
/// Single TXT character-string limit; longer records rely on chunking
pub const SPF_MAX_RECORD_LENGTH: usize = 255;
/// SPF score ceiling
pub const SPF_MAX_SCORE: f64 = 5.0;
/// Maximum MX exchanges resolved while evaluating an `mx` mechanism (RFC 7208 §4.6.4)
pub const SPF_MAX_MX_EXCHANGES: usize = 10;

/// Source addresses used to probe SPF evaluation.
///
/// Public resolver addresses from different networks, so that a policy that
/// only authorizes one provider shows up as mixed results.
pub const SPF_PROBE_ADDRESSES: [IpAddr; 4] = [
    IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)),
    IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)),
    IpAddr::V4(Ipv4Addr::new(149, 112, 112, 112)),
    IpAddr::V4(Ipv4Addr::new(208, 67, 222, 222)),
];

// DKIM
/// DKIM score ceiling
pub const DKIM_MAX_SCORE: f64 = 5.0;
/// Public key payloads longer than this (base64 chars) count as strong keys
pub const DKIM_STRONG_KEY_CHARS: usize = 300;
/// Public key payloads shorter than this (base64 chars) are flagged as weak
pub const DKIM_WEAK_KEY_CHARS: usize = 200;
/// Selectors suggested when the requested selector has no record
pub const COMMON_DKIM_SELECTORS: &[&str] = &[
    "default",
    "google",
    "selector1",
    "selector2",
    "k1",
    "dkim",
    "mail",
    "s1",
];

// DMARC
/// DMARC score ceiling
pub const DMARC_MAX_SCORE: f64 = 5.0;

// MX
/// MX score ceiling
pub const MX_MAX_SCORE: f64 = 3.0;
/// Priorities above this value get a recommendation to use lower numbers
pub const MX_HIGH_PRIORITY_THRESHOLD: u16 = 50;

// Aggregate
/// Scale of the overall posture score
pub const OVERALL_SCORE_SCALE: f64 = 10.0;
/// Number of protocol analyses in an aggregate report
pub const TOTAL_CHECKS: usize = 4;

// Admission ledger
/// Requests admitted per caller address per window
pub const ADMISSION_MAX_REQUESTS: u32 = 10;
/// Length of one admission window
pub const ADMISSION_WINDOW: Duration = Duration::from_secs(15 * 60);
/// Interval of the background sweep that evicts expired ledger entries
pub const ADMISSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

// Input handling
/// Longest domain name accepted at the input boundary (RFC 1035)
pub const MAX_DOMAIN_LENGTH: usize = 253;
/// Domains analyzed at the same time by the CLI
pub const MAX_CONCURRENT_DOMAINS: usize = 4;
