//! Error type definitions.
//!
//! This module defines the error types used throughout the application.

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the DNS resolver.
    #[error("DNS resolver initialization error: {0}")]
    DnsResolverError(String),
}

/// A DNS resolution failure.
///
/// "No records" and NXDOMAIN are not errors: the adapter reports them as an
/// empty result. Everything here is a genuine fault.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DnsError {
    /// The upstream did not answer in time.
    #[error("DNS query for {0} timed out")]
    Timeout(String),

    /// The upstream answered SERVFAIL.
    #[error("DNS server failure (SERVFAIL) for {0}")]
    ServFail(String),

    /// The upstream refused the query.
    #[error("DNS query for {0} was refused")]
    Refused(String),

    /// Any other resolver failure, with the underlying cause.
    #[error("DNS lookup failed for {name}: {cause}")]
    Other {
        /// Queried name
        name: String,
        /// Underlying resolver error text
        cause: String,
    },
}

/// Error types for rejected domain input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Nothing left after stripping scheme, path and `www.`.
    #[error("Domain is empty")]
    Empty,

    /// Longer than the DNS name limit.
    #[error("Domain exceeds {max} characters ({len})")]
    TooLong {
        /// Observed length
        len: usize,
        /// Maximum accepted length
        max: usize,
    },

    /// Contains characters that cannot appear in a host name.
    #[error("Domain contains invalid characters: {0}")]
    InvalidCharacters(String),

    /// A URL was supplied but no host could be extracted from it.
    #[error("Failed to extract host from {0}")]
    NoHost(String),
}

/// Why the structural check of a DKIM public key could not complete.
///
/// Never surfaced in a report: the check is best-effort corroboration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyCheckError {
    /// `p=` is not valid base64.
    #[error("Public key is not valid base64: {0}")]
    Base64(String),

    /// The RSA key is not a DER SubjectPublicKeyInfo.
    #[error("Public key is not a valid SubjectPublicKeyInfo: {0}")]
    Spki(String),

    /// An Ed25519 key must be exactly 32 bytes.
    #[error("Ed25519 public key has {0} bytes, expected 32")]
    Ed25519Length(usize),

    /// The signature skeleton does not agree with the key record.
    #[error("Signature skeleton is inconsistent with the key record: {0}")]
    Inconsistent(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dns_error_messages_carry_the_name() {
        assert_eq!(
            DnsError::Timeout("_dmarc.example.com".into()).to_string(),
            "DNS query for _dmarc.example.com timed out"
        );
        assert_eq!(
            DnsError::Other {
                name: "example.com".into(),
                cause: "connection reset".into()
            }
            .to_string(),
            "DNS lookup failed for example.com: connection reset"
        );
    }

    #[test]
    fn test_domain_error_messages() {
        assert_eq!(DomainError::Empty.to_string(), "Domain is empty");
        assert_eq!(
            DomainError::TooLong { len: 300, max: 253 }.to_string(),
            "Domain exceeds 253 characters (300)"
        );
    }

    #[test]
    fn test_key_check_error_messages() {
        assert_eq!(
            KeyCheckError::Ed25519Length(31).to_string(),
            "Ed25519 public key has 31 bytes, expected 32"
        );
    }

    #[test]
    fn test_dns_error_equality() {
        assert_eq!(
            DnsError::ServFail("a.example".into()),
            DnsError::ServFail("a.example".into())
        );
        assert_ne!(
            DnsError::ServFail("a.example".into()),
            DnsError::Refused("a.example".into())
        );
    }
}
