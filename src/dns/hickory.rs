//! `hickory-resolver` backed implementation of the DNS adapter.

use std::net::{Ipv4Addr, Ipv6Addr};

use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::TokioAsyncResolver;

use super::DnsResolver;
use crate::error_handling::DnsError;

/// DNS adapter over a `TokioAsyncResolver` with fixed upstreams.
///
/// Build it with [`init_resolver`](crate::initialization::init_resolver).
#[derive(Clone)]
pub struct HickoryResolver {
    resolver: TokioAsyncResolver,
}

impl HickoryResolver {
    /// Wraps an already configured resolver.
    pub fn new(resolver: TokioAsyncResolver) -> Self {
        Self { resolver }
    }
}

/// Only NXDOMAIN and NOERROR/NODATA mean "absent"; any other code is a fault.
fn classify_response(name: &str, response_code: ResponseCode) -> Result<(), DnsError> {
    match response_code {
        ResponseCode::NXDomain | ResponseCode::NoError => Ok(()),
        ResponseCode::ServFail => Err(DnsError::ServFail(name.to_string())),
        ResponseCode::Refused => Err(DnsError::Refused(name.to_string())),
        other => Err(DnsError::Other {
            name: name.to_string(),
            cause: format!("{other}"),
        }),
    }
}

/// Maps a resolver error to "absent" (`Ok`) or a fault (`Err`).
///
/// SERVFAIL, REFUSED and the other error codes arrive as `NoRecordsFound`
/// too, so the response code decides.
fn absent_or_fault(name: &str, record_type: &str, e: &ResolveError) -> Result<(), DnsError> {
    let fault = match e.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => {
            match classify_response(name, *response_code) {
                Ok(()) => return Ok(()),
                Err(fault) => fault,
            }
        }
        ResolveErrorKind::Timeout => DnsError::Timeout(name.to_string()),
        _ => {
            let error_msg = e.to_string();
            if error_msg.contains("no records found") || error_msg.contains("NXDomain") {
                return Ok(());
            }
            if error_msg.contains("timeout") || error_msg.contains("timed out") {
                DnsError::Timeout(name.to_string())
            } else {
                DnsError::Other {
                    name: name.to_string(),
                    cause: error_msg,
                }
            }
        }
    };

    log::warn!("{record_type} lookup failed for {name}: {fault}");
    Err(fault)
}

impl DnsResolver for HickoryResolver {
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, DnsError> {
        match self.resolver.txt_lookup(name).await {
            Ok(lookup) => Ok(lookup
                .iter()
                .map(|txt| {
                    // A TXT record may be split into several character-strings
                    txt.iter()
                        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
                        .collect::<String>()
                })
                .collect()),
            Err(e) => absent_or_fault(name, "TXT", &e).map(|()| Vec::new()),
        }
    }

    async fn lookup_mx(&self, name: &str) -> Result<Vec<(u16, String)>, DnsError> {
        match self.resolver.mx_lookup(name).await {
            Ok(lookup) => Ok(lookup
                .iter()
                .map(|mx| (mx.preference(), mx.exchange().to_utf8()))
                .collect()),
            Err(e) => absent_or_fault(name, "MX", &e).map(|()| Vec::new()),
        }
    }

    async fn lookup_a(&self, name: &str) -> Result<Vec<Ipv4Addr>, DnsError> {
        match self.resolver.ipv4_lookup(name).await {
            Ok(lookup) => Ok(lookup.iter().map(|a| a.0).collect()),
            Err(e) => absent_or_fault(name, "A", &e).map(|()| Vec::new()),
        }
    }

    async fn lookup_aaaa(&self, name: &str) -> Result<Vec<Ipv6Addr>, DnsError> {
        match self.resolver.ipv6_lookup(name).await {
            Ok(lookup) => Ok(lookup.iter().map(|aaaa| aaaa.0).collect()),
            Err(e) => absent_or_fault(name, "AAAA", &e).map(|()| Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_nxdomain_and_nodata_are_absence() {
        assert_eq!(classify_response("example.com", ResponseCode::NXDomain), Ok(()));
        assert_eq!(classify_response("example.com", ResponseCode::NoError), Ok(()));
    }

    #[test]
    fn test_servfail_and_refused_keep_their_kind() {
        assert_eq!(
            classify_response("example.com", ResponseCode::ServFail),
            Err(DnsError::ServFail("example.com".into()))
        );
        assert_eq!(
            classify_response("example.com", ResponseCode::Refused),
            Err(DnsError::Refused("example.com".into()))
        );
    }

    #[test]
    fn test_other_response_codes_are_faults() {
        for code in [
            ResponseCode::FormErr,
            ResponseCode::NotImp,
            ResponseCode::YXDomain,
            ResponseCode::BADVERS,
        ] {
            let result = classify_response("example.com", code);
            assert!(
                matches!(&result, Err(DnsError::Other { name, .. }) if name == "example.com"),
                "{code:?} should be a fault, got {result:?}"
            );
        }
    }

    #[test]
    fn test_timeout_is_a_fault() {
        let e = ResolveError::from(ResolveErrorKind::Timeout);
        assert_eq!(
            absent_or_fault("example.com", "TXT", &e),
            Err(DnsError::Timeout("example.com".into()))
        );
    }

    #[test]
    fn test_unclassified_error_keeps_its_cause() {
        let e = ResolveError::from(ResolveErrorKind::Message("connection reset"));
        assert_eq!(
            absent_or_fault("example.com", "MX", &e),
            Err(DnsError::Other {
                name: "example.com".into(),
                cause: "connection reset".into(),
            })
        );
    }
}
