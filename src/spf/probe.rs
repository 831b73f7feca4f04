//! Single-level SPF evaluation for the fixed probe addresses.
//!
//! `ip4`, `ip6`, `a`, `mx` and `all` are evaluated. `include`, `exists` and
//! `ptr` are never followed and never match, and macros are not expanded, so
//! the outcome shows how the record's own terms treat a sender.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use serde::Serialize;

use super::record::{Mechanism, MechanismKind, Qualifier};
use crate::config::SPF_MAX_MX_EXCHANGES;
use crate::dns::DnsResolver;
use crate::error_handling::DnsError;
use crate::utils::{settle_all, Settled};

/// Result of evaluating the record for one source address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpfOutcome {
    Pass,
    Fail,
    Softfail,
    Neutral,
    Error,
}

impl From<Qualifier> for SpfOutcome {
    fn from(q: Qualifier) -> Self {
        match q {
            Qualifier::Pass => SpfOutcome::Pass,
            Qualifier::Fail => SpfOutcome::Fail,
            Qualifier::SoftFail => SpfOutcome::Softfail,
            Qualifier::Neutral => SpfOutcome::Neutral,
        }
    }
}

/// Outcome of one probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub ip: IpAddr,
    pub result: SpfOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Check if an IPv4 address falls within a network/prefix.
/// prefix=0 matches all. prefix>32 matches none.
pub fn ip4_in_network(ip: Ipv4Addr, network: Ipv4Addr, prefix: u8) -> bool {
    if prefix == 0 {
        return true;
    }
    if prefix > 32 {
        return false;
    }
    let mask = !0u32 << (32 - prefix);
    (u32::from(ip) & mask) == (u32::from(network) & mask)
}

/// Check if an IPv6 address falls within a network/prefix.
/// prefix=0 matches all. prefix>128 matches none.
pub fn ip6_in_network(ip: Ipv6Addr, network: Ipv6Addr, prefix: u8) -> bool {
    if prefix == 0 {
        return true;
    }
    if prefix > 128 {
        return false;
    }
    let mask = !0u128 << (128 - prefix);
    (u128::from(ip) & mask) == (u128::from(network) & mask)
}

fn matches_literal(mechanism: &Mechanism, ip: IpAddr) -> bool {
    let Some(target) = mechanism.target.as_deref() else {
        return false;
    };
    match (mechanism.kind, ip) {
        (MechanismKind::Ip4, IpAddr::V4(ip)) => target
            .parse::<Ipv4Addr>()
            .is_ok_and(|net| ip4_in_network(ip, net, mechanism.cidr4.unwrap_or(32))),
        (MechanismKind::Ip6, IpAddr::V6(ip)) => target
            .parse::<Ipv6Addr>()
            .is_ok_and(|net| ip6_in_network(ip, net, mechanism.cidr6.unwrap_or(128))),
        _ => false,
    }
}

/// Whether any address of `host` covers `ip` under the mechanism's prefixes.
async fn host_covers<R: DnsResolver>(
    resolver: &R,
    host: &str,
    mechanism: &Mechanism,
    ip: IpAddr,
) -> Result<bool, DnsError> {
    match ip {
        IpAddr::V4(ip) => {
            let prefix = mechanism.cidr4.unwrap_or(32);
            let addrs = resolver.lookup_a(host).await?;
            Ok(addrs.into_iter().any(|net| ip4_in_network(ip, net, prefix)))
        }
        IpAddr::V6(ip) => {
            let prefix = mechanism.cidr6.unwrap_or(128);
            let addrs = resolver.lookup_aaaa(host).await?;
            Ok(addrs.into_iter().any(|net| ip6_in_network(ip, net, prefix)))
        }
    }
}

async fn mechanism_matches<R: DnsResolver>(
    resolver: &R,
    domain: &str,
    mechanism: &Mechanism,
    ip: IpAddr,
) -> Result<bool, DnsError> {
    let host = mechanism.target.as_deref().unwrap_or(domain);
    if host.contains('%') {
        // Macro targets are not expanded
        return Ok(false);
    }
    match mechanism.kind {
        MechanismKind::All => Ok(true),
        MechanismKind::Ip4 | MechanismKind::Ip6 => Ok(matches_literal(mechanism, ip)),
        MechanismKind::A => host_covers(resolver, host, mechanism, ip).await,
        MechanismKind::Mx => {
            let mut exchanges = resolver.lookup_mx(host).await?;
            exchanges.sort_by_key(|(priority, _)| *priority);
            for (_, exchange) in exchanges.iter().take(SPF_MAX_MX_EXCHANGES) {
                let exchange = exchange.trim_end_matches('.');
                if exchange.is_empty() {
                    continue;
                }
                if host_covers(resolver, exchange, mechanism, ip).await? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        _ => Ok(false),
    }
}

/// Evaluates the mechanisms in order for `ip`; the first match decides.
///
/// No match yields `neutral` (RFC 7208 §4.7).
pub async fn evaluate<R: DnsResolver>(
    resolver: &R,
    domain: &str,
    mechanisms: &[Mechanism],
    ip: IpAddr,
) -> Result<SpfOutcome, DnsError> {
    for mechanism in mechanisms {
        if mechanism_matches(resolver, domain, mechanism, ip).await? {
            return Ok(mechanism.qualifier.into());
        }
    }
    Ok(SpfOutcome::Neutral)
}

/// Runs one probe per address concurrently and returns the results in input order.
///
/// A failed probe, including a panicked probe task, becomes an `error` entry and
/// never affects the others.
pub async fn run_probes<R: DnsResolver>(
    resolver: &R,
    domain: &str,
    mechanisms: &[Mechanism],
    addresses: &[IpAddr],
) -> Vec<ProbeResult> {
    let mechanisms: Arc<[Mechanism]> = Arc::from(mechanisms);
    let handles = addresses
        .iter()
        .map(|&ip| {
            let resolver = resolver.clone();
            let domain = domain.to_string();
            let mechanisms = Arc::clone(&mechanisms);
            tokio::spawn(async move { evaluate(&resolver, &domain, &mechanisms, ip).await })
        })
        .collect();

    settle_all(handles)
        .await
        .into_iter()
        .zip(addresses)
        .map(|(settled, &ip)| match settled {
            Settled::Fulfilled(Ok(result)) => ProbeResult {
                ip,
                result,
                error: None,
            },
            Settled::Fulfilled(Err(e)) => ProbeResult {
                ip,
                result: SpfOutcome::Error,
                error: Some(e.to_string()),
            },
            Settled::Rejected(reason) => ProbeResult {
                ip,
                result: SpfOutcome::Error,
                error: Some(reason),
            },
        })
        .collect()
}

/// The first probe outcome that is not an error.
pub fn representative(results: &[ProbeResult]) -> Option<SpfOutcome> {
    results
        .iter()
        .map(|r| r.result)
        .find(|result| *result != SpfOutcome::Error)
}
