//! DNS resolver initialization.
//!
//! This module builds the resolver behind the DNS resolution adapter from a
//! fixed list of upstream servers.

use std::time::Duration;

use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;

use crate::config::ResolverSettings;
use crate::dns::HickoryResolver;
use crate::error_handling::InitializationError;

/// Initializes the DNS resolver used by every analyzer.
///
/// Only the configured upstream servers are queried; system configuration
/// (`/etc/resolv.conf`, search domains) is ignored.
///
/// # Errors
///
/// Returns `InitializationError::DnsResolverError` if no upstream server is configured.
pub fn init_resolver(settings: &ResolverSettings) -> Result<HickoryResolver, InitializationError> {
    if settings.servers.is_empty() {
        return Err(InitializationError::DnsResolverError(
            "no upstream DNS servers configured".to_string(),
        ));
    }

    let mut opts = ResolverOpts::default();
    opts.timeout = Duration::from_secs(settings.timeout_secs);
    opts.attempts = settings.attempts;
    // Names are always absolute; never append search domains
    opts.ndots = 0;

    let servers = NameServerConfigGroup::from_ips_clear(&settings.servers, 53, true);
    let config = ResolverConfig::from_parts(None, vec![], servers);

    log::debug!(
        "DNS resolver configured with upstreams {:?} (timeout {}s, {} attempts)",
        settings.servers,
        settings.timeout_secs,
        settings.attempts
    );

    Ok(HickoryResolver::new(TokioAsyncResolver::tokio(config, opts)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_resolver_with_default_pair() {
        let result = init_resolver(&ResolverSettings::default());
        assert!(result.is_ok());
    }

    #[test]
    fn test_init_resolver_rejects_empty_server_list() {
        let settings = ResolverSettings {
            servers: Vec::new(),
            ..Default::default()
        };
        let result = init_resolver(&settings);
        assert!(matches!(
            result,
            Err(InitializationError::DnsResolverError(_))
        ));
    }
}
