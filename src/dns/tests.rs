//! DNS module tests.

use super::*;
use crate::config::ResolverSettings;
use crate::initialization::init_resolver;

#[tokio::test]
async fn test_mock_txt_lookup_returns_records() {
    let resolver = MockResolver::new();
    resolver.add_txt("example.com", &["v=spf1 -all", "google-site-verification=abc"]);

    let records = resolver.lookup_txt("example.com").await.unwrap();
    assert_eq!(records, vec!["v=spf1 -all", "google-site-verification=abc"]);
}

#[tokio::test]
async fn test_mock_unknown_name_is_empty_not_error() {
    let resolver = MockResolver::new();
    let records = resolver.lookup_txt("nothing-here.example").await;
    assert_eq!(records, Ok(Vec::new()));
    let mx = resolver.lookup_mx("nothing-here.example").await;
    assert_eq!(mx, Ok(Vec::new()));
}

#[tokio::test]
async fn test_mock_names_are_case_and_dot_insensitive() {
    let resolver = MockResolver::new();
    resolver.add_mx("Example.COM.", &[(10, "mx1.example.com.")]);

    let mx = resolver.lookup_mx("example.com").await.unwrap();
    assert_eq!(mx, vec![(10, "mx1.example.com.".to_string())]);
}

#[tokio::test]
async fn test_mock_injected_failure_is_returned() {
    let resolver = MockResolver::new();
    resolver.add_txt("example.com", &["v=spf1 -all"]);
    resolver.fail("example.com", DnsError::ServFail("example.com".into()));

    let result = resolver.lookup_txt("example.com").await;
    assert_eq!(result, Err(DnsError::ServFail("example.com".into())));
}

#[tokio::test]
async fn test_mock_clones_share_zone() {
    let resolver = MockResolver::new();
    let clone = resolver.clone();
    clone.add_a("host.example.com", &["192.0.2.10".parse().unwrap()]);

    let addrs = resolver.lookup_a("host.example.com").await.unwrap();
    assert_eq!(addrs, vec!["192.0.2.10".parse::<std::net::Ipv4Addr>().unwrap()]);
}

#[test]
fn test_canonical_name() {
    assert_eq!(canonical_name(" Mail.Example.com. "), "mail.example.com");
    assert_eq!(canonical_name("."), "");
}

// The tests below talk to the configured public upstreams and need network access.

#[tokio::test]
#[ignore]
async fn test_hickory_txt_lookup_live() {
    let resolver = init_resolver(&ResolverSettings::default()).unwrap();
    let result = resolver.lookup_txt("google.com").await;
    assert!(result.is_ok(), "TXT lookup should succeed for google.com");
}

#[tokio::test]
#[ignore]
async fn test_hickory_nxdomain_is_empty_live() {
    let resolver = init_resolver(&ResolverSettings::default()).unwrap();
    let result = resolver
        .lookup_txt("definitely-does-not-exist-12345.invalid")
        .await;
    match result {
        Ok(records) => assert!(records.is_empty()),
        Err(e) => {
            // A fault is acceptable (e.g. no network), "not found" is not
            let msg = e.to_string().to_lowercase();
            assert!(!msg.contains("no records found") && !msg.contains("nxdomain"));
        }
    }
}

#[tokio::test]
#[ignore]
async fn test_hickory_mx_lookup_live() {
    let resolver = init_resolver(&ResolverSettings::default()).unwrap();
    let mx = resolver.lookup_mx("gmail.com").await.unwrap();
    assert!(!mx.is_empty(), "gmail.com should have MX records");
}
