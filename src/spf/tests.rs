//! SPF analyzer tests.

use super::*;
use crate::dns::MockResolver;
use crate::scoring::ScoreLevel;

fn resolver_with(domain: &str, records: &[&str]) -> MockResolver {
    let resolver = MockResolver::new();
    resolver.add_txt(domain, records);
    resolver
}

#[tokio::test]
async fn test_no_txt_records() {
    let resolver = MockResolver::new();
    let report = analyze_spf(&resolver, "example.com").await;
    assert!(!report.success);
    assert!(report.error.as_deref().unwrap().contains("No SPF record found"));
    assert!(report.score.is_none());
    assert!(!report.recommendations.is_empty());
}

#[tokio::test]
async fn test_txt_records_without_spf() {
    let resolver = resolver_with("example.com", &["google-site-verification=abc"]);
    let report = analyze_spf(&resolver, "example.com").await;
    assert!(!report.success);
    assert_eq!(report.error.as_deref(), Some("No SPF record found"));
}

#[tokio::test]
async fn test_multiple_spf_records_is_fatal() {
    let resolver = resolver_with("example.com", &["v=spf1 -all", "v=spf1 include:_spf.example.net ~all"]);
    let report = analyze_spf(&resolver, "example.com").await;
    assert!(!report.success);
    assert!(report.error.as_deref().unwrap().contains("Multiple SPF records"));
    assert!(report.score.is_none());
    let raw = report.raw_record.unwrap();
    assert!(raw.contains("v=spf1 -all") && raw.contains("_spf.example.net"));
    assert!(report.warnings[0].contains("RFC 7208"));
}

#[tokio::test]
async fn test_include_lookups_and_policy() {
    let resolver = resolver_with(
        "example.com",
        &["v=spf1 include:_spf.example.com include:_spf.other.com ~all"],
    );
    let report = analyze_spf(&resolver, "example.com").await;
    assert!(report.success);
    let details = report.details.unwrap();
    assert_eq!(details.lookups, 2);
    assert_eq!(details.policy.as_deref(), Some("~all"));
    assert_eq!(details.mechanisms.len(), 3);
    assert_eq!(details.mechanisms[0].kind, MechanismKind::Include);
}

#[tokio::test]
async fn test_too_many_lookups_is_first_warning() {
    let includes: Vec<String> = (0..11).map(|i| format!("include:_spf{i}.example.net")).collect();
    let record = format!("v=spf1 ptr {} ~all", includes.join(" "));
    let resolver = resolver_with("example.com", &[&record]);

    let report = analyze_spf(&resolver, "example.com").await;
    assert!(report.success);
    assert_eq!(report.details.as_ref().unwrap().lookups, 11);
    assert!(report.warnings[0].starts_with("Fatal:"));
    assert!(report.recommendations[0].starts_with("Reduce DNS lookups"));
    // The ptr warning is still reported, after the fatal one
    assert!(report.warnings.iter().skip(1).any(|w| w.contains("ptr")));
}

#[tokio::test]
async fn test_strong_record_scores_excellent() {
    let resolver = resolver_with("example.com", &["v=spf1 ip4:8.8.8.0/24 -all"]);
    let report = analyze_spf(&resolver, "example.com").await;
    let score = report.score.unwrap();
    assert_eq!(score.value, 5.0);
    assert_eq!(score.out_of, 5.0);
    assert_eq!(score.level, ScoreLevel::Excellent);
}

#[tokio::test]
async fn test_open_record_scores_poorly() {
    let resolver = resolver_with("example.com", &["v=spf1 +all"]);
    let report = analyze_spf(&resolver, "example.com").await;
    assert!(report.warnings.iter().any(|w| w.contains("dangerous")));
    let score = report.score.unwrap();
    assert_eq!(score.value, 3.0);
    assert!(score.level < ScoreLevel::Excellent);
}

#[tokio::test]
async fn test_probes_run_in_fixed_order() {
    let resolver = resolver_with("example.com", &["v=spf1 ip4:1.1.1.1 -all"]);
    let report = analyze_spf(&resolver, "example.com").await;
    let details = report.details.unwrap();

    let ips: Vec<_> = details.ip_test_results.iter().map(|r| r.ip).collect();
    assert_eq!(ips, SPF_PROBE_ADDRESSES.to_vec());
    assert_eq!(details.ip_test_results[0].result, SpfOutcome::Fail);
    assert_eq!(details.ip_test_results[1].result, SpfOutcome::Pass);
    assert_eq!(details.verification, Some(SpfOutcome::Fail));
}

#[tokio::test]
async fn test_probe_faults_do_not_fail_analysis() {
    let resolver = resolver_with("example.com", &["v=spf1 a:broken.example.com -all"]);
    resolver.fail("broken.example.com", DnsError::Timeout("broken.example.com".into()));

    let report = analyze_spf(&resolver, "example.com").await;
    assert!(report.success);
    let details = report.details.unwrap();
    assert!(details.ip_test_results.iter().all(|r| r.result == SpfOutcome::Error));
    assert_eq!(details.verification, None);
}

#[tokio::test]
async fn test_resolver_fault_carries_raw_error() {
    let resolver = MockResolver::new();
    resolver.fail("example.com", DnsError::ServFail("example.com".into()));
    let report = analyze_spf(&resolver, "example.com").await;
    assert!(!report.success);
    assert_eq!(
        report.error.as_deref(),
        Some("DNS server failure (SERVFAIL) for example.com")
    );
}

#[tokio::test]
async fn test_redirect_and_bare_mechanisms_recommendations() {
    let resolver = resolver_with("example.com", &["v=spf1 mx a redirect=_spf.example.net"]);
    let report = analyze_spf(&resolver, "example.com").await;
    assert!(report.recommendations[0].contains("_spf.example.net"));
    assert!(report.recommendations.iter().any(|r| r.contains("Bare")));
    assert!(report.warnings.iter().any(|w| w.contains("No 'all' mechanism")));
    assert_eq!(report.details.unwrap().lookups, 3);
}

#[tokio::test]
async fn test_report_json_shape() {
    let resolver = resolver_with("example.com", &["v=spf1 include:_spf.example.com ~all"]);
    let report = analyze_spf(&resolver, "example.com").await;
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["rawRecord"], "v=spf1 include:_spf.example.com ~all");
    assert_eq!(json["lookups"], 1);
    assert_eq!(json["policy"], "~all");
    assert_eq!(json["mechanisms"][0]["type"], "include");
    assert_eq!(json["ipTestResults"].as_array().unwrap().len(), 4);
    assert_eq!(json["ipTestResults"][0]["result"], "softfail");
    assert_eq!(json["verification"], "softfail");
}
