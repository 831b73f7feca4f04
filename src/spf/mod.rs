//! SPF analysis.
//!
//! Fetches the domain's TXT records, validates that exactly one `v=spf1`
//! record is published, tokenizes it into mechanisms, scores it and probes how
//! it evaluates for a fixed set of sender addresses.

mod probe;
mod record;
mod rules;

use serde::Serialize;

use crate::config::{SPF_MAX_SCORE, SPF_PROBE_ADDRESSES};
use crate::dns::DnsResolver;
use crate::error_handling::DnsError;
use crate::report::ProtocolReport;
use crate::scoring::{Bands, ScoreCard};

pub use probe::{ProbeResult, SpfOutcome};
pub use record::{is_spf_record, Mechanism, MechanismKind, SpfRecord};

use rules::{SpfContext, SPF_RULES};

/// SPF-specific fields of a successful report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpfDetails {
    pub lookups: usize,
    pub policy: Option<String>,
    pub mechanisms: Vec<Mechanism>,
    pub ip_test_results: Vec<ProbeResult>,
    pub verification: Option<SpfOutcome>,
}

pub type SpfReport = ProtocolReport<SpfDetails>;

/// Analyzes the SPF record published for `domain`.
///
/// Never fails: a resolver fault becomes a failed report carrying the error text.
pub async fn analyze_spf<R: DnsResolver>(resolver: &R, domain: &str) -> SpfReport {
    match try_analyze_spf(resolver, domain).await {
        Ok(report) => {
            log::debug!(
                "SPF analysis for {domain}: success={} score={:?}",
                report.success,
                report.score.as_ref().map(|s| s.value)
            );
            report
        }
        Err(e) => {
            log::warn!("SPF analysis for {domain} failed: {e}");
            SpfReport::failure(domain, e.to_string())
        }
    }
}

async fn try_analyze_spf<R: DnsResolver>(resolver: &R, domain: &str) -> Result<SpfReport, DnsError> {
    let txt_records = resolver.lookup_txt(domain).await?;
    let spf_records: Vec<&str> = txt_records
        .iter()
        .map(|r| r.trim())
        .filter(|r| is_spf_record(r))
        .collect();

    let raw = match spf_records.as_slice() {
        [] => return Ok(not_found(domain)),
        [single] => *single,
        multiple => return Ok(multiple_records(domain, multiple)),
    };

    let ctx = SpfContext::new(domain, SpfRecord::parse(raw));
    let card = ScoreCard::evaluate(SPF_RULES, &ctx);

    let ip_test_results =
        probe::run_probes(resolver, domain, &ctx.record.mechanisms, &SPF_PROBE_ADDRESSES).await;
    let verification = probe::representative(&ip_test_results);

    let details = SpfDetails {
        lookups: ctx.lookups,
        policy: ctx.record.policy().map(|m| m.original.clone()),
        mechanisms: ctx.record.mechanisms.clone(),
        ip_test_results,
        verification,
    };

    Ok(SpfReport::scored(
        domain,
        Some(ctx.record.raw.clone()),
        card.score(SPF_MAX_SCORE, Bands::STANDARD),
        details,
    )
    .with_warnings(card.warnings)
    .with_recommendations(card.recommendations))
}

fn not_found(domain: &str) -> SpfReport {
    SpfReport::failure(domain, "No SPF record found").with_recommendations([
        "Add an SPF TXT record listing the servers allowed to send mail for this domain",
        "Example: v=spf1 include:_spf.google.com ~all",
    ])
}

fn multiple_records(domain: &str, records: &[&str]) -> SpfReport {
    SpfReport::failure(domain, "Fatal: Multiple SPF records found")
        .with_raw_record(records.join("\n"))
        .with_warnings([format!(
            "{} SPF records are published; RFC 7208 allows exactly one, so receivers return permerror and SPF fails for every message",
            records.len()
        )])
        .with_recommendations([
            "Merge all SPF records into a single TXT record that starts with v=spf1",
        ])
}

#[cfg(test)]
mod tests;
