//! DMARC analysis.
//!
//! Reads the policy published at `_dmarc.<domain>` and scores how strictly
//! failing mail is handled and whether the owner gets reports about it.

mod record;
mod rules;

use serde::Serialize;

use crate::config::DMARC_MAX_SCORE;
use crate::dns::DnsResolver;
use crate::error_handling::DnsError;
use crate::report::ProtocolReport;
use crate::scoring::{Bands, ScoreCard};

pub use record::{is_dmarc_record, DmarcTags, Policy};

use rules::DMARC_RULES;

/// DMARC-specific fields of a successful report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DmarcDetails {
    pub parsed: DmarcTags,
}

pub type DmarcReport = ProtocolReport<DmarcDetails>;

/// Analyzes the DMARC policy published for `domain`.
pub async fn analyze_dmarc<R: DnsResolver>(resolver: &R, domain: &str) -> DmarcReport {
    match try_analyze_dmarc(resolver, domain).await {
        Ok(report) => {
            log::debug!(
                "DMARC analysis for {domain}: success={} score={:?}",
                report.success,
                report.score.as_ref().map(|s| s.value)
            );
            report
        }
        Err(e) => {
            log::warn!("DMARC analysis for {domain} failed: {e}");
            DmarcReport::failure(domain, e.to_string())
        }
    }
}

async fn try_analyze_dmarc<R: DnsResolver>(
    resolver: &R,
    domain: &str,
) -> Result<DmarcReport, DnsError> {
    let name = format!("_dmarc.{domain}");
    let txt_records = resolver.lookup_txt(&name).await?;
    let dmarc_records: Vec<&str> = txt_records
        .iter()
        .map(|r| r.trim())
        .filter(|r| is_dmarc_record(r))
        .collect();

    let raw = match dmarc_records.as_slice() {
        [] => {
            return Ok(DmarcReport::failure(domain, "No DMARC record found").with_recommendations([
                format!("Publish a DMARC record as a TXT record at {name}"),
                format!("Start with v=DMARC1; p=none; rua=mailto:dmarc-reports@{domain} and tighten the policy once reports look clean"),
            ]))
        }
        [single] => *single,
        multiple => {
            return Ok(DmarcReport::failure(domain, "Fatal: Multiple DMARC records found")
                .with_raw_record(multiple.join("\n"))
                .with_warnings([format!(
                    "{} DMARC records are published at {name}; receivers ignore DMARC entirely when more than one exists",
                    multiple.len()
                )])
                .with_recommendations(["Remove all but one DMARC record"]))
        }
    };

    let Some(tags) = DmarcTags::parse(raw) else {
        return Ok(
            DmarcReport::failure(domain, "Invalid DMARC record: missing or invalid p= tag")
                .with_raw_record(raw)
                .with_recommendations(["Set p= to none, quarantine or reject"]),
        );
    };

    let card = ScoreCard::evaluate(DMARC_RULES, &tags);
    Ok(DmarcReport::scored(
        domain,
        Some(raw.to_string()),
        card.score(DMARC_MAX_SCORE, Bands::STANDARD),
        DmarcDetails { parsed: tags },
    )
    .with_warnings(card.warnings)
    .with_recommendations(card.recommendations))
}
