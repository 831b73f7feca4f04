//! MX analysis.
//!
//! Scores mail-server redundancy and priority hygiene, and annotates the
//! exchanges with known hosting providers. A sole null MX (RFC 7505) means the
//! domain refuses mail and overrides the normal scoring.

mod providers;
mod rules;

use serde::Serialize;

use crate::config::MX_MAX_SCORE;
use crate::dns::DnsResolver;
use crate::error_handling::DnsError;
use crate::report::ProtocolReport;
use crate::scoring::{round_one_decimal, Bands, Score, ScoreCard};

pub use providers::detect_providers;

use rules::MX_RULES;

/// One MX record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MxRecord {
    pub priority: u16,
    pub exchange: String,
}

impl MxRecord {
    /// `.` or an empty exchange: the domain accepts no mail.
    pub fn is_null(&self) -> bool {
        self.exchange.trim().trim_end_matches('.').is_empty()
    }
}

/// MX-specific fields of a successful report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MxDetails {
    /// Sorted by ascending priority; ties keep resolver order.
    pub records: Vec<MxRecord>,
    pub providers: Vec<String>,
}

pub type MxReport = ProtocolReport<MxDetails>;

/// Analyzes the MX records published for `domain`.
pub async fn analyze_mx<R: DnsResolver>(resolver: &R, domain: &str) -> MxReport {
    match try_analyze_mx(resolver, domain).await {
        Ok(report) => {
            log::debug!(
                "MX analysis for {domain}: success={} score={:?}",
                report.success,
                report.score.as_ref().map(|s| s.value)
            );
            report
        }
        Err(e) => {
            log::warn!("MX analysis for {domain} failed: {e}");
            MxReport::failure(domain, e.to_string())
        }
    }
}

async fn try_analyze_mx<R: DnsResolver>(resolver: &R, domain: &str) -> Result<MxReport, DnsError> {
    let mut records: Vec<MxRecord> = resolver
        .lookup_mx(domain)
        .await?
        .into_iter()
        .map(|(priority, exchange)| MxRecord { priority, exchange })
        .collect();

    if records.is_empty() {
        return Ok(MxReport::failure(domain, "No MX records found").with_recommendations([
            "Publish at least one MX record so the domain can receive email",
            "If the domain should never receive email, publish a null MX record (0 .) per RFC 7505",
        ]));
    }
    // Stable: equal priorities keep resolver order
    records.sort_by_key(|r| r.priority);

    if records.len() == 1 && records[0].is_null() {
        let details = MxDetails {
            records,
            providers: Vec::new(),
        };
        return Ok(MxReport::scored(
            domain,
            None,
            Score::zero(MX_MAX_SCORE, Bands::MX),
            details,
        )
        .with_warnings(["Null MX record: domain explicitly rejects email"]));
    }

    let card = ScoreCard::evaluate(MX_RULES, records.as_slice());
    let score = Score::new(
        round_one_decimal(card.points),
        MX_MAX_SCORE,
        Bands::MX,
        card.details,
    );
    let providers = detect_providers(records.iter().map(|r| r.exchange.as_str()));

    Ok(
        MxReport::scored(domain, None, score, MxDetails { records, providers })
            .with_warnings(card.warnings)
            .with_recommendations(card.recommendations),
    )
}
