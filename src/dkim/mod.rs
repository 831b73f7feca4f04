//! DKIM analysis.
//!
//! Looks up `selector._domainkey.domain`, parses the key record's tag list and
//! scores the published key. A best-effort structural check of the key
//! material contributes a bonus but never fails the analysis.

mod record;
mod rules;
mod verify;

use serde::Serialize;

use crate::config::{COMMON_DKIM_SELECTORS, DKIM_MAX_SCORE};
use crate::dns::DnsResolver;
use crate::report::ProtocolReport;
use crate::scoring::{Bands, ScoreCard};

pub use record::{is_dkim_shaped, DkimRecord, TagList};
pub use verify::{check_key, KeyCheck, Verification};

use rules::{DkimContext, DKIM_RULES};

/// DKIM-specific fields of a successful report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DkimDetails {
    pub selector: String,
    pub tags: TagList,
    pub key_type: Option<String>,
    pub key_length: usize,
    pub key_bits: Option<usize>,
    pub verification: Option<Verification>,
}

pub type DkimReport = ProtocolReport<DkimDetails>;

/// Analyzes the DKIM key published under `selector` for `domain`.
///
/// A resolver fault is reported exactly like a missing record.
pub async fn analyze_dkim<R: DnsResolver>(resolver: &R, domain: &str, selector: &str) -> DkimReport {
    let name = format!("{selector}._domainkey.{domain}");
    let records = match resolver.lookup_txt(&name).await {
        Ok(records) => records,
        Err(e) => {
            log::warn!("DKIM lookup for {name} failed: {e}");
            Vec::new()
        }
    };

    let Some(first) = records.first() else {
        log::debug!("No DKIM record at {name}");
        return not_found(domain, selector);
    };
    let Some(raw) = records.iter().map(|r| r.trim()).find(|r| is_dkim_shaped(r)) else {
        return DkimReport::failure(domain, "Invalid DKIM record format")
            .with_raw_record(first.clone())
            .with_recommendations([format!(
                "The TXT record at {name} is not a DKIM key record; it should start with v=DKIM1 and carry the key in p="
            )]);
    };

    let record = DkimRecord::parse(raw);
    let check = if record.has_key() {
        match check_key(&record, domain, selector) {
            Ok(check) => Some(check),
            Err(e) => {
                log::debug!("DKIM key check for {name} did not complete: {e}");
                None
            }
        }
    } else {
        None
    };

    let ctx = DkimContext { record, check };
    let card = ScoreCard::evaluate(DKIM_RULES, &ctx);
    let score = card.score(DKIM_MAX_SCORE, Bands::STANDARD);
    log::debug!("DKIM analysis for {name}: score {}", score.value);

    let DkimContext { record, check } = ctx;
    let details = DkimDetails {
        selector: selector.to_string(),
        key_type: record.key_type.clone(),
        key_length: record.key_length(),
        key_bits: check.as_ref().and_then(|c| c.key_bits),
        verification: check.map(|c| c.verification),
        tags: record.tags,
    };

    DkimReport::scored(domain, Some(record.raw), score, details)
        .with_warnings(card.warnings)
        .with_recommendations(card.recommendations)
}

fn not_found(domain: &str, selector: &str) -> DkimReport {
    DkimReport::failure(
        domain,
        format!("DKIM record not found for selector '{selector}'"),
    )
    .with_recommendations([
        format!(
            "Try one of the common selectors: {}",
            COMMON_DKIM_SELECTORS.join(", ")
        ),
        "Check your mail provider's settings for the selector it signs with".to_string(),
    ])
}
