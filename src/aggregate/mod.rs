//! Aggregate posture report.
//!
//! Runs the four protocol analyses as independent tasks, waits for all of
//! them, and merges their reports. A task that panics is replaced by a failed
//! report for its protocol; the other three are unaffected.

mod priority;

use serde::Serialize;

use crate::config::{OVERALL_SCORE_SCALE, TOTAL_CHECKS};
use crate::dkim::{analyze_dkim, DkimReport};
use crate::dmarc::{analyze_dmarc, DmarcReport};
use crate::dns::DnsResolver;
use crate::mx::{analyze_mx, MxReport};
use crate::report::{PriorityRecommendation, ProtocolReport, Protocol};
use crate::scoring::{round_one_decimal, Bands, Score};
use crate::spf::{analyze_spf, SpfReport};
use crate::utils::settle;

pub use priority::priority_recommendations;

/// Merged findings across all protocols.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_checks: usize,
    pub passed_checks: usize,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
    pub priority_recommendations: Vec<PriorityRecommendation>,
}

/// Posture of one domain across DMARC, SPF, DKIM and MX.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    pub domain: String,
    pub dmarc: DmarcReport,
    pub spf: SpfReport,
    pub dkim: DkimReport,
    pub mx: MxReport,
    pub overall_score: Score,
    pub summary: Summary,
}

fn placeholder<D>(domain: &str, protocol: Protocol, reason: String) -> ProtocolReport<D> {
    ProtocolReport::failure(domain, format!("{protocol} analysis failed: {reason}"))
}

/// Analyzes every protocol for `domain` concurrently.
///
/// `selector` is the DKIM selector to look up.
pub async fn analyze_all<R: DnsResolver>(resolver: &R, domain: &str, selector: &str) -> AggregateReport {
    log::info!("Analyzing {domain} (DKIM selector {selector})");

    let dmarc_task = {
        let (resolver, domain) = (resolver.clone(), domain.to_string());
        tokio::spawn(async move { analyze_dmarc(&resolver, &domain).await })
    };
    let spf_task = {
        let (resolver, domain) = (resolver.clone(), domain.to_string());
        tokio::spawn(async move { analyze_spf(&resolver, &domain).await })
    };
    let dkim_task = {
        let (resolver, domain, selector) =
            (resolver.clone(), domain.to_string(), selector.to_string());
        tokio::spawn(async move { analyze_dkim(&resolver, &domain, &selector).await })
    };
    let mx_task = {
        let (resolver, domain) = (resolver.clone(), domain.to_string());
        tokio::spawn(async move { analyze_mx(&resolver, &domain).await })
    };

    let (dmarc, spf, dkim, mx) = tokio::join!(
        settle(dmarc_task),
        settle(spf_task),
        settle(dkim_task),
        settle(mx_task)
    );

    let dmarc = dmarc.unwrap_or_else(|reason| placeholder(domain, Protocol::Dmarc, reason));
    let spf = spf.unwrap_or_else(|reason| placeholder(domain, Protocol::Spf, reason));
    let dkim = dkim.unwrap_or_else(|reason| placeholder(domain, Protocol::Dkim, reason));
    let mx = mx.unwrap_or_else(|reason| placeholder(domain, Protocol::Mx, reason));

    combine(domain, dmarc, spf, dkim, mx)
}

/// Builds the aggregate report from four finished protocol reports.
pub fn combine(
    domain: &str,
    dmarc: DmarcReport,
    spf: SpfReport,
    dkim: DkimReport,
    mx: MxReport,
) -> AggregateReport {
    let scored = [
        dmarc.scored_points(),
        spf.scored_points(),
        dkim.scored_points(),
        mx.scored_points(),
    ];
    let (achieved, possible) = scored
        .iter()
        .flatten()
        .fold((0.0, 0.0), |(a, p), (value, out_of)| (a + value, p + out_of));
    let overall = if possible > 0.0 {
        round_one_decimal(achieved / possible * OVERALL_SCORE_SCALE)
    } else {
        0.0
    };

    let passed_checks = [dmarc.success, spf.success, dkim.success, mx.success]
        .iter()
        .filter(|success| **success)
        .count();

    let warnings = [&dmarc.warnings, &spf.warnings, &dkim.warnings, &mx.warnings]
        .into_iter()
        .flatten()
        .cloned()
        .collect();
    let recommendations = [
        &dmarc.recommendations,
        &spf.recommendations,
        &dkim.recommendations,
        &mx.recommendations,
    ]
    .into_iter()
    .flatten()
    .cloned()
    .collect();
    let priority_recommendations = priority_recommendations(&dmarc, &spf, &dkim, &mx);

    log::info!(
        "{domain}: overall {overall}/{OVERALL_SCORE_SCALE}, {passed_checks}/{TOTAL_CHECKS} checks passed"
    );

    AggregateReport {
        domain: domain.to_string(),
        dmarc,
        spf,
        dkim,
        mx,
        overall_score: Score::new(overall, OVERALL_SCORE_SCALE, Bands::STANDARD, Vec::new()),
        summary: Summary {
            total_checks: TOTAL_CHECKS,
            passed_checks,
            warnings,
            recommendations,
            priority_recommendations,
        },
    }
}
