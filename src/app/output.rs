//! Report rendering for the CLI.

use colored::*;

use crate::aggregate::AggregateReport;
use crate::report::Priority;
use crate::scoring::ScoreLevel;

/// One line per domain: overall score, level, passed checks and the most
/// urgent priority item, if any.
pub fn summary_line(report: &AggregateReport) -> String {
    let score = &report.overall_score;
    let level = score.level.to_string();
    let level = match score.level {
        ScoreLevel::Excellent => level.green(),
        ScoreLevel::Good => level.cyan(),
        ScoreLevel::Fair => level.yellow(),
        ScoreLevel::Poor => level.red(),
    };

    let mut line = format!(
        "{} {:.1}/{} {} ({}/{} checks passed)",
        report.domain.bold(),
        score.value,
        score.out_of,
        level,
        report.summary.passed_checks,
        report.summary.total_checks
    );

    if let Some(item) = report.summary.priority_recommendations.first() {
        let tag = match item.priority {
            Priority::Critical => "critical".red(),
            Priority::Important => "important".yellow(),
        };
        line.push_str(&format!(" [{tag}] {}: {}", item.protocol, item.message));
    }
    line
}

/// The full report tree as pretty-printed JSON.
pub fn json_report(report: &AggregateReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::analyze_all;
    use crate::dns::MockResolver;

    #[tokio::test]
    async fn test_summary_line_names_first_priority_item() {
        colored::control::set_override(false);
        let report = analyze_all(&MockResolver::new(), "example.com", "default").await;
        let line = summary_line(&report);
        assert!(line.starts_with("example.com 0.0/10 Poor (0/4 checks passed)"));
        assert!(line.contains("[critical] DMARC:"));
    }

    #[tokio::test]
    async fn test_json_report_is_camel_case() {
        let report = analyze_all(&MockResolver::new(), "example.com", "default").await;
        let json = json_report(&report).unwrap();
        assert!(json.contains("\"overallScore\""));
        assert!(json.contains("\"priorityRecommendations\""));
    }
}
