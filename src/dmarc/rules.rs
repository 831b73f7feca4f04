//! DMARC scoring rules.

use super::record::{DmarcTags, Policy};
use crate::scoring::{RuleOutcome, ScoringRule};

pub const DMARC_RULES: &[ScoringRule<DmarcTags>] = &[
    ScoringRule::new("valid-record", valid_record),
    ScoringRule::new("policy-strength", policy_strength),
    ScoringRule::new("aggregate-reporting", aggregate_reporting),
    ScoringRule::new("full-coverage", full_coverage),
    ScoringRule::new("subdomain-policy", subdomain_policy),
    ScoringRule::new("strict-dkim-alignment", strict_dkim_alignment),
    ScoringRule::new("strict-spf-alignment", strict_spf_alignment),
    ScoringRule::new("forensic-reporting", forensic_reporting),
];

fn valid_record(_: &DmarcTags) -> RuleOutcome {
    RuleOutcome::award(1.0, "Valid DMARC record (+1)")
}

fn policy_strength(tags: &DmarcTags) -> RuleOutcome {
    match tags.p {
        Policy::Reject => RuleOutcome::award(2.0, "Reject policy (+2)"),
        Policy::Quarantine => RuleOutcome::award(1.5, "Quarantine policy (+1.5)")
            .recommend("Move to p=reject once reports show legitimate mail passes"),
        Policy::None => RuleOutcome::award(0.0, "Monitoring-only policy (+0)")
            .warn("DMARC policy is 'none': spoofed mail is reported but still delivered")
            .recommend("Move to p=quarantine, then p=reject, after reviewing aggregate reports"),
    }
}

fn aggregate_reporting(tags: &DmarcTags) -> RuleOutcome {
    if tags.rua.is_empty() {
        RuleOutcome::none().recommend(
            "Add rua=mailto:<address> to receive aggregate reports and gain visibility into who sends as this domain",
        )
    } else {
        RuleOutcome::award(1.0, "Aggregate reporting configured (+1)")
    }
}

fn full_coverage(tags: &DmarcTags) -> RuleOutcome {
    match tags.pct {
        None | Some(100) => RuleOutcome::award(0.5, "Policy applies to all mail (+0.5)"),
        Some(pct) => RuleOutcome::none()
            .warn(format!("Policy applies to only {pct}% of failing mail"))
            .recommend("Raise pct to 100 once the policy is confirmed"),
    }
}

fn subdomain_policy(tags: &DmarcTags) -> RuleOutcome {
    match tags.sp {
        Some(sp) if sp < tags.p => RuleOutcome::none().warn(format!(
            "Subdomain policy sp={} is weaker than p={}; subdomains can be spoofed more easily",
            sp.as_str(),
            tags.p.as_str()
        )),
        _ => RuleOutcome::award(0.5, "Subdomains covered at full strength (+0.5)"),
    }
}

fn strict_dkim_alignment(tags: &DmarcTags) -> RuleOutcome {
    match tags.adkim.as_deref() {
        Some("s") => RuleOutcome::award(0.0, "Strict DKIM alignment"),
        _ => RuleOutcome::none(),
    }
}

fn strict_spf_alignment(tags: &DmarcTags) -> RuleOutcome {
    match tags.aspf.as_deref() {
        Some("s") => RuleOutcome::award(0.0, "Strict SPF alignment"),
        _ => RuleOutcome::none(),
    }
}

fn forensic_reporting(tags: &DmarcTags) -> RuleOutcome {
    if tags.ruf.is_empty() {
        RuleOutcome::none()
    } else {
        RuleOutcome::award(0.0, "Forensic reporting configured")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{Finding, ScoreCard};

    fn tags(raw: &str) -> DmarcTags {
        DmarcTags::parse(raw).unwrap()
    }

    #[test]
    fn test_strongest_record_scores_full_marks() {
        let card = ScoreCard::evaluate(
            DMARC_RULES,
            &tags("v=DMARC1; p=reject; rua=mailto:d@example.com; adkim=s; aspf=s; ruf=mailto:f@example.com"),
        );
        assert_eq!(card.points, 5.0);
        assert!(card.warnings.is_empty());
        assert!(card.details.iter().any(|d| d == "Strict DKIM alignment"));
        assert!(card.details.iter().any(|d| d == "Forensic reporting configured"));
    }

    #[test]
    fn test_none_policy_warns() {
        let outcome = policy_strength(&tags("v=DMARC1; p=none"));
        assert_eq!(outcome.points, 0.0);
        assert!(matches!(&outcome.findings[0], Finding::Warning(w) if w.contains("'none'")));
    }

    #[test]
    fn test_missing_rua_recommends_reporting() {
        let outcome = aggregate_reporting(&tags("v=DMARC1; p=reject"));
        assert!(matches!(&outcome.findings[0], Finding::Recommendation(r) if r.contains("rua=")));
    }

    #[test]
    fn test_partial_coverage() {
        let outcome = full_coverage(&tags("v=DMARC1; p=reject; pct=25"));
        assert_eq!(outcome.points, 0.0);
        assert!(matches!(&outcome.findings[0], Finding::Warning(w) if w.contains("25%")));
        assert_eq!(full_coverage(&tags("v=DMARC1; p=reject; pct=100")).points, 0.5);
    }

    #[test]
    fn test_weaker_subdomain_policy() {
        assert_eq!(subdomain_policy(&tags("v=DMARC1; p=reject; sp=none")).points, 0.0);
        assert_eq!(subdomain_policy(&tags("v=DMARC1; p=quarantine; sp=reject")).points, 0.5);
        assert_eq!(subdomain_policy(&tags("v=DMARC1; p=none")).points, 0.5);
    }
}
