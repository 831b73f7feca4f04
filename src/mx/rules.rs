//! MX scoring rules.

use std::collections::HashSet;

use super::MxRecord;
use crate::config::MX_HIGH_PRIORITY_THRESHOLD;
use crate::scoring::{RuleOutcome, ScoringRule};

pub const MX_RULES: &[ScoringRule<[MxRecord]>] = &[
    ScoringRule::new("records-present", records_present),
    ScoringRule::new("redundancy", redundancy),
    ScoringRule::new("distinct-priorities", distinct_priorities),
    ScoringRule::new("zero-priority", zero_priority),
    ScoringRule::new("high-priority", high_priority),
    ScoringRule::new("mixed-null-mx", mixed_null_mx),
];

fn records_present(_: &[MxRecord]) -> RuleOutcome {
    RuleOutcome::award(1.0, "MX records present (+1)")
}

fn redundancy(records: &[MxRecord]) -> RuleOutcome {
    if records.len() >= 2 {
        RuleOutcome::award(1.0, format!("{} mail servers for redundancy (+1)", records.len()))
    } else {
        RuleOutcome::none()
            .recommend("Add a backup MX record so mail is still accepted when the primary server is down")
    }
}

fn distinct_priorities(records: &[MxRecord]) -> RuleOutcome {
    let mut seen = HashSet::new();
    let duplicates: Vec<u16> = records
        .iter()
        .filter(|r| !seen.insert(r.priority))
        .map(|r| r.priority)
        .collect();
    if duplicates.is_empty() {
        RuleOutcome::award(1.0, "Distinct priorities (+1)")
    } else {
        RuleOutcome::none()
            .warn(format!(
                "Several MX records share priority {}; delivery order between them is arbitrary",
                duplicates[0]
            ))
            .recommend("Give each MX record its own priority unless round-robin delivery is intended")
    }
}

fn zero_priority(records: &[MxRecord]) -> RuleOutcome {
    if records.iter().any(|r| r.priority == 0) {
        RuleOutcome::none().warn("An MX record uses priority 0; verify this is intentional")
    } else {
        RuleOutcome::none()
    }
}

fn high_priority(records: &[MxRecord]) -> RuleOutcome {
    if records.iter().any(|r| r.priority > MX_HIGH_PRIORITY_THRESHOLD) {
        RuleOutcome::none().recommend(format!(
            "Use MX priorities of {MX_HIGH_PRIORITY_THRESHOLD} or lower; conventional values are 10, 20, 30"
        ))
    } else {
        RuleOutcome::none()
    }
}

fn mixed_null_mx(records: &[MxRecord]) -> RuleOutcome {
    if records.len() > 1 && records.iter().any(MxRecord::is_null) {
        RuleOutcome::none().warn(
            "A null MX (.) is published alongside other MX records; receivers may treat the configuration as ambiguous",
        )
    } else {
        RuleOutcome::none()
    }
}
