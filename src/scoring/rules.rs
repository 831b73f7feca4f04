//! Named scoring rules and the score card that accumulates them.

use super::{Bands, Score};

/// A message a rule wants surfaced in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    Warning(String),
    Recommendation(String),
    /// Placed ahead of every other warning.
    UrgentWarning(String),
    /// Placed ahead of every other recommendation.
    UrgentRecommendation(String),
}

/// Result of applying one rule to a parsed record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleOutcome {
    pub points: f64,
    pub detail: Option<String>,
    pub findings: Vec<Finding>,
}

impl RuleOutcome {
    /// No points, no messages.
    pub fn none() -> Self {
        Self::default()
    }

    /// Awards `points` and records `detail` in the score details.
    pub fn award(points: f64, detail: impl Into<String>) -> Self {
        Self {
            points,
            detail: Some(detail.into()),
            findings: Vec::new(),
        }
    }

    pub fn warn(mut self, message: impl Into<String>) -> Self {
        self.findings.push(Finding::Warning(message.into()));
        self
    }

    pub fn recommend(mut self, message: impl Into<String>) -> Self {
        self.findings.push(Finding::Recommendation(message.into()));
        self
    }

    pub fn warn_first(mut self, message: impl Into<String>) -> Self {
        self.findings.push(Finding::UrgentWarning(message.into()));
        self
    }

    pub fn recommend_first(mut self, message: impl Into<String>) -> Self {
        self.findings.push(Finding::UrgentRecommendation(message.into()));
        self
    }
}

/// A named, pure scoring rule over a parsed record of type `T`.
pub struct ScoringRule<T: ?Sized> {
    pub name: &'static str,
    pub apply: fn(&T) -> RuleOutcome,
}

impl<T: ?Sized> ScoringRule<T> {
    pub const fn new(name: &'static str, apply: fn(&T) -> RuleOutcome) -> Self {
        Self { name, apply }
    }
}

/// Points, details and messages collected from a rule list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreCard {
    pub points: f64,
    pub details: Vec<String>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

impl ScoreCard {
    /// Applies `rules` to `input` in order.
    pub fn evaluate<T: ?Sized>(rules: &[ScoringRule<T>], input: &T) -> Self {
        let mut card = ScoreCard::default();
        for rule in rules {
            let outcome = (rule.apply)(input);
            if outcome.points != 0.0 {
                log::trace!("scoring rule {} awarded {}", rule.name, outcome.points);
            }
            card.absorb(outcome);
        }
        card
    }

    /// Adds one outcome to the card.
    pub fn absorb(&mut self, outcome: RuleOutcome) {
        self.points += outcome.points;
        if let Some(detail) = outcome.detail {
            self.details.push(detail);
        }
        for finding in outcome.findings {
            match finding {
                Finding::Warning(w) => self.warnings.push(w),
                Finding::Recommendation(r) => self.recommendations.push(r),
                Finding::UrgentWarning(w) => self.warnings.insert(0, w),
                Finding::UrgentRecommendation(r) => self.recommendations.insert(0, r),
            }
        }
    }

    /// Clamped, banded score from the accumulated points.
    pub fn score(&self, out_of: f64, bands: Bands) -> Score {
        Score::new(self.points, out_of, bands, self.details.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ScoreLevel;

    struct Sample {
        strong: bool,
        risky: bool,
    }

    const RULES: &[ScoringRule<Sample>] = &[
        ScoringRule::new("base", |_| RuleOutcome::award(1.0, "Record present")),
        ScoringRule::new("strength", |s| {
            if s.strong {
                RuleOutcome::award(3.0, "Strong configuration")
            } else {
                RuleOutcome::none().recommend("Strengthen the configuration")
            }
        }),
        ScoringRule::new("risk", |s| {
            if s.risky {
                RuleOutcome::none()
                    .warn_first("Fatal: risky configuration")
                    .recommend_first("Fix the risky part")
            } else {
                RuleOutcome::none()
            }
        }),
    ];

    #[test]
    fn test_rules_accumulate_in_order() {
        let card = ScoreCard::evaluate(RULES, &Sample { strong: true, risky: false });
        assert_eq!(card.points, 4.0);
        assert_eq!(card.details, vec!["Record present", "Strong configuration"]);
        assert!(card.warnings.is_empty());
    }

    #[test]
    fn test_urgent_findings_are_prepended() {
        let mut card = ScoreCard::default();
        card.absorb(RuleOutcome::none().warn("first").recommend("later"));
        card.absorb(
            RuleOutcome::none()
                .warn_first("Fatal: urgent")
                .recommend_first("Do this now"),
        );
        assert_eq!(card.warnings, vec!["Fatal: urgent", "first"]);
        assert_eq!(card.recommendations, vec!["Do this now", "later"]);
    }

    #[test]
    fn test_rules_are_individually_testable() {
        let weak = Sample { strong: false, risky: true };
        let outcome = (RULES[1].apply)(&weak);
        assert_eq!(outcome.points, 0.0);
        assert_eq!(
            outcome.findings,
            vec![Finding::Recommendation("Strengthen the configuration".into())]
        );
        assert_eq!(RULES[2].name, "risk");
    }

    #[test]
    fn test_card_score_is_banded() {
        let card = ScoreCard::evaluate(RULES, &Sample { strong: false, risky: true });
        let score = card.score(5.0, Bands::STANDARD);
        assert_eq!(score.value, 1.0);
        assert_eq!(score.level, ScoreLevel::Poor);
        assert_eq!(card.warnings[0], "Fatal: risky configuration");
    }
}
