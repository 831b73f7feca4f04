//! Scores and the rule engine that produces them.
//!
//! Every analyzer scores its parsed record by running an ordered list of
//! [`ScoringRule`]s. Each rule is a pure function from the parsed record to a
//! [`RuleOutcome`]: a point delta, an optional score detail line, and any
//! warnings or recommendations it wants to surface. [`ScoreCard::evaluate`]
//! runs the list in order and collects everything; the card is then turned
//! into a clamped, banded [`Score`].

mod rules;

use serde::Serialize;

pub use rules::{Finding, RuleOutcome, ScoreCard, ScoringRule};

/// Qualitative band of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum ScoreLevel {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl ScoreLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreLevel::Poor => "Poor",
            ScoreLevel::Fair => "Fair",
            ScoreLevel::Good => "Good",
            ScoreLevel::Excellent => "Excellent",
        }
    }
}

impl std::fmt::Display for ScoreLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Level thresholds, expressed as points on a reference scale.
///
/// A score `value/out_of` reaches a band when `value * scale >= threshold * out_of`,
/// which keeps the comparison exact for the ceilings used here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    scale: f64,
    excellent: f64,
    good: f64,
    fair: f64,
}

impl Bands {
    /// ≥80% Excellent, ≥60% Good, ≥40% Fair.
    pub const STANDARD: Bands = Bands {
        scale: 10.0,
        excellent: 8.0,
        good: 6.0,
        fair: 4.0,
    };

    /// MX bands on its 3-point scale: ≥2.5 Excellent, ≥2 Good, ≥1 Fair.
    pub const MX: Bands = Bands {
        scale: 3.0,
        excellent: 2.5,
        good: 2.0,
        fair: 1.0,
    };

    pub fn level(&self, value: f64, out_of: f64) -> ScoreLevel {
        if out_of <= 0.0 {
            return ScoreLevel::Poor;
        }
        let scaled = value * self.scale;
        if scaled >= self.excellent * out_of {
            ScoreLevel::Excellent
        } else if scaled >= self.good * out_of {
            ScoreLevel::Good
        } else if scaled >= self.fair * out_of {
            ScoreLevel::Fair
        } else {
            ScoreLevel::Poor
        }
    }
}

/// A normalized score: `0 <= value <= out_of`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub value: f64,
    pub out_of: f64,
    pub level: ScoreLevel,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl Score {
    /// Clamps `value` into `[0, out_of]` and derives the level from `bands`.
    pub fn new(value: f64, out_of: f64, bands: Bands, details: Vec<String>) -> Self {
        let value = clamp(value, out_of);
        Self {
            value,
            out_of,
            level: bands.level(value, out_of),
            details,
        }
    }

    /// A zero score with no details.
    pub fn zero(out_of: f64, bands: Bands) -> Self {
        Self::new(0.0, out_of, bands, Vec::new())
    }
}

fn clamp(value: f64, out_of: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.max(0.0).min(out_of)
}

/// Rounds to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_standard_bands() {
        assert_eq!(Bands::STANDARD.level(5.0, 5.0), ScoreLevel::Excellent);
        assert_eq!(Bands::STANDARD.level(4.0, 5.0), ScoreLevel::Excellent);
        assert_eq!(Bands::STANDARD.level(3.5, 5.0), ScoreLevel::Good);
        assert_eq!(Bands::STANDARD.level(3.0, 5.0), ScoreLevel::Good);
        assert_eq!(Bands::STANDARD.level(2.0, 5.0), ScoreLevel::Fair);
        assert_eq!(Bands::STANDARD.level(1.5, 5.0), ScoreLevel::Poor);
        assert_eq!(Bands::STANDARD.level(8.0, 10.0), ScoreLevel::Excellent);
        assert_eq!(Bands::STANDARD.level(3.9, 10.0), ScoreLevel::Poor);
    }

    #[test]
    fn test_mx_bands() {
        assert_eq!(Bands::MX.level(3.0, 3.0), ScoreLevel::Excellent);
        assert_eq!(Bands::MX.level(2.5, 3.0), ScoreLevel::Excellent);
        assert_eq!(Bands::MX.level(2.0, 3.0), ScoreLevel::Good);
        assert_eq!(Bands::MX.level(1.0, 3.0), ScoreLevel::Fair);
        assert_eq!(Bands::MX.level(0.0, 3.0), ScoreLevel::Poor);
    }

    #[test]
    fn test_zero_ceiling_is_poor() {
        assert_eq!(Bands::STANDARD.level(0.0, 0.0), ScoreLevel::Poor);
    }

    #[test]
    fn test_score_is_clamped() {
        let over = Score::new(7.5, 5.0, Bands::STANDARD, Vec::new());
        assert_eq!(over.value, 5.0);
        let under = Score::new(-1.0, 5.0, Bands::STANDARD, Vec::new());
        assert_eq!(under.value, 0.0);
        assert_eq!(under.level, ScoreLevel::Poor);
    }

    #[test]
    fn test_round_one_decimal() {
        assert_eq!(round_one_decimal(2.25), 2.3);
        assert_eq!(round_one_decimal(8.333_333), 8.3);
        assert_eq!(round_one_decimal(10.0), 10.0);
    }

    #[test]
    fn test_levels_are_ordered() {
        let levels: Vec<ScoreLevel> = ScoreLevel::iter().collect();
        let mut sorted = levels.clone();
        sorted.sort();
        assert_eq!(levels, sorted);
    }

    #[test]
    fn test_score_serializes_camel_case_and_skips_empty_details() {
        let score = Score::new(4.0, 5.0, Bands::STANDARD, Vec::new());
        let json = serde_json::to_value(&score).unwrap();
        assert_eq!(json["outOf"], 5.0);
        assert_eq!(json["level"], "Excellent");
        assert!(json.get("details").is_none());
    }
}
