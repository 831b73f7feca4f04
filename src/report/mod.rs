//! Report types produced by the analyzers and the aggregator.
//!
//! The serialized shape of these types is the public contract: camelCase keys,
//! optional fields omitted when absent, and protocol-specific fields
//! flattened into the protocol report object.

use serde::Serialize;

use crate::scoring::Score;

/// Outcome of one protocol analysis.
///
/// `success == false` never carries a score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolReport<D> {
    pub success: bool,
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_record: Option<String>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<Score>,
    #[serde(flatten)]
    pub details: Option<D>,
}

impl<D> ProtocolReport<D> {
    /// A failed analysis with `error` and no score.
    pub fn failure(domain: &str, error: impl Into<String>) -> Self {
        Self {
            success: false,
            domain: domain.to_string(),
            error: Some(error.into()),
            raw_record: None,
            warnings: Vec::new(),
            recommendations: Vec::new(),
            score: None,
            details: None,
        }
    }

    /// A successful analysis.
    pub fn scored(domain: &str, raw_record: Option<String>, score: Score, details: D) -> Self {
        Self {
            success: true,
            domain: domain.to_string(),
            error: None,
            raw_record,
            warnings: Vec::new(),
            recommendations: Vec::new(),
            score: Some(score),
            details: Some(details),
        }
    }

    pub fn with_raw_record(mut self, raw_record: impl Into<String>) -> Self {
        self.raw_record = Some(raw_record.into());
        self
    }

    pub fn with_warnings<I, S>(mut self, warnings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.warnings.extend(warnings.into_iter().map(Into::into));
        self
    }

    pub fn with_recommendations<I, S>(mut self, recommendations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recommendations
            .extend(recommendations.into_iter().map(Into::into));
        self
    }

    /// Achieved and possible points, if this report counts toward an overall score.
    pub fn scored_points(&self) -> Option<(f64, f64)> {
        match (&self.score, self.success) {
            (Some(score), true) => Some((score.value, score.out_of)),
            _ => None,
        }
    }
}

/// How urgent a priority recommendation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    Important,
}

/// Protocols covered by an aggregate report, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Dmarc,
    Spf,
    Dkim,
    Mx,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Dmarc => "DMARC",
            Protocol::Spf => "SPF",
            Protocol::Dkim => "DKIM",
            Protocol::Mx => "MX",
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One synthesized, fixed-text priority item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityRecommendation {
    pub priority: Priority,
    pub protocol: Protocol,
    pub message: String,
}
