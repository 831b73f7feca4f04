//! DMARC record tokenizer.

use serde::Serialize;

/// Requested handling of failing mail, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    None,
    Quarantine,
    Reject,
}

impl Policy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Some(Policy::None),
            "quarantine" => Some(Policy::Quarantine),
            "reject" => Some(Policy::Reject),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::None => "none",
            Policy::Quarantine => "quarantine",
            Policy::Reject => "reject",
        }
    }
}

/// Tags of a DMARC record (RFC 7489 §6.3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DmarcTags {
    pub p: Policy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sp: Option<Policy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pct: Option<u8>,
    pub rua: Vec<String>,
    pub ruf: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adkim: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ri: Option<String>,
}

/// Lower-cased tag names with trimmed values; first occurrence wins.
fn tag_pairs(record: &str) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for part in record.split(';') {
        let Some((name, value)) = part.split_once('=') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() || pairs.iter().any(|(n, _)| *n == name) {
            continue;
        }
        pairs.push((name, value.trim().to_string()));
    }
    pairs
}

fn uri_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|uri| !uri.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

impl DmarcTags {
    /// Parses a record; `None` when `p=` is missing or not a known policy.
    ///
    /// An unparseable `sp=` or `pct=` is treated as absent.
    pub fn parse(record: &str) -> Option<Self> {
        let pairs = tag_pairs(record);
        let get = |name: &str| -> Option<&str> {
            pairs
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str())
        };

        let p = get("p").and_then(Policy::parse)?;
        let lowered = |name: &str| get(name).map(|v| v.to_ascii_lowercase());
        Some(Self {
            p,
            sp: get("sp").and_then(Policy::parse),
            pct: get("pct")
                .and_then(|v| v.parse::<u8>().ok())
                .filter(|pct| *pct <= 100),
            rua: uri_list(get("rua")),
            ruf: uri_list(get("ruf")),
            adkim: lowered("adkim"),
            aspf: lowered("aspf"),
            fo: get("fo").map(str::to_string),
            ri: get("ri").map(str::to_string),
        })
    }

    /// Policy applied to subdomains (`sp=`, defaulting to `p=`).
    pub fn subdomain_policy(&self) -> Policy {
        self.sp.unwrap_or(self.p)
    }
}

/// True when a TXT record is a DMARC version 1 record.
pub fn is_dmarc_record(txt: &str) -> bool {
    let trimmed = txt.trim_start();
    match trimmed.get(..8) {
        Some(prefix) if prefix.eq_ignore_ascii_case("v=DMARC1") => trimmed[8..]
            .chars()
            .next()
            .map_or(true, |c| c == ';' || c.is_whitespace()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_record() {
        let tags = DmarcTags::parse(
            "v=DMARC1; p=Reject; sp=quarantine; pct=50; rua=mailto:a@example.com, mailto:b@example.net; ruf=mailto:f@example.com; adkim=S; aspf=r; fo=1; ri=3600",
        )
        .unwrap();
        assert_eq!(tags.p, Policy::Reject);
        assert_eq!(tags.sp, Some(Policy::Quarantine));
        assert_eq!(tags.pct, Some(50));
        assert_eq!(tags.rua, vec!["mailto:a@example.com", "mailto:b@example.net"]);
        assert_eq!(tags.ruf.len(), 1);
        assert_eq!(tags.adkim.as_deref(), Some("s"));
        assert_eq!(tags.aspf.as_deref(), Some("r"));
        assert_eq!(tags.fo.as_deref(), Some("1"));
        assert_eq!(tags.ri.as_deref(), Some("3600"));
    }

    #[test]
    fn test_missing_or_invalid_policy() {
        assert!(DmarcTags::parse("v=DMARC1; rua=mailto:a@example.com").is_none());
        assert!(DmarcTags::parse("v=DMARC1; p=block").is_none());
    }

    #[test]
    fn test_defaults_and_bad_values() {
        let tags = DmarcTags::parse("v=DMARC1; p=none; sp=bogus; pct=250").unwrap();
        assert_eq!(tags.sp, None);
        assert_eq!(tags.subdomain_policy(), Policy::None);
        assert_eq!(tags.pct, None);
        assert!(tags.rua.is_empty());
    }

    #[test]
    fn test_first_tag_occurrence_wins() {
        let tags = DmarcTags::parse("v=DMARC1; P=quarantine; p=none").unwrap();
        assert_eq!(tags.p, Policy::Quarantine);
    }

    #[test]
    fn test_policy_strength_order() {
        assert!(Policy::None < Policy::Quarantine);
        assert!(Policy::Quarantine < Policy::Reject);
    }

    #[test]
    fn test_is_dmarc_record() {
        assert!(is_dmarc_record("v=DMARC1; p=none"));
        assert!(is_dmarc_record("V=dmarc1;p=reject"));
        assert!(!is_dmarc_record("v=DMARC10; p=none"));
        assert!(!is_dmarc_record("v=spf1 -all"));
    }

    #[test]
    fn test_serialized_shape() {
        let tags = DmarcTags::parse("v=DMARC1; p=quarantine; rua=mailto:a@example.com").unwrap();
        let json = serde_json::to_value(&tags).unwrap();
        assert_eq!(json["p"], "quarantine");
        assert_eq!(json["rua"][0], "mailto:a@example.com");
        assert!(json.get("sp").is_none());
    }
}
