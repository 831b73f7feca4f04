//! SPF record tokenizer.
//!
//! Splits a `v=spf1` record into typed mechanisms. Only single-level
//! inspection is done: targets are kept as text and never expanded.

use serde::Serialize;

/// Result qualifier of a mechanism (RFC 7208 §4.6.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualifier {
    Pass,
    Fail,
    SoftFail,
    Neutral,
}

impl Qualifier {
    fn from_prefix(c: char) -> Option<Self> {
        match c {
            '+' => Some(Qualifier::Pass),
            '-' => Some(Qualifier::Fail),
            '~' => Some(Qualifier::SoftFail),
            '?' => Some(Qualifier::Neutral),
            _ => None,
        }
    }
}

/// Mechanism or modifier type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MechanismKind {
    Include,
    A,
    Mx,
    Ptr,
    Exists,
    Redirect,
    Ip4,
    Ip6,
    All,
    Exp,
    Other,
}

impl MechanismKind {
    fn parse(name: &str) -> Self {
        match name {
            "include" => MechanismKind::Include,
            "a" => MechanismKind::A,
            "mx" => MechanismKind::Mx,
            "ptr" => MechanismKind::Ptr,
            "exists" => MechanismKind::Exists,
            "redirect" => MechanismKind::Redirect,
            "ip4" => MechanismKind::Ip4,
            "ip6" => MechanismKind::Ip6,
            "all" => MechanismKind::All,
            "exp" => MechanismKind::Exp,
            _ => MechanismKind::Other,
        }
    }

    /// Whether evaluating this term costs a DNS lookup against the limit of 10.
    pub fn requires_lookup(&self) -> bool {
        matches!(
            self,
            MechanismKind::Include
                | MechanismKind::A
                | MechanismKind::Mx
                | MechanismKind::Exists
                | MechanismKind::Redirect
        )
    }
}

/// One term of an SPF record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mechanism {
    pub original: String,
    #[serde(rename = "type")]
    pub kind: MechanismKind,
    pub requires_lookup: bool,
    #[serde(skip)]
    pub qualifier: Qualifier,
    /// Text after `:` or `=`, without the CIDR suffix, lower-cased.
    #[serde(skip)]
    pub target: Option<String>,
    #[serde(skip)]
    pub cidr4: Option<u8>,
    #[serde(skip)]
    pub cidr6: Option<u8>,
}

impl Mechanism {
    /// Parses one whitespace-separated term.
    pub fn parse(token: &str) -> Self {
        let lowered = token.to_ascii_lowercase();
        let (qualifier, body) = match lowered.chars().next().and_then(Qualifier::from_prefix) {
            Some(q) => (q, &lowered[1..]),
            None => (Qualifier::Pass, lowered.as_str()),
        };

        let name_end = body.find([':', '/', '=']).unwrap_or(body.len());
        let kind = MechanismKind::parse(&body[..name_end]);
        let rest = &body[name_end..];

        let (target, cidr_part) = match rest.chars().next() {
            Some(':') | Some('=') => {
                let value = &rest[1..];
                match value.find('/') {
                    Some(pos) => (Some(value[..pos].to_string()), &value[pos..]),
                    None => (Some(value.to_string()), ""),
                }
            }
            _ => (None, rest),
        };

        let (first, second) = parse_dual_cidr(cidr_part);
        let (cidr4, cidr6) = if kind == MechanismKind::Ip6 {
            (None, first)
        } else {
            (first, second)
        };

        Self {
            original: token.to_string(),
            kind,
            requires_lookup: kind.requires_lookup(),
            qualifier,
            target: target.filter(|t| !t.is_empty()),
            cidr4,
            cidr6,
        }
    }

    /// True for `a` / `mx` written without an explicit domain.
    pub fn is_bare(&self) -> bool {
        matches!(self.kind, MechanismKind::A | MechanismKind::Mx) && !self.original.contains(':')
    }
}

/// Parses `/24`, `//64` or `/24//64`.
fn parse_dual_cidr(part: &str) -> (Option<u8>, Option<u8>) {
    if part.is_empty() {
        return (None, None);
    }
    match part.find("//") {
        Some(pos) => {
            let first = part[..pos].strip_prefix('/').and_then(|p| p.parse().ok());
            let second = part[pos + 2..].parse().ok();
            (first, second)
        }
        None => (part.strip_prefix('/').and_then(|p| p.parse().ok()), None),
    }
}

/// A single `v=spf1` record split into its terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpfRecord {
    pub raw: String,
    pub mechanisms: Vec<Mechanism>,
}

impl SpfRecord {
    pub fn parse(raw: &str) -> Self {
        let mechanisms = raw
            .split_whitespace()
            .filter(|token| !token.eq_ignore_ascii_case("v=spf1"))
            .map(Mechanism::parse)
            .collect();
        Self {
            raw: raw.to_string(),
            mechanisms,
        }
    }

    /// DNS-querying terms counted against the RFC 7208 limit.
    pub fn lookup_count(&self) -> usize {
        self.mechanisms.iter().filter(|m| m.requires_lookup).count()
    }

    /// The first `all` mechanism, which sets the default result.
    pub fn policy(&self) -> Option<&Mechanism> {
        self.mechanisms.iter().find(|m| m.kind == MechanismKind::All)
    }

    pub fn redirect_target(&self) -> Option<&str> {
        self.mechanisms
            .iter()
            .find(|m| m.kind == MechanismKind::Redirect)
            .and_then(|m| m.target.as_deref())
    }

    pub fn includes(&self) -> impl Iterator<Item = &str> {
        self.mechanisms
            .iter()
            .filter(|m| m.kind == MechanismKind::Include)
            .filter_map(|m| m.target.as_deref())
    }
}

/// True when a TXT record is an SPF version 1 record.
pub fn is_spf_record(txt: &str) -> bool {
    let trimmed = txt.trim_start();
    match trimmed.get(..6) {
        Some(prefix) if prefix.eq_ignore_ascii_case("v=spf1") => trimmed[6..]
            .chars()
            .next()
            .map_or(true, char::is_whitespace),
        _ => false,
    }
}
