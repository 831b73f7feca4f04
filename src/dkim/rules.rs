//! DKIM scoring rules.
//!
//! Everything after `public-key` describes the key, so those rules only score
//! when a key is actually published.

use super::record::DkimRecord;
use super::verify::{KeyCheck, Verification};
use crate::config::{DKIM_STRONG_KEY_CHARS, DKIM_WEAK_KEY_CHARS};
use crate::scoring::{RuleOutcome, ScoringRule};

pub struct DkimContext {
    pub record: DkimRecord,
    pub check: Option<KeyCheck>,
}

pub const DKIM_RULES: &[ScoringRule<DkimContext>] = &[
    ScoringRule::new("valid-record", valid_record),
    ScoringRule::new("public-key", public_key),
    ScoringRule::new("key-type", key_type),
    ScoringRule::new("hash-algorithm", hash_algorithm),
    ScoringRule::new("service-type", service_type),
    ScoringRule::new("flags", flags),
    ScoringRule::new("key-length", key_length),
    ScoringRule::new("structural-check", structural_check),
];

fn valid_record(_: &DkimContext) -> RuleOutcome {
    RuleOutcome::award(1.0, "Valid DKIM record (+1)")
}

fn public_key(ctx: &DkimContext) -> RuleOutcome {
    if ctx.record.has_key() {
        RuleOutcome::award(2.0, "Public key present (+2)")
    } else {
        RuleOutcome::none()
            .warn("No public key found (p= is missing or empty); the key is revoked or unpublished")
            .recommend("Publish the selector's public key in the p= tag")
    }
}

fn key_type(ctx: &DkimContext) -> RuleOutcome {
    if !ctx.record.has_key() {
        return RuleOutcome::none();
    }
    match ctx.record.key_type.as_deref() {
        Some("rsa") => RuleOutcome::award(1.0, "RSA key type (+1)"),
        Some("ed25519") => RuleOutcome::award(1.5, "Ed25519 key type (+1.5)"),
        Some(other) => {
            RuleOutcome::none().warn(format!("Unknown key type k={other}; receivers will ignore this key"))
        }
        None => RuleOutcome::none(),
    }
}

fn hash_algorithm(ctx: &DkimContext) -> RuleOutcome {
    if !ctx.record.has_key() {
        return RuleOutcome::none();
    }
    let hashes = &ctx.record.hash_algorithms;
    if hashes.iter().any(|h| h == "sha256") {
        RuleOutcome::award(1.0, "SHA-256 hash algorithm (+1)")
    } else if hashes.iter().any(|h| h == "sha1") {
        RuleOutcome::award(0.5, "SHA-1 hash algorithm (+0.5)")
            .recommend("Upgrade from SHA-1 to SHA-256 (h=sha256); SHA-1 is deprecated by RFC 8301")
    } else {
        RuleOutcome::none()
    }
}

fn service_type(ctx: &DkimContext) -> RuleOutcome {
    if ctx.record.has_key() && ctx.record.service_types.iter().any(|s| s == "email") {
        RuleOutcome::award(0.5, "Key restricted to email service (+0.5)")
    } else {
        RuleOutcome::none()
    }
}

fn flags(ctx: &DkimContext) -> RuleOutcome {
    let mut outcome = RuleOutcome::none();
    for flag in &ctx.record.flags {
        match flag.as_str() {
            "y" => {
                outcome = outcome.warn(
                    "DKIM is in testing mode (t=y); receivers treat signed and unsigned mail alike",
                )
            }
            "s" => {
                outcome = outcome.warn(
                    "Strict mode (t=s) is set; subdomains cannot sign with this key",
                )
            }
            _ => {}
        }
    }
    outcome
}

fn key_length(ctx: &DkimContext) -> RuleOutcome {
    // Ed25519 keys are 44 base64 characters at full strength
    if !ctx.record.has_key() || ctx.record.effective_key_type() == "ed25519" {
        return RuleOutcome::none();
    }
    let length = ctx.record.key_length();
    if length > DKIM_STRONG_KEY_CHARS {
        RuleOutcome::award(0.5, "Strong key length (+0.5)")
    } else if length < DKIM_WEAK_KEY_CHARS {
        RuleOutcome::none()
            .warn(format!(
                "Public key is short ({length} base64 characters), suggesting an RSA key under 1024 bits"
            ))
            .recommend("Rotate to a 2048-bit RSA key or an Ed25519 key")
    } else {
        RuleOutcome::none()
    }
}

fn structural_check(ctx: &DkimContext) -> RuleOutcome {
    match &ctx.check {
        Some(check) if ctx.record.has_key() && check.verification == Verification::Pass => {
            RuleOutcome::award(0.5, "Key passed structural check (+0.5)")
        }
        _ => RuleOutcome::none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{Finding, ScoreCard};

    fn ctx(raw: &str) -> DkimContext {
        DkimContext {
            record: DkimRecord::parse(raw),
            check: None,
        }
    }

    #[test]
    fn test_key_attributes_need_a_key() {
        let card = ScoreCard::evaluate(DKIM_RULES, &ctx("v=DKIM1; k=ed25519; h=sha256; s=email"));
        assert_eq!(card.points, 1.0);
        assert!(card.warnings[0].contains("No public key"));
    }

    #[test]
    fn test_key_type_points() {
        assert_eq!(key_type(&ctx("k=rsa; p=QUJD")).points, 1.0);
        assert_eq!(key_type(&ctx("k=ed25519; p=QUJD")).points, 1.5);
        assert_eq!(key_type(&ctx("p=QUJD")).points, 0.0);
        let unknown = key_type(&ctx("k=dsa; p=QUJD"));
        assert!(matches!(&unknown.findings[0], Finding::Warning(w) if w.contains("k=dsa")));
    }

    #[test]
    fn test_sha1_gets_upgrade_recommendation() {
        let outcome = hash_algorithm(&ctx("h=sha1; p=QUJD"));
        assert_eq!(outcome.points, 0.5);
        assert!(matches!(&outcome.findings[0], Finding::Recommendation(r) if r.contains("SHA-256")));
        assert_eq!(hash_algorithm(&ctx("h=sha1:sha256; p=QUJD")).points, 1.0);
    }

    #[test]
    fn test_flags_warn_without_points() {
        let outcome = flags(&ctx("t=y:s; p=QUJD"));
        assert_eq!(outcome.points, 0.0);
        assert_eq!(outcome.findings.len(), 2);
    }

    #[test]
    fn test_key_length_bands() {
        let strong = key_length(&ctx(&format!("k=rsa; p={}", "A".repeat(301))));
        assert_eq!(strong.points, 0.5);
        let middle = key_length(&ctx(&format!("k=rsa; p={}", "A".repeat(260))));
        assert_eq!(middle, RuleOutcome::none());
        let weak = key_length(&ctx(&format!("k=rsa; p={}", "A".repeat(150))));
        assert_eq!(weak.findings.len(), 2);
        let ed = key_length(&ctx(&format!("k=ed25519; p={}", "A".repeat(44))));
        assert!(ed.findings.is_empty());
    }

    #[test]
    fn test_structural_check_points() {
        let mut passed = ctx("k=rsa; p=QUJD");
        passed.check = Some(KeyCheck {
            verification: Verification::Pass,
            key_bits: Some(2048),
        });
        assert_eq!(structural_check(&passed).points, 0.5);

        let mut neutral = ctx("k=dsa; p=QUJD");
        neutral.check = Some(KeyCheck {
            verification: Verification::Neutral,
            key_bits: None,
        });
        assert_eq!(structural_check(&neutral).points, 0.0);
    }
}
