//! Structural check of a published DKIM key.
//!
//! No message is verified. A `DKIM-Signature` skeleton is synthesized for the
//! domain and selector, re-read with the record tokenizer and checked against
//! the key record; then the key material itself is decoded.

use base64::Engine;
use serde::Serialize;
use x509_parser::prelude::FromDer;
use x509_parser::public_key::PublicKey;
use x509_parser::x509::SubjectPublicKeyInfo;

use super::record::{DkimRecord, TagList};
use crate::error_handling::KeyCheckError;

/// Outcome of a completed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verification {
    /// The key decodes and agrees with the signature skeleton.
    Pass,
    /// The key type is not one this check understands.
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCheck {
    pub verification: Verification,
    pub key_bits: Option<usize>,
}

impl KeyCheck {
    fn neutral() -> Self {
        Self {
            verification: Verification::Neutral,
            key_bits: None,
        }
    }
}

/// Signing algorithm a signer using this key would declare.
fn signing_algorithm(record: &DkimRecord) -> Option<String> {
    let key_type = record.effective_key_type();
    if key_type != "rsa" && key_type != "ed25519" {
        return None;
    }
    let hash = if record.allows_hash("sha256") { "sha256" } else { "sha1" };
    Some(format!("{key_type}-{hash}"))
}

fn signature_skeleton(domain: &str, selector: &str, algorithm: &str) -> String {
    let body_hash = base64::engine::general_purpose::STANDARD.encode([0u8; 32]);
    format!("v=1; a={algorithm}; d={domain}; s={selector}; h=from:to:subject; bh={body_hash}; b=")
}

fn check_skeleton(
    skeleton: &TagList,
    record: &DkimRecord,
    domain: &str,
    selector: &str,
) -> Result<(), KeyCheckError> {
    let algorithm = skeleton
        .get("a")
        .ok_or_else(|| KeyCheckError::Inconsistent("missing a= tag".into()))?;
    let (key_type, hash) = algorithm
        .split_once('-')
        .ok_or_else(|| KeyCheckError::Inconsistent(format!("malformed algorithm {algorithm}")))?;
    if key_type != record.effective_key_type() {
        return Err(KeyCheckError::Inconsistent(format!(
            "algorithm {algorithm} does not match key type {}",
            record.effective_key_type()
        )));
    }
    if !record.allows_hash(hash) {
        return Err(KeyCheckError::Inconsistent(format!(
            "hash {hash} is not allowed by h={}",
            record.hash_algorithms.join(":")
        )));
    }
    if skeleton.get("d") != Some(domain) || skeleton.get("s") != Some(selector) {
        return Err(KeyCheckError::Inconsistent("d= or s= does not round-trip".into()));
    }
    Ok(())
}

/// Runs the structural check for a record that carries a public key.
pub fn check_key(
    record: &DkimRecord,
    domain: &str,
    selector: &str,
) -> Result<KeyCheck, KeyCheckError> {
    let Some(algorithm) = signing_algorithm(record) else {
        return Ok(KeyCheck::neutral());
    };
    let skeleton = TagList::parse(&signature_skeleton(domain, selector, &algorithm));
    check_skeleton(&skeleton, record, domain, selector)?;

    let payload = record.public_key.as_deref().unwrap_or_default();
    let der = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| KeyCheckError::Base64(e.to_string()))?;

    let key_bits = if record.effective_key_type() == "ed25519" {
        if der.len() != 32 {
            return Err(KeyCheckError::Ed25519Length(der.len()));
        }
        256
    } else {
        let (_, spki) =
            SubjectPublicKeyInfo::from_der(&der).map_err(|e| KeyCheckError::Spki(e.to_string()))?;
        match spki.parsed() {
            Ok(PublicKey::RSA(rsa)) => rsa.key_size(),
            Ok(_) => return Err(KeyCheckError::Spki("not an RSA key".into())),
            Err(e) => return Err(KeyCheckError::Spki(e.to_string())),
        }
    };

    Ok(KeyCheck {
        verification: Verification::Pass,
        key_bits: Some(key_bits),
    })
}
