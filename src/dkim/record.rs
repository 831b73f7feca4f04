//! DKIM tag-list tokenizer and key record view.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Ordered `tag=value` pairs (RFC 6376 §3.2).
///
/// The first occurrence of a tag wins. Names and values are trimmed; `p=` and
/// `b=`/`bh=` values have all whitespace removed since base64 may be folded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagList {
    tags: Vec<(String, String)>,
}

impl TagList {
    pub fn parse(input: &str) -> Self {
        let mut tags: Vec<(String, String)> = Vec::new();
        for part in input.split(';') {
            let Some((name, value)) = part.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() || tags.iter().any(|(n, _)| n == name) {
                continue;
            }
            let value = match name {
                "p" | "b" | "bh" => value.chars().filter(|c| !c.is_whitespace()).collect(),
                _ => value.trim().to_string(),
            };
            tags.push((name.to_string(), value));
        }
        Self { tags }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl Serialize for TagList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tags.len()))?;
        for (name, value) in &self.tags {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Splits a colon-separated tag value into lower-cased items.
fn colon_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(':')
                .map(|item| item.trim().to_ascii_lowercase())
                .filter(|item| !item.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// A DKIM key record with the attributes the scoring rules look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DkimRecord {
    pub raw: String,
    pub tags: TagList,
    /// `k=`, lower-cased; `None` when the tag is absent.
    pub key_type: Option<String>,
    /// `p=` without whitespace; `None` when absent or empty.
    pub public_key: Option<String>,
    pub hash_algorithms: Vec<String>,
    pub service_types: Vec<String>,
    pub flags: Vec<String>,
}

impl DkimRecord {
    pub fn parse(raw: &str) -> Self {
        let tags = TagList::parse(raw);
        let key_type = tags.get("k").map(|k| k.trim().to_ascii_lowercase());
        let public_key = tags.get("p").filter(|p| !p.is_empty()).map(str::to_string);
        let hash_algorithms = colon_list(tags.get("h"));
        let service_types = colon_list(tags.get("s"));
        let flags = colon_list(tags.get("t"));
        Self {
            raw: raw.to_string(),
            tags,
            key_type,
            public_key,
            hash_algorithms,
            service_types,
            flags,
        }
    }

    pub fn has_key(&self) -> bool {
        self.public_key.is_some()
    }

    /// Length of the base64 key payload in characters.
    pub fn key_length(&self) -> usize {
        self.public_key.as_deref().map_or(0, str::len)
    }

    /// `k=` if present, otherwise the RFC 6376 default.
    pub fn effective_key_type(&self) -> &str {
        self.key_type.as_deref().unwrap_or("rsa")
    }

    pub fn allows_hash(&self, hash: &str) -> bool {
        self.hash_algorithms.is_empty() || self.hash_algorithms.iter().any(|h| h == hash)
    }
}

/// True when a TXT record looks like a DKIM key record.
pub fn is_dkim_shaped(txt: &str) -> bool {
    let compact: String = txt
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    compact.contains("v=dkim1") || compact.contains("k=rsa") || compact.contains("p=")
}
