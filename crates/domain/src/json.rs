//! JSON text helpers used for attributes that carry structured documents.

use hydrant_core::{AppError, AppResult};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Maximum container nesting accepted when encoding an attachment rule.
///
/// Matches the deepest text `serde_json` parses back under its default
/// recursion limit of 128, so every encoded rule decodes again.
pub const MAX_ATTACHMENT_RULE_DEPTH: usize = 127;

/// Checks that `value` is well-formed JSON text. The empty string is accepted.
pub fn validate_json_string(value: &str) -> AppResult<()> {
    if value.is_empty() {
        return Ok(());
    }

    serde_json::from_str::<Value>(value)
        .map(|_| ())
        .map_err(|error| AppError::Validation(format!("{value:?} contains an invalid JSON: {error}")))
}

/// Canonicalizes JSON text: sorted object keys, no insignificant whitespace.
///
/// Text that does not parse is returned unchanged so the host still sees the
/// configured value.
#[must_use]
pub fn normalize_json_string(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    match serde_json::from_str::<Value>(value) {
        Ok(parsed) => parsed.to_string(),
        Err(_) => value.to_owned(),
    }
}

/// Encodes a structured value as canonical JSON text.
pub fn encode_canonical_json(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string(&DepthLimited {
        value,
        remaining: MAX_ATTACHMENT_RULE_DEPTH,
    })
}

struct DepthLimited<'a> {
    value: &'a Value,
    remaining: usize,
}

impl DepthLimited<'_> {
    fn descend<E: serde::ser::Error>(&self) -> Result<usize, E> {
        self.remaining.checked_sub(1).ok_or_else(|| {
            E::custom(format!(
                "value nests deeper than {MAX_ATTACHMENT_RULE_DEPTH} levels"
            ))
        })
    }
}

impl Serialize for DepthLimited<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.value {
            Value::Array(items) => {
                let remaining = self.descend::<S::Error>()?;
                let mut sequence = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    sequence.serialize_element(&DepthLimited {
                        value: item,
                        remaining,
                    })?;
                }
                sequence.end()
            }
            Value::Object(entries) => {
                let remaining = self.descend::<S::Error>()?;
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, item) in entries {
                    map.serialize_entry(
                        key,
                        &DepthLimited {
                            value: item,
                            remaining,
                        },
                    )?;
                }
                map.end()
            }
            scalar => scalar.serialize(serializer),
        }
    }
}
