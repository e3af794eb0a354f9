//! Recursive structural comparison of two JSON values.
//!
//! [`Comparator::compare`] dispatches on the runtime shape of both operands:
//! objects are walked over the sorted union of their keys, arrays
//! positionally, and scalars by exact equality. Strings that carry an
//! embedded JSON document can optionally be decoded first, so a response body
//! that arrives double-encoded still diffs field by field.
//!
//! Output order is deterministic: object keys in sorted order, array elements
//! in index order.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::borrow::Cow;
use std::collections::BTreeSet;

use super::model::{DiffEntry, DiffKind};

/// Path rendered for the top level of a comparison.
pub const ROOT_PATH: &str = "root";

/// Default bound on the character length of reported values.
pub const DEFAULT_MAX_VALUE_LEN: usize = 100;

/// How the tail of the longer array is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayTailPolicy {
    /// A single `array_length_changed` entry, no per-item tail entries
    #[default]
    LengthOnly,
    /// `array_length_changed` followed by one `extra_item_in_*` per tail element
    PerItem,
}

/// Structural comparator for semi-structured values.
#[derive(Debug, Clone)]
pub struct Comparator {
    decode_embedded_json: bool,
    max_value_len: usize,
    array_tail: ArrayTailPolicy,
}

impl Default for Comparator {
    fn default() -> Self {
        Self {
            decode_embedded_json: true,
            max_value_len: DEFAULT_MAX_VALUE_LEN,
            array_tail: ArrayTailPolicy::default(),
        }
    }
}

impl Comparator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable decoding of JSON documents embedded in strings.
    pub fn decode_embedded_json(mut self, enabled: bool) -> Self {
        self.decode_embedded_json = enabled;
        self
    }

    pub fn max_value_len(mut self, max: usize) -> Self {
        self.max_value_len = max;
        self
    }

    pub fn array_tail(mut self, policy: ArrayTailPolicy) -> Self {
        self.array_tail = policy;
        self
    }

    /// Compare `a` against `b`, prefixing every reported path with `path`.
    ///
    /// Pass an empty `path` to compare from the top level; top-level entries
    /// are then reported at [`ROOT_PATH`] and children as `key`, `key.sub`
    /// or `[0]`.
    pub fn compare(&self, a: &JsonValue, b: &JsonValue, path: &str) -> Vec<DiffEntry> {
        let mut out = Vec::new();
        self.walk(a, b, path, &mut out);
        out
    }

    /// Shallow comparison: reports only a top-level type difference.
    pub fn shape(&self, a: &JsonValue, b: &JsonValue) -> Vec<DiffEntry> {
        let (a, b) = self.decoded(a, b);
        let (type_a, type_b) = (type_name(&a), type_name(&b));
        if type_a == type_b {
            return Vec::new();
        }
        vec![DiffEntry::new(ROOT_PATH, DiffKind::TypeChanged)
            .with_values(Some(self.truncate(&a)), Some(self.truncate(&b)))
            .with_types(type_a, type_b)]
    }

    /// Bound a value for inclusion in a report.
    pub fn truncate(&self, value: &JsonValue) -> JsonValue {
        match value {
            JsonValue::String(s) => JsonValue::String(truncate_str(s, self.max_value_len)),
            JsonValue::Object(_) | JsonValue::Array(_) => {
                let text = value.to_string();
                if text.chars().count() > self.max_value_len {
                    JsonValue::String(truncate_str(&text, self.max_value_len))
                } else {
                    value.clone()
                }
            }
            other => other.clone(),
        }
    }

    fn walk(&self, a: &JsonValue, b: &JsonValue, path: &str, out: &mut Vec<DiffEntry>) {
        if a == b {
            return;
        }

        if self.decode_embedded_json {
            if let Some((da, db)) = decode_pair(a, b) {
                return self.walk(&da, &db, path, out);
            }
        }

        match (a, b) {
            (JsonValue::Object(ma), JsonValue::Object(mb)) => {
                let keys: BTreeSet<&String> = ma.keys().chain(mb.keys()).collect();
                for key in keys {
                    let child = child_path(path, key);
                    match (ma.get(key), mb.get(key)) {
                        (Some(va), Some(vb)) => self.walk(va, vb, &child, out),
                        (Some(va), None) => out.push(
                            DiffEntry::new(child, DiffKind::FieldMissingInSecond)
                                .with_values(Some(self.truncate(va)), None),
                        ),
                        (None, Some(vb)) => out.push(
                            DiffEntry::new(child, DiffKind::FieldMissingInFirst)
                                .with_values(None, Some(self.truncate(vb))),
                        ),
                        (None, None) => {}
                    }
                }
            }
            (JsonValue::Array(xa), JsonValue::Array(xb)) => self.walk_arrays(xa, xb, path, out),
            _ => {
                let (type_a, type_b) = (type_name(a), type_name(b));
                let entry = if type_a != type_b {
                    DiffEntry::new(display_path(path), DiffKind::TypeChanged)
                        .with_types(type_a, type_b)
                } else {
                    DiffEntry::new(display_path(path), DiffKind::ValueChanged)
                };
                out.push(entry.with_values(Some(self.truncate(a)), Some(self.truncate(b))));
            }
        }
    }

    fn walk_arrays(&self, xa: &[JsonValue], xb: &[JsonValue], path: &str, out: &mut Vec<DiffEntry>) {
        if xa.len() != xb.len() {
            out.push(
                DiffEntry::new(display_path(path), DiffKind::ArrayLengthChanged)
                    .with_values(Some(JsonValue::from(xa.len())), Some(JsonValue::from(xb.len()))),
            );
        }

        for (index, (ea, eb)) in xa.iter().zip(xb.iter()).enumerate() {
            let child = index_path(path, index);
            if ea == eb {
                continue;
            }
            let (da, db) = self.decoded(ea, eb);
            if is_composite(&da) || is_composite(&db) {
                self.walk(&da, &db, &child, out);
            } else if da != db {
                out.push(
                    DiffEntry::new(child, DiffKind::ArrayItemChanged)
                        .with_values(Some(self.truncate(&da)), Some(self.truncate(&db))),
                );
            }
        }

        if self.array_tail == ArrayTailPolicy::PerItem {
            let shorter = xa.len().min(xb.len());
            for (index, extra) in xa.iter().enumerate().skip(shorter) {
                out.push(
                    DiffEntry::new(index_path(path, index), DiffKind::ExtraItemInFirst)
                        .with_values(Some(self.truncate(extra)), None),
                );
            }
            for (index, extra) in xb.iter().enumerate().skip(shorter) {
                out.push(
                    DiffEntry::new(index_path(path, index), DiffKind::ExtraItemInSecond)
                        .with_values(None, Some(self.truncate(extra))),
                );
            }
        }
    }

    fn decoded<'a>(&self, a: &'a JsonValue, b: &'a JsonValue) -> (Cow<'a, JsonValue>, Cow<'a, JsonValue>) {
        if self.decode_embedded_json {
            if let Some(pair) = decode_pair(a, b) {
                return pair;
            }
        }
        (Cow::Borrowed(a), Cow::Borrowed(b))
    }
}

/// Runtime type name of a JSON value as reported in `type_changed` entries.
pub fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn is_composite(value: &JsonValue) -> bool {
    matches!(value, JsonValue::Object(_) | JsonValue::Array(_))
}

/// Decode embedded JSON on one or both sides.
///
/// Two strings are substituted only if both parse. A lone string facing an
/// object or array is substituted only if it parses to an object or array.
fn decode_pair<'a>(a: &'a JsonValue, b: &'a JsonValue) -> Option<(Cow<'a, JsonValue>, Cow<'a, JsonValue>)> {
    match (a, b) {
        (JsonValue::String(sa), JsonValue::String(sb)) => {
            let da = serde_json::from_str::<JsonValue>(sa).ok()?;
            let db = serde_json::from_str::<JsonValue>(sb).ok()?;
            Some((Cow::Owned(da), Cow::Owned(db)))
        }
        (JsonValue::String(sa), other) if is_composite(other) => {
            let da = parse_composite(sa)?;
            Some((Cow::Owned(da), Cow::Borrowed(other)))
        }
        (other, JsonValue::String(sb)) if is_composite(other) => {
            let db = parse_composite(sb)?;
            Some((Cow::Borrowed(other), Cow::Owned(db)))
        }
        _ => None,
    }
}

fn parse_composite(text: &str) -> Option<JsonValue> {
    serde_json::from_str::<JsonValue>(text)
        .ok()
        .filter(is_composite)
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        ROOT_PATH
    } else {
        path
    }
}

fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn index_path(path: &str, index: usize) -> String {
    format!("{path}[{index}]")
}

fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max).collect();
    truncated.push_str("...");
    truncated
}
