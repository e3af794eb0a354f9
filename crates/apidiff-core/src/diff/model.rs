//! Structural diff output types.
//!
//! `DiffEntry` values are immutable once produced and serialize with stable
//! snake_case names so report renderers can key off them.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// The kind of discrepancy found at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    /// Key present in the second value only
    FieldMissingInFirst,
    /// Key present in the first value only
    FieldMissingInSecond,
    /// Same scalar type, different value
    ValueChanged,
    /// Different runtime types; the branch is not descended
    TypeChanged,
    /// Arrays of different length; carries both lengths
    ArrayLengthChanged,
    /// Scalar array elements at the same index differ
    ArrayItemChanged,
    /// Tail element of the longer first array
    ExtraItemInFirst,
    /// Tail element of the longer second array
    ExtraItemInSecond,
}

impl DiffKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FieldMissingInFirst => "field_missing_in_first",
            Self::FieldMissingInSecond => "field_missing_in_second",
            Self::ValueChanged => "value_changed",
            Self::TypeChanged => "type_changed",
            Self::ArrayLengthChanged => "array_length_changed",
            Self::ArrayItemChanged => "array_item_changed",
            Self::ExtraItemInFirst => "extra_item_in_first",
            Self::ExtraItemInSecond => "extra_item_in_second",
        }
    }

    /// The kind reported when the operands are swapped.
    pub fn mirrored(&self) -> Self {
        match self {
            Self::FieldMissingInFirst => Self::FieldMissingInSecond,
            Self::FieldMissingInSecond => Self::FieldMissingInFirst,
            Self::ExtraItemInFirst => Self::ExtraItemInSecond,
            Self::ExtraItemInSecond => Self::ExtraItemInFirst,
            other => *other,
        }
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single located discrepancy between two values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffEntry {
    /// Dot/bracket path into the compared structure (`root` for the top level)
    pub path: String,
    pub kind: DiffKind,
    /// Value on the first side, truncated for report size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value1: Option<JsonValue>,
    /// Value on the second side, truncated for report size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<JsonValue>,
    /// Runtime type names, only set for `type_changed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<(String, String)>,
}

impl DiffEntry {
    pub fn new(path: impl Into<String>, kind: DiffKind) -> Self {
        Self {
            path: path.into(),
            kind,
            value1: None,
            value2: None,
            types: None,
        }
    }

    pub fn with_values(mut self, value1: Option<JsonValue>, value2: Option<JsonValue>) -> Self {
        self.value1 = value1;
        self.value2 = value2;
        self
    }

    pub fn with_types(mut self, first: &str, second: &str) -> Self {
        self.types = Some((first.to_string(), second.to_string()));
        self
    }

    /// The entry `compare(b, a)` produces for this entry of `compare(a, b)`.
    pub fn mirrored(&self) -> Self {
        Self {
            path: self.path.clone(),
            kind: self.kind.mirrored(),
            value1: self.value2.clone(),
            value2: self.value1.clone(),
            types: self
                .types
                .as_ref()
                .map(|(first, second)| (second.clone(), first.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_serializes_snake_case() {
        let entry = DiffEntry::new("status", DiffKind::ValueChanged)
            .with_values(Some(json!("OK")), Some(json!("FAIL")));
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({ "path": "status", "kind": "value_changed", "value1": "OK", "value2": "FAIL" })
        );
        assert_eq!(DiffKind::ArrayLengthChanged.to_string(), "array_length_changed");
    }

    #[test]
    fn test_mirrored_swaps_sides() {
        let entry = DiffEntry::new("root", DiffKind::TypeChanged)
            .with_values(Some(json!(null)), Some(json!({"id": 1})))
            .with_types("null", "object");
        let mirror = entry.mirrored();
        assert_eq!(mirror.kind, DiffKind::TypeChanged);
        assert_eq!(mirror.value1, Some(json!({"id": 1})));
        assert_eq!(mirror.types, Some(("object".into(), "null".into())));
        assert_eq!(
            DiffEntry::new("a", DiffKind::FieldMissingInFirst).mirrored().kind,
            DiffKind::FieldMissingInSecond
        );
    }
}
