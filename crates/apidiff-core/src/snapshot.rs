//! Owned snapshots of the request/response parts of a traffic entry.
//!
//! Two layouts are understood: the nested capture layout
//! (`request.headers`, `response.body`, ...) and the flattened layout written
//! by pre-processing (`request_headers`, `response_body`, ...). The flattened
//! fields win when present. Header lists of `{name, value}` pairs are turned
//! into a mapping so both layouts diff the same way.

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

/// One side (request or response) of a captured exchange.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageSnapshot {
    #[serde(default)]
    pub headers: JsonValue,
    #[serde(default)]
    pub body: JsonValue,
    #[serde(default)]
    pub cookies: JsonValue,
    #[serde(default, skip_serializing_if = "JsonValue::is_null")]
    pub query_params: JsonValue,
}

/// A single occurrence of an endpoint in one source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// Response status, falling back to the entry-level status
    #[serde(default)]
    pub status: JsonValue,
    #[serde(default)]
    pub timestamp: JsonValue,
    pub request: MessageSnapshot,
    pub response: MessageSnapshot,
}

impl Instance {
    /// Extract a deep-copied snapshot. Never fails; absent parts are `null`.
    pub fn from_entry(entry: &JsonValue) -> Self {
        let request = entry.get("request");
        let response = entry.get("response");

        let status = response
            .and_then(|r| r.get("status"))
            .filter(|s| !s.is_null())
            .or_else(|| entry.get("status"))
            .cloned()
            .unwrap_or(JsonValue::Null);

        let timestamp = ["timestamp", "startedDateTime"]
            .iter()
            .find_map(|f| entry.get(*f))
            .cloned()
            .unwrap_or(JsonValue::Null);

        Self {
            status,
            timestamp,
            request: MessageSnapshot {
                headers: headers_of(entry, "request_headers", request),
                body: flat_or_nested(entry, "request_body", request, &["body"]),
                cookies: flat_or_nested(entry, "request_cookies", request, &["cookies"]),
                query_params: flat_or_nested(
                    entry,
                    "query_params",
                    request,
                    &["query_params", "queryParams"],
                ),
            },
            response: MessageSnapshot {
                headers: headers_of(entry, "response_headers", response),
                body: flat_or_nested(entry, "response_body", response, &["body"]),
                cookies: flat_or_nested(entry, "response_cookies", response, &["cookies"]),
                query_params: JsonValue::Null,
            },
        }
    }
}

/// Convert a `[{name, value}, ...]` header list into a mapping. Items that
/// are not `{name, value}` pairs are skipped; later duplicates win. Values
/// other than a list with at least one such pair are returned unchanged.
pub fn normalize_headers(headers: &JsonValue) -> JsonValue {
    let Some(list) = headers.as_array() else {
        return headers.clone();
    };
    let map: JsonMap<String, JsonValue> = list
        .iter()
        .filter_map(|h| {
            let name = h.get("name")?.as_str()?;
            let value = h.get("value")?;
            Some((name.to_string(), value.clone()))
        })
        .collect();
    if map.is_empty() {
        headers.clone()
    } else {
        JsonValue::Object(map)
    }
}

fn headers_of(entry: &JsonValue, flat: &str, nested: Option<&JsonValue>) -> JsonValue {
    if let Some(headers) = entry.get(flat) {
        return normalize_headers(headers);
    }
    let Some(part) = nested else {
        return JsonValue::Null;
    };
    if let Some(headers) = part.get("headers") {
        return normalize_headers(headers);
    }
    part.get("header")
        .and_then(|h| h.get("headers"))
        .map(normalize_headers)
        .unwrap_or(JsonValue::Null)
}

fn flat_or_nested(
    entry: &JsonValue,
    flat: &str,
    nested: Option<&JsonValue>,
    fields: &[&str],
) -> JsonValue {
    entry
        .get(flat)
        .or_else(|| nested.and_then(|part| fields.iter().find_map(|f| part.get(*f))))
        .cloned()
        .unwrap_or(JsonValue::Null)
}
