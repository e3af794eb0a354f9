//! Endpoint identity for captured traffic entries.
//!
//! Recorded traffic arrives in several field layouts: the method may sit at
//! the top level or under `request`, the query string may be part of a full
//! path, a separate field, or only available inside a `url`. [`resolve`]
//! folds all of these into one [`EndpointKey`] of the form
//! `{method}:{path}`.
//!
//! Matching is exact-string: no case folding, no trailing-slash handling and
//! no reordering of query parameters.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Placeholder for a method or path that could not be resolved.
pub const UNKNOWN: &str = "UNKNOWN";

const FULL_PATH_FIELDS: &[&str] = &["full_path", "fullPath"];

/// Canonical identity of a logical API endpoint.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EndpointKey {
    pub method: String,
    /// Path including the `?query` suffix when one was captured
    pub path: String,
}

impl EndpointKey {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }

    /// The catch-all key for entries that carry no identity at all.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN, UNKNOWN)
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.method, self.path)
    }
}

/// Splits on the first `:`, so a method containing `:` does not round-trip.
/// [`resolve`] never produces such a method.
impl FromStr for EndpointKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_once(':')
            .map(|(method, path)| Self::new(method, path))
            .ok_or_else(|| format!("Endpoint key without method separator: {}", s))
    }
}

impl Serialize for EndpointKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EndpointKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Derive the endpoint key of a traffic entry.
///
/// Never fails: entries that are not objects resolve to `UNKNOWN:UNKNOWN`,
/// missing pieces resolve to `UNKNOWN` individually.
pub fn resolve(entry: &JsonValue) -> EndpointKey {
    if !entry.is_object() {
        return EndpointKey::unknown();
    }

    let method = str_field(entry, "method")
        .filter(|m| is_method(m))
        .or_else(|| {
            entry
                .get("request")
                .and_then(|r| str_field(r, "method"))
                .filter(|m| is_method(m))
        })
        .unwrap_or(UNKNOWN);

    EndpointKey::new(method, resolve_path(entry))
}

/// Host the entry was sent to, if recorded.
pub fn resolve_host(entry: &JsonValue) -> Option<String> {
    if let Some(host) = str_field(entry, "host").filter(|h| !h.is_empty()) {
        return Some(host.to_string());
    }
    str_field(entry, "url")
        .and_then(|u| Url::parse(u).ok())
        .and_then(|url| url.host_str().map(str::to_string))
}

fn resolve_path(entry: &JsonValue) -> String {
    if let Some(full) = FULL_PATH_FIELDS.iter().find_map(|f| str_field(entry, f)) {
        return full.to_string();
    }

    if let Some(path) = str_field(entry, "path") {
        return with_query(path, query_string(entry));
    }

    if let Some(url) = str_field(entry, "url").and_then(|u| Url::parse(u).ok()) {
        let query = query_string(entry).or_else(|| url.query().filter(|q| !q.is_empty()));
        return with_query(url.path(), query);
    }

    with_query(UNKNOWN, query_string(entry))
}

/// Query string in priority order: `request.query`, `request.queryString`,
/// then a top-level `query`.
fn query_string(entry: &JsonValue) -> Option<&str> {
    let request = entry.get("request");
    request
        .and_then(|r| str_field(r, "query"))
        .or_else(|| request.and_then(|r| str_field(r, "queryString")))
        .or_else(|| str_field(entry, "query"))
        .filter(|q| !q.is_empty())
}

fn with_query(path: &str, query: Option<&str>) -> String {
    match query {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    }
}

/// Methods must be non-empty and free of the `:` key separator, so every
/// resolved key parses back from its display form.
fn is_method(method: &str) -> bool {
    !method.is_empty() && !method.contains(':')
}

fn str_field<'a>(value: &'a JsonValue, field: &str) -> Option<&'a str> {
    value.get(field).and_then(JsonValue::as_str)
}
