//! Loading captured traffic logs from disk.
//!
//! Capture exports come in a few shapes: a JSON array of entries, an object
//! wrapping the array under `entries` or `data`, a single entry object, or one
//! JSON entry per line. [`load_source`] accepts all of them. The helpers below
//! turn loaded entries into the flattened "detailed" layout or into summary
//! statistics for the `parse` and `summarize` commands.

// Internal imports (std, crate)
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::aggregate::TrafficSource;
use crate::endpoint::UNKNOWN;
use crate::error::{Error, Result};
use crate::snapshot::normalize_headers;

// External imports (alphabetized)
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map as JsonMap, Value as JsonValue};
use tokio::fs;

/// Extension of binary capture sessions, which cannot be read as text.
const BINARY_EXTENSION: &str = "chls";

/// Array fields an exported log may wrap its entries in.
const WRAPPER_FIELDS: [&str; 2] = ["entries", "data"];

/// Read one traffic log. The source label is the file name.
pub async fn load_source<P: AsRef<Path>>(path: P) -> Result<TrafficSource> {
    let path = path.as_ref();
    if path.extension().and_then(|e| e.to_str()) == Some(BINARY_EXTENSION) {
        return Err(Error::UnsupportedFormat(format!(
            "{} is a binary session, export it as JSON (.chlsj) first",
            path.display()
        )));
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| Error::unreadable(path.display().to_string(), e))?;

    let entries = parse_entries(&content);
    log::debug!("Loaded {} entries from {}", entries.len(), path.display());
    Ok(TrafficSource::new(source_label(path), entries))
}

/// Split file content into entries, falling back to one entry per line.
pub fn parse_entries(content: &str) -> Vec<JsonValue> {
    match serde_json::from_str::<JsonValue>(content) {
        Ok(JsonValue::Array(entries)) => entries,
        Ok(JsonValue::Object(object)) => unwrap_entries(object),
        Ok(other) => vec![other],
        Err(_) => parse_lines(content),
    }
}

fn unwrap_entries(mut object: JsonMap<String, JsonValue>) -> Vec<JsonValue> {
    for field in WRAPPER_FIELDS {
        if matches!(object.get(field), Some(JsonValue::Array(_))) {
            if let Some(JsonValue::Array(entries)) = object.remove(field) {
                return entries;
            }
        }
    }
    vec![JsonValue::Object(object)]
}

fn parse_lines(content: &str) -> Vec<JsonValue> {
    let mut entries = Vec::new();
    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(entry) => entries.push(entry),
            Err(e) => log::warn!("Skipping invalid entry on line {}: {}", line_num + 1, e),
        }
    }
    entries
}

fn source_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Output shape of a parsed log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ParseFormat {
    /// Counts and timing statistics
    Summary,
    /// Entries flattened into request/response fields
    #[default]
    Detailed,
    /// Entries exactly as loaded
    Raw,
}

impl ParseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseFormat::Summary => "summary",
            ParseFormat::Detailed => "detailed",
            ParseFormat::Raw => "raw",
        }
    }
}

impl FromStr for ParseFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "summary" => Ok(ParseFormat::Summary),
            "detailed" => Ok(ParseFormat::Detailed),
            "raw" => Ok(ParseFormat::Raw),
            _ => Err(format!("Unknown parse format: {}", s)),
        }
    }
}

impl fmt::Display for ParseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Render loaded entries in the requested format.
pub fn render(entries: &[JsonValue], format: ParseFormat) -> Result<JsonValue> {
    let value = match format {
        ParseFormat::Raw => json!({ "entries": entries }),
        ParseFormat::Summary => serde_json::to_value(LogSummary::from_entries(entries))?,
        ParseFormat::Detailed => {
            let normalized: Vec<JsonValue> = entries.iter().map(normalize_entry).collect();
            json!({ "entries": normalized })
        }
    };
    Ok(value)
}

/// Parse a log and write it as `<stem>_parsed.json` into `output_dir`.
pub async fn parse_and_save<P, Q>(path: P, output_dir: Q, format: ParseFormat) -> Result<PathBuf>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let path = path.as_ref();
    let output_dir = output_dir.as_ref();
    let source = load_source(path).await?;
    let rendered = render(&source.entries, format)?;

    fs::create_dir_all(output_dir).await?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.label.clone());
    let output_file = output_dir.join(format!("{}_parsed.json", stem));
    fs::write(&output_file, serde_json::to_string_pretty(&rendered)?).await?;
    Ok(output_file)
}

/// Flatten a capture entry into the detailed layout.
///
/// Header lists are turned into mappings and `durations.total` stands in for
/// a missing `duration`. Fields absent from the entry are omitted.
pub fn normalize_entry(entry: &JsonValue) -> JsonValue {
    let mut out = JsonMap::new();
    for field in ["url", "host", "path"] {
        out.insert(field.to_string(), field_or(entry, field, json!("")));
    }
    out.insert("status".to_string(), field_or(entry, "status", json!("")));
    out.insert("duration".to_string(), duration_of(entry).unwrap_or(json!(0)));

    if let Some(request) = entry.get("request") {
        out.insert("method".to_string(), field_or(request, "method", json!("")));
        out.insert("request_size".to_string(), field_or(request, "size", json!(0)));
        if let Some(headers) = message_headers(request) {
            out.insert("request_headers".to_string(), headers);
        }
        if let Some(body) = request.get("body") {
            out.insert("request_body".to_string(), body.clone());
        }
    }

    if let Some(response) = entry.get("response") {
        if let Some(status) = response.get("status") {
            out.insert("status".to_string(), status.clone());
        }
        out.insert("response_size".to_string(), field_or(response, "size", json!(0)));
        if let Some(headers) = message_headers(response) {
            out.insert("response_headers".to_string(), headers);
        }
        if let Some(body) = response.get("body") {
            out.insert("response_body".to_string(), body.clone());
        }
    }

    JsonValue::Object(out)
}

fn field_or(value: &JsonValue, field: &str, default: JsonValue) -> JsonValue {
    value.get(field).cloned().unwrap_or(default)
}

fn message_headers(message: &JsonValue) -> Option<JsonValue> {
    message
        .get("header")
        .and_then(|h| h.get("headers"))
        .or_else(|| message.get("headers"))
        .map(normalize_headers)
}

fn duration_of(entry: &JsonValue) -> Option<JsonValue> {
    entry.get("duration").cloned().or_else(|| {
        entry
            .get("durations")
            .and_then(|d| d.get("total"))
            .filter(|t| !t.is_null())
            .cloned()
    })
}

/// Response time statistics, in the unit the capture records durations in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub total: f64,
}

/// Aggregate statistics of one traffic log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogSummary {
    pub total_entries: usize,
    pub request_methods: BTreeMap<String, usize>,
    pub status_codes: BTreeMap<String, usize>,
    pub hosts: BTreeMap<String, usize>,
    pub content_types: BTreeMap<String, usize>,
    pub timing: Timing,
}

impl LogSummary {
    pub fn from_entries(entries: &[JsonValue]) -> Self {
        let mut summary = LogSummary {
            total_entries: entries.len(),
            ..Default::default()
        };
        let mut min = f64::INFINITY;

        for entry in entries {
            let method = entry
                .get("request")
                .and_then(|r| r.get("method"))
                .or_else(|| entry.get("method"))
                .and_then(JsonValue::as_str)
                .unwrap_or(UNKNOWN);
            bump(&mut summary.request_methods, method);

            let status = match entry.get("response").and_then(|r| r.get("status")) {
                Some(JsonValue::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => "0".to_string(),
            };
            bump(&mut summary.status_codes, &status);

            let host = entry.get("host").and_then(JsonValue::as_str).unwrap_or(UNKNOWN);
            bump(&mut summary.hosts, host);

            let content_type = entry
                .get("response")
                .and_then(|r| r.get("headers"))
                .and_then(content_type_of)
                .unwrap_or(UNKNOWN);
            bump(&mut summary.content_types, content_type);

            if let Some(duration) = duration_of(entry).and_then(|d| d.as_f64()) {
                min = min.min(duration);
                summary.timing.max = summary.timing.max.max(duration);
                summary.timing.total += duration;
            }
        }

        if !entries.is_empty() {
            summary.timing.avg = summary.timing.total / entries.len() as f64;
        }
        summary.timing.min = if min.is_finite() { min } else { 0.0 };
        summary
    }
}

fn bump(counts: &mut BTreeMap<String, usize>, key: &str) {
    *counts.entry(key.to_string()).or_default() += 1;
}

/// First `Content-Type` value of a header mapping or `{name, value}` list.
fn content_type_of(headers: &JsonValue) -> Option<&str> {
    match headers {
        JsonValue::Object(map) => match map.get("Content-Type")? {
            JsonValue::Array(values) => values.first()?.as_str(),
            JsonValue::String(value) => Some(value.as_str()),
            _ => None,
        },
        JsonValue::Array(list) => list
            .iter()
            .find(|h| h.get("name").and_then(JsonValue::as_str) == Some("Content-Type"))
            .and_then(|h| h.get("value"))
            .and_then(JsonValue::as_str),
        _ => None,
    }
}
