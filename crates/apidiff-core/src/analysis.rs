//! Pairwise comparison of aggregated endpoints.
//!
//! For every endpoint seen in at least two sources, every unordered pair of
//! those sources is compared instance by instance: the `k`-th capture of the
//! endpoint in one source against the `k`-th capture in the other. The
//! [`ComparisonLevel`] throttles how much of each exchange is diffed.
//!
//! Endpoints are independent of each other; [`compare_endpoint`] is exposed
//! so callers can spread endpoints over workers or stop between endpoints.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map as JsonMap, Value as JsonValue};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::aggregate::{Aggregation, EndpointRecord, SourceIndex};
use crate::diff::{Comparator, DiffEntry};
use crate::endpoint::EndpointKey;
use crate::snapshot::Instance;

const ENVELOPE_STATUS_FIELDS: &[&str] = &["status", "statusCode", "code"];
const ENVELOPE_MESSAGE_FIELDS: &[&str] = &["message", "statusMessage"];

/// How much of each exchange is diffed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonLevel {
    /// Status codes and top-level body types only
    Basic,
    /// Full recursive diff of headers, bodies and response envelopes
    #[default]
    Detailed,
    /// `Detailed` plus cookies and query parameters
    Comprehensive,
}

impl ComparisonLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Detailed => "detailed",
            Self::Comprehensive => "comprehensive",
        }
    }
}

impl FromStr for ComparisonLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "detailed" => Ok(Self::Detailed),
            "comprehensive" => Ok(Self::Comprehensive),
            _ => Err(format!("Unknown comparison level: {}", s)),
        }
    }
}

impl fmt::Display for ComparisonLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Options for [`compare_all`].
#[derive(Debug, Clone, Default)]
pub struct CompareOptions {
    pub level: ComparisonLevel,
    pub comparator: Comparator,
}

impl CompareOptions {
    pub fn new(level: ComparisonLevel, comparator: Comparator) -> Self {
        Self { level, comparator }
    }
}

/// Application-level status/message pair carried in a response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: JsonValue,
    pub message: JsonValue,
}

impl Envelope {
    fn to_value(&self) -> JsonValue {
        json!({ "status": self.status, "message": self.message })
    }
}

/// Best-effort envelope extraction from a response body.
///
/// Returns `None` when the body is not JSON, not an object, or carries none
/// of the conventional status/message fields.
pub fn extract_envelope(body: &JsonValue) -> Option<Envelope> {
    let parsed: Cow<'_, JsonValue> = match body {
        JsonValue::String(text) => Cow::Owned(serde_json::from_str(text).ok()?),
        other => Cow::Borrowed(other),
    };
    let object = parsed.as_object()?;
    let status = first_field(object, ENVELOPE_STATUS_FIELDS);
    let message = first_field(object, ENVELOPE_MESSAGE_FIELDS);
    if status.is_none() && message.is_none() {
        return None;
    }
    Some(Envelope {
        status: status.cloned().unwrap_or(JsonValue::Null),
        message: message.cloned().unwrap_or(JsonValue::Null),
    })
}

fn first_field<'a>(object: &'a JsonMap<String, JsonValue>, fields: &[&str]) -> Option<&'a JsonValue> {
    fields.iter().find_map(|f| object.get(*f))
}

/// Per-dimension diff lists for one instance pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionDiffs {
    #[serde(default)]
    pub request_headers: Vec<DiffEntry>,
    #[serde(default)]
    pub request_body: Vec<DiffEntry>,
    #[serde(default)]
    pub response_headers: Vec<DiffEntry>,
    #[serde(default)]
    pub response_body: Vec<DiffEntry>,
    #[serde(default)]
    pub response_envelope: Vec<DiffEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_cookies: Option<Vec<DiffEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_cookies: Option<Vec<DiffEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_params: Option<Vec<DiffEntry>>,
}

impl DimensionDiffs {
    pub fn is_empty(&self) -> bool {
        let optional = [&self.request_cookies, &self.response_cookies, &self.query_params];
        self.request_headers.is_empty()
            && self.request_body.is_empty()
            && self.response_headers.is_empty()
            && self.response_body.is_empty()
            && self.response_envelope.is_empty()
            && optional.iter().all(|d| d.as_ref().map_or(true, |v| v.is_empty()))
    }
}

/// One side of an instance pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceSide {
    pub available: bool,
    #[serde(default)]
    pub status: JsonValue,
    #[serde(default)]
    pub timestamp: JsonValue,
}

impl InstanceSide {
    fn of(instance: Option<&Instance>) -> Self {
        match instance {
            Some(instance) => Self {
                available: true,
                status: instance.status.clone(),
                timestamp: instance.timestamp.clone(),
            },
            None => Self {
                available: false,
                status: JsonValue::Null,
                timestamp: JsonValue::Null,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusDifference {
    pub first: JsonValue,
    pub second: JsonValue,
}

/// Comparison of the `index`-th capture of an endpoint in two sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceComparison {
    pub index: usize,
    pub first: InstanceSide,
    pub second: InstanceSide,
    #[serde(flatten)]
    pub diffs: DimensionDiffs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_difference: Option<StatusDifference>,
}

impl InstanceComparison {
    /// A capture missing on one side counts as a change.
    pub fn has_changes(&self) -> bool {
        !self.first.available
            || !self.second.available
            || self.status_difference.is_some()
            || !self.diffs.is_empty()
    }
}

/// All instance comparisons between two sources for one endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairComparison {
    pub first: String,
    pub second: String,
    pub has_changes: bool,
    pub instances: Vec<InstanceComparison>,
}

/// Comparison outcome for one endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub method: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    pub has_changes: bool,
    pub present_in: Vec<String>,
    pub instance_counts: IndexMap<String, usize>,
    /// Keyed by `"{first}_vs_{second}"`
    pub differences: IndexMap<String, PairComparison>,
    pub response_status_summary: IndexMap<String, Vec<JsonValue>>,
}

/// Every unordered pair of sources, in `present_in` order.
pub fn source_pairs(present_in: &[SourceIndex]) -> Vec<(SourceIndex, SourceIndex)> {
    present_in
        .iter()
        .enumerate()
        .flat_map(|(i, &first)| present_in[i + 1..].iter().map(move |&second| (first, second)))
        .collect()
}

/// Compare one endpoint across its sources.
///
/// Returns `None` for endpoints seen in fewer than two sources.
pub fn compare_endpoint(
    aggregation: &Aggregation,
    record: &EndpointRecord,
    options: &CompareOptions,
) -> Option<ComparisonResult> {
    if !record.is_comparable() {
        return None;
    }
    let label = |source: SourceIndex| aggregation.label(source);

    let mut differences: IndexMap<String, PairComparison> = IndexMap::new();
    for (first, second) in source_pairs(record.present_in()) {
        let instances = compare_pair(record.instances(first), record.instances(second), options);
        let comparison = PairComparison {
            first: label(first).to_string(),
            second: label(second).to_string(),
            has_changes: instances.iter().any(InstanceComparison::has_changes),
            instances,
        };
        let key = pair_key(&differences, &comparison, first, second);
        differences.insert(key, comparison);
    }

    let present_in: Vec<String> = record.present_in().iter().map(|&s| label(s).to_string()).collect();
    let instance_counts = record
        .present_in()
        .iter()
        .map(|&s| (label(s).to_string(), record.instance_count(s)))
        .collect();
    let response_status_summary = record
        .present_in()
        .iter()
        .map(|&s| {
            let statuses: Vec<JsonValue> = record.instances(s).iter().map(|i| i.status.clone()).collect();
            (label(s).to_string(), statuses)
        })
        .collect();

    let has_changes = differences.values().any(|p| p.has_changes);
    log::debug!(
        "Compared {} across {} sources: {}",
        record.key(),
        present_in.len(),
        if has_changes { "changed" } else { "unchanged" }
    );

    Some(ComparisonResult {
        method: record.key().method.clone(),
        path: record.key().path.clone(),
        host: record.host().map(str::to_string),
        has_changes,
        present_in,
        instance_counts,
        differences,
        response_status_summary,
    })
}

/// Compare every endpoint seen in at least two sources.
pub fn compare_all(
    aggregation: &Aggregation,
    options: &CompareOptions,
) -> BTreeMap<EndpointKey, ComparisonResult> {
    aggregation
        .comparable()
        .filter_map(|record| {
            compare_endpoint(aggregation, record, options)
                .map(|result| (record.key().clone(), result))
        })
        .collect()
}

/// `"{A}_vs_{B}"`, qualified with the source indices (and then a counter)
/// until it no longer clashes with a key already taken.
fn pair_key(
    taken: &IndexMap<String, PairComparison>,
    comparison: &PairComparison,
    first: SourceIndex,
    second: SourceIndex,
) -> String {
    let plain = format!("{}_vs_{}", comparison.first, comparison.second);
    if !taken.contains_key(&plain) {
        return plain;
    }
    let qualified = format!("{}#{}_vs_{}#{}", comparison.first, first, comparison.second, second);
    let mut key = qualified.clone();
    let mut suffix = 1;
    while taken.contains_key(&key) {
        key = format!("{}~{}", qualified, suffix);
        suffix += 1;
    }
    key
}

fn compare_pair(
    first: &[Instance],
    second: &[Instance],
    options: &CompareOptions,
) -> Vec<InstanceComparison> {
    (0..first.len().max(second.len()))
        .map(|index| compare_instances(index, first.get(index), second.get(index), options))
        .collect()
}

fn compare_instances(
    index: usize,
    first: Option<&Instance>,
    second: Option<&Instance>,
    options: &CompareOptions,
) -> InstanceComparison {
    let (diffs, status_difference) = match (first, second) {
        (Some(a), Some(b)) => {
            let status_difference = (status_text(&a.status) != status_text(&b.status)).then(|| {
                StatusDifference {
                    first: a.status.clone(),
                    second: b.status.clone(),
                }
            });
            (compare_dimensions(a, b, options), status_difference)
        }
        _ => (DimensionDiffs::default(), None),
    };

    InstanceComparison {
        index,
        first: InstanceSide::of(first),
        second: InstanceSide::of(second),
        diffs,
        status_difference,
    }
}

fn compare_dimensions(a: &Instance, b: &Instance, options: &CompareOptions) -> DimensionDiffs {
    let comparator = &options.comparator;
    if options.level == ComparisonLevel::Basic {
        return DimensionDiffs {
            request_body: comparator.shape(&a.request.body, &b.request.body),
            response_body: comparator.shape(&a.response.body, &b.response.body),
            ..Default::default()
        };
    }

    let response_envelope = match (extract_envelope(&a.response.body), extract_envelope(&b.response.body)) {
        (Some(ea), Some(eb)) => comparator.compare(&ea.to_value(), &eb.to_value(), ""),
        _ => Vec::new(),
    };

    let mut diffs = DimensionDiffs {
        request_headers: comparator.compare(&a.request.headers, &b.request.headers, ""),
        request_body: comparator.compare(&a.request.body, &b.request.body, ""),
        response_headers: comparator.compare(&a.response.headers, &b.response.headers, ""),
        response_body: comparator.compare(&a.response.body, &b.response.body, ""),
        response_envelope,
        ..Default::default()
    };

    if options.level == ComparisonLevel::Comprehensive {
        diffs.request_cookies = Some(comparator.compare(&a.request.cookies, &b.request.cookies, ""));
        diffs.response_cookies = Some(comparator.compare(&a.response.cookies, &b.response.cookies, ""));
        diffs.query_params =
            Some(comparator.compare(&a.request.query_params, &b.request.query_params, ""));
    }

    diffs
}

/// Statuses compare by their textual form, so `200` and `"200"` match.
fn status_text(status: &JsonValue) -> Cow<'_, str> {
    match status {
        JsonValue::String(s) => Cow::Borrowed(s.as_str()),
        JsonValue::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{aggregate, TrafficSource};
    use crate::diff::DiffKind;

    fn entry(request_body: JsonValue, response_body: JsonValue) -> JsonValue {
        json!({
            "method": "GET",
            "path": "/v1/users",
            "request": {"headers": {}, "body": request_body},
            "response": {"status": 200, "headers": {}, "body": response_body}
        })
    }

    fn run(sources: Vec<TrafficSource>, level: ComparisonLevel) -> BTreeMap<EndpointKey, ComparisonResult> {
        let options = CompareOptions::new(level, Comparator::new());
        compare_all(&aggregate(&sources), &options)
    }

    fn users() -> EndpointKey {
        EndpointKey::new("GET", "/v1/users")
    }

    #[test]
    fn test_null_body_against_object_body() {
        let results = run(
            vec![
                TrafficSource::new("a", vec![entry(json!(null), json!(null))]),
                TrafficSource::new("b", vec![entry(json!({"id": 1}), json!(null))]),
            ],
            ComparisonLevel::Detailed,
        );
        let result = &results[&users()];
        assert!(result.has_changes);
        let diffs = &result.differences["a_vs_b"].instances[0].diffs.request_body;
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].path, "root");
        assert_eq!(diffs[0].kind, DiffKind::TypeChanged);
    }

    #[test]
    fn test_three_identical_sources() {
        let e = entry(json!({"id": 1}), json!("{\"status\":\"OK\"}"));
        let results = run(
            vec![
                TrafficSource::new("a", vec![e.clone()]),
                TrafficSource::new("b", vec![e.clone()]),
                TrafficSource::new("c", vec![e]),
            ],
            ComparisonLevel::Comprehensive,
        );
        let result = &results[&users()];
        assert!(!result.has_changes);
        let keys: Vec<&str> = result.differences.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a_vs_b", "a_vs_c", "b_vs_c"]);
        for pair in result.differences.values() {
            assert!(!pair.has_changes);
            assert!(pair.instances[0].diffs.is_empty());
        }
    }

    #[test]
    fn test_single_source_endpoint_is_excluded() {
        let results = run(
            vec![
                TrafficSource::new("a", vec![entry(json!(null), json!(null))]),
                TrafficSource::new("b", vec![json!({"method": "GET", "path": "/other"})]),
            ],
            ComparisonLevel::Detailed,
        );
        assert!(results.is_empty());
    }

    #[test]
    fn test_string_encoded_body_against_object_body() {
        let results = run(
            vec![
                TrafficSource::new("a", vec![entry(json!(null), json!("{\"status\":\"OK\"}"))]),
                TrafficSource::new("b", vec![entry(json!(null), json!({"status": "FAIL"}))]),
            ],
            ComparisonLevel::Detailed,
        );
        let instance = &results[&users()].differences["a_vs_b"].instances[0];
        assert_eq!(instance.diffs.response_body.len(), 1);
        assert_eq!(instance.diffs.response_body[0].kind, DiffKind::ValueChanged);
        assert_eq!(instance.diffs.response_body[0].path, "status");
        assert_eq!(instance.diffs.response_envelope[0].path, "status");
    }

    #[test]
    fn test_basic_level_skips_deep_diffs() {
        let mut a = entry(json!({"id": 1}), json!({"x": 1}));
        let mut b = entry(json!({"id": 2}), json!([1]));
        a["request"]["headers"] = json!({"X-A": "1"});
        b["request"]["headers"] = json!({"X-A": "2"});
        let results = run(
            vec![TrafficSource::new("a", vec![a]), TrafficSource::new("b", vec![b])],
            ComparisonLevel::Basic,
        );
        let diffs = &results[&users()].differences["a_vs_b"].instances[0].diffs;
        assert!(diffs.request_headers.is_empty());
        assert!(diffs.request_body.is_empty());
        assert_eq!(diffs.response_body.len(), 1);
        assert_eq!(diffs.response_body[0].kind, DiffKind::TypeChanged);
        assert!(diffs.request_cookies.is_none());
    }

    #[test]
    fn test_comprehensive_level_adds_cookies_and_query_params() {
        let mut a = entry(json!(null), json!(null));
        let mut b = entry(json!(null), json!(null));
        a["request"]["cookies"] = json!({"sid": "1"});
        b["request"]["cookies"] = json!({"sid": "2"});
        b["request"]["query_params"] = json!({"page": "2"});
        let sources = vec![TrafficSource::new("a", vec![a]), TrafficSource::new("b", vec![b])];

        let detailed = run(sources.clone(), ComparisonLevel::Detailed);
        assert!(!detailed[&users()].has_changes);

        let comprehensive = run(sources, ComparisonLevel::Comprehensive);
        let diffs = &comprehensive[&users()].differences["a_vs_b"].instances[0].diffs;
        assert_eq!(diffs.request_cookies.as_ref().map(Vec::len), Some(1));
        assert_eq!(diffs.query_params.as_ref().map(Vec::len), Some(1));
        assert_eq!(diffs.response_cookies.as_ref().map(Vec::len), Some(0));
        assert!(comprehensive[&users()].has_changes);
    }

    #[test]
    fn test_status_mismatch_marks_change() {
        let a = entry(json!(null), json!(null));
        let mut b = entry(json!(null), json!(null));
        b["response"]["status"] = json!(500);
        let results = run(
            vec![TrafficSource::new("a", vec![a]), TrafficSource::new("b", vec![b])],
            ComparisonLevel::Basic,
        );
        let result = &results[&users()];
        assert!(result.has_changes);
        let difference = result.differences["a_vs_b"].instances[0].status_difference.as_ref().unwrap();
        assert_eq!(difference.first, json!(200));
        assert_eq!(difference.second, json!(500));
        assert_eq!(result.response_status_summary["b"], vec![json!(500)]);
    }

    #[test]
    fn test_numeric_and_string_status_match() {
        let a = entry(json!(null), json!(null));
        let mut b = entry(json!(null), json!(null));
        b["response"]["status"] = json!("200");
        let results = run(
            vec![TrafficSource::new("a", vec![a]), TrafficSource::new("b", vec![b])],
            ComparisonLevel::Detailed,
        );
        assert!(!results[&users()].has_changes);
    }

    #[test]
    fn test_missing_instance_marks_change() {
        let e = entry(json!(null), json!(null));
        let results = run(
            vec![
                TrafficSource::new("a", vec![e.clone(), e.clone()]),
                TrafficSource::new("b", vec![e]),
            ],
            ComparisonLevel::Detailed,
        );
        let result = &results[&users()];
        assert!(result.has_changes);
        assert_eq!(result.instance_counts["a"], 2);
        assert_eq!(result.instance_counts["b"], 1);
        let instances = &result.differences["a_vs_b"].instances;
        assert_eq!(instances.len(), 2);
        assert!(!instances[0].has_changes());
        assert!(instances[1].first.available);
        assert!(!instances[1].second.available);
    }

    #[test]
    fn test_pair_keys_do_not_collide() {
        let e = entry(json!(null), json!(null));
        let results = run(
            vec![
                TrafficSource::new("x_vs_y", vec![e.clone()]),
                TrafficSource::new("z", vec![e.clone()]),
                TrafficSource::new("x", vec![e.clone()]),
                TrafficSource::new("y_vs_z", vec![e]),
            ],
            ComparisonLevel::Detailed,
        );
        assert_eq!(results[&users()].differences.len(), 6);
        assert!(results[&users()].differences.contains_key("x#2_vs_y_vs_z#3"));
    }

    #[test]
    fn test_compare_endpoint_uses_source_labels() {
        let sources = vec![
            TrafficSource::new("before.chlsj", vec![entry(json!(null), json!({"n": 1}))]),
            TrafficSource::new("after.chlsj", vec![entry(json!(null), json!({"n": 2}))]),
        ];
        let aggregation = aggregate(&sources);
        let record = &aggregation.endpoints[&users()];
        let result = compare_endpoint(&aggregation, record, &CompareOptions::default()).unwrap();
        assert_eq!(result.present_in, vec!["before.chlsj", "after.chlsj"]);
        assert!(result.differences.contains_key("before.chlsj_vs_after.chlsj"));
        assert_eq!(result.instance_counts["after.chlsj"], 1);
    }

    #[test]
    fn test_qualified_pair_keys_do_not_collide() {
        let e = entry(json!(null), json!(null));
        let labels = ["a_vs_b#4", "c#5", "a", "b_vs_c", "a_vs_b", "c"];
        let sources = labels
            .iter()
            .map(|l| TrafficSource::new(*l, vec![e.clone()]))
            .collect();
        let results = run(sources, ComparisonLevel::Detailed);
        let differences = &results[&users()].differences;
        assert_eq!(differences.len(), 15);

        let mut pairs: Vec<(String, String)> = differences
            .values()
            .map(|p| (p.first.clone(), p.second.clone()))
            .collect();
        pairs.sort();
        pairs.dedup();
        assert_eq!(pairs.len(), 15);
    }

    #[test]
    fn test_source_pairs_generic() {
        assert_eq!(source_pairs(&[0, 1]), vec![(0, 1)]);
        assert_eq!(source_pairs(&[0, 2, 3]), vec![(0, 2), (0, 3), (2, 3)]);
        assert_eq!(source_pairs(&[0, 1, 2, 3]).len(), 6);
        assert!(source_pairs(&[4]).is_empty());
    }

    #[test]
    fn test_envelope_aliases() {
        let envelope = extract_envelope(&json!("{\"statusCode\": 404, \"statusMessage\": \"nope\"}")).unwrap();
        assert_eq!(envelope.status, json!(404));
        assert_eq!(envelope.message, json!("nope"));

        let envelope = extract_envelope(&json!({"code": "E1"})).unwrap();
        assert_eq!(envelope.status, json!("E1"));
        assert_eq!(envelope.message, JsonValue::Null);

        assert!(extract_envelope(&json!("not json")).is_none());
        assert!(extract_envelope(&json!([1, 2])).is_none());
        assert!(extract_envelope(&json!({"data": 1})).is_none());
    }

    #[test]
    fn test_unparseable_body_skips_envelope_only() {
        let results = run(
            vec![
                TrafficSource::new("a", vec![entry(json!(null), json!("plain text"))]),
                TrafficSource::new("b", vec![entry(json!(null), json!({"status": "OK"}))]),
            ],
            ComparisonLevel::Detailed,
        );
        let diffs = &results[&users()].differences["a_vs_b"].instances[0].diffs;
        assert!(diffs.response_envelope.is_empty());
        assert_eq!(diffs.response_body.len(), 1);
    }

    #[test]
    fn test_results_are_deterministic() {
        let sources = vec![
            TrafficSource::new("a", vec![entry(json!({"b": 1, "a": [1, 2]}), json!("{\"z\":1,\"y\":2}"))]),
            TrafficSource::new("b", vec![entry(json!({"a": [1], "c": 3}), json!({"y": 3}))]),
        ];
        let first = serde_json::to_string(&run(sources.clone(), ComparisonLevel::Comprehensive)).unwrap();
        let second = serde_json::to_string(&run(sources, ComparisonLevel::Comprehensive)).unwrap();
        assert_eq!(first, second);
    }
}
