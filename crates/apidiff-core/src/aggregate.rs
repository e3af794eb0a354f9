//! Folding traffic entries from every source into per-endpoint records.
//!
//! Each endpoint is built by an [`EndpointRecordBuilder`] while sources are
//! folded in, then finalized into an immutable [`EndpointRecord`]. Sources
//! are referred to by their position in the caller's list, never by label.

use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use crate::endpoint::{self, EndpointKey};
use crate::snapshot::Instance;

/// Index of a source in the caller-supplied order.
pub type SourceIndex = usize;

/// One independently captured traffic log.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficSource {
    pub label: String,
    pub entries: Vec<JsonValue>,
}

impl TrafficSource {
    pub fn new(label: impl Into<String>, entries: Vec<JsonValue>) -> Self {
        Self {
            label: label.into(),
            entries,
        }
    }
}

/// Accumulates the occurrences of one endpoint.
#[derive(Debug, Clone)]
pub struct EndpointRecordBuilder {
    key: EndpointKey,
    host: Option<String>,
    present_in: Vec<SourceIndex>,
    instances: BTreeMap<SourceIndex, Vec<Instance>>,
}

impl EndpointRecordBuilder {
    pub fn new(key: EndpointKey) -> Self {
        Self {
            key,
            host: None,
            present_in: Vec::new(),
            instances: BTreeMap::new(),
        }
    }

    /// Record one entry seen in `source`.
    pub fn add(&mut self, source: SourceIndex, entry: &JsonValue) {
        if !self.present_in.contains(&source) {
            self.present_in.push(source);
        }
        if self.host.is_none() {
            self.host = endpoint::resolve_host(entry);
        }
        self.instances
            .entry(source)
            .or_default()
            .push(Instance::from_entry(entry));
    }

    fn absorb(&mut self, other: EndpointRecordBuilder) {
        if self.host.is_none() {
            self.host = other.host;
        }
        for source in other.present_in {
            if !self.present_in.contains(&source) {
                self.present_in.push(source);
            }
        }
        for (source, mut instances) in other.instances {
            self.instances.entry(source).or_default().append(&mut instances);
        }
    }

    pub fn finish(mut self) -> EndpointRecord {
        self.present_in.sort_unstable();
        EndpointRecord {
            key: self.key,
            host: self.host,
            present_in: self.present_in,
            instances: self.instances,
        }
    }
}

/// Finalized, read-only view of one endpoint across all sources.
///
/// Instance counts are derived from the stored instances, so a count always
/// matches the number of snapshots kept for that source.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointRecord {
    key: EndpointKey,
    host: Option<String>,
    present_in: Vec<SourceIndex>,
    instances: BTreeMap<SourceIndex, Vec<Instance>>,
}

impl EndpointRecord {
    pub fn key(&self) -> &EndpointKey {
        &self.key
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Sources the endpoint was seen in, in source order.
    pub fn present_in(&self) -> &[SourceIndex] {
        &self.present_in
    }

    pub fn instances(&self, source: SourceIndex) -> &[Instance] {
        self.instances
            .get(&source)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn instance_count(&self, source: SourceIndex) -> usize {
        self.instances(source).len()
    }

    /// Whether there is at least one partner source to diff against.
    pub fn is_comparable(&self) -> bool {
        self.present_in.len() >= 2
    }
}

/// Incremental endpoint aggregation.
///
/// Sources may be folded into separate aggregators and combined with
/// [`Aggregator::merge`]; the result is the same as folding them in order.
#[derive(Debug, Default)]
pub struct Aggregator {
    builders: BTreeMap<EndpointKey, EndpointRecordBuilder>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold every entry of one source, in original order.
    pub fn fold_source(&mut self, source: SourceIndex, entries: &[JsonValue]) {
        for entry in entries {
            let key = endpoint::resolve(entry);
            self.builders
                .entry(key.clone())
                .or_insert_with(|| EndpointRecordBuilder::new(key))
                .add(source, entry);
        }
        log::debug!(
            "Folded {} entries from source #{} ({} endpoints so far)",
            entries.len(),
            source,
            self.builders.len()
        );
    }

    pub fn merge(&mut self, other: Aggregator) {
        for (key, builder) in other.builders {
            match self.builders.get_mut(&key) {
                Some(existing) => existing.absorb(builder),
                None => {
                    self.builders.insert(key, builder);
                }
            }
        }
    }

    pub fn finish(self) -> BTreeMap<EndpointKey, EndpointRecord> {
        self.builders
            .into_iter()
            .map(|(key, builder)| (key, builder.finish()))
            .collect()
    }
}

/// Aggregated endpoints together with the labels of the sources they index.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub labels: Vec<String>,
    pub endpoints: BTreeMap<EndpointKey, EndpointRecord>,
}

impl Aggregation {
    pub fn label(&self, source: SourceIndex) -> &str {
        self.labels.get(source).map(String::as_str).unwrap_or(endpoint::UNKNOWN)
    }

    /// Endpoints seen in at least two sources.
    pub fn comparable(&self) -> impl Iterator<Item = &EndpointRecord> {
        self.endpoints.values().filter(|r| r.is_comparable())
    }
}

/// Fold all sources, in order, into endpoint records.
pub fn aggregate(sources: &[TrafficSource]) -> Aggregation {
    let mut aggregator = Aggregator::new();
    for (index, source) in sources.iter().enumerate() {
        aggregator.fold_source(index, &source.entries);
    }
    Aggregation {
        labels: sources.iter().map(|s| s.label.clone()).collect(),
        endpoints: aggregator.finish(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(method: &str, path: &str, body: JsonValue) -> JsonValue {
        json!({"method": method, "path": path, "request": {"headers": {}, "body": body}})
    }

    #[test]
    fn test_counts_match_instances() {
        let sources = vec![
            TrafficSource::new(
                "a.json",
                vec![entry("GET", "/x", json!(null)), entry("GET", "/x", json!(1))],
            ),
            TrafficSource::new("b.json", vec![entry("GET", "/x", json!(null))]),
        ];
        let aggregation = aggregate(&sources);
        let record = &aggregation.endpoints[&EndpointKey::new("GET", "/x")];
        assert_eq!(record.present_in(), &[0, 1]);
        assert_eq!(record.instance_count(0), 2);
        assert_eq!(record.instance_count(1), 1);
        assert_eq!(record.instances(0)[1].request.body, json!(1));
        assert_eq!(record.instance_count(2), 0);
    }

    #[test]
    fn test_malformed_entries_go_to_unknown_bucket() {
        let sources = vec![
            TrafficSource::new("a", vec![json!("garbage"), json!(null), json!({})]),
            TrafficSource::new("b", vec![json!(7)]),
        ];
        let aggregation = aggregate(&sources);
        assert_eq!(aggregation.endpoints.len(), 1);
        let record = &aggregation.endpoints[&EndpointKey::unknown()];
        assert_eq!(record.instance_count(0), 3);
        assert_eq!(record.instance_count(1), 1);
    }

    #[test]
    fn test_single_source_endpoints_are_not_comparable() {
        let sources = vec![
            TrafficSource::new("a", vec![entry("GET", "/shared", json!(null)), entry("GET", "/only-a", json!(null))]),
            TrafficSource::new("b", vec![entry("GET", "/shared", json!(null))]),
        ];
        let aggregation = aggregate(&sources);
        assert_eq!(aggregation.endpoints.len(), 2);
        let comparable: Vec<String> = aggregation.comparable().map(|r| r.key().to_string()).collect();
        assert_eq!(comparable, vec!["GET:/shared"]);
    }

    #[test]
    fn test_input_is_left_untouched() {
        let sources = vec![
            TrafficSource::new("a", vec![entry("POST", "/x", json!({"id": 1}))]),
            TrafficSource::new("b", vec![entry("POST", "/x", json!({"id": 2}))]),
        ];
        let before = sources.clone();
        let _ = aggregate(&sources);
        assert_eq!(sources, before);
    }

    #[test]
    fn test_merge_matches_sequential_fold() {
        let a = vec![entry("GET", "/x", json!(1)), entry("GET", "/y", json!(2))];
        let b = vec![entry("GET", "/x", json!(3))];
        let c = vec![entry("GET", "/y", json!(4)), entry("GET", "/x", json!(5))];

        let mut sequential = Aggregator::new();
        sequential.fold_source(0, &a);
        sequential.fold_source(1, &b);
        sequential.fold_source(2, &c);

        let mut shard_c = Aggregator::new();
        shard_c.fold_source(2, &c);
        let mut shard_ab = Aggregator::new();
        shard_ab.fold_source(0, &a);
        shard_ab.fold_source(1, &b);
        shard_c.merge(shard_ab);

        assert_eq!(sequential.finish(), shard_c.finish());
    }

    #[test]
    fn test_host_recorded_from_first_entry() {
        let sources = vec![TrafficSource::new(
            "a",
            vec![
                json!({"method": "GET", "path": "/x", "host": "api.example.com"}),
                json!({"method": "GET", "path": "/x", "host": "other.example.com"}),
            ],
        )];
        let aggregation = aggregate(&sources);
        assert_eq!(
            aggregation.endpoints[&EndpointKey::new("GET", "/x")].host(),
            Some("api.example.com")
        );
        assert_eq!(aggregation.label(0), "a");
        assert_eq!(aggregation.label(9), "UNKNOWN");
    }
}
