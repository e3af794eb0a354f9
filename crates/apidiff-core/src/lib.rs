//! apidiff Core Library
//!
//! This library compares captured HTTP traffic from two or more sources
//! endpoint by endpoint and reports structural differences between the
//! requests and responses each source recorded.

pub mod aggregate;
pub mod analysis;
pub mod config;
pub mod diff;
pub mod endpoint;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod report;
pub mod snapshot;

pub use crate::{
    aggregate::{aggregate, Aggregation, TrafficSource},
    analysis::{compare_all, CompareOptions, ComparisonLevel, ComparisonResult},
    config::Config,
    diff::{ArrayTailPolicy, Comparator, DiffEntry, DiffKind},
    endpoint::EndpointKey,
    engine::{compare_files, compare_sources},
    error::{Error, ErrorResponse, Result},
    ingest::{load_source, LogSummary, ParseFormat},
    report::Report,
};
