//! Comparison report assembly and persistence.
//!
//! The serialized field names are consumed by report renderers and must stay
//! stable: `comparison_time`, `files_compared`, `comparison_level`,
//! `total_endpoints_analyzed`, `endpoints_with_changes`, `detailed_results`.

// Internal imports (std, crate)
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::analysis::{ComparisonLevel, ComparisonResult};
use crate::endpoint::EndpointKey;

// External imports (alphabetized)
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;

/// File name prefix of saved reports.
pub const REPORT_FILE_PREFIX: &str = "api_comparison";

/// Top-level comparison report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(rename = "comparison_time")]
    pub generated_at: DateTime<Utc>,

    /// Source labels, in the order they were supplied
    #[serde(rename = "files_compared", alias = "sources_compared")]
    pub sources_compared: Vec<String>,

    pub comparison_level: ComparisonLevel,

    #[serde(rename = "total_endpoints_analyzed")]
    pub total_endpoints: usize,

    pub endpoints_with_changes: usize,

    #[serde(rename = "detailed_results")]
    pub per_endpoint: BTreeMap<EndpointKey, ComparisonResult>,
}

impl Report {
    /// Reduce per-endpoint results into a report stamped with the current time.
    pub fn assemble(
        results: BTreeMap<EndpointKey, ComparisonResult>,
        source_labels: &[String],
        level: ComparisonLevel,
    ) -> Self {
        let endpoints_with_changes = results.values().filter(|r| r.has_changes).count();
        Self {
            generated_at: Utc::now(),
            sources_compared: source_labels.to_vec(),
            comparison_level: level,
            total_endpoints: results.len(),
            endpoints_with_changes,
            per_endpoint: results,
        }
    }

    /// Results for endpoints that differ between at least two sources.
    pub fn changed_endpoints(&self) -> impl Iterator<Item = (&EndpointKey, &ComparisonResult)> {
        self.per_endpoint.iter().filter(|(_, r)| r.has_changes)
    }

    /// File name used by [`Report::save_to_dir`].
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}.json",
            REPORT_FILE_PREFIX,
            self.generated_at.format("%Y%m%d_%H%M%S")
        )
    }

    /// Write the report as pretty JSON into `dir`, creating it if needed.
    pub async fn save_to_dir<P: AsRef<Path>>(&self, dir: P) -> crate::Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).await?;
        let path = dir.join(self.file_name());
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content).await?;
        log::debug!("Saved comparison report to {}", path.display());
        Ok(path)
    }

    /// Load a previously saved report.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}
