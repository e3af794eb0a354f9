//! Main entry points for comparing traffic sources

// Internal imports (std, crate)
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::{
    aggregate::{aggregate, TrafficSource},
    analysis::compare_all,
    config::Config,
    error::{Error, Result},
    ingest::load_source,
    report::Report,
};

// External imports (alphabetized)
use futures::future::try_join_all;

/// Fewest sources a comparison needs.
pub const MIN_SOURCES: usize = 2;

/// Check the source count against `[MIN_SOURCES, max]`.
pub fn validate_count(supplied: usize, max: usize) -> Result<()> {
    if supplied < MIN_SOURCES || supplied > max {
        return Err(Error::InputCardinality {
            supplied,
            min: MIN_SOURCES,
            max,
        });
    }
    Ok(())
}

/// Check source count and label uniqueness.
pub fn validate_sources(sources: &[TrafficSource], max: usize) -> Result<()> {
    validate_count(sources.len(), max)?;
    let mut seen = HashSet::new();
    for source in sources {
        if !seen.insert(source.label.as_str()) {
            return Err(Error::DuplicateSource(source.label.clone()));
        }
    }
    Ok(())
}

/// Compare already loaded sources and assemble the report.
pub fn compare_sources(sources: &[TrafficSource], config: &Config) -> Result<Report> {
    config.validate()?;
    validate_sources(sources, config.max_sources)?;

    // 1. Fold every source into endpoint records
    let aggregation = aggregate(sources);
    log::debug!(
        "Aggregated {} endpoints from {} sources",
        aggregation.endpoints.len(),
        sources.len()
    );

    // 2. Diff every endpoint shared by at least two sources
    let results = compare_all(&aggregation, &config.compare_options());

    // 3. Reduce into the report
    Ok(Report::assemble(
        results,
        &aggregation.labels,
        config.comparison_level,
    ))
}

/// Load the given files concurrently and compare them.
///
/// Sources whose file names collide are labelled by their full path instead.
pub async fn compare_files<P: AsRef<Path>>(paths: &[P], config: &Config) -> Result<Report> {
    config.validate()?;
    validate_count(paths.len(), config.max_sources)?;

    let paths: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
    let mut seen = HashSet::new();
    for path in &paths {
        if !seen.insert(path) {
            return Err(Error::DuplicateSource(path.display().to_string()));
        }
    }

    let mut sources = try_join_all(paths.iter().map(load_source)).await?;
    disambiguate_labels(&mut sources, &paths);
    compare_sources(&sources, config)
}

fn disambiguate_labels(sources: &mut [TrafficSource], paths: &[PathBuf]) {
    let labels: Vec<String> = sources.iter().map(|s| s.label.clone()).collect();
    for (source, path) in sources.iter_mut().zip(paths) {
        if labels.iter().filter(|l| **l == source.label).count() > 1 {
            source.label = path.display().to_string();
        }
    }
}
