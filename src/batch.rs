//! Detection and extraction across a set of archive entries.
//!
//! Entries are processed one at a time, in the order given, so the merged
//! result is reproducible. A failing entry only loses its own contribution.

use std::collections::HashSet;

use tracing::instrument;

use crate::archive::Archive;
use crate::error::ExtractError;
use crate::extract::strategy_for;
use crate::format::{FormatTag, try_detect};

/// What happened to one entry of a batch.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub path: String,
    pub format: FormatTag,
    /// Number of usernames extracted, before merging.
    pub result: Result<usize, ExtractError>,
}

/// Merged usernames of a batch plus a per-entry account of how it went.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    usernames: Vec<String>,
    outcomes: Vec<FileOutcome>,
}

impl ExtractionReport {
    /// Unique usernames, in order of first appearance.
    pub fn usernames(&self) -> &[String] {
        &self.usernames
    }

    pub fn into_usernames(self) -> Vec<String> {
        self.usernames
    }

    pub fn outcomes(&self) -> &[FileOutcome] {
        &self.outcomes
    }

    /// Entries that contributed nothing because of an error.
    pub fn failures(&self) -> impl Iterator<Item = &ExtractError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }
}

/// Remove repeats, keeping the first occurrence of each value.
pub fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(values.len());
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

async fn parse_entry(archive: &dyn Archive, path: &str) -> (FormatTag, Result<Vec<String>, ExtractError>) {
    let format = match try_detect(archive, path).await {
        Ok(format) => format,
        Err(err) => return (FormatTag::Unknown, Err(err)),
    };

    let Some(extractor) = strategy_for(format) else {
        return (
            format,
            Err(ExtractError::UnsupportedFormat {
                path: path.to_string(),
                format,
            }),
        );
    };

    let result = match archive.read_entry_text(path).await {
        Ok(content) => extractor.extract(&content).map_err(|e| ExtractError::Parse {
            path: path.to_string(),
            format,
            reason: format!("{e:#}"),
        }),
        Err(err) => Err(err),
    };
    (format, result)
}

/// Detect, read and extract a single entry.
#[instrument(level = "debug", skip(archive))]
pub async fn load_and_parse_file(archive: &dyn Archive, path: &str) -> Result<Vec<String>, ExtractError> {
    parse_entry(archive, path).await.1
}

/// Extract usernames from every path and merge them without repeats.
///
/// Never fails as a whole: each entry that cannot be read, parsed or
/// matched to an extractor is logged, recorded in the report and skipped.
#[instrument(skip(archive, paths), fields(entries = paths.len()))]
pub async fn extract_all<S: AsRef<str>>(archive: &dyn Archive, paths: &[S]) -> ExtractionReport {
    let mut merged = Vec::new();
    let mut outcomes = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        let (format, result) = parse_entry(archive, path).await;

        let result = match result {
            Ok(usernames) => {
                tracing::debug!(%path, %format, count = usernames.len(), "Extracted usernames");
                let count = usernames.len();
                merged.extend(usernames);
                Ok(count)
            }
            Err(err) => {
                tracing::warn!(%path, %format, error = %err, "Skipping entry");
                Err(err)
            }
        };
        outcomes.push(FileOutcome {
            path: path.to_string(),
            format,
            result,
        });
    }

    ExtractionReport {
        usernames: dedup_preserving_order(merged),
        outcomes,
    }
}
