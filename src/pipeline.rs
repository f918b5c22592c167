//! The whole run: locate, extract both sides, compare.

use tracing::instrument;

use crate::archive::Archive;
use crate::batch::{ExtractionReport, extract_all};
use crate::compare::{RelationshipPartitions, compare};
use crate::locate::{CandidateFiles, LocatorPatterns, locate};

/// Everything produced by one analysis of an export archive.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub candidates: CandidateFiles,
    pub following: ExtractionReport,
    pub followers: ExtractionReport,
    pub partitions: RelationshipPartitions,
}

impl Analysis {
    /// True if any located entry failed to contribute.
    pub fn is_degraded(&self) -> bool {
        self.following.failures().next().is_some() || self.followers.failures().next().is_some()
    }
}

/// Locate relationship entries in `archive`, extract both lists and compare them.
#[instrument(skip_all)]
pub async fn analyze(archive: &dyn Archive, patterns: &LocatorPatterns) -> Analysis {
    let candidates = locate(archive.entry_paths(), patterns);
    if candidates.following.is_empty() {
        tracing::warn!("No entry matches the following pattern");
    }
    if candidates.followers.is_empty() {
        tracing::warn!("No entry matches the followers pattern");
    }

    let following = extract_all(archive, &candidates.following).await;
    let followers = extract_all(archive, &candidates.followers).await;
    let partitions = compare(following.usernames(), followers.usernames());

    tracing::info!(
        following = following.usernames().len(),
        followers = followers.usernames().len(),
        mutual = partitions.mutual.len(),
        "Compared relationship lists"
    );

    Analysis {
        candidates,
        following,
        followers,
        partitions,
    }
}
