//! Selection of the archive entries that hold each relationship list.

use std::collections::HashSet;

use regex::Regex;

use crate::config::{Config, FOLLOWERS_PATTERN_KEY, FOLLOWING_PATTERN_KEY};
use crate::error::ConfigError;

/// The two path patterns the locator needs, resolved once from configuration.
#[derive(Debug, Clone)]
pub struct LocatorPatterns {
    pub following: Regex,
    pub followers: Regex,
}

impl LocatorPatterns {
    pub fn new(following: Regex, followers: Regex) -> Self {
        Self {
            following,
            followers,
        }
    }

    /// Resolve both patterns, failing if either key is absent or not a pattern.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let resolve = |key: &str| {
            config
                .pattern(key)
                .cloned()
                .ok_or_else(|| ConfigError::MissingPattern(key.to_string()))
        };
        Ok(Self::new(resolve(FOLLOWING_PATTERN_KEY)?, resolve(FOLLOWERS_PATTERN_KEY)?))
    }
}

/// Entry paths selected for each side of the comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateFiles {
    pub following: Vec<String>,
    pub followers: Vec<String>,
}

/// Test every entry path against both patterns.
///
/// Each list keeps first-seen order without repeats. A path matching both
/// patterns is placed in both lists.
pub fn locate<I, S>(entry_paths: I, patterns: &LocatorPatterns) -> CandidateFiles
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut files = CandidateFiles::default();
    let mut seen_following = HashSet::new();
    let mut seen_followers = HashSet::new();

    for path in entry_paths {
        let path = path.as_ref();
        let following = patterns.following.is_match(path);
        let followers = patterns.followers.is_match(path);

        if following && seen_following.insert(path.to_string()) {
            files.following.push(path.to_string());
        }
        if followers && seen_followers.insert(path.to_string()) {
            files.followers.push(path.to_string());
        }
        if following && followers {
            tracing::warn!(%path, "Entry matches both the following and followers patterns");
        }
    }

    tracing::debug!(
        following = files.following.len(),
        followers = files.followers.len(),
        "Located relationship entries"
    );
    files
}
