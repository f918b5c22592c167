//! `key = value` configuration files.
//!
//! Keys ending in `_regex` hold `/pattern/flags` literals and are compiled
//! when loaded; every other value is kept as raw text.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};
use tracing::instrument;

use crate::error::ConfigError;

/// Key suffix that marks a value as a pattern literal.
pub const PATTERN_SUFFIX: &str = "_regex";

/// Key holding the pattern for entries listing followed accounts.
pub const FOLLOWING_PATTERN_KEY: &str = "following_files_path_regex";

/// Key holding the pattern for entries listing followers.
pub const FOLLOWERS_PATTERN_KEY: &str = "followers_files_path_regex";

/// Configuration shipped with the binary, matching the standard export layout.
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.conf");

#[derive(Debug, Clone)]
pub enum ConfigValue {
    Text(String),
    Pattern(Regex),
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    values: HashMap<String, ConfigValue>,
}

impl Config {
    /// Parse configuration text.
    ///
    /// Blank lines, `#` comments and lines without exactly one `=` are
    /// skipped. A later key replaces an earlier one.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();

        for line in text.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split('=');
            let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
                tracing::debug!(%line, "Ignoring configuration line without a single '='");
                continue;
            };
            let (key, value) = (key.trim(), value.trim());

            let pattern = if key.ends_with(PATTERN_SUFFIX) {
                parse_pattern_literal(key, value)?
            } else {
                None
            };
            let parsed = match pattern {
                Some(pattern) => ConfigValue::Pattern(pattern),
                None => ConfigValue::Text(value.to_string()),
            };
            values.insert(key.to_string(), parsed);
        }

        Ok(Self { values })
    }

    /// The configuration shipped with the binary.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::parse(DEFAULT_CONFIG)
    }

    /// Load configuration from a local path or an `http(s)://` URL.
    #[instrument]
    pub async fn load(location: &str) -> Result<Self, ConfigError> {
        let read_error = |reason: String| ConfigError::Read {
            location: location.to_string(),
            reason,
        };

        let text = if location.starts_with("http://") || location.starts_with("https://") {
            let response = reqwest::get(location)
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| read_error(e.to_string()))?;
            response.text().await.map_err(|e| read_error(e.to_string()))?
        } else {
            tokio::fs::read_to_string(location)
                .await
                .map_err(|e| read_error(e.to_string()))?
        };

        let config = Self::parse(&text)?;
        tracing::debug!(keys = config.values.len(), "Loaded configuration");
        Ok(config)
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// The compiled pattern stored under `key`, if that key holds one.
    pub fn pattern(&self, key: &str) -> Option<&Regex> {
        match self.values.get(key)? {
            ConfigValue::Pattern(pattern) => Some(pattern),
            ConfigValue::Text(_) => None,
        }
    }

    /// The raw text stored under `key`, if that key holds text.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key)? {
            ConfigValue::Text(text) => Some(text.as_str()),
            ConfigValue::Pattern(_) => None,
        }
    }
}

/// Compile a `/pattern/flags` literal.
///
/// Returns `Ok(None)` when the value is not a literal at all, so it can be
/// stored as text instead.
fn parse_pattern_literal(key: &str, value: &str) -> Result<Option<Regex>, ConfigError> {
    let Some(rest) = value.strip_prefix('/') else {
        return Ok(None);
    };
    let Some((body, flags)) = rest.rsplit_once('/') else {
        return Ok(None);
    };
    if !flags.chars().all(|c| c.is_ascii_alphabetic()) {
        return Ok(None);
    }

    let invalid = |reason: String| ConfigError::InvalidPattern {
        key: key.to_string(),
        reason,
    };

    let mut builder = RegexBuilder::new(body);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            // Stateful matching and unicode mode have no equivalent here
            'g' | 'y' | 'u' | 'd' => {}
            other => return Err(invalid(format!("unsupported flag '{other}'"))),
        }
    }

    builder.build().map(Some).map_err(|e| invalid(e.to_string()))
}
