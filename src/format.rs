//! Content format detection for archive entries.
//!
//! The extension is authoritative when it is one of the known ones. Only
//! entries without a recognised extension are read and sniffed.

use std::fmt;

use serde::Serialize;
use tracing::instrument;

use crate::archive::Archive;
use crate::error::ExtractError;

/// Number of characters inspected when sniffing markup.
pub const SNIFF_PREFIX_CHARS: usize = 500;

/// Inferred content type of an archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatTag {
    Html,
    Json,
    Xml,
    Text,
    Unknown,
}

impl FormatTag {
    /// Map a file extension to its format, if it is one of the known ones.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => Some(FormatTag::Html),
            "json" => Some(FormatTag::Json),
            "xml" => Some(FormatTag::Xml),
            "txt" => Some(FormatTag::Text),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatTag::Html => "html",
            FormatTag::Json => "json",
            FormatTag::Xml => "xml",
            FormatTag::Text => "text",
            FormatTag::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything after the last `.` of the path, or `""` when there is none.
fn extension(path: &str) -> &str {
    path.rsplit_once('.').map_or("", |(_, ext)| ext)
}

/// Guess the format of already loaded content.
pub fn sniff(content: &str) -> FormatTag {
    let trimmed = content.trim_start();
    let prefix = match trimmed.char_indices().nth(SNIFF_PREFIX_CHARS) {
        Some((end, _)) => &trimmed[..end],
        None => trimmed,
    };

    if prefix.starts_with('<') {
        if prefix.contains("<html") || prefix.contains("<!DOCTYPE html") {
            return FormatTag::Html;
        }
        return FormatTag::Xml;
    }

    // The whole document must parse, not just the prefix
    if serde_json::from_str::<serde::de::IgnoredAny>(content).is_ok() {
        return FormatTag::Json;
    }

    FormatTag::Text
}

/// Detect the format of one entry, keeping the read failure if there is one.
pub(crate) async fn try_detect(archive: &dyn Archive, path: &str) -> Result<FormatTag, ExtractError> {
    if let Some(tag) = FormatTag::from_extension(extension(path)) {
        return Ok(tag);
    }
    let content = archive.read_entry_text(path).await?;
    Ok(sniff(&content))
}

/// Detect the format of one entry.
///
/// Never fails: an entry that cannot be read is reported as
/// [`FormatTag::Unknown`] with a warning.
#[instrument(level = "debug", skip(archive))]
pub async fn detect(archive: &dyn Archive, path: &str) -> FormatTag {
    match try_detect(archive, path).await {
        Ok(tag) => tag,
        Err(err) => {
            tracing::warn!(%path, error = %err, "Unable to read entry to detect its format");
            FormatTag::Unknown
        }
    }
}
