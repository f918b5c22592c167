//! Archive access used by the pipeline: list member paths, read a member as text.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::error::ExtractError;
use crate::io::ReadAt;
use crate::zip::{ZipExtractor, ZipFileEntry};

/// A data export whose members can be listed and read as text.
#[async_trait]
pub trait Archive: Send + Sync {
    /// Paths of all file members, in archive order. Directories are omitted.
    fn entry_paths(&self) -> Vec<String>;

    /// Read one member as UTF-8 text.
    ///
    /// Fails with [`ExtractError::Read`] when the path is absent, the
    /// member cannot be decompressed, or its bytes are not valid UTF-8.
    async fn read_entry_text(&self, path: &str) -> Result<String, ExtractError>;
}

/// [`Archive`] backed by a ZIP file read through any [`ReadAt`] source.
pub struct ZipArchive<R: ReadAt> {
    extractor: ZipExtractor<R>,
    entries: Vec<ZipFileEntry>,
    index: HashMap<String, usize>,
}

impl<R: ReadAt> ZipArchive<R> {
    /// Open the archive and read its central directory.
    ///
    /// This is the only fatal archive error: a source that is not a ZIP
    /// file cannot be processed at all.
    pub async fn open(reader: Arc<R>) -> Result<Self> {
        let extractor = ZipExtractor::new(reader);
        let entries: Vec<ZipFileEntry> = extractor
            .list_files()
            .await?
            .into_iter()
            .filter(|e| !e.is_directory)
            .collect();

        // Duplicate member names resolve to the first occurrence
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            index.entry(entry.file_name.clone()).or_insert(i);
        }

        tracing::debug!(entries = entries.len(), "Opened archive");
        Ok(Self {
            extractor,
            entries,
            index,
        })
    }
}

#[async_trait]
impl<R: ReadAt + 'static> Archive for ZipArchive<R> {
    fn entry_paths(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(i, e)| self.index.get(&e.file_name) == Some(i))
            .map(|(_, e)| e.file_name.clone())
            .collect()
    }

    async fn read_entry_text(&self, path: &str) -> Result<String, ExtractError> {
        let read_error = |reason: String| ExtractError::Read {
            path: path.to_string(),
            reason,
        };

        let entry = self
            .index
            .get(path)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| read_error("no such entry in archive".to_string()))?;

        let bytes = self
            .extractor
            .extract_to_memory(entry)
            .await
            .map_err(|e| read_error(format!("{e:#}")))?;

        let mut text = String::from_utf8(bytes).map_err(|e| read_error(e.to_string()))?;
        if text.starts_with('\u{feff}') {
            text.drain(..'\u{feff}'.len_utf8());
        }
        Ok(text)
    }
}
