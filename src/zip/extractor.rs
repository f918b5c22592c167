use std::io::Read;
use std::sync::Arc;

use flate2::Crc;
use flate2::read::DeflateDecoder;

use crate::io::ReadAt;
use anyhow::{Context, Result, bail};

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipFileEntry};

/// Upper bound for a single decompressed member, export files are small.
const MAX_MEMBER_SIZE: u64 = 512 * 1024 * 1024;

/// ZIP file extractor
pub struct ZipExtractor<R: ReadAt> {
    parser: ZipParser<R>,
}

impl<R: ReadAt> ZipExtractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            parser: ZipParser::new(reader),
        }
    }

    /// List all files in the archive
    pub async fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        self.parser.list_files().await
    }

    /// Decompress a member into memory and verify its checksum.
    ///
    /// Neither the stored nor the decoded data may exceed the declared
    /// uncompressed size or [`MAX_MEMBER_SIZE`].
    pub async fn extract_to_memory(&self, entry: &ZipFileEntry) -> Result<Vec<u8>> {
        if entry.uncompressed_size > MAX_MEMBER_SIZE {
            bail!(
                "{} is too large to load ({} bytes)",
                entry.file_name,
                entry.uncompressed_size
            );
        }
        if entry.compressed_size > MAX_MEMBER_SIZE {
            bail!(
                "{} is too large to load ({} compressed bytes)",
                entry.file_name,
                entry.compressed_size
            );
        }

        let data_offset = self.parser.get_data_offset(entry).await?;
        let archive_size = self.parser.reader().size();
        if data_offset.saturating_add(entry.compressed_size) > archive_size {
            bail!("Data for {} extends past the end of the archive", entry.file_name);
        }

        let mut raw = vec![0u8; entry.compressed_size as usize];
        self.parser
            .reader()
            .read_exact_at(data_offset, &mut raw)
            .await
            .with_context(|| format!("Truncated data for {}", entry.file_name))?;

        let data = match entry.compression_method {
            CompressionMethod::Stored => raw,
            CompressionMethod::Deflate => {
                // One byte past the declared size is enough to detect a lying header
                let limit = entry.uncompressed_size + 1;
                let mut out = Vec::with_capacity(entry.uncompressed_size as usize);
                DeflateDecoder::new(raw.as_slice())
                    .take(limit)
                    .read_to_end(&mut out)
                    .with_context(|| format!("Corrupt DEFLATE stream in {}", entry.file_name))?;
                out
            }
            CompressionMethod::Unknown(_) => bail!(
                "Unsupported compression method {} for {}",
                entry.compression_method.as_u16(),
                entry.file_name
            ),
        };

        if data.len() as u64 != entry.uncompressed_size {
            bail!(
                "Size mismatch for {}: declared {} bytes, got {}",
                entry.file_name,
                entry.uncompressed_size,
                data.len()
            );
        }

        let mut crc = Crc::new();
        crc.update(&data);
        if crc.sum() != entry.crc32 {
            bail!(
                "CRC mismatch for {}: expected {:08x}, got {:08x}",
                entry.file_name,
                entry.crc32,
                crc.sum()
            );
        }

        Ok(data)
    }
}
