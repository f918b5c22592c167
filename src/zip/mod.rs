//! Minimal ZIP reader for data export archives.
//!
//! The archive is read from the end: the End of Central Directory record
//! (or its ZIP64 variant) locates the Central Directory, which lists every
//! member without touching file data. Member data is fetched on demand from
//! the Local File Header offset, so remote archives only transfer the
//! members that are actually parsed.
//!
//! Supported: STORED and DEFLATE members, ZIP64 sizes and offsets, archive
//! comments. Not supported: encryption, multi-disk archives, other methods.

mod extractor;
mod parser;
mod structures;

pub use extractor::ZipExtractor;
pub use parser::ZipParser;
pub use structures::*;
