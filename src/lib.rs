//! # followcheck
//!
//! Compares the "following" and "followers" lists of an Instagram data
//! export.
//!
//! The export archive is opened lazily (local file or HTTP Range requests),
//! the entries holding each relationship list are picked by configurable
//! path patterns, and every entry is classified (by extension, else by
//! sniffing its content) as HTML, JSON, XML or plain text before the
//! matching extractor pulls usernames out of it. Entries that cannot be
//! read or parsed are reported and skipped; the run still produces a
//! best-effort result.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use followcheck::{Config, LocalFileReader, LocatorPatterns, ZipArchive, analyze};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let reader = Arc::new(LocalFileReader::new("instagram-export.zip")?);
//!     let archive = ZipArchive::open(reader).await?;
//!     let patterns = LocatorPatterns::from_config(&Config::builtin()?)?;
//!
//!     let analysis = analyze(&archive, &patterns).await;
//!     for user in &analysis.partitions.only_following {
//!         println!("{user} does not follow back");
//!     }
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod batch;
pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod io;
pub mod locate;
pub mod pipeline;
pub mod zip;

pub use archive::{Archive, ZipArchive};
pub use batch::{ExtractionReport, FileOutcome, extract_all, load_and_parse_file};
pub use cli::Cli;
pub use compare::{RelationshipPartitions, compare};
pub use config::{Config, ConfigValue};
pub use error::{ConfigError, ExtractError};
pub use format::{FormatTag, detect};
pub use io::{HttpRangeReader, LocalFileReader, MemoryReader, ReadAt};
pub use locate::{CandidateFiles, LocatorPatterns, locate};
pub use pipeline::{Analysis, analyze};
