//! Orpheus Archive Crawler Core Library
//!
//! Crawls the Orpheus radio programs archive, extracts numbered track
//! records per program, caches them as JSON and downloads tagged MP3 files.
//!
//! # Overview
//!
//! - Rate-limited HTTP client behind the [`PageSource`] trait
//! - HTML parsers for the archive, listing and episode detail pages
//! - [`OrpheusScraper`] walking listings and resolving episodes into records
//! - [`ArchiveCache`] keeping JSON snapshots between runs
//! - [`AudioDownloader`] writing ID3-tagged files
//!
//! # Example
//!
//! ```no_run
//! use orpheus_core::{ArchiveCache, CacheKind, OrpheusScraper, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let scraper = OrpheusScraper::new()?;
//!     let cache = ArchiveCache::new(".");
//!
//!     let mut archive = scraper.seed_archive(&cache).await?;
//!     if let Some(program) = archive.find_program_mut("eurofest") {
//!         for record in scraper.scan_program(program).await? {
//!             println!("{}. {:?}", record.track_number, record.title);
//!         }
//!     }
//!     cache.save(CacheKind::Full, &archive)?;
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
mod client;
pub mod download;
mod error;
pub mod parser;
mod scraper;
pub mod tracks;
mod types;
pub mod url;

// Re-export client types
pub use client::{ClientConfig, OrpheusClient, PageSource, RateLimiter};

// Re-export error types
pub use error::{ArchiveError, Result};

// Re-export cache and download entry points
pub use cache::{ArchiveCache, CacheKind};
pub use download::AudioDownloader;

// Re-export parser types
pub use parser::{AudioCandidate, DetailPage};

// Re-export main scraper API
pub use scraper::OrpheusScraper;

// Re-export data types
pub use types::{Archive, Program, Record, ScanState};
