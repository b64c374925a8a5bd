//! Error types for the Orpheus archive crawler
//!
//! Provides a single error enum with human-readable messages covering
//! fetching, parsing, caching and tagging.

use thiserror::Error;

/// Error type for all archive crawler operations
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Server answered 404
    #[error("Page not found: {0}")]
    NotFound(String),

    /// Server answered with another non-success status
    #[error("Unexpected HTTP status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Failed to parse HTML content
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    /// Expected HTML element was not found
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Client configuration rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Post header did not carry a `dd.MM.yyyy` date
    #[error("Failed to parse date: '{0}'")]
    DateParse(String),

    /// Record reached the download stage without an audio URL
    #[error("Record has no audio URL: {0}")]
    MissingAudio(String),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cache (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing audio tags failed
    #[error("Tagging failed: {0}")]
    Tag(#[from] lofty::error::LoftyError),
}

/// Result type alias for archive crawler operations
pub type Result<T> = std::result::Result<T, ArchiveError>;
