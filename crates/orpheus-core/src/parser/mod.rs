//! HTML parsers for the Orpheus archive site
//!
//! Contains modules for parsing different page types. Parsers work on raw
//! HTML strings and return owned data; fetching happens elsewhere.

pub mod archive;
pub mod detail;
pub mod listing;
pub mod player;

pub use archive::parse_programs;
pub use detail::{DetailPage, parse_detail_page, parse_frame_audio};
pub use listing::{parse_last_page_offset, parse_listing_page, parse_post_date};
pub use player::{AudioCandidate, extract_audio_candidates};

use scraper::{ElementRef, Selector};

use crate::error::{ArchiveError, Result};

/// Parses a CSS selector, mapping failures into [`ArchiveError::ParseError`]
pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ArchiveError::ParseError(format!("Invalid selector {}: {:?}", css, e)))
}

/// Element text with whitespace collapsed, the way a browser renders it
pub(crate) fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Non-empty attribute value
pub(crate) fn non_empty_attr<'a>(element: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
