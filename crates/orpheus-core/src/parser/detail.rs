//! Episode detail page parser

use scraper::Html;

use super::player::{AudioCandidate, extract_audio_candidates};
use super::{element_text, non_empty_attr, selector};
use crate::error::{ArchiveError, Result};

/// Everything the record extractor needs from one detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPage {
    /// Episode title from the content item
    pub title: String,

    /// Player sources in document order
    pub audio: Vec<AudioCandidate>,

    /// `src` of the first embedded frame in the content item, if any
    pub frame_src: Option<String>,
}

/// Parses an episode detail page
///
/// # Arguments
/// * `html` - Raw HTML of the detail page
/// * `base_url` - Site origin for resolving relative audio sources
///
/// # Errors
/// `ElementNotFound` if the content item (`#col-l`) or its
/// `[itemprop="name"]` title is missing
pub fn parse_detail_page(html: &str, base_url: &str) -> Result<DetailPage> {
    let document = Html::parse_document(html);

    let item = document
        .select(&selector("#col-l")?)
        .next()
        .ok_or_else(|| ArchiveError::ElementNotFound("#col-l".to_string()))?;

    let title = item
        .select(&selector(r#"[itemprop="name"]"#)?)
        .next()
        .map(|el| element_text(&el))
        .ok_or_else(|| ArchiveError::ElementNotFound(r#"#col-l [itemprop="name"]"#.to_string()))?;

    let frame_src = item
        .select(&selector("iframe")?)
        .next()
        .and_then(|frame| non_empty_attr(&frame, "src"))
        .map(str::to_string);

    Ok(DetailPage {
        title,
        audio: extract_audio_candidates(html, base_url),
        frame_src,
    })
}

/// Finds the audio link inside an embedded player frame
///
/// The framed page carries the file as the first titled anchor of its body.
pub fn parse_frame_audio(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let anchor_selector = selector("body a[title]").ok()?;

    document
        .select(&anchor_selector)
        .next()
        .and_then(|a| non_empty_attr(&a, "href"))
        .map(str::to_string)
}
