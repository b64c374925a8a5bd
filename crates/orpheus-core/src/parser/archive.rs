//! Programs archive parser
//!
//! Parses the top-level archive page into unscanned [`Program`] entries.

use scraper::{ElementRef, Html};

use super::{element_text, non_empty_attr, selector};
use crate::error::Result;
use crate::types::Program;
use crate::url::resolve_url;

/// Parses the programs archive HTML into a list of programs
///
/// # Arguments
/// * `html` - Raw HTML of the archive page
/// * `base_url` - Site origin for resolving relative links
///
/// # Returns
/// Programs in page order, empty if the page carries no program items.
/// Items without a link are skipped.
pub fn parse_programs(html: &str, base_url: &str) -> Result<Vec<Program>> {
    let document = Html::parse_document(html);
    let item_selector = selector("div.afisha-list-item")?;

    let mut programs = Vec::new();
    for item in document.select(&item_selector) {
        if let Some(program) = parse_program_item(&item, base_url)? {
            programs.push(program);
        }
    }

    Ok(programs)
}

fn parse_program_item(item: &ElementRef, base_url: &str) -> Result<Option<Program>> {
    let Some(text_block) = item.select(&selector("div.ait-txt")?).next() else {
        return Ok(None);
    };
    let Some(anchor) = text_block.select(&selector("[href]")?).next() else {
        return Ok(None);
    };
    let Some(href) = non_empty_attr(&anchor, "href") else {
        return Ok(None);
    };

    let artist = text_block
        .select(&selector("p")?)
        .next()
        .map(|p| element_text(&p))
        .filter(|text| !text.is_empty());

    Ok(Some(Program::new(
        resolve_url(base_url, href),
        element_text(&anchor),
        artist,
    )))
}
