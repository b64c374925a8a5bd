//! Program listing page parser
//!
//! Handles the paginated blog listing of a program: the pagination control
//! and the episode posts with their "load more" links.

use chrono::NaiveDate;
use scraper::{ElementRef, Html};

use super::{element_text, non_empty_attr, selector};
use crate::error::{ArchiveError, Result};
use crate::types::{Program, Record};
use crate::url::{parse_start_offset, resolve_url};

/// Date format of post headers (`05.01.2019`)
const POST_DATE_FORMAT: &str = "%d.%m.%Y";

/// Returns the `start` offset of the last page
///
/// # Returns
/// `0` when the page has no pagination control (single page)
///
/// # Errors
/// `ParseError` if the control is present but its last link carries no
/// numeric `start` parameter
pub fn parse_last_page_offset(html: &str) -> Result<u32> {
    let document = Html::parse_document(html);

    let Some(pagination) = document.select(&selector("ul.pagination-list")?).next() else {
        return Ok(0);
    };

    let last_href = pagination
        .select(&selector("li [href]")?)
        .filter_map(|link| non_empty_attr(&link, "href"))
        .last()
        .ok_or_else(|| ArchiveError::ParseError("Pagination list has no links".to_string()))?;

    parse_start_offset(last_href).ok_or_else(|| {
        ArchiveError::ParseError(format!("No start offset in pagination link: {}", last_href))
    })
}

/// Parses one listing page into candidate records
///
/// Posts come first in page order (newest first, as the site lists them),
/// followed by bare candidates from the "load more" block.
///
/// # Arguments
/// * `html` - Raw HTML of `{program.url}?start={offset}`
/// * `base_url` - Site origin for resolving relative links
/// * `program` - Owning program; candidates inherit its title and artist
///
/// # Errors
/// `DateParse` if any post header is missing or not a `dd.MM.yyyy` date
pub fn parse_listing_page(html: &str, base_url: &str, program: &Program) -> Result<Vec<Record>> {
    let document = Html::parse_document(html);

    let Some(blog) = document.select(&selector("div.blog")?).next() else {
        return Ok(Vec::new());
    };

    let mut candidates = Vec::new();

    for post in blog.select(&selector(r#"[itemprop="blogPost"]"#)?) {
        if let Some(candidate) = parse_post(&post, base_url, program)? {
            candidates.push(candidate);
        }
    }

    if let Some(more) = blog.select(&selector("div.items-more")?).next() {
        for link in more.select(&selector("a[href]")?) {
            if let Some(href) = non_empty_attr(&link, "href") {
                candidates.push(Record::candidate(program, resolve_url(base_url, href)));
            }
        }
    }

    Ok(candidates)
}

fn parse_post(post: &ElementRef, base_url: &str, program: &Program) -> Result<Option<Record>> {
    let header = post
        .select(&selector("div.page-header")?)
        .next()
        .map(|h| element_text(&h))
        .unwrap_or_default();
    let date = parse_post_date(&header)?;

    let Some(href) = first_href(post)? else {
        return Ok(None);
    };

    let img_url = thumbnail(post)?.map(|src| resolve_url(base_url, src));

    let mut candidate = Record::candidate(program, resolve_url(base_url, href));
    candidate.date = Some(date);
    candidate.img_url = img_url;
    Ok(Some(candidate))
}

fn first_href<'a>(post: &ElementRef<'a>) -> Result<Option<&'a str>> {
    let Some(text_block) = post.select(&selector("div.ait-txt")?).next() else {
        return Ok(None);
    };
    Ok(text_block
        .select(&selector("[href]")?)
        .next()
        .and_then(|a| non_empty_attr(&a, "href")))
}

fn thumbnail<'a>(post: &ElementRef<'a>) -> Result<Option<&'a str>> {
    let Some(picture) = post.select(&selector("div.ait-pic")?).next() else {
        return Ok(None);
    };
    Ok(picture
        .select(&selector(r#"[itemprop="thumbnailUrl"]"#)?)
        .next()
        .and_then(|img| non_empty_attr(&img, "src")))
}

/// Parses a post header date
///
/// Only the leading token is considered, so trailing header text such as a
/// weekday is ignored.
///
/// # Example
/// ```
/// use orpheus_core::parser::parse_post_date;
/// let date = parse_post_date("05.01.2019 Суббота").unwrap();
/// assert_eq!(date.to_string(), "2019-01-05");
/// ```
pub fn parse_post_date(text: &str) -> Result<NaiveDate> {
    let token = text.split_whitespace().next().unwrap_or_default();
    NaiveDate::parse_from_str(token, POST_DATE_FORMAT)
        .map_err(|_| ArchiveError::DateParse(text.trim().to_string()))
}
