//! URL helper functions for the Orpheus archive site
//!
//! Provides builders for archive and listing URLs and resolution of
//! site-relative links.

use url::Url;

/// Site origin
pub const BASE_URL: &str = "http://muzcentrum.ru";

/// Path of the top-level programs archive page
pub const ARCHIVE_PATH: &str = "/orpheusradio/programsarchive";

/// Number of posts per listing page (the `start` step)
pub const PAGE_SIZE: u32 = 10;

/// Builds the programs archive URL for a site origin
///
/// # Example
/// ```
/// use orpheus_core::url::build_archive_url;
/// let url = build_archive_url("http://muzcentrum.ru");
/// assert_eq!(url, "http://muzcentrum.ru/orpheusradio/programsarchive");
/// ```
pub fn build_archive_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), ARCHIVE_PATH)
}

/// Builds the URL of one listing page of a program
///
/// # Example
/// ```
/// use orpheus_core::url::build_page_url;
/// let url = build_page_url("http://muzcentrum.ru/orpheusradio/programsarchive/eurofest", 20);
/// assert_eq!(url, "http://muzcentrum.ru/orpheusradio/programsarchive/eurofest?start=20");
/// ```
pub fn build_page_url(program_url: &str, offset: u32) -> String {
    format!("{}?start={}", program_url, offset)
}

/// Resolves a link found on a page against the site origin
///
/// Links already starting with `http` are returned unchanged.
pub fn resolve_url(base_url: &str, href: &str) -> String {
    let href = href.trim();
    if href.starts_with("http") {
        return href.to_string();
    }

    match Url::parse(base_url).and_then(|base| base.join(href)) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}{}", base_url.trim_end_matches('/'), href),
    }
}

/// Returns everything after the last `/` of a URL
///
/// # Example
/// ```
/// use orpheus_core::url::last_segment;
/// assert_eq!(last_segment("http://muzcentrum.ru/orpheusradio/programsarchive/eurofest"), "eurofest");
/// ```
pub fn last_segment(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Percent-decoded last segment, suitable as a file name stem
///
/// Path separators and NUL that decode out of the segment become `_`, so the
/// stem always names a single file.
///
/// # Example
/// ```
/// use orpheus_core::url::file_slug;
/// assert_eq!(file_slug("http://muzcentrum.ru/eurofest/12-ac%2Fdc"), "12-ac_dc");
/// ```
pub fn file_slug(url: &str) -> String {
    let segment = last_segment(url);
    let segment = segment.split('?').next().unwrap_or(segment);
    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());

    decoded
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect()
}

/// Extracts the `start` query parameter from a pagination link
pub fn parse_start_offset(href: &str) -> Option<u32> {
    let (_, query) = href.split_once('?')?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "start")
        .and_then(|(_, value)| value.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_archive_url_trailing_slash() {
        assert_eq!(
            build_archive_url("http://127.0.0.1:8080/"),
            "http://127.0.0.1:8080/orpheusradio/programsarchive"
        );
    }

    #[test]
    fn test_resolve_relative_href() {
        let url = resolve_url(BASE_URL, "/orpheusradio/programsarchive/jazz");
        assert_eq!(url, "http://muzcentrum.ru/orpheusradio/programsarchive/jazz");
    }

    #[test]
    fn test_resolve_absolute_href_unchanged() {
        let url = resolve_url(BASE_URL, "https://cdn.example.com/a.mp3");
        assert_eq!(url, "https://cdn.example.com/a.mp3");
    }

    #[test]
    fn test_resolve_with_port_origin() {
        let url = resolve_url("http://127.0.0.1:4000", "/images/a.jpg");
        assert_eq!(url, "http://127.0.0.1:4000/images/a.jpg");
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment("http://x/a/b/c"), "c");
        assert_eq!(last_segment("plain"), "plain");
    }

    #[test]
    fn test_file_slug_decodes_and_drops_query() {
        assert_eq!(file_slug("http://x/a/%D0%BE%D0%B4%D0%B8%D0%BD?x=1"), "один");
        assert_eq!(file_slug("http://x/a/123-episode"), "123-episode");
    }

    #[test]
    fn test_file_slug_never_contains_separators() {
        assert_eq!(file_slug("http://x/a/12-ac%2Fdc"), "12-ac_dc");
        assert_eq!(file_slug("http://x/a/..%2F..%2Fetc"), ".._.._etc");
        assert_eq!(file_slug("http://x/a/back%5Cslash%00"), "back_slash_");
    }

    #[test]
    fn test_parse_start_offset() {
        assert_eq!(parse_start_offset("/orpheusradio/programsarchive/jazz?start=90"), Some(90));
        assert_eq!(parse_start_offset("/jazz?limit=5&start=40"), Some(40));
        assert_eq!(parse_start_offset("/jazz"), None);
        assert_eq!(parse_start_offset("/jazz?start=abc"), None);
    }
}
