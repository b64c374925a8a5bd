//! Embedded player configuration extractor
//!
//! Detail pages initialise their audio player from inline head scripts:
//!
//! ```text
//! new MyPlayer({ src: '/audio/2019/ep1.mp3', description: 'Part one' });
//! ```
//!
//! This module finds those snippets and pulls out the audio source and the
//! optional description. Matching is regex based and brace bounded; callers
//! only see [`extract_audio_candidates`].

use regex::Regex;
use scraper::Html;
use serde::{Deserialize, Serialize};

use super::selector;
use crate::url::resolve_url;

/// Player constructor call up to the first closing brace
const PLAYER_PATTERN: &str = r"MyPlayer\(\s*\{[^}]*\}";
/// Field values run to the matching closing quote, so the other quote style may appear inside
const SRC_PATTERN: &str = r#"src\s*:\s*(?:'([^']*)'|"([^"]*)")"#;
const DESCRIPTION_PATTERN: &str = r#"description\s*:\s*(?:'([^']*)'|"([^"]*)")"#;

/// One playable source found in a player configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioCandidate {
    /// Absolute audio URL
    pub url: String,

    /// Track description, when the snippet carries a non-empty one
    pub description: Option<String>,
}

/// Extracts player audio sources from the head scripts of a page
///
/// # Arguments
/// * `html` - Raw HTML of a detail page
/// * `base_url` - Site origin for resolving relative `src` values
///
/// # Returns
/// Candidates in document order; empty when the page embeds no player.
/// Snippets without a `src` field are skipped.
pub fn extract_audio_candidates(html: &str, base_url: &str) -> Vec<AudioCandidate> {
    let (Ok(player_re), Ok(src_re), Ok(description_re)) = (
        Regex::new(PLAYER_PATTERN),
        Regex::new(SRC_PATTERN),
        Regex::new(DESCRIPTION_PATTERN),
    ) else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let Ok(script_selector) = selector("head script") else {
        return Vec::new();
    };

    let mut candidates = Vec::new();

    for script in document.select(&script_selector) {
        let code: String = script.text().collect();
        if code.trim().is_empty() {
            continue;
        }

        for snippet in player_re.find_iter(&code) {
            let snippet = snippet.as_str();

            let Some(src) = capture(&src_re, snippet) else {
                continue;
            };
            let description = capture(&description_re, snippet);

            candidates.push(AudioCandidate {
                url: resolve_url(base_url, src),
                description: description.map(str::to_string),
            });
        }
    }

    candidates
}

fn capture<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    re.captures(text)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().trim())
        .filter(|value| !value.is_empty())
}
