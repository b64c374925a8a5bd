//! Core data types for the archive crawler
//!
//! `Archive` → `Program` → `Record`, serialized as the JSON cache snapshot.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::url::last_segment;

/// Root aggregate: the archive page and every program listed on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archive {
    /// URL of the programs archive page
    pub url: String,

    /// Programs in site order
    pub programs: Vec<Program>,
}

impl Archive {
    pub fn new(url: impl Into<String>, programs: Vec<Program>) -> Self {
        Self {
            url: url.into(),
            programs,
        }
    }

    /// Find a program by its slug (last URL segment, e.g. `eurofest`)
    pub fn find_program(&self, slug: &str) -> Option<&Program> {
        self.programs.iter().find(|p| p.slug() == slug)
    }

    /// Mutable variant of [`Archive::find_program`]
    pub fn find_program_mut(&mut self, slug: &str) -> Option<&mut Program> {
        self.programs.iter_mut().find(|p| p.slug() == slug)
    }
}

/// A recurring radio show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Listing URL, unique key
    pub url: String,

    pub title: String,

    /// Host or performer shown under the title
    pub artist: Option<String>,

    /// Lazily populated record list
    #[serde(default)]
    pub records: ScanState,
}

impl Program {
    /// Create an unscanned program
    pub fn new(url: impl Into<String>, title: impl Into<String>, artist: Option<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            artist,
            records: ScanState::Unscanned,
        }
    }

    /// Last path segment of the program URL, used as its short name
    pub fn slug(&self) -> &str {
        last_segment(&self.url)
    }

    pub fn is_scanned(&self) -> bool {
        matches!(self.records, ScanState::Scanned(_))
    }

    /// Records of a scanned program, empty slice otherwise
    pub fn records(&self) -> &[Record] {
        match &self.records {
            ScanState::Scanned(records) => records,
            ScanState::Unscanned => &[],
        }
    }
}

/// Whether a program's episodes have been crawled yet
///
/// Serialized as `null` when unscanned and as an array when scanned, so a
/// scanned program with zero playable episodes stays distinguishable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<Vec<Record>>", into = "Option<Vec<Record>>")]
pub enum ScanState {
    #[default]
    Unscanned,
    Scanned(Vec<Record>),
}

impl From<Option<Vec<Record>>> for ScanState {
    fn from(value: Option<Vec<Record>>) -> Self {
        match value {
            Some(records) => ScanState::Scanned(records),
            None => ScanState::Unscanned,
        }
    }
}

impl From<ScanState> for Option<Vec<Record>> {
    fn from(value: ScanState) -> Self {
        match value {
            ScanState::Scanned(records) => Some(records),
            ScanState::Unscanned => None,
        }
    }
}

/// One resolved track
///
/// Multi-track episodes produce several records sharing the same `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// 1-based position within the program, 0 while unassigned
    pub track_number: u32,

    pub title: Option<String>,

    /// Inherited from the program
    pub artist: Option<String>,

    /// Program title
    pub album: String,

    /// Detail page URL
    pub url: String,

    /// Air date (serialized as `YYYY-MM-DD`)
    pub date: Option<NaiveDate>,

    pub audio_url: Option<String>,

    /// Thumbnail used as cover art
    pub img_url: Option<String>,
}

impl Record {
    /// A provisional record for a detail page, before audio resolution
    pub fn candidate(program: &Program, url: impl Into<String>) -> Self {
        Self {
            track_number: 0,
            title: None,
            artist: program.artist.clone(),
            album: program.title.clone(),
            url: url.into(),
            date: None,
            audio_url: None,
            img_url: None,
        }
    }
}
