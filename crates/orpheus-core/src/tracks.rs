//! Track resolution for episode candidates
//!
//! Turns one candidate plus what its detail page offered into zero, one or
//! several numbered records. No I/O happens here; the scraper fetches pages
//! and feeds the results through [`expand_candidate`] in chronological order.

use crate::parser::AudioCandidate;
use crate::types::Record;

/// Running track number shared across a whole program
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TrackCounter {
    last: u32,
}

impl TrackCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance and return the next track number (first call yields 1)
    pub fn next_track(&mut self) -> u32 {
        self.last += 1;
        self.last
    }

    /// Last assigned track number, 0 if none yet
    pub fn last(&self) -> u32 {
        self.last
    }
}

/// Resolves one candidate into records
///
/// * no audio: the candidate is dropped and the counter is untouched;
/// * one source: one record titled with the detail-page title;
/// * several sources: the first keeps the candidate and prefers its own
///   description as title, every further source becomes a new record right
///   after it sharing url, artist, album, date and thumbnail.
///
/// # Arguments
/// * `candidate` - Provisional record from the listing
/// * `title` - Title from the detail page
/// * `audio` - Player sources, or the frame fallback as a single source
/// * `counter` - Program-wide track counter
pub fn expand_candidate(
    candidate: Record,
    title: &str,
    audio: Vec<AudioCandidate>,
    counter: &mut TrackCounter,
) -> Vec<Record> {
    let mut sources = audio.into_iter();

    let Some(first) = sources.next() else {
        return Vec::new();
    };

    let multi = sources.len() > 0;

    let mut head = candidate;
    head.track_number = counter.next_track();
    head.title = match (multi, first.description) {
        (true, Some(description)) => Some(description),
        _ => Some(title.to_string()),
    };
    head.audio_url = Some(first.url);

    let mut records = Vec::with_capacity(1 + sources.len());
    records.push(head);

    for source in sources {
        let head = &records[0];
        let extra = Record {
            track_number: counter.next_track(),
            title: source.description,
            artist: head.artist.clone(),
            album: head.album.clone(),
            url: head.url.clone(),
            date: head.date,
            audio_url: Some(source.url),
            img_url: head.img_url.clone(),
        };
        records.push(extra);
    }

    records
}
