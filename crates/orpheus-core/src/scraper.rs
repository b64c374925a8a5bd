//! Main scraper API for the Orpheus archive
//!
//! Combines a [`PageSource`] with the HTML parsers to list programs and
//! extract their numbered records.

use tracing::{debug, info, warn};

use crate::cache::{ArchiveCache, CacheKind};
use crate::client::{ClientConfig, OrpheusClient, PageSource};
use crate::error::Result;
use crate::parser::{
    AudioCandidate, DetailPage, parse_detail_page, parse_frame_audio, parse_last_page_offset,
    parse_listing_page, parse_programs,
};
use crate::tracks::{TrackCounter, expand_candidate};
use crate::types::{Archive, Program, Record, ScanState};
use crate::url::{PAGE_SIZE, build_archive_url, build_page_url, resolve_url};

/// Main scraper API for the Orpheus archive
///
/// All fetches are issued one after another; a failed fetch aborts the
/// operation in progress.
pub struct OrpheusScraper<S = OrpheusClient> {
    source: S,
}

impl OrpheusScraper<OrpheusClient> {
    /// Create a new scraper with default configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn new() -> Result<Self> {
        Ok(Self::with_source(OrpheusClient::new()?))
    }

    /// Create a new scraper with custom client configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self::with_source(OrpheusClient::with_config(config)?))
    }
}

impl<S: PageSource> OrpheusScraper<S> {
    /// Create a scraper on top of any page source
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// The underlying page source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// URL of the programs archive page
    pub fn archive_url(&self) -> String {
        build_archive_url(self.source.base_url())
    }

    /// List every program on the archive page
    ///
    /// # Returns
    /// Unscanned programs in site order; empty if the page lists none
    ///
    /// # Errors
    /// Fetch errors for the archive page
    pub async fn list_programs(&self) -> Result<Vec<Program>> {
        let url = self.archive_url();
        let html = self.source.fetch_page(&url).await?;
        let programs = parse_programs(&html, self.source.base_url())?;
        info!(count = programs.len(), "Listed programs from {}", url);
        Ok(programs)
    }

    /// Fetch the archive page as a fresh [`Archive`]
    pub async fn fetch_archive(&self) -> Result<Archive> {
        let programs = self.list_programs().await?;
        Ok(Archive::new(self.archive_url(), programs))
    }

    /// Load the seed snapshot, or crawl the program listing and store it
    ///
    /// # Errors
    /// Fetch errors when the snapshot is missing, or I/O errors saving it
    pub async fn seed_archive(&self, cache: &ArchiveCache) -> Result<Archive> {
        if let Some(archive) = cache.load(CacheKind::Seed) {
            return Ok(archive);
        }

        info!("Reading archive from {}", self.archive_url());
        let archive = self.fetch_archive().await?;
        cache.save(CacheKind::Seed, &archive)?;
        Ok(archive)
    }

    /// Offset of the last listing page of a program
    ///
    /// # Returns
    /// `0` for a single-page listing
    pub async fn last_page_offset(&self, listing_url: &str) -> Result<u32> {
        let html = self.source.fetch_page(listing_url).await?;
        parse_last_page_offset(&html)
    }

    /// Collect candidate records from every listing page, oldest first
    ///
    /// Visits `start = 0, 10, …, last` and reverses the accumulated
    /// newest-first sequence.
    ///
    /// # Errors
    /// Fetch errors, or `DateParse` for a malformed post header
    pub async fn collect_candidates(&self, program: &Program) -> Result<Vec<Record>> {
        let last_offset = self.last_page_offset(&program.url).await?;
        debug!(program = %program.title, last_offset, "Walking listing pages");

        let mut candidates = Vec::new();
        for offset in (0..=last_offset).step_by(PAGE_SIZE as usize) {
            let html = self
                .source
                .fetch_page(&build_page_url(&program.url, offset))
                .await?;
            let page = parse_listing_page(&html, self.source.base_url(), program)?;
            debug!(offset, found = page.len(), "Parsed listing page");
            candidates.extend(page);
        }

        candidates.reverse();
        Ok(candidates)
    }

    /// Extract the full, numbered record list of a program
    ///
    /// Candidates are resolved oldest first against their detail pages.
    /// Candidates without playable audio are dropped; multi-track episodes
    /// expand in place. Track numbers run 1, 2, 3, … across the program.
    ///
    /// # Errors
    /// Any fetch error, malformed date or detail page without a title aborts
    /// the whole extraction
    pub async fn extract_records(&self, program: &Program) -> Result<Vec<Record>> {
        let candidates = self.collect_candidates(program).await?;
        info!(
            program = %program.title,
            candidates = candidates.len(),
            "Resolving episode pages"
        );

        let mut counter = TrackCounter::new();
        let mut records = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let html = self.source.fetch_page(&candidate.url).await?;
            let page = parse_detail_page(&html, self.source.base_url())?;
            let title = page.title.clone();
            let audio = self.resolve_audio(page).await?;

            if audio.is_empty() {
                warn!(url = %candidate.url, "No playable audio, skipping episode");
                continue;
            }

            records.extend(expand_candidate(candidate, &title, audio, &mut counter));
        }

        info!(program = %program.title, records = records.len(), "Extraction complete");
        Ok(records)
    }

    /// Scan a program unless it already holds a scanned record list
    ///
    /// On error the program is left as it was.
    pub async fn scan_program<'p>(&self, program: &'p mut Program) -> Result<&'p [Record]> {
        if !program.is_scanned() {
            let records = self.extract_records(program).await?;
            program.records = ScanState::Scanned(records);
        } else {
            debug!(program = %program.title, "Already scanned, using cached records");
        }
        Ok(program.records())
    }

    /// Player sources of a detail page, falling back to its embedded frame
    async fn resolve_audio(&self, page: DetailPage) -> Result<Vec<AudioCandidate>> {
        if !page.audio.is_empty() {
            return Ok(page.audio);
        }

        let Some(frame_src) = page.frame_src.filter(|src| src.starts_with("http")) else {
            return Ok(Vec::new());
        };

        debug!(frame = %frame_src, "Following embedded frame");
        let frame_html = self.source.fetch_page(&frame_src).await?;

        Ok(parse_frame_audio(&frame_html)
            .map(|href| AudioCandidate {
                url: resolve_url(&frame_src, &href),
                description: None,
            })
            .into_iter()
            .collect())
    }
}
