//! Command implementations for the `orpheus` binary
//!
//! Each command writes its human-readable report to the given writer.
//! Missing inputs are reported as messages, not errors.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use orpheus_core::{
    Archive, ArchiveCache, AudioDownloader, CacheKind, ClientConfig, OrpheusScraper, Program,
    Record,
};

/// Everything a command needs
pub struct App {
    pub scraper: OrpheusScraper,
    pub cache: ArchiveCache,
    pub client_config: ClientConfig,
}

impl App {
    pub fn new(client_config: ClientConfig, cache: ArchiveCache) -> Result<Self> {
        let scraper = OrpheusScraper::with_config(client_config.clone())
            .context("Failed to create HTTP client")?;
        Ok(Self {
            scraper,
            cache,
            client_config,
        })
    }

    /// Full snapshot when present, otherwise the seed listing
    async fn working_archive(&self) -> Result<Archive> {
        match self.cache.load(CacheKind::Full) {
            Some(archive) => Ok(archive),
            None => Ok(self.scraper.seed_archive(&self.cache).await?),
        }
    }
}

/// `orpheus list`: print every program of the archive
pub async fn list_programs(app: &App, out: &mut impl Write) -> Result<()> {
    let archive = app.scraper.seed_archive(&app.cache).await?;
    for (index, program) in archive.programs.iter().enumerate() {
        writeln!(out, "{}", program_line(index, program))?;
    }
    Ok(())
}

/// `orpheus scan <program>`: extract one program's records and cache them
pub async fn scan_program(app: &App, slug: &str, out: &mut impl Write) -> Result<()> {
    let mut archive = app.working_archive().await?;

    let Some(program) = archive.find_program_mut(slug) else {
        writeln!(out, "No program {} in programs archive", slug)?;
        return Ok(());
    };

    let records = app.scraper.scan_program(program).await?;
    write_records(out, records)?;

    app.cache.save(CacheKind::Full, &archive)?;
    Ok(())
}

/// `orpheus scan all`: extract every program, saving after each one
pub async fn scan_all(app: &App, out: &mut impl Write) -> Result<()> {
    let mut archive = app.working_archive().await?;

    for index in 0..archive.programs.len() {
        let program = &mut archive.programs[index];
        writeln!(out, "{}", program_line(index, program))?;
        writeln!(out, "{}", program.url)?;

        let records = app.scraper.scan_program(program).await?;
        write_records(out, records)?;

        app.cache.save(CacheKind::Full, &archive)?;
    }
    Ok(())
}

/// `orpheus download <program> <path>`: write tagged MP3 files
pub async fn download_program(
    app: &App,
    slug: &str,
    path: &Path,
    out: &mut impl Write,
) -> Result<()> {
    if !path.exists() {
        writeln!(out, "Path {} does not exist", path.display())?;
        return Ok(());
    }

    let Some(archive) = app.cache.load(CacheKind::Full) else {
        writeln!(out, "Get programs archive at first")?;
        return Ok(());
    };

    let Some(program) = archive.find_program(slug) else {
        writeln!(out, "No program {} in programs archive", slug)?;
        return Ok(());
    };

    if program.records().is_empty() {
        writeln!(
            out,
            "Program {} doesn't have any records. Scan it first",
            program.title
        )?;
        return Ok(());
    }

    let program_dir = path.join(slug);
    std::fs::create_dir_all(&program_dir)
        .with_context(|| format!("Failed to create {}", program_dir.display()))?;

    let downloader = AudioDownloader::with_config(app.client_config.clone())?;
    for (track, result) in downloader.download_all(program.records(), &program_dir).await {
        match result {
            Ok(file) => writeln!(out, "{}", file.display())?,
            Err(e) => writeln!(out, "{}: {}", track, e)?,
        }
    }
    Ok(())
}

fn program_line(index: usize, program: &Program) -> String {
    format!("{}. {} - {}", index, program.slug(), program.title)
}

fn write_records(out: &mut impl Write, records: &[Record]) -> Result<()> {
    for record in records {
        writeln!(out, "{}", record_line(record))?;
    }
    writeln!(out)?;
    Ok(())
}

fn record_line(record: &Record) -> String {
    let date = record
        .date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "----------".to_string());
    format!(
        "{:>3}. {} {} | {}",
        record.track_number,
        date,
        record.title.as_deref().unwrap_or("(untitled)"),
        record.audio_url.as_deref().unwrap_or("-"),
    )
}
