//! JSON snapshots of the crawled archive
//!
//! Two snapshots live side by side in one directory: the seed listing of
//! programs and the fuller archive holding scanned record lists. A missing
//! or unreadable snapshot is a cache miss, never an error.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::Result;
use crate::types::Archive;

/// Which snapshot to read or write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    /// Program listing without records
    Seed,
    /// Archive with scanned programs
    Full,
}

impl CacheKind {
    /// File name of the snapshot inside the cache directory
    pub fn file_name(self) -> &'static str {
        match self {
            CacheKind::Seed => "archive.json",
            CacheKind::Full => "programsarchive.json",
        }
    }
}

/// Directory holding the archive snapshots
#[derive(Debug, Clone)]
pub struct ArchiveCache {
    dir: PathBuf,
}

impl ArchiveCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of a snapshot file
    pub fn path(&self, kind: CacheKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    /// Load a snapshot
    ///
    /// # Returns
    /// `None` when the file is missing or does not hold a valid archive
    pub fn load(&self, kind: CacheKind) -> Option<Archive> {
        let path = self.path(kind);
        info!("Trying to read {:?} archive from {}", kind, path.display());

        match read_archive(&path) {
            Ok(archive) => Some(archive),
            Err(e) => {
                warn!("Error reading archive from {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Write a snapshot, replacing the previous file
    ///
    /// # Errors
    /// `Io` if the directory or file cannot be written
    pub fn save(&self, kind: CacheKind, archive: &Archive) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path(kind);
        let json = serde_json::to_string_pretty(archive)?;
        fs::write(&path, json)?;
        info!("Saved {:?} archive to {}", kind, path.display());
        Ok(())
    }
}

fn read_archive(path: &Path) -> Result<Archive> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Program, Record, ScanState};
    use chrono::NaiveDate;

    fn archive() -> Archive {
        let mut scanned = Program::new(
            "http://muzcentrum.ru/orpheusradio/programsarchive/eurofest",
            "Eurofest",
            Some("Anna".to_string()),
        );
        scanned.records = ScanState::Scanned(vec![Record {
            track_number: 1,
            title: None,
            artist: Some("Anna".to_string()),
            album: "Eurofest".to_string(),
            url: "http://muzcentrum.ru/orpheusradio/programsarchive/eurofest/1-a".to_string(),
            date: NaiveDate::from_ymd_opt(2019, 2, 28),
            audio_url: Some("http://muzcentrum.ru/audio/1.mp3".to_string()),
            img_url: Some("http://muzcentrum.ru/images/1.jpg".to_string()),
        }]);

        Archive::new(
            "http://muzcentrum.ru/orpheusradio/programsarchive",
            vec![
                scanned,
                Program::new("http://muzcentrum.ru/orpheusradio/programsarchive/jazz", "Jazz", None),
            ],
        )
    }

    #[test]
    fn test_missing_file_is_cache_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ArchiveCache::new(dir.path());
        assert!(cache.load(CacheKind::Full).is_none());
    }

    #[test]
    fn test_malformed_file_is_cache_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ArchiveCache::new(dir.path());
        fs::write(cache.path(CacheKind::Seed), "{ not json").unwrap();
        assert!(cache.load(CacheKind::Seed).is_none());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ArchiveCache::new(dir.path());
        let original = archive();

        cache.save(CacheKind::Full, &original).unwrap();
        let loaded = cache.load(CacheKind::Full).unwrap();
        assert_eq!(loaded, original);

        cache.save(CacheKind::Full, &loaded).unwrap();
        assert_eq!(cache.load(CacheKind::Full).unwrap(), original);
    }

    #[test]
    fn test_snapshots_are_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ArchiveCache::new(dir.path());

        cache.save(CacheKind::Seed, &archive()).unwrap();

        assert!(dir.path().join("archive.json").exists());
        assert!(cache.load(CacheKind::Full).is_none());
    }

    #[test]
    fn test_save_creates_directory_and_pretty_prints() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ArchiveCache::new(dir.path().join("nested"));

        cache.save(CacheKind::Seed, &archive()).unwrap();

        let text = fs::read_to_string(cache.path(CacheKind::Seed)).unwrap();
        assert!(text.contains("\n  \"programs\": ["));
        assert!(text.contains("\"trackNumber\": 1"));
        assert!(text.contains("\"date\": \"2019-02-28\""));
    }
}
