//! Audio download and ID3 tagging
//!
//! Downloads a record's audio next to its final name, tags it with the
//! record metadata using lofty and renames it into place. Each record is
//! handled on its own; a failure for one does not stop the others.

use std::path::{Path, PathBuf};

use lofty::config::WriteOptions;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, ItemValue, Tag, TagItem, TagType};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::client::{ClientConfig, OrpheusClient};
use crate::error::{ArchiveError, Result};
use crate::types::Record;
use crate::url::file_slug;

/// Date format written to the recording date frame
const TAG_DATE_FORMAT: &str = "%Y-%m-%d";

/// Downloads records into tagged MP3 files
pub struct AudioDownloader {
    client: OrpheusClient,
}

impl AudioDownloader {
    /// Create a downloader with default client configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a downloader with custom client configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            client: OrpheusClient::with_config(config)?,
        })
    }

    /// Download and tag every record, one after another
    ///
    /// # Returns
    /// `(track_number, result)` per record, in input order
    pub async fn download_all(&self, records: &[Record], dir: &Path) -> Vec<(u32, Result<PathBuf>)> {
        let mut results = Vec::with_capacity(records.len());
        for record in records {
            let result = self.download_record(record, dir).await;
            if let Err(e) = &result {
                warn!(track = record.track_number, url = %record.url, "Download failed: {}", e);
            }
            results.push((record.track_number, result));
        }
        results
    }

    /// Download one record into `dir` and tag it
    ///
    /// An existing file with the final name is reused as is.
    ///
    /// # Returns
    /// Path of the tagged file, `{track}_{slug}.mp3`
    ///
    /// # Errors
    /// - `MissingAudio` if the record has no audio URL
    /// - `HttpError`/`NotFound`/`HttpStatus` if the audio cannot be fetched
    /// - `Tag` if the downloaded file is not taggable audio
    pub async fn download_record(&self, record: &Record, dir: &Path) -> Result<PathBuf> {
        let audio_url = record
            .audio_url
            .as_deref()
            .ok_or_else(|| ArchiveError::MissingAudio(record.url.clone()))?;

        let target = dir.join(output_file_name(record));
        if tokio::fs::try_exists(&target).await? {
            info!("Already downloaded: {}", target.display());
            return Ok(target);
        }

        let partial = target.with_extension("part.mp3");
        match self.fetch_and_tag(record, audio_url, &partial).await {
            Ok(()) => {
                tokio::fs::rename(&partial, &target).await?;
                info!("Saved {}", target.display());
                Ok(target)
            }
            Err(e) => {
                let _ = tokio::fs::remove_file(&partial).await;
                Err(e)
            }
        }
    }

    async fn fetch_and_tag(&self, record: &Record, audio_url: &str, path: &Path) -> Result<()> {
        self.stream_to_file(audio_url, path).await?;

        let cover = match record.img_url.as_deref() {
            Some(img_url) => match self.client.fetch_bytes(img_url).await {
                Ok(data) => Some((data, guess_mime_type(img_url))),
                Err(e) => {
                    warn!("Cover image {} unavailable: {}", img_url, e);
                    None
                }
            },
            None => None,
        };

        let path = path.to_path_buf();
        let record = record.clone();
        tokio::task::spawn_blocking(move || write_tags(&path, &record, cover))
            .await
            .map_err(std::io::Error::other)?
    }

    async fn stream_to_file(&self, url: &str, path: &Path) -> Result<()> {
        let mut response = self.client.get(url).await?;
        let mut file = tokio::fs::File::create(path).await?;

        while let Some(chunk) = response.chunk().await.map_err(ArchiveError::HttpError)? {
            file.write_all(&chunk).await?;
        }

        file.flush().await?;
        Ok(())
    }
}

/// Final file name of a record: `{track}_{last segment of its page URL}.mp3`
///
/// # Example
/// ```
/// use orpheus_core::{Record, download::output_file_name};
/// let record = Record {
///     track_number: 7,
///     title: None,
///     artist: None,
///     album: "Eurofest".to_string(),
///     url: "http://muzcentrum.ru/orpheusradio/programsarchive/eurofest/321-vienna".to_string(),
///     date: None,
///     audio_url: None,
///     img_url: None,
/// };
/// assert_eq!(output_file_name(&record), "7_321-vienna.mp3");
/// ```
pub fn output_file_name(record: &Record) -> String {
    format!("{}_{}.mp3", record.track_number, file_slug(&record.url))
}

fn write_tags(path: &Path, record: &Record, cover: Option<(Vec<u8>, MimeType)>) -> Result<()> {
    let tagged_file = Probe::open(path)?.read()?;

    let mut tag = tagged_file
        .primary_tag()
        .cloned()
        .unwrap_or_else(|| Tag::new(TagType::Id3v2));

    apply_record_tags(&mut tag, record, cover);

    tag.save_to_path(path, WriteOptions::default())?;
    Ok(())
}

/// Copies record metadata into a tag
pub(crate) fn apply_record_tags(tag: &mut Tag, record: &Record, cover: Option<(Vec<u8>, MimeType)>) {
    tag.set_track(record.track_number);

    if let Some(title) = &record.title {
        tag.set_title(title.clone());
    }
    if let Some(artist) = &record.artist {
        tag.set_artist(artist.clone());
    }
    tag.set_album(record.album.clone());

    tag.insert(TagItem::new(
        ItemKey::AudioSourceUrl,
        ItemValue::Locator(record.url.clone()),
    ));

    if let Some(date) = record.date {
        tag.insert_text(ItemKey::RecordingDate, date.format(TAG_DATE_FORMAT).to_string());
    }

    if let Some((data, mime_type)) = cover {
        tag.remove_picture_type(PictureType::CoverFront);
        tag.push_picture(Picture::new_unchecked(
            PictureType::CoverFront,
            Some(mime_type),
            None,
            data,
        ));
    }
}

/// Guess the cover MIME type from the image URL
fn guess_mime_type(url: &str) -> MimeType {
    let path = url.split('?').next().unwrap_or(url).to_lowercase();
    if path.ends_with(".png") {
        MimeType::Png
    } else if path.ends_with(".gif") {
        MimeType::Gif
    } else if path.ends_with(".bmp") {
        MimeType::Bmp
    } else {
        MimeType::Jpeg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record(audio_url: Option<String>) -> Record {
        Record {
            track_number: 3,
            title: Some("Vienna".to_string()),
            artist: Some("Anna".to_string()),
            album: "Eurofest".to_string(),
            url: "http://muzcentrum.ru/orpheusradio/programsarchive/eurofest/321-vienna".to_string(),
            date: NaiveDate::from_ymd_opt(2019, 5, 18),
            audio_url,
            img_url: None,
        }
    }

    fn downloader(base_url: &str) -> AudioDownloader {
        AudioDownloader::with_config(ClientConfig {
            base_url: base_url.to_string(),
            requests_per_second: 100.0,
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name(&record(None)), "3_321-vienna.mp3");
    }

    #[test]
    fn test_output_file_name_stays_inside_dir() {
        let mut encoded = record(None);
        encoded.url = "http://muzcentrum.ru/orpheusradio/programsarchive/rock/12-ac%2Fdc".to_string();

        let name = output_file_name(&encoded);
        assert_eq!(name, "3_12-ac_dc.mp3");

        let dir = Path::new("/music/rock");
        assert_eq!(dir.join(&name).parent(), Some(dir));
    }

    #[test]
    fn test_apply_record_tags() {
        let mut tag = Tag::new(TagType::Id3v2);
        apply_record_tags(
            &mut tag,
            &record(Some("http://x/a.mp3".to_string())),
            Some((vec![0xFF, 0xD8, 0xFF], MimeType::Jpeg)),
        );

        assert_eq!(tag.track(), Some(3));
        assert_eq!(tag.title().as_deref(), Some("Vienna"));
        assert_eq!(tag.artist().as_deref(), Some("Anna"));
        assert_eq!(tag.album().as_deref(), Some("Eurofest"));
        assert_eq!(tag.get_string(&ItemKey::RecordingDate), Some("2019-05-18"));
        assert!(matches!(
            tag.get(&ItemKey::AudioSourceUrl).map(TagItem::value),
            Some(ItemValue::Locator(url)) if url.ends_with("/321-vienna")
        ));
        assert_eq!(tag.pictures().len(), 1);
        assert_eq!(tag.pictures()[0].pic_type(), PictureType::CoverFront);
    }

    #[test]
    fn test_apply_record_tags_skips_missing_fields() {
        let mut tag = Tag::new(TagType::Id3v2);
        let mut bare = record(None);
        bare.title = None;
        bare.artist = None;
        bare.date = None;

        apply_record_tags(&mut tag, &bare, None);

        assert_eq!(tag.title(), None);
        assert_eq!(tag.artist(), None);
        assert_eq!(tag.get_string(&ItemKey::RecordingDate), None);
        assert!(tag.pictures().is_empty());
    }

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type("http://x/a.PNG"), MimeType::Png);
        assert_eq!(guess_mime_type("http://x/a.gif?v=2"), MimeType::Gif);
        assert_eq!(guess_mime_type("http://x/a.jpg"), MimeType::Jpeg);
        assert_eq!(guess_mime_type("http://x/a"), MimeType::Jpeg);
    }

    #[tokio::test]
    async fn test_missing_audio_url_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = downloader("http://127.0.0.1:9").download_record(&record(None), dir.path()).await;
        assert!(matches!(result, Err(ArchiveError::MissingAudio(_))));
    }

    #[tokio::test]
    async fn test_existing_file_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("3_321-vienna.mp3");
        std::fs::write(&existing, b"already here").unwrap();

        let result = downloader("http://127.0.0.1:9")
            .download_record(&record(Some("http://127.0.0.1:9/a.mp3".to_string())), dir.path())
            .await
            .unwrap();

        assert_eq!(result, existing);
        assert_eq!(std::fs::read(&existing).unwrap(), b"already here");
    }

    #[tokio::test]
    async fn test_untaggable_download_is_cleaned_up() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/audio/broken.mp3"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not audio</html>"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let result = downloader(&server.uri())
            .download_record(
                &record(Some(format!("{}/audio/broken.mp3", server.uri()))),
                dir.path(),
            )
            .await;

        assert!(matches!(result, Err(ArchiveError::Tag(_))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_download_all_reports_each_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut second = record(Some(format!("{}/audio/gone.mp3", server.uri())));
        second.track_number = 4;
        let records = vec![record(None), second];

        let results = downloader(&server.uri())
            .download_all(&records, dir.path())
            .await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, 3);
        assert!(matches!(results[0].1, Err(ArchiveError::MissingAudio(_))));
        assert_eq!(results[1].0, 4);
        assert!(matches!(results[1].1, Err(ArchiveError::NotFound(_))));
    }
}
