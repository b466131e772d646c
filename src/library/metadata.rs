//! Per-file metadata resolution.
//!
//! Tag parsing is a best-effort capability behind [`TagReader`]; whatever it
//! fails to provide is filled from fallbacks so that a broken file never
//! aborts a catalog build.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use lofty::prelude::*;
use lofty::probe::Probe;
use thiserror::Error;

use crate::config::LibrarySettings;

#[derive(Debug, Error)]
pub enum TagError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tags: {0}")]
    Parse(#[from] lofty::error::LoftyError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedPicture {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// Tags as reported by a [`TagReader`]; every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub year: Option<u32>,
    pub pictures: Vec<EmbeddedPicture>,
}

/// Given a file's bytes, return its tags or fail.
pub trait TagReader: Send + Sync {
    fn read_tags(&self, bytes: &[u8]) -> Result<RawTags, TagError>;
}

/// [`TagReader`] backed by `lofty`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagReader;

fn clean(value: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// First four-digit run of a date-ish tag value ("1999", "1999-03-01").
fn parse_year(value: &str) -> Option<u32> {
    let digits: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.len() == 4 { digits.parse().ok() } else { None }
}

impl TagReader for LoftyTagReader {
    fn read_tags(&self, bytes: &[u8]) -> Result<RawTags, TagError> {
        let tagged = Probe::new(Cursor::new(bytes)).guess_file_type()?.read()?;

        let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
            return Ok(RawTags::default());
        };

        let year = tag
            .get_string(&ItemKey::RecordingDate)
            .or_else(|| tag.get_string(&ItemKey::OriginalReleaseDate))
            .and_then(parse_year);

        let pictures = tag
            .pictures()
            .iter()
            .map(|pic| EmbeddedPicture {
                data: pic.data().to_vec(),
                mime_type: pic
                    .mime_type()
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| "image/jpeg".to_string()),
            })
            .collect();

        Ok(RawTags {
            title: clean(tag.title()),
            artist: clean(tag.artist()),
            album: clean(tag.album()),
            year,
            pictures,
        })
    }
}

/// Fields of one audio file after fallback rules have been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: Option<u32>,
    pub cover: Option<EmbeddedPicture>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Apply the fallback precedence to whatever tags were recovered.
///
/// The tag title is only trusted when it differs from the resolved album:
/// some taggers copy the album name into the title field.
pub fn resolve_fields(
    tags: Option<RawTags>,
    file_stem: &str,
    settings: &LibrarySettings,
) -> ResolvedMetadata {
    let tags = tags.unwrap_or_default();

    let artist = present(tags.artist).unwrap_or_else(|| settings.unknown_artist.clone());
    let album = present(tags.album).unwrap_or_else(|| settings.unknown_album.clone());
    let title = present(tags.title)
        .filter(|t| *t != album)
        .unwrap_or_else(|| file_stem.to_string());

    ResolvedMetadata {
        title,
        artist,
        album,
        year: tags.year,
        cover: tags.pictures.into_iter().next(),
    }
}

/// Read `path` and resolve its metadata; never fails.
pub fn resolve_file(
    path: &Path,
    reader: &dyn TagReader,
    settings: &LibrarySettings,
) -> ResolvedMetadata {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let tags = fs::read(path)
        .map_err(TagError::from)
        .and_then(|bytes| reader.read_tags(&bytes));

    let tags = match tags {
        Ok(tags) => Some(tags),
        Err(e) => {
            tracing::debug!(file = %path.display(), error = %e, "no usable tags, using fallbacks");
            None
        }
    };

    resolve_fields(tags, &stem, settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(title: Option<&str>, artist: Option<&str>, album: Option<&str>) -> RawTags {
        RawTags {
            title: title.map(String::from),
            artist: artist.map(String::from),
            album: album.map(String::from),
            ..RawTags::default()
        }
    }

    #[test]
    fn missing_tags_fall_back_to_placeholders_and_filename() {
        let m = resolve_fields(None, "track-02", &LibrarySettings::default());
        assert_eq!(m.title, "track-02");
        assert_eq!(m.artist, "Unknown");
        assert_eq!(m.album, "Album");
        assert_eq!(m.year, None);
        assert_eq!(m.cover, None);
    }

    #[test]
    fn tag_values_win_when_present() {
        let mut raw = tags(Some("Song"), Some("Y"), Some("X"));
        raw.year = Some(2001);
        let m = resolve_fields(Some(raw), "file", &LibrarySettings::default());
        assert_eq!((m.title.as_str(), m.artist.as_str(), m.album.as_str()), ("Song", "Y", "X"));
        assert_eq!(m.year, Some(2001));
    }

    #[test]
    fn title_equal_to_album_is_ignored() {
        let raw = tags(Some("Same"), Some("Y"), Some("Same"));
        let m = resolve_fields(Some(raw), "01 intro", &LibrarySettings::default());
        assert_eq!(m.title, "01 intro");
        assert_eq!(m.album, "Same");
    }

    #[test]
    fn title_is_compared_with_the_resolved_album() {
        // No album tag: the placeholder becomes the album, so a title equal
        // to the placeholder is treated as a duplicate too.
        let raw = tags(Some("Album"), None, None);
        let m = resolve_fields(Some(raw), "stem", &LibrarySettings::default());
        assert_eq!(m.title, "stem");
    }

    #[test]
    fn blank_tag_values_count_as_absent() {
        let raw = tags(Some("  "), Some(""), Some(" "));
        let m = resolve_fields(Some(raw), "stem", &LibrarySettings::default());
        assert_eq!(m.title, "stem");
        assert_eq!(m.artist, "Unknown");
        assert_eq!(m.album, "Album");
    }

    #[test]
    fn first_picture_becomes_cover_candidate() {
        let mut raw = tags(Some("T"), None, None);
        raw.pictures = vec![
            EmbeddedPicture { data: vec![1], mime_type: "image/png".into() },
            EmbeddedPicture { data: vec![2], mime_type: "image/jpeg".into() },
        ];
        let m = resolve_fields(Some(raw), "stem", &LibrarySettings::default());
        assert_eq!(m.cover.unwrap().data, vec![1]);
    }

    #[test]
    fn parse_year_accepts_dates_and_rejects_noise() {
        assert_eq!(parse_year("1999"), Some(1999));
        assert_eq!(parse_year("2004-05-06"), Some(2004));
        assert_eq!(parse_year("99"), None);
        assert_eq!(parse_year("unknown"), None);
    }

    #[test]
    fn lofty_reader_fails_on_garbage_and_resolver_degrades() {
        assert!(LoftyTagReader.read_tags(b"definitely not audio").is_err());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken song.mp3");
        std::fs::write(&path, b"definitely not audio").unwrap();
        let m = resolve_file(&path, &LoftyTagReader, &LibrarySettings::default());
        assert_eq!(m.title, "broken song");
        assert_eq!(m.artist, "Unknown");
    }

    #[test]
    fn unreadable_file_still_resolves() {
        let dir = tempfile::tempdir().unwrap();
        let m = resolve_file(
            &dir.path().join("gone.ogg"),
            &LoftyTagReader,
            &LibrarySettings::default(),
        );
        assert_eq!(m.title, "gone");
        assert_eq!(m.album, "Album");
    }
}
