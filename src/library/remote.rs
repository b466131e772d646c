use std::path::Path;

use serde::Deserialize;

use crate::config::LibrarySettings;

/// One track as listed by a remote catalog endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteTrackRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    /// Path or URL of the audio.
    #[serde(alias = "filePath", alias = "file_path", alias = "url")]
    pub location: String,
    #[serde(default)]
    pub cover: Option<String>,
}

/// A record with fallbacks applied.
pub(super) struct ResolvedRecord {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub locator: String,
    pub is_network: bool,
    pub cover: Option<String>,
}

impl RemoteTrackRecord {
    pub(super) fn resolve(self, settings: &LibrarySettings) -> ResolvedRecord {
        let non_blank = |s: String| Some(s).filter(|s| !s.trim().is_empty());

        let artist = non_blank(self.artist).unwrap_or_else(|| settings.unknown_artist.clone());
        let album = non_blank(self.album).unwrap_or_else(|| settings.unknown_album.clone());
        let title = non_blank(self.title).unwrap_or_else(|| {
            let tail = self.location.rsplit('/').next().unwrap_or(&self.location);
            Path::new(tail)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| tail.to_string())
        });

        ResolvedRecord {
            title,
            artist,
            album,
            is_network: self.location.contains("://"),
            locator: self.location,
            cover: self.cover.and_then(non_blank),
        }
    }
}

/// Parse a JSON array of [`RemoteTrackRecord`]s.
pub fn parse_records(json: &str) -> Result<Vec<RemoteTrackRecord>, serde_json::Error> {
    serde_json::from_str(json)
}
