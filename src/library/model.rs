use std::path::PathBuf;

use super::urls::UrlLease;

/// Separator between album and artist in an [`Album`] key.
pub const ALBUM_KEY_SEPARATOR: &str = "__";

/// Composite album identity: resolved album name, separator, resolved artist name.
pub fn album_key(album: &str, artist: &str) -> String {
    format!("{album}{ALBUM_KEY_SEPARATOR}{artist}")
}

/// Where a track's audio came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    File(PathBuf),
    Remote(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Position in discovery order for the build that produced it.
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: Option<u32>,
    pub source: SourceRef,
    /// Locator resolvable through the catalog's object URL table.
    pub playable_url: String,
    pub cover_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    /// See [`album_key`].
    pub id: String,
    pub album: String,
    pub artist: String,
    pub cover_url: Option<String>,
    pub songs: Vec<Track>,
}

/// One immutable catalog snapshot.
///
/// The snapshot owns every object URL minted while building it; they are
/// revoked when the snapshot is dropped.
#[derive(Debug)]
pub struct Catalog {
    generation: u64,
    albums: Vec<Album>,
    _lease: Option<UrlLease>,
}

impl Catalog {
    pub(crate) fn new(generation: u64, albums: Vec<Album>, lease: UrlLease) -> Self {
        Self {
            generation,
            albums,
            _lease: Some(lease),
        }
    }

    /// The catalog a session starts with, before any folder is loaded.
    pub fn empty() -> Self {
        Self {
            generation: 0,
            albums: Vec::new(),
            _lease: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    pub fn is_empty(&self) -> bool {
        self.albums.is_empty()
    }

    pub fn track_count(&self) -> usize {
        self.albums.iter().map(|a| a.songs.len()).sum()
    }

    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.albums.iter().flat_map(|a| a.songs.iter())
    }

    /// Locate the album holding `track_id` and the track's index within it.
    pub fn locate(&self, track_id: &str) -> Option<(&Album, usize)> {
        self.albums.iter().find_map(|album| {
            album
                .songs
                .iter()
                .position(|s| s.id == track_id)
                .map(|idx| (album, idx))
        })
    }

    /// Locate the track built from `source`.
    ///
    /// Ids are only stable within one build; the source identifies the
    /// same file or record across rebuilds.
    pub fn locate_source(&self, source: &SourceRef) -> Option<(&Album, usize)> {
        let id = &self.tracks().find(|t| &t.source == source)?.id;
        self.locate(id)
    }

    pub fn track(&self, track_id: &str) -> Option<&Track> {
        self.locate(track_id).map(|(album, idx)| &album.songs[idx])
    }
}
