use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/gmusic/config.toml` or `~/.config/gmusic/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `GMUSIC__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub scan: ScanSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Base names (without extension) recognised as album artwork.
    pub cover_names: Vec<String>,
    /// Image extensions accepted for artwork files.
    pub image_extensions: Vec<String>,
    /// Artist shown when a file carries no artist tag.
    pub unknown_artist: String,
    /// Album shown when a file carries no album tag.
    pub unknown_album: String,
    /// Whether to follow symlinks during discovery.
    pub follow_links: bool,
    /// Where to look for artwork files when a track has no embedded picture.
    pub cover_scope: CoverScope,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: ["mp3", "ogg", "wav", "flac", "m4a", "aac", "webm"]
                .map(String::from)
                .to_vec(),
            cover_names: ["cover", "folder", "front", "album", "artwork", "picture"]
                .map(String::from)
                .to_vec(),
            image_extensions: ["jpg", "jpeg", "png", "webp"].map(String::from).to_vec(),
            unknown_artist: "Unknown".to_string(),
            unknown_album: "Album".to_string(),
            follow_links: true,
            cover_scope: CoverScope::Root,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoverScope {
    /// Only the root folder is searched.
    #[serde(alias = "root-only")]
    Root,
    /// The folder of the track that introduced the album, then the root.
    #[serde(alias = "track_folder", alias = "album-folder")]
    TrackFolder,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Size of the metadata worker pool. `0` uses one worker per CPU.
    pub workers: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding the saved folder and the metadata edits.
    ///
    /// Defaults to `$XDG_DATA_HOME/gmusic` or `~/.local/share/gmusic`.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "gmusic=info".to_string(),
        }
    }
}
