//! Error types shared by the catalog, the stores and the session.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced to the caller of a session operation.
///
/// Per-file metadata failures never appear here: they are absorbed by the
/// metadata resolver and degrade to fallback fields.
#[derive(Debug, Error)]
pub enum Error {
    /// Read access to the folder was refused or has been revoked.
    #[error("permission denied for {}", .0.display())]
    PermissionDenied(PathBuf),

    /// The host lacks a capability the operation needs.
    #[error("unsupported environment: {0}")]
    UnsupportedEnvironment(&'static str),

    /// The chosen root folder could not be opened or listed.
    #[error("cannot read folder {}: {source}", path.display())]
    RootEnumeration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A rebuild was requested before any folder was opened.
    #[error("no music folder has been opened")]
    NoFolder,

    /// One of the persistent stores is unavailable.
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

/// Persistence-layer failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store file {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No data directory could be determined for the stores.
    #[error("no data directory available for persistent stores")]
    NoDataDir,
}

/// A queue operation referenced a track that is not in the current catalog.
///
/// Recoverable: the queue is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("track {0} is not part of the current catalog")]
pub struct StaleTrackReference(pub String);
