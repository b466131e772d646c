//! Music catalog: discovery, metadata resolution, artwork and album grouping.
//!
//! Data flows `scan` → `metadata` → `cover` → `catalog`. The resulting
//! [`Catalog`] is an immutable snapshot that owns the object URLs of its
//! tracks and artwork.

mod catalog;
mod cover;
mod metadata;
mod model;
mod remote;
mod scan;
mod search;
mod urls;

pub use catalog::CatalogBuilder;
pub use cover::{CoverFinder, find_cover_in};
pub use metadata::{
    EmbeddedPicture, LoftyTagReader, RawTags, ResolvedMetadata, TagError, TagReader,
    resolve_fields, resolve_file,
};
pub use model::{ALBUM_KEY_SEPARATOR, Album, Catalog, SourceRef, Track, album_key};
pub use remote::{RemoteTrackRecord, parse_records};
pub use scan::discover;
pub use search::AlbumMatch;
pub use urls::{ObjectSource, ObjectUrls, UrlLease};

#[cfg(test)]
pub(crate) mod testing;
