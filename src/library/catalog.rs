use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use crate::config::LibrarySettings;
use crate::error::Error;
use crate::store::EditOverrides;

use super::cover::CoverFinder;
use super::metadata::{ResolvedMetadata, TagReader, resolve_file};
use super::model::{Album, Catalog, SourceRef, Track, album_key};
use super::remote::RemoteTrackRecord;
use super::scan::discover;
use super::urls::{ObjectSource, ObjectUrls, UrlLease};

/// A track as discovered, before ids and edits are applied.
struct Discovered {
    title: String,
    artist: String,
    album: String,
    year: Option<u32>,
    source: SourceRef,
    playable_url: String,
}

/// Ordered album mapping plus the monotonic track-id counter.
struct Grouper<'e> {
    edits: &'e EditOverrides,
    index: HashMap<String, usize>,
    albums: Vec<Album>,
    next_id: u64,
}

impl<'e> Grouper<'e> {
    fn new(edits: &'e EditOverrides) -> Self {
        Self {
            edits,
            index: HashMap::new(),
            albums: Vec::new(),
            next_id: 0,
        }
    }

    /// Append one track. `cover` is only evaluated when the track opens a new album.
    ///
    /// The album key comes from the discovered fields; edits only change
    /// what the track displays.
    fn push(&mut self, found: Discovered, cover: impl FnOnce() -> Option<String>) {
        let key = album_key(&found.album, &found.artist);
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                self.albums.push(Album {
                    id: key.clone(),
                    album: found.album.clone(),
                    artist: found.artist.clone(),
                    cover_url: cover(),
                    songs: Vec::new(),
                });
                let slot = self.albums.len() - 1;
                self.index.insert(key, slot);
                slot
            }
        };

        let id = self.next_id.to_string();
        self.next_id += 1;

        let edits = self.edits;
        let edit = edits.get(&id);
        let pick = |field: Option<&String>, discovered: String| field.cloned().unwrap_or(discovered);
        let album = &mut self.albums[slot];

        let track = Track {
            title: pick(edit.and_then(|e| e.title.as_ref()), found.title),
            artist: pick(edit.and_then(|e| e.artist.as_ref()), found.artist),
            album: pick(edit.and_then(|e| e.album.as_ref()), found.album),
            year: found.year,
            source: found.source,
            playable_url: found.playable_url,
            cover_url: edit
                .and_then(|e| e.cover_url.clone())
                .or_else(|| album.cover_url.clone()),
            id,
        };
        album.songs.push(track);
    }

    fn finish(self) -> Vec<Album> {
        self.albums
    }
}

/// Builds [`Catalog`] snapshots from a folder or from remote track records.
pub struct CatalogBuilder<'a> {
    settings: &'a LibrarySettings,
    reader: &'a dyn TagReader,
    edits: &'a EditOverrides,
    urls: Arc<ObjectUrls>,
    workers: usize,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(
        settings: &'a LibrarySettings,
        reader: &'a dyn TagReader,
        edits: &'a EditOverrides,
        urls: Arc<ObjectUrls>,
    ) -> Self {
        Self {
            settings,
            reader,
            edits,
            urls,
            workers: 0,
        }
    }

    /// Bound the metadata worker pool; `0` means one worker per CPU.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Resolve metadata for every file, keeping `files` order.
    fn resolve_all(&self, files: &[PathBuf]) -> Vec<ResolvedMetadata> {
        let resolve = |path: &PathBuf| resolve_file(path, self.reader, self.settings);
        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
        {
            Ok(pool) => pool.install(|| files.par_iter().map(resolve).collect()),
            Err(e) => {
                tracing::warn!(error = %e, "worker pool unavailable, resolving sequentially");
                files.iter().map(resolve).collect()
            }
        }
    }

    /// Scan `root` and group its audio files into albums.
    ///
    /// Fails only if `root` cannot be listed; unreadable or untagged files
    /// degrade to fallback fields.
    pub fn build(&self, root: &Path, generation: u64) -> Result<Catalog, Error> {
        tracing::info!(root = %root.display(), generation, "building catalog");

        let files = discover(root, self.settings)?;
        let resolved = self.resolve_all(&files);

        let mut lease = UrlLease::new(self.urls.clone(), generation);
        let mut covers = CoverFinder::new(root, self.settings);
        let mut grouper = Grouper::new(self.edits);

        for (path, meta) in files.into_iter().zip(resolved) {
            let ResolvedMetadata {
                title,
                artist,
                album,
                year,
                cover,
            } = meta;
            let playable_url = lease.create(ObjectSource::File(path.clone()));
            let found = Discovered {
                title,
                artist,
                album,
                year,
                source: SourceRef::File(path.clone()),
                playable_url,
            };
            grouper.push(found, || {
                covers
                    .resolve(cover, &path)
                    .map(|source| lease.create(source))
            });
        }

        let catalog = Catalog::new(generation, grouper.finish(), lease);
        tracing::info!(
            albums = catalog.albums().len(),
            tracks = catalog.track_count(),
            generation,
            "catalog built"
        );
        Ok(catalog)
    }

    /// Group a flat list of remote track records with the same rules as a folder scan.
    pub fn build_from_records(&self, records: Vec<RemoteTrackRecord>, generation: u64) -> Catalog {
        let mut lease = UrlLease::new(self.urls.clone(), generation);
        let mut grouper = Grouper::new(self.edits);

        for record in records {
            let resolved = record.resolve(self.settings);
            let playable_url = if resolved.is_network {
                resolved.locator.clone()
            } else {
                lease.create(ObjectSource::File(PathBuf::from(&resolved.locator)))
            };
            let found = Discovered {
                title: resolved.title,
                artist: resolved.artist,
                album: resolved.album,
                year: None,
                source: SourceRef::Remote(resolved.locator),
                playable_url,
            };
            grouper.push(found, || resolved.cover);
        }

        let catalog = Catalog::new(generation, grouper.finish(), lease);
        tracing::info!(
            albums = catalog.albums().len(),
            tracks = catalog.track_count(),
            generation,
            "catalog built from remote records"
        );
        catalog
    }
}
