//! The session controller: owns the current catalog snapshot, both stores
//! and the playback queue.
//!
//! Every rebuild produces a new [`Catalog`] off to the side and swaps it in
//! whole; the queue only ever sees a finished snapshot.

mod queue;

pub use queue::{PlaybackQueue, PlaybackState};

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::capabilities::Capabilities;
use crate::config::Settings;
use crate::error::{Error, Result, StaleTrackReference, StoreError};
use crate::library::{
    AlbumMatch, Catalog, CatalogBuilder, LoftyTagReader, ObjectUrls, RemoteTrackRecord, TagReader,
    Track,
};
use crate::store::{
    EditOverride, EditOverrides, EditStore, FolderHandle, FolderStore, PermissionPrompt,
    PermissionState, Verification, query_read_permission, verify_read_permission_with,
};

/// Lets the user choose a folder interactively.
pub trait FolderPicker {
    /// `None` when the user backs out.
    fn pick_folder(&self) -> Option<PathBuf>;
}

/// How [`Session::reload_saved`] ended when it did not fail.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    NoSavedFolder,
    Cancelled,
    Loaded,
}

/// What happens to the queue when a new snapshot is installed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum QueueOnSwap {
    /// Same source: keep playing the current track if it still exists.
    Follow,
    /// Different folder or record list: nothing carries over.
    Clear,
}

type PermissionQuery = Box<dyn Fn(&FolderHandle) -> PermissionState>;

pub struct Session {
    settings: Settings,
    caps: Capabilities,
    folders: FolderStore,
    edits: EditStore,
    reader: Box<dyn TagReader>,
    permission_query: PermissionQuery,
    urls: Arc<ObjectUrls>,
    catalog: Catalog,
    generation: u64,
    root: Option<PathBuf>,
    queue: PlaybackQueue,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("caps", &self.caps)
            .field("root", &self.root)
            .field("generation", &self.generation)
            .field("albums", &self.catalog.albums().len())
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Session with the `lofty` tag reader and stores in the configured data directory.
    pub fn new(settings: Settings, caps: Capabilities) -> Result<Self> {
        let data_dir = settings.data_dir().ok_or(StoreError::NoDataDir)?;
        Ok(Self::with_parts(
            settings,
            caps,
            &data_dir,
            Box::new(LoftyTagReader),
        ))
    }

    pub fn with_parts(
        settings: Settings,
        caps: Capabilities,
        data_dir: &Path,
        reader: Box<dyn TagReader>,
    ) -> Self {
        tracing::debug!(data_dir = %data_dir.display(), "opening session stores");
        Self {
            settings,
            caps,
            folders: FolderStore::new(data_dir),
            edits: EditStore::new(data_dir),
            reader,
            permission_query: Box::new(query_read_permission),
            urls: ObjectUrls::new(),
            catalog: Catalog::empty(),
            generation: 0,
            root: None,
            queue: PlaybackQueue::new(),
        }
    }

    /// Replace how folder read access is checked.
    pub fn with_permission_query(
        mut self,
        query: impl Fn(&FolderHandle) -> PermissionState + 'static,
    ) -> Self {
        self.permission_query = Box::new(query);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn queue(&self) -> &PlaybackQueue {
        &self.queue
    }

    /// The folder the current catalog was built from, if any.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Shared object URL table; the audio thread resolves locators through it.
    pub fn urls(&self) -> Arc<ObjectUrls> {
        self.urls.clone()
    }

    /// Ask `picker` for a folder and open it.
    ///
    /// Fails closed when the host has no picker; a cancelled pick is `Ok(None)`.
    pub fn select_folder(&mut self, picker: &dyn FolderPicker) -> Result<Option<&Catalog>> {
        if !self.caps.can_pick_folder {
            return Err(Error::UnsupportedEnvironment("interactive folder selection"));
        }
        let Some(path) = picker.pick_folder() else {
            tracing::info!("folder selection cancelled");
            return Ok(None);
        };
        self.open_folder(&path).map(Some)
    }

    /// Open `path` as the music folder: build its catalog and remember it.
    ///
    /// The catalog is swapped in before the folder is saved, so a store
    /// failure is reported while the freshly built catalog stays usable.
    pub fn open_folder(&mut self, path: &Path) -> Result<&Catalog> {
        let root = path.canonicalize().map_err(|source| {
            if source.kind() == ErrorKind::PermissionDenied {
                Error::PermissionDenied(path.to_path_buf())
            } else {
                Error::RootEnumeration {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let handle = FolderHandle::new(&root);
        if self.caps.can_check_permission
            && (self.permission_query)(&handle) == PermissionState::Prompt
        {
            return Err(Error::PermissionDenied(root));
        }

        let next = self.build_snapshot(&root)?;
        let swap = self.swap_for(&root);
        self.root = Some(root);
        self.install(next, swap);
        self.folders.save(&handle)?;
        Ok(&self.catalog)
    }

    /// Reopen the folder saved by an earlier session, re-confirming access first.
    pub fn reload_saved(&mut self, prompt: &dyn PermissionPrompt) -> Result<ReloadOutcome> {
        let Some(handle) = self.folders.load()? else {
            tracing::info!("no saved folder to reload");
            return Ok(ReloadOutcome::NoSavedFolder);
        };

        let query = self.permission_query.as_ref();
        match verify_read_permission_with(&handle, &self.caps, prompt, query) {
            Verification::Cancelled => {
                tracing::info!(folder = %handle.root().display(), "permission request cancelled");
                Ok(ReloadOutcome::Cancelled)
            }
            Verification::Denied => Err(Error::PermissionDenied(handle.root().to_path_buf())),
            Verification::Granted => {
                let next = self.build_snapshot(handle.root())?;
                let swap = self.swap_for(handle.root());
                self.root = Some(handle.root().to_path_buf());
                self.install(next, swap);
                Ok(ReloadOutcome::Loaded)
            }
        }
    }

    /// Rescan the current folder, picking up edits saved since the last build.
    ///
    /// On failure the previous catalog stays in place.
    pub fn rebuild(&mut self) -> Result<&Catalog> {
        let root = self.root.clone().ok_or(Error::NoFolder)?;
        let next = self.build_snapshot(&root)?;
        self.install(next, QueueOnSwap::Follow);
        Ok(&self.catalog)
    }

    /// Replace the catalog with one grouped from remote track records.
    pub fn load_records(&mut self, records: Vec<RemoteTrackRecord>) -> &Catalog {
        let edits = self.load_edits();
        let next = self
            .builder(&edits)
            .build_from_records(records, self.generation + 1);
        self.root = None;
        self.install(next, QueueOnSwap::Clear);
        &self.catalog
    }

    /// Persist an edit for `track_id`; it shows up from the next build on.
    pub fn save_edit(&self, track_id: &str, edit: EditOverride) -> Result<()> {
        self.edits.save(track_id, edit)?;
        Ok(())
    }

    /// Merge `changes` into the edit already saved for `track_id`.
    ///
    /// Fields left unset in `changes` keep their saved value. Returns the
    /// edit as stored.
    pub fn amend_edit(&self, track_id: &str, changes: EditOverride) -> Result<EditOverride> {
        let saved = self.edits.get(track_id)?.unwrap_or_default();
        let merged = EditOverride {
            title: changes.title.or(saved.title),
            artist: changes.artist.or(saved.artist),
            album: changes.album.or(saved.album),
            cover_url: changes.cover_url.or(saved.cover_url),
        };
        self.edits.save(track_id, merged.clone())?;
        Ok(merged)
    }

    pub fn search(&self, term: &str) -> Vec<AlbumMatch<'_>> {
        self.catalog.search(term)
    }

    pub fn select_track(&mut self, track_id: &str) -> std::result::Result<&Track, StaleTrackReference> {
        self.queue.select_track(&self.catalog, track_id)
    }

    pub fn next(&mut self) -> Option<&Track> {
        self.queue.next()
    }

    pub fn previous(&mut self) -> Option<&Track> {
        self.queue.previous()
    }

    pub fn on_track_ended(&mut self) -> Option<&Track> {
        self.queue.on_track_ended()
    }

    pub fn change_to(&mut self, index: usize) -> Option<&Track> {
        self.queue.change_to(index)
    }

    pub fn toggle_pause(&mut self) -> PlaybackState {
        self.queue.toggle_pause()
    }

    pub fn stop(&mut self) {
        self.queue.stop();
    }

    /// Saved edits, or none when the store is unreadable.
    fn load_edits(&self) -> EditOverrides {
        match self.edits.load_all() {
            Ok(edits) => edits,
            Err(e) => {
                tracing::warn!(error = %e, "saved edits unavailable, building without them");
                EditOverrides::new()
            }
        }
    }

    fn builder<'a>(&'a self, edits: &'a EditOverrides) -> CatalogBuilder<'a> {
        CatalogBuilder::new(
            &self.settings.library,
            self.reader.as_ref(),
            edits,
            self.urls.clone(),
        )
        .workers(self.settings.scan.workers)
    }

    fn build_snapshot(&self, root: &Path) -> Result<Catalog> {
        let edits = self.load_edits();
        self.builder(&edits).build(root, self.generation + 1)
    }

    fn swap_for(&self, root: &Path) -> QueueOnSwap {
        if self.root.as_deref() == Some(root) {
            QueueOnSwap::Follow
        } else {
            QueueOnSwap::Clear
        }
    }

    /// Swap `next` in, settle the queue, then release the old snapshot.
    fn install(&mut self, next: Catalog, swap: QueueOnSwap) {
        self.generation = next.generation();
        let previous = std::mem::replace(&mut self.catalog, next);
        match swap {
            QueueOnSwap::Follow => self.queue.rebind(&self.catalog),
            QueueOnSwap::Clear => self.queue.clear(),
        }
        tracing::debug!(
            from = previous.generation(),
            to = self.generation,
            "catalog swapped"
        );
        drop(previous);
    }
}
