//! The active track list and its cursor.
//!
//! Manual `next`/`previous` wrap around the album; auto-advance on track
//! end stops after the last track instead of looping.

use crate::error::StaleTrackReference;
use crate::library::{Catalog, Track};

/// Playback sub-state of a loaded queue.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

#[derive(Debug, Default, Clone)]
pub struct PlaybackQueue {
    active: Vec<Track>,
    cursor: Option<usize>,
    playback: PlaybackState,
}

impl PlaybackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` once a track has been selected (the `Loaded` state).
    pub fn is_loaded(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn active(&self) -> &[Track] {
        &self.active
    }

    pub fn current(&self) -> Option<&Track> {
        self.cursor.and_then(|i| self.active.get(i))
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    fn play_at(&mut self, index: usize) -> Option<&Track> {
        self.cursor = Some(index);
        self.playback = PlaybackState::Playing;
        self.active.get(index)
    }

    /// Load the album containing `track_id` and point the cursor at it.
    ///
    /// A track missing from `catalog` leaves the queue untouched.
    pub fn select_track(
        &mut self,
        catalog: &Catalog,
        track_id: &str,
    ) -> Result<&Track, StaleTrackReference> {
        let Some((album, index)) = catalog.locate(track_id) else {
            tracing::warn!(track = track_id, "ignoring selection of unknown track");
            return Err(StaleTrackReference(track_id.to_string()));
        };
        self.active = album.songs.clone();
        self.play_at(index)
            .ok_or_else(|| StaleTrackReference(track_id.to_string()))
    }

    /// Skip forward, wrapping to the first track.
    pub fn next(&mut self) -> Option<&Track> {
        let cursor = self.cursor?;
        let len = self.active.len();
        self.play_at((cursor + 1) % len)
    }

    /// Skip backward, wrapping to the last track.
    pub fn previous(&mut self) -> Option<&Track> {
        let cursor = self.cursor?;
        let len = self.active.len();
        self.play_at((cursor + len - 1) % len)
    }

    /// The current track finished on its own.
    ///
    /// Advances when a later track exists; otherwise playback stops with the
    /// cursor left on the last track. Returns the track to play next, if any.
    pub fn on_track_ended(&mut self) -> Option<&Track> {
        let cursor = self.cursor?;
        if cursor + 1 < self.active.len() {
            self.play_at(cursor + 1)
        } else {
            self.playback = PlaybackState::Stopped;
            None
        }
    }

    /// Jump to `index`; out-of-range indices are ignored.
    pub fn change_to(&mut self, index: usize) -> Option<&Track> {
        if self.cursor.is_none() || index >= self.active.len() {
            return None;
        }
        self.play_at(index)
    }

    /// Flip between playing and paused; a stopped queue stays stopped.
    pub fn toggle_pause(&mut self) -> PlaybackState {
        self.playback = match self.playback {
            PlaybackState::Playing => PlaybackState::Paused,
            PlaybackState::Paused => PlaybackState::Playing,
            PlaybackState::Stopped => PlaybackState::Stopped,
        };
        self.playback
    }

    pub fn stop(&mut self) {
        self.playback = PlaybackState::Stopped;
    }

    /// Back to `Idle`.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Re-point the queue at a freshly swapped catalog.
    ///
    /// The current track is looked up by its source, since ids shift when
    /// files come and go. If it no longer exists the queue returns to `Idle`.
    pub fn rebind(&mut self, catalog: &Catalog) {
        let Some(current) = self.current().map(|t| t.source.clone()) else {
            self.clear();
            return;
        };
        match catalog.locate_source(&current) {
            Some((album, index)) => {
                self.active = album.songs.clone();
                self.cursor = Some(index);
            }
            None => {
                tracing::info!(source = ?current, "current track vanished after rebuild, clearing queue");
                self.clear();
            }
        }
    }
}
