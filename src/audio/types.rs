//! Commands, events and shared state of the audio thread.

use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCmd {
    /// Start playing the given locator, replacing whatever is playing.
    Play(String),
    /// Stop playback immediately.
    Stop,
    /// Toggle pause/resume.
    TogglePause,
    /// Stop and shut the audio thread down.
    Quit,
}

/// Reported back by the audio thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    Started(String),
    /// The current source drained on its own.
    Ended,
    Failed(String),
}

#[derive(Debug, Clone, Default)]
/// Runtime playback information shared with the host.
pub struct PlaybackInfo {
    /// Locator being played, if any.
    pub url: Option<String>,
    pub elapsed: Duration,
    pub playing: bool,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
