//! Audio output on a dedicated `rodio` thread.
//!
//! The thread resolves object URLs through the shared table, plays one
//! source at a time and reports back over a channel; deciding what plays
//! next is left to the session's queue.

mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use sink::AudioError;
pub use types::{AudioCmd, AudioEvent, PlaybackHandle, PlaybackInfo};

#[cfg(test)]
mod tests;
