//! Local music catalog ingestion and playback session.

pub mod audio;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod library;
pub mod session;
pub mod store;

pub use error::{Error, Result, StaleTrackReference, StoreError};
