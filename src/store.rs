//! Persistent stores: the granted music folder and per-track metadata edits.
//!
//! Both stores are small JSON documents in the data directory with
//! last-write-wins semantics.

mod edits;
mod folder;
mod json;

pub use edits::{EditOverride, EditOverrides, EditStore};
pub use folder::{
    FolderHandle, FolderStore, PermissionPrompt, PermissionState, PromptOutcome, Verification,
    query_read_permission, verify_read_permission, verify_read_permission_with,
};
