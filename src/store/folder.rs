use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::capabilities::Capabilities;
use crate::error::StoreError;

use super::json::JsonFile;

/// Reference to the folder the user granted access to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderHandle {
    pub root: PathBuf,
}

impl FolderHandle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Display name: the folder's last path component.
    pub fn name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string())
    }
}

/// Persists the single last-granted [`FolderHandle`].
#[derive(Debug, Clone)]
pub struct FolderStore {
    file: JsonFile,
}

impl FolderStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            file: JsonFile::new(data_dir.join("folder.json")),
        }
    }

    /// Overwrite the saved folder.
    pub fn save(&self, handle: &FolderHandle) -> Result<(), StoreError> {
        self.file.write(handle)?;
        tracing::info!(folder = %handle.root.display(), "saved music folder");
        Ok(())
    }

    /// The last saved folder, if any.
    pub fn load(&self) -> Result<Option<FolderHandle>, StoreError> {
        self.file.read()
    }
}

/// Current read-access state of a folder.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    /// Access is refused but the user may be able to grant it.
    Prompt,
    /// The folder cannot be accessed at all (missing, not a directory).
    Denied,
}

/// Answer from an interactive permission request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Granted,
    Denied,
    Cancelled,
}

/// Asks the user to (re)grant read access to a folder.
pub trait PermissionPrompt {
    fn request_read(&self, handle: &FolderHandle) -> PromptOutcome;
}

/// Result of [`verify_read_permission`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Verification {
    Granted,
    Denied,
    Cancelled,
}

pub fn query_read_permission(handle: &FolderHandle) -> PermissionState {
    match fs::read_dir(&handle.root) {
        Ok(_) => PermissionState::Granted,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => PermissionState::Prompt,
        Err(_) => PermissionState::Denied,
    }
}

/// Confirm read access before reusing a saved folder.
///
/// Without permission introspection access is assumed (fail open).
/// Otherwise a refused folder is offered to `prompt` once and re-queried.
pub fn verify_read_permission(
    handle: &FolderHandle,
    caps: &Capabilities,
    prompt: &dyn PermissionPrompt,
) -> Verification {
    verify_read_permission_with(handle, caps, prompt, query_read_permission)
}

/// [`verify_read_permission`] with a caller-supplied access check.
pub fn verify_read_permission_with(
    handle: &FolderHandle,
    caps: &Capabilities,
    prompt: &dyn PermissionPrompt,
    query: impl Fn(&FolderHandle) -> PermissionState,
) -> Verification {
    if !caps.can_check_permission {
        return Verification::Granted;
    }

    match query(handle) {
        PermissionState::Granted => Verification::Granted,
        PermissionState::Denied => Verification::Denied,
        PermissionState::Prompt => match prompt.request_read(handle) {
            PromptOutcome::Cancelled => Verification::Cancelled,
            PromptOutcome::Denied => Verification::Denied,
            PromptOutcome::Granted => match query(handle) {
                PermissionState::Granted => Verification::Granted,
                _ => Verification::Denied,
            },
        },
    }
}
