use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

use super::json::JsonFile;

/// User corrections for one track; unset fields keep the discovered value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "coverUrl")]
    pub cover_url: Option<String>,
}

impl EditOverride {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.artist.is_none() && self.album.is_none() && self.cover_url.is_none()
    }
}

/// All saved overrides, keyed by track id.
pub type EditOverrides = BTreeMap<String, EditOverride>;

/// Persists [`EditOverride`]s independently of any catalog build.
#[derive(Debug, Clone)]
pub struct EditStore {
    file: JsonFile,
}

impl EditStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            file: JsonFile::new(data_dir.join("edits.json")),
        }
    }

    pub fn load_all(&self) -> Result<EditOverrides, StoreError> {
        Ok(self.file.read()?.unwrap_or_default())
    }

    pub fn get(&self, track_id: &str) -> Result<Option<EditOverride>, StoreError> {
        Ok(self.load_all()?.remove(track_id))
    }

    /// Store `edit` for `track_id`, replacing any earlier record.
    pub fn save(&self, track_id: &str, edit: EditOverride) -> Result<(), StoreError> {
        let mut all = self.load_all()?;
        all.insert(track_id.to_string(), edit);
        self.file.write(&all)?;
        tracing::info!(track = track_id, store = %self.file.path().display(), "saved track edit");
        Ok(())
    }
}
