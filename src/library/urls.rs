//! Session-scoped object URLs.
//!
//! Tracks and albums refer to their audio and artwork through opaque
//! `blob:` locators. Each locator is minted into a shared table and owned
//! by the catalog snapshot that created it; dropping the snapshot's
//! [`UrlLease`] revokes every locator it minted.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

/// What a locator resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectSource {
    File(PathBuf),
    Bytes { data: Arc<[u8]>, mime_type: String },
}

#[derive(Default)]
struct Table {
    next: u64,
    live: HashMap<String, ObjectSource>,
    revoked: u64,
}

/// Shared table of live object URLs.
#[derive(Default)]
pub struct ObjectUrls {
    table: Mutex<Table>,
}

impl fmt::Debug for ObjectUrls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectUrls")
            .field("live", &self.live_count())
            .finish()
    }
}

impl ObjectUrls {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn table(&self) -> MutexGuard<'_, Table> {
        // The table holds plain data, a poisoned lock leaves it consistent.
        self.table.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn mint(&self, generation: u64, source: ObjectSource) -> String {
        let mut table = self.table();
        let url = format!("blob:gmusic/{generation}/{}", table.next);
        table.next += 1;
        table.live.insert(url.clone(), source);
        url
    }

    /// Resolve a live locator. Revoked or foreign locators yield `None`.
    pub fn resolve(&self, url: &str) -> Option<ObjectSource> {
        self.table().live.get(url).cloned()
    }

    /// Revoke one locator; returns whether it was live.
    fn revoke(&self, url: &str) -> bool {
        let mut table = self.table();
        let removed = table.live.remove(url).is_some();
        if removed {
            table.revoked += 1;
        }
        removed
    }

    pub fn live_count(&self) -> usize {
        self.table().live.len()
    }

    /// Total number of locators revoked over the table's lifetime.
    pub fn revoked_count(&self) -> u64 {
        self.table().revoked
    }
}

/// The set of locators minted for one catalog generation.
pub struct UrlLease {
    urls: Arc<ObjectUrls>,
    generation: u64,
    owned: Vec<String>,
}

impl fmt::Debug for UrlLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlLease")
            .field("generation", &self.generation)
            .field("owned", &self.owned.len())
            .finish()
    }
}

impl UrlLease {
    pub fn new(urls: Arc<ObjectUrls>, generation: u64) -> Self {
        Self {
            urls,
            generation,
            owned: Vec::new(),
        }
    }

    pub fn create(&mut self, source: ObjectSource) -> String {
        let url = self.urls.mint(self.generation, source);
        self.owned.push(url.clone());
        url
    }
}

impl Drop for UrlLease {
    fn drop(&mut self) {
        let mut released = 0usize;
        for url in self.owned.drain(..) {
            if self.urls.revoke(&url) {
                released += 1;
            }
        }
        tracing::debug!(generation = self.generation, released, "released object urls");
    }
}
