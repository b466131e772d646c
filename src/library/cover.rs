use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{CoverScope, LibrarySettings};

use super::metadata::EmbeddedPicture;
use super::scan::{has_extension_in, normalized_list};
use super::urls::ObjectSource;

/// Whether `path` looks like album artwork: an image extension and a
/// base name on the cover-name list, both compared case-insensitively.
///
/// The base name ends at the first dot, so `cover.front.jpg` counts as `cover`.
fn is_cover_file(path: &Path, names: &[String], image_exts: &[String]) -> bool {
    if !has_extension_in(path, image_exts) {
        return false;
    }
    path.file_name()
        .and_then(|s| s.to_str())
        .and_then(|name| name.split('.').next())
        .map(|base| {
            let base = base.to_ascii_lowercase();
            names.iter().any(|n| n == &base)
        })
        .unwrap_or(false)
}

/// First artwork file directly inside `dir`, in file-name order.
pub fn find_cover_in(dir: &Path, settings: &LibrarySettings) -> Option<PathBuf> {
    let names = normalized_list(&settings.cover_names);
    let image_exts = normalized_list(&settings.image_extensions);

    let mut entries: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(rd) => rd
            .filter_map(Result::ok)
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|e| e.path())
            .collect(),
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "cannot list folder for artwork");
            return None;
        }
    };
    entries.sort();

    entries
        .into_iter()
        .find(|p| is_cover_file(p, &names, &image_exts))
}

/// Resolves artwork files for albums without embedded pictures.
///
/// The root folder is listed at most once per build.
pub struct CoverFinder<'a> {
    root: &'a Path,
    settings: &'a LibrarySettings,
    root_cover: Option<Option<PathBuf>>,
}

impl<'a> CoverFinder<'a> {
    pub fn new(root: &'a Path, settings: &'a LibrarySettings) -> Self {
        Self {
            root,
            settings,
            root_cover: None,
        }
    }

    fn root_cover(&mut self) -> Option<PathBuf> {
        let (root, settings) = (self.root, self.settings);
        self.root_cover
            .get_or_insert_with(|| find_cover_in(root, settings))
            .clone()
    }

    /// Artwork file for an album first seen on `track_path`.
    pub fn file_for(&mut self, track_path: &Path) -> Option<PathBuf> {
        if self.settings.cover_scope == CoverScope::TrackFolder {
            if let Some(parent) = track_path.parent().filter(|p| *p != self.root) {
                if let Some(found) = find_cover_in(parent, self.settings) {
                    return Some(found);
                }
            }
        }
        self.root_cover()
    }

    /// Full resolution chain: embedded picture, else artwork file, else none.
    pub fn resolve(
        &mut self,
        embedded: Option<EmbeddedPicture>,
        track_path: &Path,
    ) -> Option<ObjectSource> {
        if let Some(pic) = embedded {
            tracing::debug!(track = %track_path.display(), "using embedded artwork");
            return Some(ObjectSource::Bytes {
                data: pic.data.into(),
                mime_type: pic.mime_type,
            });
        }
        let found = self.file_for(track_path);
        if let Some(path) = &found {
            tracing::debug!(cover = %path.display(), "using artwork file");
        }
        found.map(ObjectSource::File)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn cover_file_requires_known_base_name_and_image_extension() {
        let s = LibrarySettings::default();
        let names = normalized_list(&s.cover_names);
        let exts = normalized_list(&s.image_extensions);
        assert!(is_cover_file(Path::new("/m/Cover.JPG"), &names, &exts));
        assert!(is_cover_file(Path::new("/m/folder.webp"), &names, &exts));
        assert!(!is_cover_file(Path::new("/m/cover.gif"), &names, &exts));
        assert!(!is_cover_file(Path::new("/m/back.jpg"), &names, &exts));
        assert!(is_cover_file(Path::new("/m/cover.front.jpg"), &names, &exts));
        assert!(is_cover_file(Path::new("/m/Folder.Large.PNG"), &names, &exts));
        assert!(!is_cover_file(Path::new("/m/back.cover.jpg"), &names, &exts));
        assert!(!is_cover_file(Path::new("/m/.cover.jpg"), &names, &exts));
    }

    #[test]
    fn find_cover_in_returns_first_match_in_name_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("front.png"), b"x").unwrap();
        fs::write(dir.path().join("artwork.jpg"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        let found = find_cover_in(dir.path(), &LibrarySettings::default()).unwrap();
        assert_eq!(found.file_name().unwrap(), "artwork.jpg");
    }

    #[test]
    fn embedded_picture_wins_over_cover_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("cover.jpg"), b"x").unwrap();
        let settings = LibrarySettings::default();
        let mut finder = CoverFinder::new(dir.path(), &settings);
        let pic = EmbeddedPicture { data: vec![9, 9], mime_type: "image/png".into() };
        let resolved = finder.resolve(Some(pic), &dir.path().join("a.mp3"));
        match resolved {
            Some(ObjectSource::Bytes { data, mime_type }) => {
                assert_eq!(&*data, &[9, 9]);
                assert_eq!(mime_type, "image/png");
            }
            other => panic!("expected embedded artwork, got {other:?}"),
        }
    }

    #[test]
    fn root_scope_ignores_subfolder_artwork() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("A")).unwrap();
        fs::write(dir.path().join("A/cover.jpg"), b"x").unwrap();
        let settings = LibrarySettings::default();
        let mut finder = CoverFinder::new(dir.path(), &settings);
        assert_eq!(finder.resolve(None, &dir.path().join("A/s.mp3")), None);
    }

    #[test]
    fn track_folder_scope_prefers_track_folder_then_root() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("A")).unwrap();
        fs::create_dir_all(dir.path().join("B")).unwrap();
        fs::write(dir.path().join("A/folder.png"), b"x").unwrap();
        fs::write(dir.path().join("cover.jpg"), b"x").unwrap();
        let settings = LibrarySettings {
            cover_scope: CoverScope::TrackFolder,
            ..LibrarySettings::default()
        };
        let mut finder = CoverFinder::new(dir.path(), &settings);
        assert_eq!(
            finder.file_for(&dir.path().join("A/s.mp3")),
            Some(dir.path().join("A/folder.png"))
        );
        assert_eq!(
            finder.file_for(&dir.path().join("B/s.mp3")),
            Some(dir.path().join("cover.jpg"))
        );
    }
}
