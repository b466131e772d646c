use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::Error;

/// Lower-cased extension allow-list, tolerant of leading dots and padding.
pub(crate) fn normalized_list(exts: &[String]) -> Vec<String> {
    exts.iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

pub(crate) fn has_extension_in(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

/// Recursively enumerate the audio files below `root`.
///
/// Depth-first, entries sorted by file name so that repeated scans of an
/// unchanged tree yield the same order. Every directory is descended. When
/// links are followed `walkdir` reports symlink loops as errors; those
/// entries are logged and skipped like any other unreadable entry.
///
/// Fails only when `root` itself cannot be listed.
pub fn discover(root: &Path, settings: &LibrarySettings) -> Result<Vec<PathBuf>, Error> {
    fs::read_dir(root).map_err(|source| Error::RootEnumeration {
        path: root.to_path_buf(),
        source,
    })?;

    let exts = normalized_list(&settings.extensions);
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(settings.follow_links)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_file() && has_extension_in(entry.path(), &exts) {
            files.push(entry.into_path());
        }
    }

    tracing::debug!(root = %root.display(), files = files.len(), "discovery complete");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn names(files: &[PathBuf], root: &Path) -> Vec<String> {
        files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn has_extension_in_matches_configured_extensions_case_insensitive() {
        let exts = normalized_list(&LibrarySettings::default().extensions);
        assert!(has_extension_in(Path::new("/tmp/a.mp3"), &exts));
        assert!(has_extension_in(Path::new("/tmp/a.MP3"), &exts));
        assert!(has_extension_in(Path::new("/tmp/a.flac"), &exts));
        assert!(has_extension_in(Path::new("/tmp/a.M4a"), &exts));
        assert!(has_extension_in(Path::new("/tmp/a.webm"), &exts));
        assert!(!has_extension_in(Path::new("/tmp/a.txt"), &exts));
        assert!(!has_extension_in(Path::new("/tmp/a"), &exts));
    }

    #[test]
    fn normalized_list_strips_dots_and_blanks() {
        let exts = normalized_list(&[" .MP3 ".into(), "".into(), "ogg".into()]);
        assert_eq!(exts, vec!["mp3", "ogg"]);
    }

    #[test]
    fn discover_filters_non_audio_and_descends_every_directory() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("B")).unwrap();
        fs::create_dir_all(root.join(".hidden/deep")).unwrap();
        fs::write(root.join("b.MP3"), b"x").unwrap();
        fs::write(root.join("A.ogg"), b"x").unwrap();
        fs::write(root.join("c.txt"), b"x").unwrap();
        fs::write(root.join("cover.jpg"), b"x").unwrap();
        fs::write(root.join("B/two.flac"), b"x").unwrap();
        fs::write(root.join(".hidden/deep/x.wav"), b"x").unwrap();

        let files = discover(root, &LibrarySettings::default()).unwrap();
        assert_eq!(
            names(&files, root),
            vec![".hidden/deep/x.wav", "A.ogg", "B/two.flac", "b.MP3"]
        );
    }

    #[test]
    fn discover_is_deterministic_across_runs() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        for d in ["z", "a", "m/n"] {
            fs::create_dir_all(root.join(d)).unwrap();
            fs::write(root.join(d).join("t.mp3"), b"x").unwrap();
        }
        let settings = LibrarySettings::default();
        assert_eq!(
            discover(root, &settings).unwrap(),
            discover(root, &settings).unwrap()
        );
    }

    #[test]
    fn discover_fails_when_root_is_missing() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = discover(&missing, &LibrarySettings::default()).unwrap_err();
        assert!(matches!(err, Error::RootEnumeration { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn discover_survives_symlink_cycles() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("a/song.mp3"), b"x").unwrap();
        std::os::unix::fs::symlink(root, root.join("a/loop")).unwrap();

        let files = discover(root, &LibrarySettings::default()).unwrap();
        assert_eq!(names(&files, root), vec!["a/song.mp3"]);
    }
}
