use super::load::{default_config_path, default_data_dir, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_gmusic_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("GMUSIC_CONFIG_PATH", "/tmp/gmusic-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/gmusic-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("gmusic")
            .join("config.toml")
    );
}

#[test]
fn default_data_dir_falls_back_to_home_local_share() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_DATA_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_data_dir().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".local")
            .join("share")
            .join("gmusic")
    );
}

#[test]
fn explicit_data_dir_wins_over_default() {
    let mut s = Settings::default();
    s.storage.data_dir = Some("/srv/gmusic".into());
    assert_eq!(s.data_dir().unwrap(), std::path::PathBuf::from("/srv/gmusic"));
}

#[test]
fn defaults_match_documented_lists_and_placeholders() {
    let s = Settings::default();
    assert_eq!(
        s.library.extensions,
        vec!["mp3", "ogg", "wav", "flac", "m4a", "aac", "webm"]
    );
    assert_eq!(
        s.library.cover_names,
        vec!["cover", "folder", "front", "album", "artwork", "picture"]
    );
    assert_eq!(s.library.image_extensions, vec!["jpg", "jpeg", "png", "webp"]);
    assert_eq!(s.library.unknown_artist, "Unknown");
    assert_eq!(s.library.unknown_album, "Album");
    assert_eq!(s.library.cover_scope, CoverScope::Root);
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_empty_extensions_and_placeholders() {
    let mut s = Settings::default();
    s.library.extensions = vec!["  ".into()];
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.library.unknown_album = String::new();
    assert!(s.validate().is_err());
}

#[test]
fn settings_load_from_config_file_and_parse_cover_scope_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[library]
extensions = ["mp3"]
cover_names = ["cover"]
unknown_artist = "Desconocido"
unknown_album = "Álbum"
follow_links = false
cover_scope = "album-folder"

[scan]
workers = 2

[storage]
data_dir = "/tmp/gmusic-data"

[logging]
filter = "gmusic=debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("GMUSIC_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("GMUSIC__SCAN__WORKERS");

    let s = Settings::load().unwrap();
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert_eq!(s.library.cover_names, vec!["cover".to_string()]);
    assert_eq!(s.library.unknown_artist, "Desconocido");
    assert_eq!(s.library.unknown_album, "Álbum");
    assert!(!s.library.follow_links);
    assert_eq!(s.library.cover_scope, CoverScope::TrackFolder);
    // Untouched keys keep their defaults.
    assert_eq!(s.library.image_extensions.len(), 4);
    assert_eq!(s.scan.workers, 2);
    assert_eq!(
        s.storage.data_dir,
        Some(std::path::PathBuf::from("/tmp/gmusic-data"))
    );
    assert_eq!(s.logging.filter, "gmusic=debug");
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[scan]
workers = 8
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("GMUSIC_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("GMUSIC__SCAN__WORKERS", "3");

    let s = Settings::load().unwrap();
    assert_eq!(s.scan.workers, 3);
}

#[test]
fn to_toml_round_trips_through_loader_shape() {
    let s = Settings::default();
    let text = s.to_toml().unwrap();
    assert!(text.contains("[library]"));
    assert!(text.contains("cover_scope = \"root\""));
    let back: Settings = toml::from_str(&text).unwrap();
    assert_eq!(back.library.extensions, s.library.extensions);
}
