use std::io::Read;
use std::sync::Arc;

use super::sink::{AudioReader, decode, open_reader};
use super::*;
use crate::library::{ObjectSource, ObjectUrls, UrlLease};
use tempfile::tempdir;

fn read_all(mut reader: AudioReader) -> Vec<u8> {
    let mut out = Vec::new();
    reader.read_to_end(&mut out).unwrap();
    out
}

#[test]
fn file_locators_open_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.mp3");
    std::fs::write(&path, b"abc").unwrap();

    let urls = ObjectUrls::new();
    let mut lease = UrlLease::new(urls.clone(), 1);
    let url = lease.create(ObjectSource::File(path));

    let reader = open_reader(&urls, &url).unwrap();
    assert!(matches!(reader, AudioReader::File(_)));
    assert_eq!(read_all(reader), b"abc");
}

#[test]
fn byte_locators_read_from_memory() {
    let urls = ObjectUrls::new();
    let mut lease = UrlLease::new(urls.clone(), 1);
    let data: Arc<[u8]> = Arc::from(&b"xyz"[..]);
    let url = lease.create(ObjectSource::Bytes {
        data,
        mime_type: "audio/mpeg".into(),
    });

    assert_eq!(read_all(open_reader(&urls, &url).unwrap()), b"xyz");
}

#[test]
fn revoked_and_network_locators_are_unknown() {
    let urls = ObjectUrls::new();
    let url = {
        let mut lease = UrlLease::new(urls.clone(), 1);
        lease.create(ObjectSource::File("/nowhere.mp3".into()))
    };

    assert!(matches!(
        open_reader(&urls, &url),
        Err(AudioError::UnknownLocator(u)) if u == url
    ));
    assert!(matches!(
        open_reader(&urls, "https://music.example/a.mp3"),
        Err(AudioError::UnknownLocator(_))
    ));
}

#[test]
fn missing_file_is_an_open_error() {
    let dir = tempdir().unwrap();
    let urls = ObjectUrls::new();
    let mut lease = UrlLease::new(urls.clone(), 1);
    let url = lease.create(ObjectSource::File(dir.path().join("gone.mp3")));

    assert!(matches!(open_reader(&urls, &url), Err(AudioError::Open { .. })));
}

#[test]
fn garbage_bytes_fail_to_decode() {
    let urls = ObjectUrls::new();
    let mut lease = UrlLease::new(urls.clone(), 1);
    let url = lease.create(ObjectSource::Bytes {
        data: Arc::from(&b"definitely not audio"[..]),
        mime_type: "audio/mpeg".into(),
    });

    match decode(&urls, &url) {
        Err(AudioError::Decode { locator, .. }) => assert_eq!(locator, url),
        Err(other) => panic!("expected a decode error, got {other}"),
        Ok(_) => panic!("garbage decoded as audio"),
    }
}

#[test]
fn playback_info_starts_idle() {
    let info = PlaybackInfo::default();
    assert_eq!(info.url, None);
    assert!(!info.playing);
}
