//! Test helpers: a text-based tag format so folder trees can be built
//! without real audio fixtures.

use std::fs;
use std::path::Path;

use super::metadata::{EmbeddedPicture, RawTags, TagError, TagReader};

const MAGIC: &str = "TAGS\n";

/// Reads files written by [`write_tagged`]; anything else fails to parse.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TextTagReader;

impl TagReader for TextTagReader {
    fn read_tags(&self, bytes: &[u8]) -> Result<RawTags, TagError> {
        let text = std::str::from_utf8(bytes)
            .ok()
            .and_then(|t| t.strip_prefix(MAGIC))
            .ok_or_else(|| TagError::Io(std::io::Error::other("no tag block")))?;

        let mut tags = RawTags::default();
        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.to_string();
            match key {
                "title" => tags.title = Some(value),
                "artist" => tags.artist = Some(value),
                "album" => tags.album = Some(value),
                "year" => tags.year = value.parse().ok(),
                "picture" => {
                    let (mime_type, data) = value.split_once(':').unwrap_or(("image/jpeg", value.as_str()));
                    tags.pictures.push(EmbeddedPicture {
                        data: data.as_bytes().to_vec(),
                        mime_type: mime_type.to_string(),
                    });
                }
                _ => {}
            }
        }
        Ok(tags)
    }
}

fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
}

/// Write `rel` under `root` carrying the given tags.
pub(crate) fn write_tagged(root: &Path, rel: &str, fields: &[(&str, &str)]) {
    let path = root.join(rel);
    ensure_parent(&path);
    let mut body = String::from(MAGIC);
    for (k, v) in fields {
        body.push_str(&format!("{k}={v}\n"));
    }
    fs::write(path, body).unwrap();
}

/// Write `rel` under `root` with content no reader can parse.
pub(crate) fn write_untagged(root: &Path, rel: &str) {
    let path = root.join(rel);
    ensure_parent(&path);
    fs::write(path, b"\xff\xfbnot really audio").unwrap();
}
