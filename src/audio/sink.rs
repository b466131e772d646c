//! Opening object URLs as decodable `rodio` sources.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::PathBuf;
use std::sync::Arc;

use rodio::{Decoder, OutputStream, Sink};
use thiserror::Error;

use crate::library::{ObjectSource, ObjectUrls};

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("{0} is not a live object URL")]
    UnknownLocator(String),
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot decode {locator}: {message}")]
    Decode { locator: String, message: String },
    #[error("no audio output device: {0}")]
    NoDevice(String),
}

/// Audio bytes behind an object URL, either on disk or in memory.
pub(super) enum AudioReader {
    File(BufReader<File>),
    Memory(Cursor<Arc<[u8]>>),
}

impl Read for AudioReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::File(r) => r.read(buf),
            Self::Memory(r) => r.read(buf),
        }
    }
}

impl Seek for AudioReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Self::File(r) => r.seek(pos),
            Self::Memory(r) => r.seek(pos),
        }
    }
}

/// Resolve `url` through the table and open what it points at.
///
/// Network locators are never in the table and fail as unknown.
pub(super) fn open_reader(urls: &ObjectUrls, url: &str) -> Result<AudioReader, AudioError> {
    match urls.resolve(url) {
        Some(ObjectSource::File(path)) => match File::open(&path) {
            Ok(file) => Ok(AudioReader::File(BufReader::new(file))),
            Err(source) => Err(AudioError::Open { path, source }),
        },
        Some(ObjectSource::Bytes { data, .. }) => Ok(AudioReader::Memory(Cursor::new(data))),
        None => Err(AudioError::UnknownLocator(url.to_string())),
    }
}

pub(super) fn decode(urls: &ObjectUrls, url: &str) -> Result<Decoder<AudioReader>, AudioError> {
    let reader = open_reader(urls, url)?;
    Decoder::new(reader).map_err(|e| AudioError::Decode {
        locator: url.to_string(),
        message: e.to_string(),
    })
}

/// Create a paused `Sink` for `url` on `stream`.
pub(super) fn create_sink(
    stream: &OutputStream,
    urls: &ObjectUrls,
    url: &str,
) -> Result<Sink, AudioError> {
    let source = decode(urls, url)?;
    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}
