use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStreamBuilder, Sink};

use crate::library::ObjectUrls;

use super::sink::{AudioError, create_sink};
use super::types::{AudioCmd, AudioEvent, PlaybackHandle};

const TICK: Duration = Duration::from_millis(200);

/// State owned by the audio thread between commands.
struct Playing {
    sink: Option<Sink>,
    paused: bool,
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Playing {
    fn new() -> Self {
        Self {
            sink: None,
            paused: true,
            started_at: None,
            accumulated: Duration::ZERO,
        }
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn start(&mut self, sink: Sink, url: &str, info: &PlaybackHandle) {
        self.stop(info);
        sink.play();
        self.sink = Some(sink);
        self.paused = false;
        self.started_at = Some(Instant::now());
        if let Ok(mut info) = info.lock() {
            info.url = Some(url.to_string());
            info.elapsed = Duration::ZERO;
            info.playing = true;
        }
    }

    fn stop(&mut self, info: &PlaybackHandle) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.paused = true;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        if let Ok(mut info) = info.lock() {
            info.url = None;
            info.elapsed = Duration::ZERO;
            info.playing = false;
        }
    }

    fn toggle_pause(&mut self, info: &PlaybackHandle) {
        let Some(s) = self.sink.as_ref() else {
            return;
        };
        if self.paused {
            s.play();
            self.started_at = Some(Instant::now());
        } else {
            s.pause();
            if let Some(st) = self.started_at.take() {
                self.accumulated += st.elapsed();
            }
        }
        self.paused = !self.paused;
        if let Ok(mut info) = info.lock() {
            info.playing = !self.paused;
        }
    }

    /// `true` once the sink has drained while nominally playing.
    fn drained(&self) -> bool {
        !self.paused && self.sink.as_ref().is_some_and(|s| s.empty())
    }
}

pub(super) fn spawn_audio_thread(
    urls: Arc<ObjectUrls>,
    rx: Receiver<AudioCmd>,
    events: Sender<AudioEvent>,
    playback_info: PlaybackHandle,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                let err = AudioError::NoDevice(e.to_string());
                tracing::error!(error = %err, "audio thread cannot start");
                let _ = events.send(AudioEvent::Failed(err.to_string()));
                return;
            }
        };
        // rodio logs to stderr when the stream is dropped.
        stream.log_on_drop(false);

        let mut state = Playing::new();

        loop {
            match rx.recv_timeout(TICK) {
                Ok(AudioCmd::Play(url)) => match create_sink(&stream, &urls, &url) {
                    Ok(sink) => {
                        tracing::debug!(url = %url, "playing");
                        state.start(sink, &url, &playback_info);
                        let _ = events.send(AudioEvent::Started(url));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "cannot play track");
                        state.stop(&playback_info);
                        let _ = events.send(AudioEvent::Failed(e.to_string()));
                    }
                },
                Ok(AudioCmd::Stop) => state.stop(&playback_info),
                Ok(AudioCmd::TogglePause) => state.toggle_pause(&playback_info),
                Ok(AudioCmd::Quit) => {
                    state.stop(&playback_info);
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {
                    if state.drained() {
                        state.stop(&playback_info);
                        let _ = events.send(AudioEvent::Ended);
                    } else if !state.paused {
                        if let Ok(mut info) = playback_info.lock() {
                            info.elapsed = state.elapsed();
                        }
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        tracing::debug!("audio thread finished");
    })
}
