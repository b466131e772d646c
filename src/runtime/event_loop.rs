//! Drives playback: terminal controls in, audio events out, with the
//! session's queue deciding what plays next.

use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use anyhow::{Result, anyhow, bail};
use gmusic::audio::{AudioCmd, AudioEvent, AudioPlayer, PlaybackInfo};
use gmusic::library::Track;
use gmusic::session::Session;

const POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCmd {
    Next,
    Prev,
    PlayPause,
    Stop,
    Jump(usize),
    Status,
    Quit,
}

fn parse_control(line: &str) -> Option<ControlCmd> {
    let line = line.trim();
    match line {
        "n" | "next" => Some(ControlCmd::Next),
        "p" | "prev" => Some(ControlCmd::Prev),
        "" | "pause" => Some(ControlCmd::PlayPause),
        "s" | "stop" => Some(ControlCmd::Stop),
        "i" | "status" => Some(ControlCmd::Status),
        "q" | "quit" => Some(ControlCmd::Quit),
        // One-based on the terminal, zero-based in the queue.
        n => n
            .parse::<usize>()
            .ok()
            .and_then(|i| i.checked_sub(1))
            .map(ControlCmd::Jump),
    }
}

/// Read control lines from stdin until it closes.
fn spawn_stdin_controls(tx: Sender<ControlCmd>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match parse_control(&line) {
                Some(cmd) => {
                    if tx.send(cmd).is_err() {
                        break;
                    }
                }
                None => eprintln!("controls: n, p, Enter (pause), s, i, <number>, q"),
            }
        }
    });
}

fn start(player: &AudioPlayer, track: &Track) -> Result<()> {
    println!("Now playing: {} - {} ({})", track.title, track.artist, track.album);
    player
        .play(&track.playable_url)
        .map_err(|_| anyhow!("audio thread is not running"))
}

/// `m:ss` for anything under an hour.
fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// One line describing what the audio thread is doing right now.
fn status_line(session: &Session, info: &PlaybackInfo) -> String {
    let (Some(track), Some(_)) = (session.queue().current(), info.url.as_ref()) else {
        return "Nothing playing.".to_string();
    };
    let position = session.queue().cursor().map_or(0, |i| i + 1);
    format!(
        "[{}/{}] {} - {} {} ({})",
        position,
        session.queue().active().len(),
        track.title,
        track.artist,
        format_elapsed(info.elapsed),
        if info.playing { "playing" } else { "paused" },
    )
}

/// Play `track_id` and let the queue advance until the album ends or the
/// user quits.
pub fn run(session: &mut Session, track_id: &str) -> Result<()> {
    let player = AudioPlayer::new(session.urls());
    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    spawn_stdin_controls(control_tx);

    let track = session.select_track(track_id)?;
    start(&player, track)?;
    drive(session, &player, &control_rx)
}

fn drive(session: &mut Session, player: &AudioPlayer, controls: &Receiver<ControlCmd>) -> Result<()> {
    loop {
        while let Ok(cmd) = controls.try_recv() {
            match cmd {
                ControlCmd::Quit => {
                    session.stop();
                    let _ = player.send(AudioCmd::Stop);
                    return Ok(());
                }
                ControlCmd::Next => {
                    if let Some(track) = session.next() {
                        start(player, track)?;
                    }
                }
                ControlCmd::Prev => {
                    if let Some(track) = session.previous() {
                        start(player, track)?;
                    }
                }
                ControlCmd::Jump(index) => match session.change_to(index) {
                    Some(track) => start(player, track)?,
                    None => tracing::info!(index = index + 1, "no such track in the album"),
                },
                ControlCmd::PlayPause => {
                    let state = session.toggle_pause();
                    let _ = player.send(AudioCmd::TogglePause);
                    tracing::debug!(?state, "toggled pause");
                }
                ControlCmd::Stop => {
                    session.stop();
                    let _ = player.send(AudioCmd::Stop);
                }
                ControlCmd::Status => {
                    let handle = player.playback_handle();
                    let info = handle.lock().map(|i| i.clone()).unwrap_or_default();
                    println!("{}", status_line(session, &info));
                }
            }
        }

        match player.next_event(POLL) {
            Some(AudioEvent::Ended) => match session.on_track_ended() {
                Some(track) => start(player, track)?,
                None => {
                    println!("End of album.");
                    return Ok(());
                }
            },
            Some(AudioEvent::Failed(msg)) => {
                session.stop();
                bail!("playback failed: {msg}");
            }
            Some(AudioEvent::Started(url)) => tracing::debug!(%url, "audio started"),
            None if player.is_finished() => bail!("audio thread exited"),
            None => {}
        }
    }
}
