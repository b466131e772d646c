use std::fs;

use anyhow::{Context, Result, bail};
use gmusic::library::{AlbumMatch, Catalog, Track, parse_records};
use gmusic::session::{ReloadOutcome, Session};
use gmusic::store::EditOverride;

use super::cli::Command;
use super::event_loop;
use super::prompt::{TerminalPicker, TerminalPrompt};

fn describe_edit(edit: &EditOverride) -> String {
    [
        ("title", &edit.title),
        ("artist", &edit.artist),
        ("album", &edit.album),
        ("cover", &edit.cover_url),
    ]
    .iter()
    .filter_map(|(field, value)| value.as_ref().map(|v| format!("{field}={v:?}")))
    .collect::<Vec<_>>()
    .join(", ")
}

pub fn dispatch(session: &mut Session, command: Command) -> Result<()> {
    match command {
        Command::Open { dir: Some(dir) } => {
            let catalog = session
                .open_folder(&dir)
                .with_context(|| format!("opening {}", dir.display()))?;
            print_catalog(catalog);
        }
        Command::Open { dir: None } => match session.select_folder(&TerminalPicker)? {
            Some(catalog) => print_catalog(catalog),
            None => println!("No folder selected."),
        },
        Command::List => {
            reload(session)?;
            print_catalog(session.catalog());
        }
        Command::Search { term } => {
            reload(session)?;
            let matches = session.search(&term);
            if matches.is_empty() {
                println!("Nothing matches \"{term}\".");
            }
            for m in &matches {
                print_match(m);
            }
        }
        Command::Edit {
            track_id,
            title,
            artist,
            album,
            cover_url,
        } => {
            let edit = EditOverride {
                title,
                artist,
                album,
                cover_url,
            };
            if edit.is_empty() {
                bail!("nothing to change: pass --title, --artist, --album or --cover-url");
            }
            let saved = session
                .amend_edit(&track_id, edit)
                .with_context(|| format!("saving edit for track {track_id}"))?;
            println!("Saved edit for track {track_id}: {}", describe_edit(&saved));
        }
        Command::Play { track_id } => {
            reload(session)?;
            event_loop::run(session, &track_id)?;
        }
        Command::Import { file, play } => {
            let json = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let records =
                parse_records(&json).with_context(|| format!("parsing {}", file.display()))?;
            print_catalog(session.load_records(records));
            if let Some(track_id) = play {
                event_loop::run(session, &track_id)?;
            }
        }
        Command::Config => {
            let toml = session
                .settings()
                .to_toml()
                .context("rendering settings as TOML")?;
            print!("{toml}");
        }
    }
    Ok(())
}

fn reload(session: &mut Session) -> Result<()> {
    match session.reload_saved(&TerminalPrompt)? {
        ReloadOutcome::Loaded => Ok(()),
        ReloadOutcome::NoSavedFolder => {
            bail!("no music folder remembered yet; run `gmusic open <dir>` first")
        }
        ReloadOutcome::Cancelled => bail!("permission request cancelled"),
    }
}

fn print_track(track: &Track) {
    match track.year {
        Some(year) => println!("  {:>4}  {} ({year})", track.id, track.title),
        None => println!("  {:>4}  {}", track.id, track.title),
    }
}

fn print_catalog(catalog: &Catalog) {
    if catalog.is_empty() {
        println!("No music found.");
        return;
    }
    for album in catalog.albums() {
        let cover = if album.cover_url.is_some() { " [cover]" } else { "" };
        println!("{} / {}{cover}", album.album, album.artist);
        for track in &album.songs {
            print_track(track);
        }
    }
    println!(
        "{} albums, {} tracks",
        catalog.albums().len(),
        catalog.track_count()
    );
}

fn print_match(m: &AlbumMatch<'_>) {
    println!("{} / {}", m.album.album, m.album.artist);
    for track in &m.songs {
        print_track(track);
    }
}
