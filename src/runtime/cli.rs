use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "gmusic")]
#[command(about = "Browse and play a local music folder")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open a music folder, remember it and list its albums.
    ///
    /// Without a directory the folder is asked for interactively.
    Open { dir: Option<PathBuf> },

    /// Reload the remembered folder and list its albums.
    List,

    /// Search albums and songs in the remembered folder.
    Search { term: String },

    /// Save a metadata correction for a track.
    Edit {
        track_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        artist: Option<String>,
        #[arg(long)]
        album: Option<String>,
        #[arg(long = "cover-url")]
        cover_url: Option<String>,
    },

    /// Play a track and the rest of its album.
    Play { track_id: String },

    /// Build the catalog from a JSON list of track records.
    Import {
        file: PathBuf,
        /// Start playing this track id once imported.
        #[arg(long)]
        play: Option<String>,
    },

    /// Print the effective configuration as TOML.
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_takes_optional_field_flags() {
        let args = Args::try_parse_from([
            "gmusic", "edit", "3", "--artist", "Z", "--cover-url", "http://x/c.jpg",
        ])
        .unwrap();
        match args.command {
            Command::Edit {
                track_id,
                title,
                artist,
                cover_url,
                ..
            } => {
                assert_eq!(track_id, "3");
                assert_eq!(title, None);
                assert_eq!(artist.as_deref(), Some("Z"));
                assert_eq!(cover_url.as_deref(), Some("http://x/c.jpg"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn open_directory_is_optional() {
        let args = Args::try_parse_from(["gmusic", "open"]).unwrap();
        assert!(matches!(args.command, Command::Open { dir: None }));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
