use anyhow::{Context, Result};
use clap::Parser;
use gmusic::capabilities::Capabilities;
use gmusic::session::Session;

mod cli;
mod commands;
mod event_loop;
mod logging;
mod prompt;
mod settings;

pub fn run() -> Result<()> {
    let args = cli::Args::parse();

    let loaded = settings::load_settings();
    logging::init(&loaded.settings.logging);
    if let Some(reason) = &loaded.fallback_reason {
        tracing::warn!(%reason, "using default settings");
    }

    let caps = Capabilities::probe();
    let mut session =
        Session::new(loaded.settings, caps).context("opening the gmusic data directory")?;

    commands::dispatch(&mut session, args.command)
}
