//! Terminal stand-ins for the folder picker and the permission request.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use gmusic::session::FolderPicker;
use gmusic::store::{FolderHandle, PermissionPrompt, PromptOutcome};

fn ask(question: &str) -> Option<String> {
    print!("{question}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line),
    }
}

/// Blank answers and end of input cancel.
fn parse_folder_answer(answer: Option<&str>) -> Option<PathBuf> {
    let answer = answer?.trim();
    (!answer.is_empty()).then(|| PathBuf::from(answer))
}

fn parse_permission_answer(answer: Option<&str>) -> PromptOutcome {
    match answer.map(|a| a.trim().to_ascii_lowercase()).as_deref() {
        None | Some("c") | Some("cancel") => PromptOutcome::Cancelled,
        Some("n") | Some("no") => PromptOutcome::Denied,
        Some(_) => PromptOutcome::Granted,
    }
}

pub struct TerminalPicker;

impl FolderPicker for TerminalPicker {
    fn pick_folder(&self) -> Option<PathBuf> {
        parse_folder_answer(ask("Music folder (empty to cancel): ").as_deref())
    }
}

pub struct TerminalPrompt;

impl PermissionPrompt for TerminalPrompt {
    fn request_read(&self, handle: &FolderHandle) -> PromptOutcome {
        println!(
            "gmusic cannot read \"{}\" ({}). Restore read access, then press Enter.",
            handle.name(),
            handle.root().display()
        );
        parse_permission_answer(ask("[Enter] retry, [n] deny, [c] cancel: ").as_deref())
    }
}
