use std::io::IsTerminal;

/// What the host environment supports, probed once per session.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Capabilities {
    /// An interactive folder picker is available.
    pub can_pick_folder: bool,
    /// Directory reads report permission errors distinctly.
    pub can_check_permission: bool,
}

impl Capabilities {
    pub fn probe() -> Self {
        let caps = Self {
            can_pick_folder: std::io::stdin().is_terminal(),
            can_check_permission: cfg!(any(unix, windows)),
        };
        tracing::debug!(?caps, "probed host capabilities");
        caps
    }

    /// Everything available; used by hosts that drive the session programmatically.
    pub fn full() -> Self {
        Self {
            can_pick_folder: true,
            can_check_permission: true,
        }
    }
}
