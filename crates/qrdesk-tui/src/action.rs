//! All possible UI actions. Actions are the sole mechanism for state mutation.

use qrdesk_core::{Command, Response};

use crate::panel::PanelId;

/// Everything that flows through the action channel.
///
/// `Dispatch` carries a user intent to the coordinator; `Completed` carries a
/// finished backend call back to it.
#[derive(Debug)]
pub enum Action {
    // ── Lifecycle ────────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ───────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    Focus(PanelId),
    ToggleHelp,

    // ── Session ──────────────────────────────────────────────────────
    Dispatch(Command),
    Completed(Response),
}

impl From<Command> for Action {
    fn from(command: Command) -> Self {
        Self::Dispatch(command)
    }
}
