//! Terminal session guard.
//!
//! [`TerminalSession::start`] switches to raw mode and the alternate screen;
//! dropping the session switches back. A failure halfway through setup rolls
//! back what was already done, so an error never leaves the shell in raw
//! mode.

use std::io::{self, Stdout, stdout};
use std::path::Path;

use color_eyre::eyre::Result;
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use tracing::warn;

/// Raw-mode, alternate-screen terminal owned by the app loop.
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    pub fn start() -> Result<Self> {
        if let Err(e) = enter() {
            rollback();
            return Err(e.into());
        }
        let terminal = match Terminal::new(CrosstermBackend::new(stdout())) {
            Ok(terminal) => terminal,
            Err(e) => {
                rollback();
                return Err(e.into());
            }
        };

        // From here on, Drop restores the terminal.
        let mut session = Self { terminal };
        session.terminal.clear()?;
        Ok(session)
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(e) = restore() {
            warn!(error = %e, "could not restore terminal");
        }
    }
}

fn enter() -> io::Result<()> {
    terminal::enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, cursor::Hide)
}

/// Undo a partial [`enter`] before reporting the setup error.
fn rollback() {
    if let Err(e) = restore() {
        warn!(error = %e, "terminal rollback failed");
    }
}

/// Undo [`enter`]. Every step is attempted; the first failure is returned.
fn restore() -> io::Result<()> {
    let screen = execute!(stdout(), cursor::Show, LeaveAlternateScreen);
    let raw = terminal::disable_raw_mode();
    screen.and(raw)
}

/// Panic and error hooks. Panics restore the terminal before printing and
/// point at the log file.
///
/// Install before [`TerminalSession::start`] so setup failures print cleanly.
pub fn install_hooks(log_file: &Path) -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .panic_section(format!("qrdesk log: {}", log_file.display()))
        .into_hooks();

    eyre_hook.install()?;

    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore();
        panic_hook(info);
    }));

    Ok(())
}
