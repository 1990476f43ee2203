//! Palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const CORAL: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29

// ── QR modules ────────────────────────────────────────────────────────

/// QR codes need true black on white to stay scannable.
pub const QR_DARK: Color = Color::Rgb(0, 0, 0);
pub const QR_LIGHT: Color = Color::Rgb(255, 255, 255);

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn border_for(focused: bool) -> Style {
    if focused {
        border_focused()
    } else {
        border_default()
    }
}

/// Normal row text.
pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Highlighted row under the cursor.
pub fn table_selected() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Text being typed into an input field.
pub fn input_text() -> Style {
    Style::default().fg(ELECTRIC_YELLOW)
}

/// A button that would fire on Enter.
pub fn button_enabled() -> Style {
    Style::default()
        .fg(BG_DARK)
        .bg(SUCCESS_GREEN)
        .add_modifier(Modifier::BOLD)
}

/// A button that is currently inert.
pub fn button_disabled() -> Style {
    Style::default().fg(BORDER_GRAY).bg(BG_HIGHLIGHT)
}

/// Status bar text.
pub fn status_bar() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

/// Destructive prompt accents.
pub fn danger() -> Style {
    Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD)
}
