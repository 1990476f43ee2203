//! Component trait: the building block for every panel.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use qrdesk_core::Coordinator;
use ratatui::{Frame, layout::Rect};

use crate::action::Action;

/// Every panel implements Component.
///
/// Panels hold only view state (cursor, scroll, spinner). Session state is
/// read from the coordinator passed into each call, and changes go back out
/// as actions.
pub trait Component: Send {
    /// Handle a keyboard event. Return an Action to dispatch, or None.
    fn handle_key_event(&mut self, _key: KeyEvent, _session: &Coordinator) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Process a dispatched action. May return a follow-up action.
    fn update(&mut self, _action: &Action, _session: &Coordinator) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Render into the provided frame area.
    fn render(&self, frame: &mut Frame, area: Rect, session: &Coordinator);

    /// Whether printable keys belong to this panel rather than to global
    /// shortcuts while it has focus.
    fn captures_text(&self) -> bool {
        false
    }

    /// Whether this component currently holds input focus.
    fn focused(&self) -> bool;

    /// Set focus state.
    fn set_focused(&mut self, focused: bool);
}
