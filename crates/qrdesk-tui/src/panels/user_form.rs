//! Form panel: create a user, or rename the one being edited.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use qrdesk_core::{Command, Coordinator, EntityForm, FormMode, TextEdit, TextTarget};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct UserFormPanel {
    focused: bool,
}

/// The form currently on screen. Editing takes precedence over creating.
fn active_form(session: &Coordinator) -> (&EntityForm, TextTarget) {
    if session.state().edit_user.is_some() {
        (session.edit_form(), TextTarget::EditForm)
    } else {
        (session.create_form(), TextTarget::CreateForm)
    }
}

impl UserFormPanel {
    pub fn new() -> Self {
        Self { focused: false }
    }
}

impl Component for UserFormPanel {
    fn handle_key_event(&mut self, key: KeyEvent, session: &Coordinator) -> Result<Option<Action>> {
        let (form, target) = active_form(session);
        let edit = |edit| Some(Action::Dispatch(Command::Input { target, edit }));

        let action = match key.code {
            KeyCode::Enter => Some(
                match form.mode() {
                    FormMode::Create => Command::SubmitCreate,
                    FormMode::Edit => Command::SubmitEdit,
                }
                .into(),
            ),
            KeyCode::Esc => Some(
                match form.mode() {
                    FormMode::Create => Command::CancelCreate,
                    FormMode::Edit => Command::CancelEdit,
                }
                .into(),
            ),
            KeyCode::Backspace => edit(TextEdit::Backspace),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                edit(TextEdit::Clear)
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                edit(TextEdit::Insert(c))
            }
            _ => None,
        };
        Ok(action)
    }

    fn render(&self, frame: &mut Frame, area: Rect, session: &Coordinator) {
        let (form, _) = active_form(session);

        let block = Block::default()
            .title(format!(" {} ", form.title()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_for(self.focused));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let cursor = if self.focused { "▏" } else { "" };
        let ready = !form.value().trim().is_empty();
        let button = if ready {
            theme::button_enabled()
        } else {
            theme::button_disabled()
        };

        let lines = vec![
            Line::from(vec![
                Span::styled(" Username: ", theme::table_row()),
                Span::styled(form.value(), theme::input_text()),
                Span::styled(cursor, theme::key_hint_key()),
            ]),
            Line::from(vec![
                Span::raw(" "),
                Span::styled(format!(" {} ", form.submit_label()), button),
                Span::styled("  ⏎ submit  Esc cancel", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn captures_text(&self) -> bool {
        true
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use qrdesk_core::{EntityId, User};

    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn command(action: Option<Action>) -> Command {
        match action {
            Some(Action::Dispatch(command)) => command,
            other => panic!("expected a command, got {other:?}"),
        }
    }

    #[test]
    fn create_mode_keys() {
        let mut session = Coordinator::new();
        session.handle(Command::BeginCreate);
        let mut panel = UserFormPanel::new();

        let typed = command(panel.handle_key_event(press(KeyCode::Char('q')), &session).unwrap());
        assert_eq!(
            typed,
            Command::Input {
                target: TextTarget::CreateForm,
                edit: TextEdit::Insert('q'),
            }
        );
        assert_eq!(
            command(panel.handle_key_event(press(KeyCode::Enter), &session).unwrap()),
            Command::SubmitCreate
        );
        assert_eq!(
            command(panel.handle_key_event(press(KeyCode::Esc), &session).unwrap()),
            Command::CancelCreate
        );
    }

    #[test]
    fn edit_mode_targets_edit_form() {
        let mut session = Coordinator::new();
        session.handle(Command::SelectUser(User {
            id: EntityId::Numeric(1),
            username: "alice".into(),
        }));
        session.handle(Command::BeginEdit);
        let mut panel = UserFormPanel::new();

        let clear = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(
            command(panel.handle_key_event(clear, &session).unwrap()),
            Command::Input {
                target: TextTarget::EditForm,
                edit: TextEdit::Clear,
            }
        );
        assert_eq!(
            command(panel.handle_key_event(press(KeyCode::Enter), &session).unwrap()),
            Command::SubmitEdit
        );
        assert_eq!(
            command(panel.handle_key_event(press(KeyCode::Esc), &session).unwrap()),
            Command::CancelEdit
        );
    }
}
