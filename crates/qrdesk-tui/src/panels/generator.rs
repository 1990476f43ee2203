//! Generate panel: text input, trigger button, and busy spinner.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use qrdesk_core::{Command, Coordinator, TextEdit, TextTarget};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use throbber_widgets_tui::{Throbber, ThrobberState};

use crate::action::Action;
use crate::component::Component;
use crate::panel::PanelId;
use crate::theme;

pub struct GeneratorPanel {
    focused: bool,
    throbber_state: ThrobberState,
}

impl GeneratorPanel {
    pub fn new() -> Self {
        Self {
            focused: false,
            throbber_state: ThrobberState::default(),
        }
    }
}

fn input(edit: TextEdit) -> Option<Action> {
    Some(
        Command::Input {
            target: TextTarget::Generator,
            edit,
        }
        .into(),
    )
}

impl Component for GeneratorPanel {
    fn handle_key_event(&mut self, key: KeyEvent, _session: &Coordinator) -> Result<Option<Action>> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let action = match key.code {
            KeyCode::Enter => Some(Command::Generate.into()),
            KeyCode::Char('b') if ctrl => Some(Command::GenerateBatch.into()),
            KeyCode::Char('u') if ctrl => input(TextEdit::Clear),
            KeyCode::Char(c) if !ctrl => input(TextEdit::Insert(c)),
            KeyCode::Backspace => input(TextEdit::Backspace),
            KeyCode::Esc => Some(Action::Focus(PanelId::Users)),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action, session: &Coordinator) -> Result<Option<Action>> {
        if matches!(action, Action::Tick) && session.generator().is_busy() {
            self.throbber_state.calc_next();
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect, session: &Coordinator) {
        let generator = session.generator();

        let block = Block::default()
            .title(" Generate QR Code ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_for(self.focused));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(inner);

        let cursor = if self.focused { "▏" } else { "" };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" Text: ", theme::table_row()),
                Span::styled(generator.text(), theme::input_text()),
                Span::styled(cursor, theme::key_hint_key()),
            ])),
            rows[0],
        );

        let button = if generator.can_trigger(session.selected_username()) {
            theme::button_enabled()
        } else {
            theme::button_disabled()
        };
        let trigger = Line::from(vec![
            Span::raw(" "),
            Span::styled(format!(" {} ", generator.trigger_label()), button),
            Span::styled("  ⏎ one  ^B batch (a;b;c)", theme::key_hint()),
        ]);

        if generator.is_busy() {
            let [button_area, spinner_area] =
                Layout::horizontal([Constraint::Min(1), Constraint::Length(3)]).areas(rows[1]);
            frame.render_widget(Paragraph::new(trigger), button_area);
            let throbber = Throbber::default()
                .style(Style::default().fg(theme::NEON_CYAN))
                .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
            frame.render_stateful_widget(throbber, spinner_area, &mut self.throbber_state.clone());
        } else {
            frame.render_widget(Paragraph::new(trigger), rows[1]);
        }
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
