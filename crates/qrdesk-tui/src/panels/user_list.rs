//! Users panel: the loaded user collection with a movable cursor.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use qrdesk_core::{Command, Coordinator, User};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct UserListPanel {
    focused: bool,
    cursor: usize,
}

impl UserListPanel {
    pub fn new() -> Self {
        Self {
            focused: true,
            cursor: 0,
        }
    }

    /// Cursor clamped to the current list length.
    fn cursor_in(&self, users: &[User]) -> Option<usize> {
        if users.is_empty() {
            None
        } else {
            Some(self.cursor.min(users.len() - 1))
        }
    }

    fn move_cursor(&mut self, users: &[User], delta: isize) {
        let Some(current) = self.cursor_in(users) else {
            return;
        };
        self.cursor = current
            .saturating_add_signed(delta)
            .min(users.len().saturating_sub(1));
    }
}

impl Component for UserListPanel {
    fn handle_key_event(&mut self, key: KeyEvent, session: &Coordinator) -> Result<Option<Action>> {
        let users = session.users().users();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_cursor(users, 1),
            KeyCode::Char('k') | KeyCode::Up => self.move_cursor(users, -1),
            KeyCode::Char('g') | KeyCode::Home => self.cursor = 0,
            KeyCode::Char('G') | KeyCode::End => self.cursor = users.len().saturating_sub(1),
            KeyCode::Enter => {
                if let Some(user) = self.cursor_in(users).and_then(|i| users.get(i)) {
                    return Ok(Some(Command::SelectUser(user.clone()).into()));
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect, session: &Coordinator) {
        let users = session.users().users();
        let loading = if session.users().is_loading() { " …" } else { "" };
        let block = Block::default()
            .title(format!(" Users ({}){loading} ", users.len()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_for(self.focused));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(2)]).split(inner);

        let selected_id = session.state().selected_user.as_ref().map(|u| &u.id);
        let items: Vec<ListItem> = users
            .iter()
            .map(|user| {
                let marker = if selected_id == Some(&user.id) { "● " } else { "  " };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Style::default().fg(theme::SUCCESS_GREEN)),
                    Span::styled(user.username.as_str(), theme::table_row()),
                ]))
            })
            .collect();

        if items.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  No users", theme::key_hint())),
                layout[0],
            );
        } else {
            let list = List::new(items).highlight_style(theme::table_selected());
            let mut state = ListState::default().with_selected(self.cursor_in(users));
            frame.render_stateful_widget(list, layout[0], &mut state);
        }

        let hints = Paragraph::new(vec![
            Line::from(vec![
                Span::styled(" ⏎ ", theme::key_hint_key()),
                Span::styled("select ", theme::key_hint()),
                Span::styled("n ", theme::key_hint_key()),
                Span::styled("new ", theme::key_hint()),
                Span::styled("r ", theme::key_hint_key()),
                Span::styled("reload", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled(" e ", theme::key_hint_key()),
                Span::styled("edit   ", theme::key_hint()),
                Span::styled("d ", theme::key_hint_key()),
                Span::styled("delete", theme::key_hint()),
            ]),
        ]);
        frame.render_widget(hints, layout[1]);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
