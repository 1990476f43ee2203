//! Application core: event loop, focus management, action dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use qrdesk_api::ApiClient;
use qrdesk_core::{Command, Coordinator, Request, execute};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::action::Action;
use crate::component::Component;
use crate::event::{Event, EventReader, Rates};
use crate::panel::PanelId;
use crate::panels::create_panels;
use crate::theme;
use crate::tui::TerminalSession;
use crate::widgets::centered_rect;

const USERS_COLUMN_WIDTH: u16 = 30;

/// Top-level application state and event loop.
pub struct App {
    /// Session state machine shared by every panel.
    session: Coordinator,
    /// Backend the spawned requests run against.
    backend: Arc<ApiClient>,
    /// Shown in the status bar.
    backend_url: String,
    /// All panel components, keyed by PanelId.
    panels: HashMap<PanelId, Box<dyn Component>>,
    /// Panel holding keyboard focus.
    focus: PanelId,
    running: bool,
    help_visible: bool,
    /// Backend calls spawned but not yet completed.
    in_flight: usize,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(backend: ApiClient) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let backend_url = backend.base_url().to_string();

        let mut panels: HashMap<PanelId, Box<dyn Component>> =
            create_panels().into_iter().collect();
        for (id, panel) in &mut panels {
            panel.set_focused(*id == PanelId::Users);
        }

        Self {
            session: Coordinator::new(),
            backend: Arc::new(backend),
            backend_url,
            panels,
            focus: PanelId::Users,
            running: true,
            help_visible: false,
            in_flight: 0,
            action_tx,
            action_rx,
        }
    }

    /// Run the main event loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = TerminalSession::start()?;
        let mut events = EventReader::spawn(Rates::default());

        info!(url = %self.backend_url, "TUI event loop started");
        self.action_tx.send(Command::Mount.into())?;

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                if let Action::Render = action {
                    terminal.draw(|frame| self.render(frame))?;
                } else {
                    self.process_action(action)?;
                }
            }

            // The spinner clock only runs while a generation is pending.
            events.set_animating(self.session.generator().is_busy());
        }

        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action.
    ///
    /// Modal layers come first (help, delete confirmation), then focus
    /// cycling, then text entry for the focused panel, then globals.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        if self.session.pending_delete().is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') => Some(Command::ConfirmDelete.into()),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Command::CancelDelete.into()),
                _ => None,
            });
        }

        match key.code {
            KeyCode::Tab => return Ok(Some(Action::FocusNext)),
            KeyCode::BackTab => return Ok(Some(Action::FocusPrev)),
            _ => {}
        }

        if let Some(panel) = self.panels.get_mut(&self.focus) {
            if panel.captures_text() {
                return panel.handle_key_event(key, &self.session);
            }
        }

        let global = match (ctrl, key.code) {
            (false, KeyCode::Char('q')) => Some(Action::Quit),
            (false, KeyCode::Char('?')) => Some(Action::ToggleHelp),
            (false, KeyCode::Char('n')) => Some(Command::BeginCreate.into()),
            (false, KeyCode::Char('e')) => Some(Command::BeginEdit.into()),
            (false, KeyCode::Char('d')) => Some(Command::DeleteSelected.into()),
            (false, KeyCode::Char('r')) => Some(Command::RefreshUsers.into()),
            (false, KeyCode::Char('c')) => Some(Command::RefreshRequestCount.into()),
            (false, KeyCode::Char('C')) => Some(Command::ResetRequestCount.into()),
            (true, KeyCode::Char('b')) => Some(Command::GenerateBatch.into()),
            _ => None,
        };
        if global.is_some() {
            return Ok(global);
        }

        match self.panels.get_mut(&self.focus) {
            Some(panel) => panel.handle_key_event(key, &self.session),
            None => Ok(None),
        }
    }

    /// Process a single action: update session and view state.
    fn process_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::Resize(w, h) => debug!(w, h, "terminal resized"),
            Action::ToggleHelp => self.help_visible = !self.help_visible,
            Action::FocusNext => self.set_focus(self.focus.next(&self.session)),
            Action::FocusPrev => self.set_focus(self.focus.prev(&self.session)),
            Action::Focus(target) => self.set_focus(target),
            Action::Dispatch(command) => {
                let opens_form = matches!(command, Command::BeginCreate | Command::BeginEdit);
                debug!(?command, "dispatch");
                let requests = self.session.handle(command);
                self.spawn_all(requests);
                if opens_form && PanelId::Form.is_visible(&self.session) {
                    self.set_focus(PanelId::Form);
                }
            }
            Action::Completed(response) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                let requests = self.session.apply(response);
                self.spawn_all(requests);
            }
            Action::Tick => {
                for panel in self.panels.values_mut() {
                    if let Some(follow_up) = panel.update(&Action::Tick, &self.session)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }
            Action::Render => {}
        }

        if !self.focus.is_visible(&self.session) {
            self.set_focus(PanelId::Users);
        }
        Ok(())
    }

    fn set_focus(&mut self, target: PanelId) {
        if target == self.focus || !target.is_visible(&self.session) {
            return;
        }
        debug!("focus: {} → {}", self.focus, target);
        if let Some(panel) = self.panels.get_mut(&self.focus) {
            panel.set_focused(false);
        }
        self.focus = target;
        if let Some(panel) = self.panels.get_mut(&self.focus) {
            panel.set_focused(true);
        }
    }

    /// Run each request on the runtime; the result comes back as
    /// `Action::Completed`.
    fn spawn_all(&mut self, requests: Vec<Request>) {
        for request in requests {
            debug!(request = request.name(), "spawning backend call");
            self.in_flight += 1;
            let backend = Arc::clone(&self.backend);
            let tx = self.action_tx.clone();
            tokio::spawn(async move {
                let response = execute(backend.as_ref(), request).await;
                // The receiver is gone only when the app is shutting down.
                let _ = tx.send(Action::Completed(response));
            });
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let [body, status] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
        let [users_area, main_area] = Layout::horizontal([
            Constraint::Length(USERS_COLUMN_WIDTH),
            Constraint::Min(1),
        ])
        .areas(body);

        self.render_panel(PanelId::Users, frame, users_area);
        self.render_main(frame, main_area);
        self.render_status_bar(frame, status);

        if let Some(user) = self.session.pending_delete() {
            render_confirm_dialog(frame, area, &user.username);
        }
        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_panel(&self, id: PanelId, frame: &mut Frame, area: Rect) {
        if let Some(panel) = self.panels.get(&id) {
            panel.render(frame, area, &self.session);
        }
    }

    /// Right column: form on top when open, then generator and gallery for
    /// the selected user.
    fn render_main(&self, frame: &mut Frame, area: Rect) {
        let form_visible = PanelId::Form.is_visible(&self.session);
        let selected = self.session.state().selected_user.is_some();

        let mut constraints = Vec::new();
        if form_visible {
            constraints.push(Constraint::Length(5));
        }
        if selected {
            constraints.push(Constraint::Length(4));
            constraints.push(Constraint::Min(3));
        } else {
            constraints.push(Constraint::Min(3));
        }
        let areas = Layout::vertical(constraints).split(area);
        let mut slots = areas.iter().copied();

        if form_visible {
            if let Some(slot) = slots.next() {
                self.render_panel(PanelId::Form, frame, slot);
            }
        }

        if selected {
            if let Some(slot) = slots.next() {
                self.render_panel(PanelId::Generator, frame, slot);
            }
            if let Some(slot) = slots.next() {
                self.render_panel(PanelId::Gallery, frame, slot);
            }
        } else if let Some(slot) = slots.next() {
            render_welcome(frame, slot);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let selected = self.session.selected_username().unwrap_or("no user selected");
        let count = self
            .session
            .request_count()
            .map_or_else(|| "-".to_owned(), |c| c.to_string());

        let activity = if self.in_flight > 0 {
            Span::styled(
                format!("◐ {} pending", self.in_flight),
                Style::default().fg(theme::ELECTRIC_YELLOW),
            )
        } else {
            Span::styled("● idle", Style::default().fg(theme::SUCCESS_GREEN))
        };

        let line = Line::from(vec![
            Span::raw(" "),
            activity,
            Span::styled(format!(" │ {}", self.backend_url), theme::status_bar()),
            Span::styled(format!(" │ {selected}"), theme::status_bar()),
            Span::styled(format!(" │ requests: {count}"), theme::status_bar()),
            Span::styled(format!(" │ [{}]", self.focus), theme::status_bar()),
            Span::styled(" │ Tab focus  ? help  q quit", theme::key_hint()),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}

fn render_welcome(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled("qrdesk", theme::title_style())),
        Line::from(""),
        Line::from(Span::styled(
            "Select a user to generate and browse QR codes.",
            Style::default().fg(theme::DIM_WHITE),
        )),
        Line::from(vec![
            Span::styled("n", theme::key_hint_key()),
            Span::styled(" creates a new user.", theme::key_hint()),
        ]),
    ];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}

fn render_confirm_dialog(frame: &mut Frame, area: Rect, username: &str) {
    let dialog = centered_rect(area, 50, 7);
    frame.render_widget(Clear, dialog);

    let block = Block::default()
        .title(" Delete User ")
        .title_style(theme::danger().add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::danger())
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let text = vec![
        Line::from(Span::styled(
            "Are you sure you want to delete this user?",
            Style::default().fg(theme::DIM_WHITE),
        )),
        Line::from(Span::styled(username, theme::danger())),
        Line::from(""),
        Line::from(vec![
            Span::styled("y ", theme::key_hint_key()),
            Span::styled("delete   ", theme::key_hint()),
            Span::styled("n/Esc ", theme::key_hint_key()),
            Span::styled("cancel", theme::key_hint()),
        ]),
    ];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}

fn help_row(keys: &'static str, description: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {keys:<10}"), theme::key_hint_key()),
        Span::styled(description, theme::key_hint()),
    ])
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_area = centered_rect(area, 58, 22);
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(
            format!("  {title}"),
            Style::default().fg(theme::NEON_CYAN),
        ))
    };

    let help_text = vec![
        section("Navigation"),
        help_row("Tab", "Next panel"),
        help_row("j/k ↑/↓", "Move in list or gallery"),
        help_row("h/l", "Move across the gallery"),
        help_row("Enter", "Select user / submit"),
        help_row("Esc", "Cancel form / leave input"),
        Line::from(""),
        section("Users"),
        help_row("n", "New user"),
        help_row("e", "Edit selected user"),
        help_row("d", "Delete selected user"),
        help_row("r", "Reload users"),
        Line::from(""),
        section("QR codes"),
        help_row("Ctrl+B", "Generate batch (a;b;c)"),
        help_row("c / C", "Refresh / reset request count"),
        Line::from(""),
        help_row("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled("  Esc or ? to close", theme::key_hint())),
    ];

    frame.render_widget(Paragraph::new(help_text), inner);
}
