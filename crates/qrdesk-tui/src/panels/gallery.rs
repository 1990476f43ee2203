//! Gallery panel: a scrolling grid of the selected user's QR codes.

use std::cell::Cell;

use bytesize::ByteSize;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use qrdesk_core::{Coordinator, EMPTY_PLACEHOLDER, GalleryTile};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::qr::QrWidget;

const TILE_WIDTH: u16 = 26;
const TILE_HEIGHT: u16 = 15;

/// Grid shape for a given area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Grid {
    columns: usize,
    rows: usize,
}

impl Grid {
    fn for_area(area: Rect) -> Self {
        Self {
            columns: usize::from(area.width / TILE_WIDTH).max(1),
            rows: usize::from(area.height / TILE_HEIGHT).max(1),
        }
    }

    /// First grid row to draw so that `cursor` stays on screen.
    fn first_row(self, cursor: usize) -> usize {
        (cursor / self.columns).saturating_sub(self.rows - 1)
    }
}

pub struct GalleryPanel {
    focused: bool,
    cursor: usize,
    columns: Cell<usize>,
}

impl GalleryPanel {
    pub fn new() -> Self {
        Self {
            focused: false,
            cursor: 0,
            columns: Cell::new(1),
        }
    }

    fn move_cursor(&mut self, len: usize, delta: isize) {
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self
            .cursor
            .min(len - 1)
            .saturating_add_signed(delta)
            .min(len - 1);
    }

    fn render_tile(&self, frame: &mut Frame, area: Rect, tile: &GalleryTile, active: bool) {
        let caption: String = tile.content.chars().take(usize::from(TILE_WIDTH) - 4).collect();
        let block = Block::default()
            .title(Span::styled(format!(" {caption} "), Style::default().fg(theme::CORAL)))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_for(active));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [image_area, size_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        match &tile.bitmap {
            Some(bitmap) => frame.render_widget(QrWidget::new(bitmap), image_area),
            None => frame.render_widget(
                Paragraph::new(Span::styled("unreadable image", theme::danger()))
                    .alignment(Alignment::Center),
                image_area,
            ),
        }

        let size = ByteSize::b(u64::try_from(tile.payload_len).unwrap_or(u64::MAX));
        frame.render_widget(
            Paragraph::new(Span::styled(format!("#{} · {size}", tile.id), theme::key_hint()))
                .alignment(Alignment::Center),
            size_area,
        );
    }
}

impl Component for GalleryPanel {
    fn handle_key_event(&mut self, key: KeyEvent, session: &Coordinator) -> Result<Option<Action>> {
        let len = session.tiles().len();
        let columns = isize::try_from(self.columns.get()).unwrap_or(1);
        match key.code {
            KeyCode::Char('h') | KeyCode::Left => self.move_cursor(len, -1),
            KeyCode::Char('l') | KeyCode::Right => self.move_cursor(len, 1),
            KeyCode::Char('k') | KeyCode::Up => self.move_cursor(len, -columns),
            KeyCode::Char('j') | KeyCode::Down => self.move_cursor(len, columns),
            KeyCode::Char('g') | KeyCode::Home => self.cursor = 0,
            KeyCode::Char('G') | KeyCode::End => self.cursor = len.saturating_sub(1),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect, session: &Coordinator) {
        let username = session.selected_username().unwrap_or_default();
        let tiles = session.tiles();

        let block = Block::default()
            .title(format!(" QR Codes for {username} ({}) ", tiles.len()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_for(self.focused));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if tiles.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    EMPTY_PLACEHOLDER,
                    Style::default()
                        .fg(theme::DIM_WHITE)
                        .add_modifier(Modifier::ITALIC),
                )))
                .alignment(Alignment::Center),
                inner,
            );
            return;
        }

        let grid = Grid::for_area(inner);
        self.columns.set(grid.columns);
        let cursor = self.cursor.min(tiles.len() - 1);
        let first = grid.first_row(cursor) * grid.columns;

        let row_areas = Layout::vertical(vec![Constraint::Length(TILE_HEIGHT); grid.rows]).split(inner);
        for (row, row_area) in row_areas.iter().enumerate() {
            let cells =
                Layout::horizontal(vec![Constraint::Length(TILE_WIDTH); grid.columns]).split(*row_area);
            for (col, cell) in cells.iter().enumerate() {
                let index = first + row * grid.columns + col;
                let Some(tile) = tiles.get(index) else {
                    return;
                };
                self.render_tile(frame, *cell, tile, self.focused && index == cursor);
            }
        }
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn grid_fits_at_least_one_tile() {
        let grid = Grid::for_area(Rect::new(0, 0, 10, 5));
        assert_eq!(grid, Grid { columns: 1, rows: 1 });

        let grid = Grid::for_area(Rect::new(0, 0, TILE_WIDTH * 3 + 5, TILE_HEIGHT * 2));
        assert_eq!(grid, Grid { columns: 3, rows: 2 });
    }

    #[test]
    fn first_row_follows_cursor() {
        let grid = Grid { columns: 3, rows: 2 };
        assert_eq!(grid.first_row(0), 0);
        assert_eq!(grid.first_row(5), 0);
        assert_eq!(grid.first_row(6), 1);
        assert_eq!(grid.first_row(10), 2);
    }

    #[test]
    fn cursor_clamps_to_tiles() {
        let mut panel = GalleryPanel::new();
        panel.columns.set(3);
        panel.move_cursor(4, 3);
        assert_eq!(panel.cursor, 3);
        panel.move_cursor(4, 3);
        assert_eq!(panel.cursor, 3);
        panel.move_cursor(4, -10);
        assert_eq!(panel.cursor, 0);
        panel.move_cursor(0, 1);
        assert_eq!(panel.cursor, 0);
    }
}
