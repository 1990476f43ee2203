//! Half-block renderer for QR bitmaps.
//!
//! Each terminal cell shows two vertically stacked pixels using `▀` with
//! the upper pixel as foreground and the lower one as background. Large
//! bitmaps are sampled nearest-neighbour down to the largest square that
//! fits the area.

use qrdesk_core::QrBitmap;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;

use crate::theme;

const UPPER_HALF: &str = "▀";

pub struct QrWidget<'a> {
    bitmap: &'a QrBitmap,
}

impl<'a> QrWidget<'a> {
    pub fn new(bitmap: &'a QrBitmap) -> Self {
        Self { bitmap }
    }

    /// Side length in pixels of the square drawn into `area`.
    pub fn side_for(&self, area: Rect) -> u32 {
        let fit = u32::from(area.width).min(u32::from(area.height) * 2);
        let native = self.bitmap.width().max(self.bitmap.height());
        fit.min(native)
    }

    fn sample(&self, px: u32, py: u32, side: u32) -> Color {
        let x = px * self.bitmap.width() / side;
        let y = py * self.bitmap.height() / side;
        if self.bitmap.is_dark(x, y) {
            theme::QR_DARK
        } else {
            theme::QR_LIGHT
        }
    }
}

impl Widget for QrWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let side = self.side_for(area);
        if side == 0 {
            return;
        }

        let cols = u16::try_from(side).unwrap_or(area.width);
        let rows = u16::try_from(side.div_ceil(2)).unwrap_or(area.height);
        let left = area.x + area.width.saturating_sub(cols) / 2;
        let top = area.y + area.height.saturating_sub(rows) / 2;

        for row in 0..rows {
            for col in 0..cols {
                let px = u32::from(col);
                let upper = self.sample(px, u32::from(row) * 2, side);
                let lower_y = u32::from(row) * 2 + 1;
                let lower = if lower_y < side {
                    self.sample(px, lower_y, side)
                } else {
                    theme::QR_LIGHT
                };
                if let Some(cell) = buf.cell_mut((left + col, top + row)) {
                    cell.set_symbol(UPPER_HALF).set_fg(upper).set_bg(lower);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn checker(size: u32) -> QrBitmap {
        QrBitmap::from_fn(size, size, |x, y| (x + y) % 2 == 0)
    }

    #[test]
    fn native_size_when_it_fits() {
        let bitmap = checker(4);
        let widget = QrWidget::new(&bitmap);
        assert_eq!(widget.side_for(Rect::new(0, 0, 10, 10)), 4);
    }

    #[test]
    fn shrinks_to_area() {
        let bitmap = checker(100);
        let widget = QrWidget::new(&bitmap);
        assert_eq!(widget.side_for(Rect::new(0, 0, 30, 10)), 20);
    }

    #[test]
    fn draws_two_pixels_per_cell() {
        let bitmap = checker(2);
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        QrWidget::new(&bitmap).render(area, &mut buf);

        let first = &buf[(0, 0)];
        assert_eq!(first.symbol(), UPPER_HALF);
        assert_eq!(first.fg, theme::QR_DARK);
        assert_eq!(first.bg, theme::QR_LIGHT);

        let second = &buf[(1, 0)];
        assert_eq!(second.fg, theme::QR_LIGHT);
        assert_eq!(second.bg, theme::QR_DARK);
    }

    #[test]
    fn odd_height_pads_with_light() {
        let bitmap = checker(3);
        let area = Rect::new(0, 0, 3, 2);
        let mut buf = Buffer::empty(area);
        QrWidget::new(&bitmap).render(area, &mut buf);

        // Third pixel row sits in the upper half of the second cell row.
        assert_eq!(buf[(0, 1)].fg, theme::QR_DARK);
        assert_eq!(buf[(0, 1)].bg, theme::QR_LIGHT);
    }
}
