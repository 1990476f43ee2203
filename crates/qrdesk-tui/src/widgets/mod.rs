//! Reusable widgets and layout helpers.

pub mod qr;

use ratatui::layout::Rect;

/// A `width` x `height` rect centered in `area`, shrunk to fit with a
/// two-cell margin.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn centers_inside_area() {
        let rect = centered_rect(Rect::new(0, 0, 100, 40), 50, 10);
        assert_eq!(rect, Rect::new(25, 15, 50, 10));
    }

    #[test]
    fn shrinks_to_fit() {
        let rect = centered_rect(Rect::new(10, 5, 20, 8), 50, 10);
        assert_eq!(rect, Rect::new(12, 7, 16, 4));
    }
}
