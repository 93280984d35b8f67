// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row): tabs, load status             |
// +--------------------------------------------------+
// | Main Panel (fill): active tab                     |
// |                                                   |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Flex, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    pub status_bar: Rect,
    pub main_panel: Rect,
    pub help_bar: Rect,
}

/// Build the dashboard layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(5),    // main panel
            Constraint::Length(1), // help bar
        ])
        .split(area);

    AppLayout {
        status_bar: vertical[0],
        main_panel: vertical[1],
        help_bar: vertical[2],
    }
}

/// A rectangle of the given size centered in `area`, clamped to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let clamped_width = width.min(area.width);
    let clamped_height = height.min(area.height);

    let vertical = Layout::vertical([Constraint::Length(clamped_height)])
        .flex(Flex::Center)
        .split(area);

    let horizontal = Layout::horizontal([Constraint::Length(clamped_width)])
        .flex(Flex::Center)
        .split(vertical[0]);

    horizontal[0]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_area() -> Rect {
        Rect::new(0, 0, 160, 50)
    }

    #[test]
    fn bars_are_one_row_and_main_fills_the_rest() {
        let layout = build_layout(test_area());
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.help_bar.height, 1);
        assert_eq!(layout.main_panel.height, 48);
        assert_eq!(layout.main_panel.width, 160);
    }

    #[test]
    fn zones_stack_top_to_bottom() {
        let layout = build_layout(test_area());
        assert!(layout.status_bar.y < layout.main_panel.y);
        assert!(layout.main_panel.y < layout.help_bar.y);
        assert_eq!(layout.help_bar.y, 49);
    }

    #[test]
    fn small_terminal_still_valid() {
        let layout = build_layout(Rect::new(0, 0, 40, 8));
        for rect in [layout.status_bar, layout.main_panel, layout.help_bar] {
            assert!(
                rect.width > 0 && rect.height > 0,
                "Small terminal: rect {:?} has zero area",
                rect
            );
        }
    }

    #[test]
    fn centered_rect_is_centered() {
        let area = Rect::new(0, 0, 80, 24);
        let result = centered_rect(30, 10, area);
        assert_eq!(result.width, 30);
        assert_eq!(result.height, 10);
        let dx = (result.x + result.width / 2) as i32 - 40;
        let dy = (result.y + result.height / 2) as i32 - 12;
        assert!(dx.unsigned_abs() <= 1 && dy.unsigned_abs() <= 1);
    }

    #[test]
    fn centered_rect_clamps_to_small_area() {
        let area = Rect::new(0, 0, 10, 3);
        let result = centered_rect(30, 10, area);
        assert!(result.width <= area.width);
        assert!(result.height <= area.height);
    }
}
