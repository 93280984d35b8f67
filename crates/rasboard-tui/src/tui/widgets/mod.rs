// TUI widget modules for each dashboard panel.

pub mod heatmap;
pub mod player_detail;
pub mod player_table;
pub mod positions;
pub mod predictions;
pub mod quit_confirm;
pub mod ras_scatter;
pub mod status_bar;

use ratatui::style::Color;
use rasboard_core::color::Rgb;

/// Terminal color for a scale color.
pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}
