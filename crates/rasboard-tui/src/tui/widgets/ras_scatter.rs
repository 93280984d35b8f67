// RAS scatter widget: each player's RAS against their Pro Bowl count.
//
// Drawn beside the player table. Points follow the table's position
// filter; players without a RAS are left out.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use rasboard_core::dataset::{filter_by_field, ALL};
use rasboard_core::loader::LoadState;

use crate::tui::ViewState;

/// `(ras, pro_bowls)` for every player passing the table filter.
pub fn scatter_points(state: &ViewState) -> Vec<(f64, f64)> {
    filter_by_field(state.records(), &state.table.filter)
        .iter()
        .filter_map(|p| p.ras_score.map(|ras| (ras, p.pro_bowl_count as f64)))
        .collect()
}

/// Render the scatter into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let position = state.position_filter_name();
    let points = scatter_points(state);
    let title = if position == ALL {
        format!("RAS vs Pro Bowls ({})", points.len())
    } else {
        format!("RAS vs Pro Bowls [{position}] ({})", points.len())
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    let message = match &state.players {
        LoadState::Loading => Some("  Loading players...".to_string()),
        LoadState::Failed(_) => Some("  No data.".to_string()),
        LoadState::Loaded(_) if points.is_empty() => Some("  No players with a RAS.".to_string()),
        LoadState::Loaded(_) => None,
    };
    if let Some(text) = message {
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let top = points
        .iter()
        .map(|(_, pro_bowls)| *pro_bowls)
        .fold(1.0_f64, f64::max);
    let dataset = Dataset::default()
        .marker(Marker::Dot)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(Color::Cyan))
        .data(&points);

    let axis_style = Style::default().fg(Color::Gray);
    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .title("RAS")
                .style(axis_style)
                .bounds([0.0, 10.0])
                .labels(["0", "5", "10"]),
        )
        .y_axis(
            Axis::default()
                .title("Pro Bowls")
                .style(axis_style)
                .bounds([0.0, top])
                .labels(["0".to_string(), format!("{top:.0}")])
                .labels_alignment(Alignment::Right),
        );
    frame.render_widget(chart, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
