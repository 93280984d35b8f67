// Positions widget: per-position summary of RAS and Pro Bowl outcomes.
//
// One row per position with an average-RAS gauge and the impact label.
// Color: Green=significantly, Yellow=moderately, Blue=slightly
// Row order follows `ViewState::aggregate_order` (cycled with `o`). Rows
// cover the players passing the table's position filter.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use rasboard_core::dataset::{impact_label, PositionAggregate, ALL};
use rasboard_core::loader::LoadState;

use crate::tui::ViewState;

/// Gauge width in characters; one step per RAS point.
const GAUGE_WIDTH: usize = 10;

/// Render the position summary into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let position = state.position_filter_name();
    let title = if position == ALL {
        format!("Positions (by {})", state.aggregate_order.label())
    } else {
        format!("Positions [{position}] (by {})", state.aggregate_order.label())
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    let message = match &state.players {
        LoadState::Loading => Some("  Loading players...".to_string()),
        LoadState::Failed(msg) => Some(format!("  Error loading data: {msg}")),
        LoadState::Loaded(_) if state.aggregates.is_empty() => {
            Some("  No position data.".to_string())
        }
        LoadState::Loaded(_) => None,
    };
    if let Some(text) = message {
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        "Pos", "Players", "Avg RAS", "", "Pro Bowls", "Avg PB", "Multi-PB %", "Impact",
    ])
    .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = state.ordered_aggregates().iter().map(aggregate_row).collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(GAUGE_WIDTH as u16 + 2),
        Constraint::Length(10),
        Constraint::Length(7),
        Constraint::Length(11),
        Constraint::Min(13),
    ];

    let table = Table::new(rows, widths).header(header).block(
        block.title_bottom(Line::from(" o: change order ").style(Style::default().fg(Color::DarkGray))),
    );
    frame.render_widget(table, area);
}

fn aggregate_row(agg: &PositionAggregate) -> Row<'static> {
    let impact = impact_label(agg.avg_ras);
    let color = impact_color(impact);
    Row::new(vec![
        Cell::from(agg.position.clone()),
        Cell::from(agg.player_count.to_string()),
        Cell::from(
            agg.avg_ras
                .map(|r| format!("{r:.2}"))
                .unwrap_or_else(|| "N/A".to_string()),
        ),
        Cell::from(ras_gauge(agg.avg_ras)).style(Style::default().fg(color)),
        Cell::from(agg.total_pro_bowls.to_string()),
        Cell::from(format!("{:.2}", agg.avg_pro_bowls)),
        Cell::from(format!("{:.1}%", agg.multi_pro_bowl_rate)),
        Cell::from(impact).style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ])
}

/// Color for an impact label.
pub fn impact_color(label: &str) -> Color {
    match label {
        "significantly" => Color::Green,
        "moderately" => Color::Yellow,
        "slightly" => Color::Blue,
        _ => Color::DarkGray,
    }
}

/// A fixed-width bar for an average RAS, e.g. `[#######---]` for 7.2.
pub fn ras_gauge(avg_ras: Option<f64>) -> String {
    let filled = avg_ras
        .map(|r| (r.clamp(0.0, 10.0).round() as usize).min(GAUGE_WIDTH))
        .unwrap_or(0);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(GAUGE_WIDTH - filled))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
