// Heatmap widget: measurement correlation matrix.
//
// Cells are tinted on a diverging scale (blue negative, white zero, red
// positive) and labelled with the coefficient. A side list ranks the other
// measures by the strength of their correlation with the first measure.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table};
use ratatui::Frame;

use rasboard_core::color::{color_for_scalar, contrast_text, ScaleDomain};
use rasboard_core::correlation::CorrelationMatrix;
use rasboard_core::loader::LoadState;

use super::to_color;
use crate::tui::ViewState;

/// Width of one matrix cell, including the coefficient text.
const CELL_WIDTH: u16 = 9;
/// Width of the row label column.
const LABEL_WIDTH: u16 = 20;
/// Width of the ranking panel.
const RANKING_WIDTH: u16 = 34;

/// Render the correlation heatmap into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Measurement Correlations");

    let matrix = match &state.correlations {
        LoadState::Loading => {
            frame.render_widget(Paragraph::new("  Loading correlations...").block(block), area);
            return;
        }
        LoadState::Failed(msg) => {
            let paragraph = Paragraph::new(format!("  Error loading data: {msg}"))
                .style(Style::default().fg(Color::Red))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }
        LoadState::Loaded(snapshot) => &snapshot.data,
    };

    if matrix.is_empty() {
        let paragraph = Paragraph::new("  No correlation data.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let [grid_area, ranking_area] =
        Layout::horizontal([Constraint::Min(LABEL_WIDTH), Constraint::Length(RANKING_WIDTH)])
            .areas(area);

    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(matrix.measures().iter().map(|m| Cell::from(truncate(m, CELL_WIDTH as usize)))),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = (0..matrix.len())
        .map(|r| matrix_row(matrix, r))
        .collect();

    let widths = std::iter::once(Constraint::Length(LABEL_WIDTH))
        .chain((0..matrix.len()).map(|_| Constraint::Length(CELL_WIDTH)));

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, grid_area);

    render_ranking(frame, ranking_area, matrix);
}

fn matrix_row(matrix: &CorrelationMatrix, row: usize) -> Row<'static> {
    let label = truncate(&matrix.measures()[row], LABEL_WIDTH as usize);
    let cells = (0..matrix.len()).map(|col| {
        let value = matrix.cell(row, col);
        let style = Style::default()
            .bg(to_color(color_for_scalar(value, ScaleDomain::CORRELATION)))
            .fg(to_color(contrast_text(value)));
        Cell::from(format_coefficient(value)).style(style)
    });
    Row::new(std::iter::once(Cell::from(label)).chain(cells))
}

fn render_ranking(frame: &mut Frame, area: Rect, matrix: &CorrelationMatrix) {
    let target = matrix.measures()[0].as_str();
    let items: Vec<ListItem> = matrix
        .ranked_against(target)
        .into_iter()
        .map(|(measure, value)| {
            let color = if value >= 0.0 { Color::Red } else { Color::Blue };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{value:+.2} "), Style::default().fg(color)),
                Span::raw(measure.to_string()),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("vs {}", truncate(target, RANKING_WIDTH as usize - 8))),
    );
    frame.render_widget(list, area);
}

/// Cell text: signed to two decimals, `N/A` when the pair is missing.
pub fn format_coefficient(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{v:+.2}"),
        None => "N/A".to_string(),
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        text.chars().take(width.saturating_sub(1)).chain(['…']).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
