// Player table widget: the sorted, filtered, paginated player list.
//
// Columns: #, Player, Pos, RAS, Pro Bowls, College, Draft
// The sorted column header carries the direction arrow; RAS cells are
// tinted by score band; the footer shows the row range and page.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState as HighlightState};
use ratatui::Frame;

use rasboard_core::color::ras_band_color;
use rasboard_core::loader::LoadState;
use rasboard_core::record::{Field, PlayerRecord};
use rasboard_core::table::{TablePage, TableState};

use super::to_color;
use crate::tui::ViewState;

/// Render the player table into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(build_title(state));

    match &state.players {
        LoadState::Loading => {
            frame.render_widget(Paragraph::new("Loading players...").block(block), area);
            return;
        }
        LoadState::Failed(msg) => {
            let text = format!("Error loading data: {msg}");
            let paragraph = Paragraph::new(text)
                .style(Style::default().fg(Color::Red))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }
        LoadState::Loaded(_) => {}
    }

    let page = state.table_page();
    let header = Row::new(
        std::iter::once(Cell::from("#"))
            .chain(Field::ALL.iter().map(|f| Cell::from(header_label(*f, &state.table)))),
    )
    .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = page
        .rows
        .iter()
        .enumerate()
        .map(|(i, p)| player_row(page.first_index + i, p))
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Min(18),
        Constraint::Length(9),
        Constraint::Length(7),
        Constraint::Length(10),
        Constraint::Min(14),
        Constraint::Length(14),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block.title_bottom(footer(&page)))
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">> ");

    let mut highlight = HighlightState::default();
    if !page.rows.is_empty() {
        highlight.select(Some(state.selected.min(page.rows.len() - 1)));
    }
    frame.render_stateful_widget(table, area, &mut highlight);
}

fn player_row(index: usize, p: &PlayerRecord) -> Row<'static> {
    let band = to_color(ras_band_color(p.ras_score));
    Row::new(vec![
        Cell::from(index.to_string()),
        Cell::from(p.player.clone()),
        Cell::from(p.position.clone()),
        Cell::from(p.ras_display()).style(Style::default().fg(Color::Black).bg(band)),
        Cell::from(p.pro_bowl_count.to_string()),
        Cell::from(p.college.clone()),
        Cell::from(p.draft_year.to_string()),
    ])
}

/// Column header with the direction arrow on the sorted column.
pub fn header_label(field: Field, table: &TableState) -> String {
    if field == table.sort_field {
        format!("{} {}", field.label(), table.direction.arrow())
    } else {
        field.label().to_string()
    }
}

fn footer(page: &TablePage<'_>) -> Line<'static> {
    Line::from(format!(
        " {} | Page {} of {} ",
        page.summary(),
        page.page,
        page.total_pages
    ))
}

fn build_title(state: &ViewState) -> Line<'static> {
    let mut title = String::from("Players");
    let position = state.position_filter_name();
    if position != rasboard_core::dataset::ALL {
        title.push_str(&format!(" [{position}]"));
    }
    title.push_str(&format!(
        " sorted by {} {}",
        state.table.sort_field.label(),
        state.table.direction.arrow()
    ));
    Line::from(title)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
