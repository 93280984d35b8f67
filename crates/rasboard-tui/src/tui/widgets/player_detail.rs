// Player detail overlay widget.
//
// A centered modal over the main panel with every field of one record,
// its RAS profile link, and how the player compares with the position
// summary. Opened with Enter on the player table, closed with Esc.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use rasboard_core::color::ras_band_color;
use rasboard_core::dataset::{impact_label, PositionAggregate};
use rasboard_core::record::PlayerRecord;

use super::to_color;
use crate::tui::layout::centered_rect;
use crate::tui::ViewState;

const DIALOG_WIDTH: u16 = 72;
const DIALOG_HEIGHT: u16 = 14;

/// Render the detail overlay for `player`.
pub fn render(frame: &mut Frame, area: Rect, player: &PlayerRecord, state: &ViewState) {
    let dialog_area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" {} ", player.player),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(" Esc: close ").style(Style::default().fg(Color::DarkGray)));

    let aggregate = state
        .aggregates
        .iter()
        .find(|a| a.position == player.position);

    let paragraph = Paragraph::new(detail_lines(player, aggregate))
        .block(block)
        .style(Style::default().bg(Color::Black))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, dialog_area);
}

fn field_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {label:<11}"), Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

/// Body text of the overlay.
pub fn detail_lines(player: &PlayerRecord, aggregate: Option<&PositionAggregate>) -> Vec<Line<'static>> {
    let band = to_color(ras_band_color(player.ras_score));
    let mut lines = vec![
        field_line("Position", player.position.clone()),
        Line::from(vec![
            Span::styled(format!("  {:<11}", "RAS"), Style::default().fg(Color::Gray)),
            Span::styled(
                format!(" {} ", player.ras_display()),
                Style::default().fg(Color::Black).bg(band),
            ),
        ]),
        field_line("Pro Bowls", player.pro_bowl_count.to_string()),
        field_line("College", player.college.clone()),
        field_line("Draft", player.draft_year.to_string()),
        field_line("Profile", player.profile_link()),
        Line::default(),
    ];
    lines.extend(comparison_lines(player, aggregate));
    lines
}

fn comparison_lines(player: &PlayerRecord, aggregate: Option<&PositionAggregate>) -> Vec<Line<'static>> {
    let Some(agg) = aggregate else {
        return vec![Line::styled(
            format!("  No position summary for {}.", player.position),
            Style::default().fg(Color::DarkGray),
        )];
    };

    let avg = agg
        .avg_ras
        .map(|r| format!("{r:.2}"))
        .unwrap_or_else(|| "N/A".to_string());
    let mut lines = vec![field_line(
        "Pos. avg",
        format!(
            "RAS {avg}, {:.2} Pro Bowls over {} players",
            agg.avg_pro_bowls, agg.player_count
        ),
    )];

    if let (Some(ras), Some(avg)) = (player.ras_score, agg.avg_ras) {
        let diff = ras - avg;
        let color = if diff >= 0.0 { Color::Green } else { Color::Red };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<11}", "vs avg"), Style::default().fg(Color::Gray)),
            Span::styled(format!("{diff:+.2}"), Style::default().fg(color)),
        ]));
    }

    lines.push(Line::styled(
        format!(
            "  Athleticism {} impacts Pro Bowl selection for {}.",
            impact_label(agg.avg_ras),
            agg.position
        ),
        Style::default().fg(Color::Yellow),
    ));
    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::loaded_state;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn lines_compare_with_position_average() {
        let state = loaded_state();
        let player = state.records().iter().find(|p| p.player == "Adrian Peterson").unwrap();
        let agg = state.aggregates.iter().find(|a| a.position == "RB");
        let body = text(&detail_lines(player, agg));
        assert!(body.contains("9.62"));
        assert!(body.contains("https://ras.football/search/adrian-peterson/"));
        assert!(body.contains("+0.00"));
        assert!(body.contains("Athleticism significantly impacts Pro Bowl selection for RB."));
    }

    #[test]
    fn lines_without_summary_for_excluded_position() {
        let state = loaded_state();
        let player = state.records().iter().find(|p| p.player == "Ed Reed").unwrap();
        let agg = state.aggregates.iter().find(|a| a.position == player.position);
        assert!(agg.is_none());
        let body = text(&detail_lines(player, agg));
        assert!(body.contains("No position summary for DB."));
    }

    #[test]
    fn lines_skip_difference_when_ras_missing() {
        let state = loaded_state();
        let player = state.records().iter().find(|p| p.player == "Frank Gore").unwrap();
        let agg = state.aggregates.iter().find(|a| a.position == "RB");
        let body = text(&detail_lines(player, agg));
        assert!(body.contains("N/A"));
        assert!(!body.contains("vs avg"));
    }

    #[test]
    fn render_overlay() {
        let state = loaded_state();
        let player = &state.records()[0];
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), player, &state))
            .unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(screen.contains(&player.player));
        assert!(screen.contains("Esc: close"));
    }
}
