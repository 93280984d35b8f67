// Status bar widget: tab bar and per-resource load indicators.

use chrono::{DateTime, Local};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use rasboard_core::loader::LoadState;

use crate::protocol::TabId;
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [tab bar] | [players] [correlations] [predictions] [loaded at]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![Span::raw(" ")];
    spans.extend(tab_spans(state.active_tab));
    spans.push(Span::styled("| ", Style::default().fg(Color::Gray)));

    spans.extend(load_spans("players", &state.players, |p| p.len()));
    spans.extend(load_spans("corr", &state.correlations, |m| m.len()));
    spans.extend(load_spans("preds", &state.predictions, |s| s.len()));

    if let Some(snapshot) = state.players.snapshot() {
        spans.push(Span::styled(
            format!("| loaded {}", loaded_clock(&snapshot.loaded_at)),
            Style::default().fg(Color::Gray),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Wall-clock time of a load, e.g. `14:03:27`.
pub fn loaded_clock(at: &DateTime<Local>) -> String {
    at.format("%H:%M:%S").to_string()
}

/// Dot color for a load state: yellow loading, green loaded, red failed.
pub fn load_indicator<T>(state: &LoadState<T>) -> Color {
    match state {
        LoadState::Loading => Color::Yellow,
        LoadState::Loaded(_) => Color::Green,
        LoadState::Failed(_) => Color::Red,
    }
}

fn load_spans<T>(name: &str, state: &LoadState<T>, count: impl Fn(&T) -> usize) -> Vec<Span<'static>> {
    let detail = match state {
        LoadState::Loading => "…".to_string(),
        LoadState::Loaded(snapshot) => count(&snapshot.data).to_string(),
        LoadState::Failed(_) => "error".to_string(),
    };
    vec![
        Span::styled("● ", Style::default().fg(load_indicator(state))),
        Span::styled(format!("{name} {detail} "), Style::default().fg(Color::White)),
    ]
}

/// Tab indicator spans with the active tab highlighted, e.g.
/// "[1:Players] [2:Positions] [3:Correlations] [4:Predictions]".
pub fn tab_spans(active: TabId) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for tab in TabId::ALL {
        let style = if tab == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{}:{}]", tab.key(), tab.label()), style));
        spans.push(Span::raw(" "));
    }
    spans
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
