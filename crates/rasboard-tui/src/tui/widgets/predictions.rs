// Predictions widget: multi-Pro-Bowl probability against RAS.
//
// One line per model for the selected position (cycled with `p`). The
// "All" view mixes positions, so it is drawn as a scatter instead.

use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Line;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph};
use ratatui::Frame;

use rasboard_core::dataset::ALL;
use rasboard_core::loader::LoadState;
use rasboard_core::predictions::{Model, PredictionSet};

use crate::tui::ViewState;

/// Render the prediction chart into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let position = state.prediction_position_name();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Pro Bowl probability by RAS: {position}"))
        .title_bottom(Line::from(" p: change position ").style(Style::default().fg(Color::DarkGray)));

    let set = match &state.predictions {
        LoadState::Loading => {
            frame.render_widget(Paragraph::new("  Loading predictions...").block(block), area);
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

    let curves = model_curves(set, &position);
    if curves.iter().all(|(_, points)| points.is_empty()) {
        let paragraph = Paragraph::new("  No predictions for this position.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let graph_type = if position == ALL {
        GraphType::Scatter
    } else {
        GraphType::Line
    };

    let datasets: Vec<Dataset> = curves
        .iter()
        .map(|(model, points)| {
            Dataset::default()
                .name(model.label())
                .marker(Marker::Braille)
                .graph_type(graph_type)
                .style(Style::default().fg(model_color(*model)))
                .data(points)
        })
        .collect();

    let axis_style = Style::default().fg(Color::Gray);
    let chart = Chart::new(datasets)
        .block(block)
        .legend_position(Some(LegendPosition::TopLeft))
        .x_axis(
            Axis::default()
                .title("RAS")
                .style(axis_style)
                .bounds([0.0, 10.0])
                .labels(["0", "5", "10"]),
        )
        .y_axis(
            Axis::default()
                .title("P(multi Pro Bowl)")
                .style(axis_style)
                .bounds([0.0, 1.0])
                .labels(["0.0", "0.5", "1.0"])
                .labels_alignment(Alignment::Right),
        )
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));
    frame.render_widget(chart, area);
}

/// Each model's curve for `position`, in `Model::ALL` order.
pub fn model_curves(set: &PredictionSet, position: &str) -> Vec<(Model, Vec<(f64, f64)>)> {
    Model::ALL
        .iter()
        .map(|model| (*model, set.curve(position, *model)))
        .collect()
}

fn model_color(model: Model) -> Color {
    match model {
        Model::LogisticRegression => Color::Cyan,
        Model::RandomForest => Color::Magenta,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::loaded;
    use rasboard_core::predictions::PredictionPoint;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn point(ras: f64, position: &str, logistic: Option<f64>, forest: Option<f64>) -> PredictionPoint {
        PredictionPoint {
            ras,
            position: position.to_string(),
            logistic_prob: logistic,
            forest_prob: forest,
        }
    }

    fn sample_set() -> PredictionSet {
        PredictionSet::new(vec![
            point(3.0, "WR", Some(0.1), Some(0.05)),
            point(9.0, "WR", Some(0.6), Some(0.7)),
            point(6.0, "RB", Some(0.3), None),
        ])
    }

    fn screen(state: &ViewState) -> String {
        let backend = TestBackend::new(80, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn curves_skip_missing_model_output() {
        let curves = model_curves(&sample_set(), "RB");
        assert_eq!(curves[0], (Model::LogisticRegression, vec![(6.0, 0.3)]));
        assert_eq!(curves[1], (Model::RandomForest, vec![]));
    }

    #[test]
    fn render_loading() {
        assert!(screen(&ViewState::default()).contains("Loading predictions..."));
    }

    #[test]
    fn render_selected_position_with_legend() {
        let mut state = ViewState::default();
        state.predictions = loaded(sample_set());
        // positions: All, WR, RB
        state.prediction_position = 1;
        let text = screen(&state);
        assert!(text.contains("Pro Bowl probability by RAS: WR"));
        assert!(text.contains("Logistic Regression"));
        assert!(text.contains("Random Forest"));
    }

    #[test]
    fn render_all_positions_scatter() {
        let mut state = ViewState::default();
        state.predictions = loaded(sample_set());
        assert!(screen(&state).contains("Pro Bowl probability by RAS: All"));
    }

    #[test]
    fn render_empty_set_message() {
        let mut state = ViewState::default();
        state.predictions = loaded(PredictionSet::new(Vec::new()));
        assert!(screen(&state).contains("No predictions for this position."));
    }
}
