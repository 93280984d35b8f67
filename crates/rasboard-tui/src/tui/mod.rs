// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the loaded data and every piece of view
// state. The app orchestrator pushes `UiUpdate` messages over an mpsc
// channel; the TUI applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{debug, info};

use rasboard_core::config::{AnalysisConfig, Config};
use rasboard_core::correlation::CorrelationMatrix;
use rasboard_core::dataset::{
    aggregate_by_position, exclude_positions, filter_by_field, find_player, order_aggregates,
    position_options, retain_min_players, AggregateOrder, FieldFilter, PositionAggregate, ALL,
};
use rasboard_core::loader::LoadState;
use rasboard_core::predictions::PredictionSet;
use rasboard_core::record::PlayerRecord;
use rasboard_core::table::{TableAction, TablePage, TableState};

use crate::protocol::{TabId, UiUpdate, UserCommand};

use layout::build_layout;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state: the loaded resources plus everything the user can
/// change with the keyboard.
pub struct ViewState {
    pub players: LoadState<Vec<PlayerRecord>>,
    pub correlations: LoadState<CorrelationMatrix>,
    pub predictions: LoadState<PredictionSet>,
    /// Position summary, recomputed when players load.
    pub aggregates: Vec<PositionAggregate>,
    pub aggregate_order: AggregateOrder,
    /// `"All"` plus the positions present in the player data.
    pub position_options: Vec<String>,
    /// Sort, filter, and page of the player table.
    pub table: TableState,
    /// Highlighted row within the current page.
    pub selected: usize,
    /// Player shown in the detail overlay, by identity key.
    pub detail: Option<String>,
    /// Index into `PredictionSet::positions()`.
    pub prediction_position: usize,
    pub active_tab: TabId,
    pub confirm_quit: bool,
    pub analysis: AnalysisConfig,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::new(&Config::default())
    }
}

impl ViewState {
    pub fn new(config: &Config) -> Self {
        ViewState {
            players: LoadState::Loading,
            correlations: LoadState::Loading,
            predictions: LoadState::Loading,
            aggregates: Vec::new(),
            aggregate_order: AggregateOrder::default(),
            position_options: vec![ALL.to_string()],
            table: TableState::new(config.page_size()),
            selected: 0,
            detail: None,
            prediction_position: 0,
            active_tab: TabId::default(),
            confirm_quit: false,
            analysis: config.analysis.clone(),
        }
    }

    /// Loaded players, or an empty slice while loading or after a failure.
    pub fn records(&self) -> &[PlayerRecord] {
        self.players.data().map(Vec::as_slice).unwrap_or(&[])
    }

    /// The player table page currently on screen.
    pub fn table_page(&self) -> TablePage<'_> {
        self.table.project(self.records())
    }

    /// Apply a table transition and reset the highlight. A filter change
    /// also recomputes the position summary.
    pub fn apply_table(&mut self, action: TableAction) {
        let previous_filter = self.table.filter.clone();
        self.table = self.table.update(action, self.records());
        self.selected = 0;
        if self.table.filter != previous_filter {
            self.recompute_aggregates();
        }
    }

    /// The highlighted record on the current page.
    pub fn selected_player(&self) -> Option<&PlayerRecord> {
        self.table_page().rows.get(self.selected).copied()
    }

    /// Record shown in the detail overlay, if it still exists.
    pub fn detail_player(&self) -> Option<&PlayerRecord> {
        self.detail
            .as_deref()
            .and_then(|name| find_player(self.records(), name))
    }

    /// Aggregates in the order chosen by the user.
    pub fn ordered_aggregates(&self) -> Vec<PositionAggregate> {
        order_aggregates(&self.aggregates, self.aggregate_order)
    }

    /// Position shown on the predictions tab.
    pub fn prediction_position_name(&self) -> String {
        self.predictions
            .data()
            .map(|set| set.positions())
            .and_then(|positions| positions.get(self.prediction_position).cloned())
            .unwrap_or_else(|| ALL.to_string())
    }

    /// Position the player table is filtered to, `"All"` when unfiltered.
    pub fn position_filter_name(&self) -> String {
        match &self.table.filter {
            FieldFilter::All => ALL.to_string(),
            other => self
                .position_options
                .iter()
                .find(|p| FieldFilter::position(p) == *other)
                .cloned()
                .unwrap_or_else(|| other.label()),
        }
    }

    /// Position summary over the records that pass the table filter.
    fn recompute_aggregates(&mut self) {
        let filtered = filter_by_field(self.records(), &self.table.filter);
        let kept = exclude_positions(&filtered, &self.analysis.excluded_positions);
        self.aggregates = retain_min_players(
            &aggregate_by_position(&kept),
            self.analysis.min_position_players,
        );
    }

    fn rebuild_player_views(&mut self) {
        self.position_options = position_options(self.records());
        self.table = TableState {
            filter: FieldFilter::All,
            page: 1,
            ..self.table.clone()
        };
        self.recompute_aggregates();
        self.selected = 0;
        if self.detail_player().is_none() {
            self.detail = None;
        }
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Reloading => {
            state.players = LoadState::Loading;
            state.correlations = LoadState::Loading;
            state.predictions = LoadState::Loading;
            state.rebuild_player_views();
        }
        UiUpdate::Players(players) => {
            state.players = players;
            state.rebuild_player_views();
        }
        UiUpdate::Correlations(correlations) => {
            state.correlations = correlations;
        }
        UiUpdate::Predictions(predictions) => {
            state.predictions = predictions;
            state.prediction_position = 0;
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    match state.active_tab {
        TabId::Players => render_players_tab(frame, layout.main_panel, state),
        TabId::Positions => widgets::positions::render(frame, layout.main_panel, state),
        TabId::Correlations => widgets::heatmap::render(frame, layout.main_panel, state),
        TabId::Predictions => widgets::predictions::render(frame, layout.main_panel, state),
    }
    render_help_bar(frame, layout.help_bar, state);

    if let Some(player) = state.detail_player() {
        widgets::player_detail::render(frame, layout.main_panel, player, state);
    }
    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }
}

/// The scatter is drawn beside the table from this main panel width.
const SCATTER_MIN_WIDTH: u16 = 120;

fn render_players_tab(frame: &mut Frame, area: ratatui::layout::Rect, state: &ViewState) {
    if area.width < SCATTER_MIN_WIDTH {
        widgets::player_table::render(frame, area, state);
        return;
    }
    let [table, scatter] =
        Layout::horizontal([Constraint::Fill(3), Constraint::Fill(1)]).areas(area);
    widgets::player_table::render(frame, table, state);
    widgets::ras_scatter::render(frame, scatter, state);
}

/// Key hints for the active tab.
pub fn help_text(state: &ViewState) -> &'static str {
    if state.detail.is_some() {
        return " Esc:Close | q:Quit";
    }
    match state.active_tab {
        TabId::Players => {
            " 1-4:Tabs | s:Sort | d:Dir | p:Position | n/b:Page | Enter:Details | R:Reload | q:Quit"
        }
        TabId::Positions => " 1-4:Tabs | o:Order | R:Reload | q:Quit",
        TabId::Correlations => " 1-4:Tabs | R:Reload | q:Quit",
        TabId::Predictions => " 1-4:Tabs | p:Position | R:Reload | q:Quit",
    }
}

fn render_help_bar(frame: &mut Frame, area: ratatui::layout::Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        help_text(state),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    config: &Config,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::new(config);
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    None => {
                        info!("UI channel closed, leaving TUI");
                        break Ok(());
                    }
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            debug!("Sending command {:?}", cmd);
                            let _ = cmd_tx.send(cmd).await;
                            if cmd == UserCommand::Quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(anyhow::anyhow!("terminal input error: {e}")),
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(anyhow::anyhow!("failed to draw frame: {e}"));
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
