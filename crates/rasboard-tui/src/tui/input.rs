// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState changes (tab switching, table
// sorting/filtering/paging, the detail overlay).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use rasboard_core::dataset::FieldFilter;
use rasboard_core::table::TableAction;

use super::ViewState;
use crate::protocol::{TabId, UserCommand};

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator (Reload, Quit). Returns `None` when the key press was
/// handled locally by mutating `ViewState`.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if view_state.detail.is_some() {
        return handle_detail(key_event, view_state);
    }

    match key_event.code {
        KeyCode::Char('1') => {
            view_state.active_tab = TabId::Players;
            None
        }
        KeyCode::Char('2') => {
            view_state.active_tab = TabId::Positions;
            None
        }
        KeyCode::Char('3') => {
            view_state.active_tab = TabId::Correlations;
            None
        }
        KeyCode::Char('4') => {
            view_state.active_tab = TabId::Predictions;
            None
        }

        KeyCode::Char('R') | KeyCode::Char('r') => Some(UserCommand::Reload),

        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => match view_state.active_tab {
            TabId::Players => handle_players_key(key_event, view_state),
            TabId::Positions => handle_positions_key(key_event, view_state),
            TabId::Predictions => handle_predictions_key(key_event, view_state),
            TabId::Correlations => None,
        },
    }
}

/// In quit confirmation mode `y`/`q` confirm, `n`/Esc cancel, and all
/// other keys are blocked.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// While the detail overlay is open only closing and quitting work.
fn handle_detail(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace => {
            view_state.detail = None;
            None
        }
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }
        _ => None,
    }
}

fn handle_players_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('s') => {
            let next = view_state.table.sort_field.next();
            view_state.apply_table(TableAction::SortBy(next));
        }
        KeyCode::Char('d') => view_state.apply_table(TableAction::ToggleDirection),
        KeyCode::Char('p') => cycle_position_filter(view_state),
        KeyCode::Char('n') | KeyCode::Right | KeyCode::PageDown => {
            view_state.apply_table(TableAction::NextPage)
        }
        KeyCode::Char('b') | KeyCode::Left | KeyCode::PageUp => {
            view_state.apply_table(TableAction::PrevPage)
        }
        KeyCode::Home => view_state.apply_table(TableAction::GoToPage(1)),
        KeyCode::End => {
            let last = view_state.table.page_count(view_state.records());
            view_state.apply_table(TableAction::GoToPage(last));
        }
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.selected = view_state.selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let rows = view_state.table_page().rows.len();
            if view_state.selected + 1 < rows {
                view_state.selected += 1;
            }
        }
        KeyCode::Enter => {
            view_state.detail = view_state.selected_player().map(|p| p.player.clone());
        }
        _ => {}
    }
    None
}

fn handle_positions_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    if key_event.code == KeyCode::Char('o') {
        view_state.aggregate_order = view_state.aggregate_order.next();
    }
    None
}

fn handle_predictions_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    if key_event.code == KeyCode::Char('p') {
        let count = view_state
            .predictions
            .data()
            .map(|set| set.positions().len())
            .unwrap_or(1);
        view_state.prediction_position = (view_state.prediction_position + 1) % count;
    }
    None
}

/// Cycle the table's position filter: All -> first position -> ... -> All.
fn cycle_position_filter(view_state: &mut ViewState) {
    let options = &view_state.position_options;
    let current = view_state.position_filter_name();
    let idx = options.iter().position(|p| *p == current).unwrap_or(0);
    let next = options
        .get((idx + 1) % options.len().max(1))
        .map(|p| FieldFilter::position(p))
        .unwrap_or_default();
    view_state.apply_table(TableAction::SetFilter(next));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
