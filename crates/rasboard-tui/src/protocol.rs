// Message types exchanged between the app orchestrator and the TUI.

use rasboard_core::correlation::CorrelationMatrix;
use rasboard_core::loader::LoadState;
use rasboard_core::predictions::PredictionSet;
use rasboard_core::record::PlayerRecord;

/// Tabs of the main panel, in key order (`1`..`4`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabId {
    #[default]
    Players,
    Positions,
    Correlations,
    Predictions,
}

impl TabId {
    pub const ALL: [TabId; 4] = [
        TabId::Players,
        TabId::Positions,
        TabId::Correlations,
        TabId::Predictions,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TabId::Players => "Players",
            TabId::Positions => "Positions",
            TabId::Correlations => "Correlations",
            TabId::Predictions => "Predictions",
        }
    }

    /// Key that selects this tab.
    pub fn key(&self) -> char {
        match self {
            TabId::Players => '1',
            TabId::Positions => '2',
            TabId::Correlations => '3',
            TabId::Predictions => '4',
        }
    }
}

/// Updates pushed from the app orchestrator to the TUI.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    /// A reload began; every resource goes back to `Loading`.
    Reloading,
    Players(LoadState<Vec<PlayerRecord>>),
    Correlations(LoadState<CorrelationMatrix>),
    Predictions(LoadState<PredictionSet>),
}

/// Commands sent from the TUI to the app orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    /// Re-fetch every resource and replace the loaded data wholesale.
    Reload,
    Quit,
}
