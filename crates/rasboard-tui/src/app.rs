// Application orchestrator.
//
// Owns the in-flight load tasks. At startup, and again on every reload
// command, it spawns one task per resource; each task pushes its finished
// `LoadState` to the TUI over `ui_tx`. A reload aborts loads still in flight
// so an older response can never overwrite a newer one.

use std::future::Future;

use rasboard_core::config::Config;
use rasboard_core::error::LoadError;
use rasboard_core::loader::{self, DataSource, LoadState};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::protocol::{UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub config: Config,
    loads: Vec<JoinHandle<()>>,
    /// Number of load rounds started, including the initial one.
    pub load_rounds: usize,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        AppState {
            config,
            loads: Vec::new(),
            load_rounds: 0,
        }
    }

    /// Spawn one load task per resource, aborting any still running.
    pub fn start_loads(&mut self, ui_tx: &mpsc::Sender<UiUpdate>) {
        self.abort_loads();
        self.load_rounds += 1;
        info!("Starting load round {}", self.load_rounds);

        self.loads.push(spawn_load(
            "players",
            self.config.players_source(),
            ui_tx.clone(),
            |source| async move { loader::load_players(&source).await },
            UiUpdate::Players,
        ));
        self.loads.push(spawn_load(
            "correlations",
            self.config.correlations_source(),
            ui_tx.clone(),
            |source| async move { loader::load_correlations(&source).await },
            UiUpdate::Correlations,
        ));
        self.loads.push(spawn_load(
            "predictions",
            self.config.predictions_source(),
            ui_tx.clone(),
            |source| async move { loader::load_predictions(&source).await },
            UiUpdate::Predictions,
        ));
    }

    pub fn abort_loads(&mut self) {
        for handle in self.loads.drain(..) {
            handle.abort();
        }
    }
}

fn spawn_load<T, F, Fut>(
    kind: &'static str,
    source: DataSource,
    ui_tx: mpsc::Sender<UiUpdate>,
    load: F,
    wrap: fn(LoadState<T>) -> UiUpdate,
) -> JoinHandle<()>
where
    T: Send + 'static,
    F: FnOnce(DataSource) -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, LoadError>> + Send + 'static,
{
    tokio::spawn(async move {
        let result = load(source.clone()).await;
        if let Err(e) = &result {
            error!("Failed to load {} from {}: {}", kind, source, e);
        }
        let state = LoadState::from_result(result, &source);
        let _ = ui_tx.send(wrap(state)).await;
    })
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the orchestrator until the TUI quits or drops its command sender.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");
    state.start_loads(&ui_tx);

    loop {
        match cmd_rx.recv().await {
            Some(UserCommand::Quit) => {
                info!("Quit command received, shutting down");
                break;
            }
            Some(cmd) => {
                handle_user_command(&mut state, cmd, &ui_tx).await;
            }
            None => {
                info!("Command channel closed, shutting down");
                break;
            }
        }
    }

    state.abort_loads();
    info!("Application event loop exiting");
    Ok(())
}

async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::Reload => {
            info!("Reload requested");
            let _ = ui_tx.send(UiUpdate::Reloading).await;
            state.start_loads(ui_tx);
        }
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn fixture(name: &str) -> String {
        format!(
            "{}/../rasboard-core/tests/fixtures/{}",
            env!("CARGO_MANIFEST_DIR"),
            name
        )
    }

    fn fixture_config() -> Config {
        let mut config = Config::default();
        config.data.players = fixture("players.json");
        config.data.correlations = fixture("correlations.json");
        config.data.predictions = fixture("predictions.json");
        config
    }

    async fn next_update(rx: &mut mpsc::Receiver<UiUpdate>) -> UiUpdate {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for UiUpdate")
            .expect("ui channel closed")
    }

    /// Collect one update per resource, in whatever order they finish.
    async fn collect_round(rx: &mut mpsc::Receiver<UiUpdate>) -> (bool, bool, bool) {
        let (mut players, mut corr, mut preds) = (false, false, false);
        for _ in 0..3 {
            match next_update(rx).await {
                UiUpdate::Players(s) => players = s.data().is_some(),
                UiUpdate::Correlations(s) => corr = s.data().is_some(),
                UiUpdate::Predictions(s) => preds = s.data().is_some(),
                UiUpdate::Reloading => panic!("unexpected Reloading"),
            }
        }
        (players, corr, preds)
    }

    #[tokio::test]
    async fn initial_round_loads_every_resource() {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (ui_tx, mut ui_rx) = mpsc::channel(16);
        let handle = tokio::spawn(run(cmd_rx, ui_tx, AppState::new(fixture_config())));

        assert_eq!(collect_round(&mut ui_rx).await, (true, true, true));

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn reload_announces_then_loads_again() {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (ui_tx, mut ui_rx) = mpsc::channel(16);
        let handle = tokio::spawn(run(cmd_rx, ui_tx, AppState::new(fixture_config())));

        collect_round(&mut ui_rx).await;
        cmd_tx.send(UserCommand::Reload).await.unwrap();
        assert!(matches!(next_update(&mut ui_rx).await, UiUpdate::Reloading));
        assert_eq!(collect_round(&mut ui_rx).await, (true, true, true));

        drop(cmd_tx);
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn missing_file_reports_failure() {
        let mut config = fixture_config();
        config.data.predictions = fixture("does_not_exist.json");
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (ui_tx, mut ui_rx) = mpsc::channel(16);
        let handle = tokio::spawn(run(cmd_rx, ui_tx, AppState::new(config)));

        let mut failure = None;
        for _ in 0..3 {
            if let UiUpdate::Predictions(state) = next_update(&mut ui_rx).await {
                failure = state.error().map(str::to_string);
            }
        }
        let message = failure.expect("predictions should fail");
        assert!(message.contains("does_not_exist.json"));

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
    }
}
