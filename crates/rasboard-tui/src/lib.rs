// Library root: exposes the orchestrator, message types, and TUI so the
// binary and integration tests share one API.

pub mod app;
pub mod protocol;
pub mod tui;
