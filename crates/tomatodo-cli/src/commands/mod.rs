pub mod config;
pub mod run;
pub mod task;
pub mod timer;

use tomatodo_core::{alert, storage};
use tomatodo_core::{Config, Event, ManualClock, SessionController, TaskId};

/// Restore the stored session for a one-shot command.
///
/// Nothing ticks between invocations, so the clock is a manual one.
pub fn open_session(config: &Config) -> (SessionController, Option<Event>) {
    SessionController::restore(
        storage::open_gateway(),
        alert::from_config(&config.alert),
        Box::new(ManualClock::new()),
    )
}

pub fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

/// Resolve a position or id prefix, reporting a miss on stderr.
///
/// An unknown task is a no-op, not a failure.
pub fn resolve_or_note(session: &SessionController, reference: &str) -> Option<TaskId> {
    session
        .require_task(reference)
        .map_err(|e| eprintln!("{e}"))
        .ok()
}
