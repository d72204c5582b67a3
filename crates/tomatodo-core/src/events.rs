use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::TaskId;
use crate::timer::TimerMode;

/// Every state change in the system produces an Event.
/// The CLI prints them; the alert sink listens for completions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// A running period reached zero and the engine moved on.
    TimerCompleted {
        from: TimerMode,
        to: TimerMode,
        pomodoros_completed: u32,
        cycles_completed: u32,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        from: TimerMode,
        to: TimerMode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    TaskAdded {
        id: TaskId,
        text: String,
        at: DateTime<Utc>,
    },
    TaskToggled {
        id: TaskId,
        completed: bool,
        at: DateTime<Utc>,
    },
    TaskEdited {
        id: TaskId,
        text: String,
        at: DateTime<Utc>,
    },
    TaskDeleted {
        id: TaskId,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: TimerMode,
        label: String,
        is_running: bool,
        is_break: bool,
        remaining_secs: u32,
        clock: String,
        pomodoros_completed: u32,
        cycles_completed: u32,
        /// 1-based number of the cycle in progress.
        cycle_number: u32,
        motto: String,
        open_tasks: usize,
        done_tasks: usize,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn is_completion(&self) -> bool {
        matches!(self, Event::TimerCompleted { .. })
    }
}
