//! Timer engine implementation.
//!
//! The engine is a pure countdown state machine. It owns no clock and spawns
//! nothing: the caller invokes `tick()` once per second while the timer runs.
//!
//! ## State Transitions
//!
//! ```text
//! {Focus, ShortBreak, LongBreak} x {Running, Paused}
//!
//! Focus     --zero--> ShortBreak   (pomodoros % 4 != 0)
//! Focus     --zero--> LongBreak    (pomodoros % 4 == 0, cycles += 1)
//! *Break    --zero--> Focus
//! ```
//!
//! Every completion lands in the paused state with the new mode's full duration.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new();
//! engine.toggle_running();
//! // Once per second:
//! if let Some(event) = engine.tick() { /* period finished */ }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::mode::{TimerMode, POMODOROS_PER_CYCLE};
use crate::events::Event;

/// Countdown state persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSession {
    pub remaining_secs: u32,
    pub mode: TimerMode,
    pub is_running: bool,
    pub pomodoros_completed: u32,
    pub cycles_completed: u32,
}

impl Default for TimerSession {
    fn default() -> Self {
        Self {
            remaining_secs: TimerMode::Focus.duration_secs(),
            mode: TimerMode::Focus,
            is_running: false,
            pomodoros_completed: 0,
            cycles_completed: 0,
        }
    }
}

/// Core timer engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerEngine {
    session: TimerSession,
}

impl TimerEngine {
    /// Fresh engine: focus mode, full duration, paused, zero counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a previously persisted session.
    pub fn from_session(session: TimerSession) -> Self {
        Self { session }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session(&self) -> &TimerSession {
        &self.session
    }

    pub fn mode(&self) -> TimerMode {
        self.session.mode
    }

    pub fn remaining_secs(&self) -> u32 {
        self.session.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.session.is_running
    }

    pub fn pomodoros_completed(&self) -> u32 {
        self.session.pomodoros_completed
    }

    pub fn cycles_completed(&self) -> u32 {
        self.session.cycles_completed
    }

    /// Running with nothing left on the clock: a completion is pending.
    pub fn is_due(&self) -> bool {
        self.session.is_running && self.session.remaining_secs == 0
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn toggle_running(&mut self) -> Event {
        self.session.is_running = !self.session.is_running;
        if self.session.is_running {
            Event::TimerStarted {
                mode: self.session.mode,
                remaining_secs: self.session.remaining_secs,
                at: Utc::now(),
            }
        } else {
            Event::TimerPaused {
                mode: self.session.mode,
                remaining_secs: self.session.remaining_secs,
                at: Utc::now(),
            }
        }
    }

    /// Start if paused. `None` when already running.
    pub fn start(&mut self) -> Option<Event> {
        if self.session.is_running {
            return None;
        }
        Some(self.toggle_running())
    }

    /// Pause if running. `None` when already paused.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.session.is_running {
            return None;
        }
        Some(self.toggle_running())
    }

    /// One second of countdown.
    ///
    /// Returns `Some(Event::TimerCompleted)` on the tick that crosses from one
    /// second to zero. Ticks while paused or already at zero do nothing.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.session.is_running || self.session.remaining_secs == 0 {
            return None;
        }
        self.session.remaining_secs -= 1;
        if self.session.remaining_secs == 0 {
            return self.on_reach_zero();
        }
        None
    }

    /// Complete the current period if one is pending.
    ///
    /// Only fires while running at zero; the transition itself pauses the
    /// timer and refills the clock, so a second call is always a no-op.
    pub fn on_reach_zero(&mut self) -> Option<Event> {
        if !self.is_due() {
            return None;
        }
        let from = self.session.mode;
        let to = match from {
            TimerMode::Focus => {
                let session = &mut self.session;
                session.pomodoros_completed = session.pomodoros_completed.saturating_add(1);
                if session.pomodoros_completed % POMODOROS_PER_CYCLE == 0 {
                    session.cycles_completed = session.cycles_completed.saturating_add(1);
                    TimerMode::LongBreak
                } else {
                    TimerMode::ShortBreak
                }
            }
            TimerMode::ShortBreak | TimerMode::LongBreak => TimerMode::Focus,
        };
        self.enter(to);
        Some(Event::TimerCompleted {
            from,
            to,
            pomodoros_completed: self.session.pomodoros_completed,
            cycles_completed: self.session.cycles_completed,
            at: Utc::now(),
        })
    }

    /// User-selected mode change. Counters are left alone.
    pub fn switch_mode(&mut self, target: TimerMode) -> Event {
        let from = self.session.mode;
        self.enter(target);
        Event::ModeSwitched {
            from,
            to: target,
            remaining_secs: self.session.remaining_secs,
            at: Utc::now(),
        }
    }

    pub fn reset_all(&mut self) -> Event {
        self.session = TimerSession::default();
        Event::TimerReset { at: Utc::now() }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter(&mut self, mode: TimerMode) {
        self.session.mode = mode;
        self.session.remaining_secs = mode.duration_secs();
        self.session.is_running = false;
    }
}
