mod engine;
mod mode;

pub use engine::{TimerEngine, TimerSession};
pub use mode::{
    format_clock, TimerMode, FOCUS_SECS, LONG_BREAK_SECS, POMODOROS_PER_CYCLE, SHORT_BREAK_SECS,
};
