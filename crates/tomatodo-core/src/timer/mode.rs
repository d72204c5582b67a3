use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Length of a focus period in seconds.
pub const FOCUS_SECS: u32 = 25 * 60;
/// Length of a short break in seconds.
pub const SHORT_BREAK_SECS: u32 = 5 * 60;
/// Length of a long break in seconds.
pub const LONG_BREAK_SECS: u32 = 15 * 60;
/// Every n-th completed focus period is followed by a long break.
pub const POMODOROS_PER_CYCLE: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    #[default]
    Focus,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub const ALL: [TimerMode; 3] = [TimerMode::Focus, TimerMode::ShortBreak, TimerMode::LongBreak];

    /// Fixed duration of this mode in seconds.
    pub fn duration_secs(self) -> u32 {
        match self {
            TimerMode::Focus => FOCUS_SECS,
            TimerMode::ShortBreak => SHORT_BREAK_SECS,
            TimerMode::LongBreak => LONG_BREAK_SECS,
        }
    }

    pub fn is_break(self) -> bool {
        !matches!(self, TimerMode::Focus)
    }

    /// Human-readable tab label.
    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Focus => "Pomodoro",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }

    /// One-line encouragement shown under the clock.
    pub fn motto(self) -> &'static str {
        if self.is_break() {
            "Relax and recharge!"
        } else {
            "Stay focused and productive!"
        }
    }

    fn slug(self) -> &'static str {
        match self {
            TimerMode::Focus => "focus",
            TimerMode::ShortBreak => "short-break",
            TimerMode::LongBreak => "long-break",
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for TimerMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "focus" | "pomodoro" | "work" => Ok(TimerMode::Focus),
            "short-break" | "shortbreak" | "short" => Ok(TimerMode::ShortBreak),
            "long-break" | "longbreak" | "long" => Ok(TimerMode::LongBreak),
            _ => Err(ValidationError::UnknownMode(s.to_string())),
        }
    }
}

/// Render seconds as `MM:SS`.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
