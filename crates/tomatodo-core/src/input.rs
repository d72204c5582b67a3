//! Line-oriented user input for interactive sessions.
//!
//! Input arrives in one of two focus states. In [`InputFocus::Command`] each
//! line is a command, and a line equal to the toggle key flips the timer. In
//! [`InputFocus::TextEntry`] the line is task text, so the toggle key is just
//! text and never reaches the timer.

use crate::error::ValidationError;
use crate::timer::TimerMode;

/// Line that abandons a text-entry prompt.
pub const CANCEL_ENTRY: &str = ":cancel";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFocus {
    #[default]
    Command,
    /// A task add/edit prompt is open.
    TextEntry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ToggleRunning,
    Start,
    Pause,
    SwitchMode(TimerMode),
    ResetAll,
    Status,
    ListTasks,
    AddTask(String),
    /// Open the add prompt; the next line is the text.
    PromptAdd,
    ToggleTask(String),
    EditTask { reference: String, text: String },
    /// Open the edit prompt for a task; the next line is the new text.
    BeginEdit(String),
    DeleteTask(String),
    /// Text typed into an open prompt.
    SubmitText(String),
    CancelEntry,
    Help,
    Quit,
}

/// Parse one input line.
///
/// `Ok(None)` means the line is blank and should be ignored.
pub fn parse_line(
    line: &str,
    focus: InputFocus,
    toggle_key: &str,
) -> Result<Option<Command>, ValidationError> {
    let line = line.trim_end_matches(&['\r', '\n'][..]);

    if focus == InputFocus::TextEntry {
        if line.trim() == CANCEL_ENTRY {
            return Ok(Some(Command::CancelEntry));
        }
        return Ok(Some(Command::SubmitText(line.to_string())));
    }

    if !toggle_key.is_empty() && line == toggle_key {
        return Ok(Some(Command::ToggleRunning));
    }

    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (trimmed, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "toggle" | "t" => Command::ToggleRunning,
        "start" => Command::Start,
        "pause" => Command::Pause,
        "reset" => Command::ResetAll,
        "status" | "s" => Command::Status,
        "list" | "ls" => Command::ListTasks,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        "focus" | "pomodoro" => Command::SwitchMode(TimerMode::Focus),
        "short" => Command::SwitchMode(TimerMode::ShortBreak),
        "long" => Command::SwitchMode(TimerMode::LongBreak),
        "switch" | "mode" => {
            if rest.is_empty() {
                return Err(ValidationError::MissingArgument {
                    command: "switch",
                    what: "a mode",
                });
            }
            Command::SwitchMode(rest.parse()?)
        }
        "add" | "a" => {
            if rest.is_empty() {
                Command::PromptAdd
            } else {
                Command::AddTask(rest.to_string())
            }
        }
        "done" | "check" => Command::ToggleTask(required(rest, "done")?),
        "rm" | "delete" | "del" => Command::DeleteTask(required(rest, "delete")?),
        "edit" | "e" => {
            let rest = required(rest, "edit")?;
            match rest.split_once(char::is_whitespace) {
                Some((reference, text)) => Command::EditTask {
                    reference: reference.to_string(),
                    text: text.to_string(),
                },
                None => Command::BeginEdit(rest),
            }
        }
        other => return Err(ValidationError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

fn required(rest: &str, command: &'static str) -> Result<String, ValidationError> {
    if rest.is_empty() {
        return Err(ValidationError::MissingArgument {
            command,
            what: "a task number or id",
        });
    }
    Ok(rest.to_string())
}

pub const HELP: &str = "\
commands:
  <space>            toggle the timer (or: toggle, t)
  start | pause      start or pause explicitly
  focus|short|long   switch mode (or: switch <mode>)
  reset              reset timer and counters
  status | s         show the timer
  list | ls          show tasks
  add [text]         add a task (prompts when text is omitted)
  done <n>           toggle a task's completion
  edit <n> [text]    edit a task (prompts when text is omitted)
  rm <n>             delete a task
  :cancel            leave an add/edit prompt
  quit | q           exit";
