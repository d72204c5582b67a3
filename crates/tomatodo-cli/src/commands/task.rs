//! Task management commands for CLI.

use clap::Subcommand;
use tomatodo_core::Config;

use super::{open_session, print_event, resolve_or_note};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to the end of the list
    Add {
        /// Task text (surrounding whitespace is trimmed)
        text: String,
    },
    /// List tasks as JSON
    List,
    /// Toggle a task's completion
    Toggle {
        /// 1-based position or id prefix
        reference: String,
    },
    /// Replace a task's text
    Edit {
        /// 1-based position or id prefix
        reference: String,
        /// New text
        text: String,
    },
    /// Delete a task
    Delete {
        /// 1-based position or id prefix
        reference: String,
    },
}

pub fn run(action: TaskAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let (mut session, _) = open_session(config);

    match action {
        TaskAction::Add { text } => {
            print_event(&session.add_task(&text)?)?;
        }
        TaskAction::List => {
            println!("{}", serde_json::to_string_pretty(session.tasks())?);
        }
        TaskAction::Toggle { reference } => {
            if let Some(id) = resolve_or_note(&session, &reference) {
                if let Some(event) = session.toggle_task(id) {
                    print_event(&event)?;
                }
            }
        }
        TaskAction::Edit { reference, text } => {
            if let Some(id) = resolve_or_note(&session, &reference) {
                if let Some(event) = session.edit_task(id, &text)? {
                    print_event(&event)?;
                }
            }
        }
        TaskAction::Delete { reference } => {
            if let Some(id) = resolve_or_note(&session, &reference) {
                if let Some(event) = session.delete_task(id) {
                    print_event(&event)?;
                }
            }
        }
    }
    Ok(())
}
