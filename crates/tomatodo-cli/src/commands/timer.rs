use clap::Subcommand;
use tomatodo_core::{Config, TimerMode};

use super::{open_session, print_event};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current timer state as JSON
    Status,
    /// Start if paused, pause if running
    Toggle,
    /// Start the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Switch to a mode (stops the timer, keeps counters)
    Switch {
        /// focus, short-break or long-break
        mode: TimerMode,
    },
    /// Back to a fresh focus period with zeroed counters
    Reset,
    /// Advance a running timer by whole seconds
    Tick {
        /// Number of one-second ticks to apply
        #[arg(long, default_value = "1")]
        count: u32,
    },
}

pub fn run(action: TimerAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let (mut session, pending) = open_session(config);
    if let Some(event) = &pending {
        print_event(event)?;
    }

    match action {
        TimerAction::Status => {}
        TimerAction::Toggle => {
            print_event(&session.toggle_running())?;
        }
        TimerAction::Start => {
            if let Some(event) = session.start() {
                print_event(&event)?;
            }
        }
        TimerAction::Pause => {
            if let Some(event) = session.pause() {
                print_event(&event)?;
            }
        }
        TimerAction::Switch { mode } => {
            print_event(&session.switch_mode(mode))?;
        }
        TimerAction::Reset => {
            print_event(&session.reset_all())?;
        }
        TimerAction::Tick { count } => {
            for _ in 0..count {
                if !session.engine().is_running() {
                    break;
                }
                if let Some(event) = session.tick() {
                    print_event(&event)?;
                }
            }
        }
    }

    print_event(&session.snapshot())?;
    Ok(())
}
