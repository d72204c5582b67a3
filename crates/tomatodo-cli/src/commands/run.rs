//! Interactive session: stdin commands and a live one-second clock.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use tomatodo_core::alert;
use tomatodo_core::input::{self, Command, InputFocus, CANCEL_ENTRY, HELP};
use tomatodo_core::storage;
use tomatodo_core::timer::{format_clock, POMODOROS_PER_CYCLE};
use tomatodo_core::{Config, Event, IntervalClock, SessionController, Tick, TimerMode};

pub fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(interactive(config))
}

async fn interactive(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let (clock, mut ticks) = IntervalClock::new();
    let (session, pending) = SessionController::restore(
        storage::open_gateway(),
        alert::from_config(&config.alert),
        Box::new(clock),
    );
    let mut repl = Repl::new(session, config.keys.toggle.clone());
    let mut out = std::io::stdout();

    if let Some(event) = &pending {
        repl.announce(event, &mut out)?;
    }
    repl.render_status(&mut out)?;
    writeln!(out, "type 'help' for commands")?;
    out.flush()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(Tick) = ticks.recv() => repl.on_tick(&mut out)?,
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if let Flow::Quit = repl.handle_line(&line, &mut out)? {
                    break;
                }
            }
        }
        out.flush()?;
    }

    info!("interactive session ended");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prompt {
    Add,
    Edit,
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct Repl {
    session: SessionController,
    prompt: Option<Prompt>,
    toggle_key: String,
}

impl Repl {
    fn new(session: SessionController, toggle_key: String) -> Self {
        Self {
            session,
            prompt: None,
            toggle_key,
        }
    }

    fn focus(&self) -> InputFocus {
        match self.prompt {
            Some(_) => InputFocus::TextEntry,
            None => InputFocus::Command,
        }
    }

    fn on_tick(&mut self, out: &mut impl Write) -> std::io::Result<()> {
        if let Some(event) = self.session.tick() {
            return self.announce(&event, out);
        }
        let engine = self.session.engine();
        if engine.is_running() && engine.remaining_secs() % 60 == 0 {
            writeln!(
                out,
                "  {} {}",
                engine.mode().label(),
                format_clock(engine.remaining_secs())
            )?;
        }
        Ok(())
    }

    fn handle_line(&mut self, line: &str, out: &mut impl Write) -> std::io::Result<Flow> {
        let command = match input::parse_line(line, self.focus(), &self.toggle_key) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(e) => {
                writeln!(out, "! {e}")?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            Command::ToggleRunning => {
                let event = self.session.toggle_running();
                self.announce(&event, out)?;
            }
            Command::Start => match self.session.start() {
                Some(event) => self.announce(&event, out)?,
                None => writeln!(out, "already running")?,
            },
            Command::Pause => match self.session.pause() {
                Some(event) => self.announce(&event, out)?,
                None => writeln!(out, "already paused")?,
            },
            Command::SwitchMode(mode) => {
                let event = self.session.switch_mode(mode);
                self.announce(&event, out)?;
            }
            Command::ResetAll => {
                let event = self.session.reset_all();
                self.announce(&event, out)?;
            }
            Command::Status => self.render_status(out)?,
            Command::ListTasks => self.render_tasks(out)?,
            Command::AddTask(text) => match self.session.add_task(&text) {
                Ok(_) => self.render_tasks(out)?,
                Err(e) => writeln!(out, "! {e}")?,
            },
            Command::PromptAdd => {
                self.prompt = Some(Prompt::Add);
                writeln!(out, "new task ({CANCEL_ENTRY} to abort):")?;
            }
            Command::ToggleTask(reference) => match self.session.require_task(&reference) {
                Ok(id) => {
                    self.session.toggle_task(id);
                    self.render_tasks(out)?;
                }
                Err(e) => writeln!(out, "! {e}")?,
            },
            Command::EditTask { reference, text } => {
                let edited = self
                    .session
                    .require_task(&reference)
                    .and_then(|id| self.session.edit_task(id, &text));
                match edited {
                    Ok(_) => self.render_tasks(out)?,
                    Err(e) => writeln!(out, "! {e}")?,
                }
            }
            Command::BeginEdit(reference) => {
                let current = self.session.require_task(&reference).map(|id| {
                    self.session
                        .begin_edit(id)
                        .map(str::to_owned)
                        .unwrap_or_default()
                });
                match current {
                    Ok(text) => {
                        self.prompt = Some(Prompt::Edit);
                        writeln!(out, "editing \"{text}\" ({CANCEL_ENTRY} to abort):")?;
                    }
                    Err(e) => writeln!(out, "! {e}")?,
                }
            }
            Command::DeleteTask(reference) => match self.session.require_task(&reference) {
                Ok(id) => {
                    self.session.delete_task(id);
                    self.render_tasks(out)?;
                }
                Err(e) => writeln!(out, "! {e}")?,
            },
            Command::SubmitText(text) => self.submit(&text, out)?,
            Command::CancelEntry => {
                self.session.cancel_edit();
                self.prompt = None;
                writeln!(out, "cancelled")?;
            }
            Command::Help => write!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Text typed into an open prompt. A rejected entry keeps the prompt open.
    fn submit(&mut self, text: &str, out: &mut impl Write) -> std::io::Result<()> {
        let result = match self.prompt {
            Some(Prompt::Add) => self.session.add_task(text).map(|_| ()),
            Some(Prompt::Edit) => self.session.submit_edit(text).map(|_| ()),
            None => return Ok(()),
        };
        match result {
            Ok(()) => {
                self.prompt = None;
                self.render_tasks(out)
            }
            Err(e) => {
                if self.prompt == Some(Prompt::Edit) && self.session.editing().is_none() {
                    self.prompt = None;
                }
                writeln!(out, "! {e}")
            }
        }
    }

    fn announce(&self, event: &Event, out: &mut impl Write) -> std::io::Result<()> {
        match event {
            Event::TimerStarted {
                mode,
                remaining_secs,
                ..
            } => writeln!(out, "> {} {}", mode.label(), format_clock(*remaining_secs)),
            Event::TimerPaused {
                mode,
                remaining_secs,
                ..
            } => writeln!(
                out,
                "|| {} paused at {}",
                mode.label(),
                format_clock(*remaining_secs)
            ),
            Event::TimerCompleted {
                from,
                to,
                pomodoros_completed,
                cycles_completed,
                ..
            } => writeln!(
                out,
                "{} complete. Next: {} {} (pomodoros {}, cycles {}). {}",
                from.label(),
                to.label(),
                format_clock(to.duration_secs()),
                pomodoros_completed,
                cycles_completed,
                to.motto()
            ),
            Event::ModeSwitched {
                to, remaining_secs, ..
            } => writeln!(out, "{} {}", to.label(), format_clock(*remaining_secs)),
            Event::TimerReset { .. } => writeln!(
                out,
                "reset: {} {}",
                TimerMode::Focus.label(),
                format_clock(TimerMode::Focus.duration_secs())
            ),
            _ => Ok(()),
        }
    }

    fn render_status(&self, out: &mut impl Write) -> std::io::Result<()> {
        let engine = self.session.engine();
        let state = if engine.is_running() { "running" } else { "paused" };
        writeln!(
            out,
            "[{}] {} {}  pomodoro {}/{}  cycle {}",
            engine.mode().label(),
            format_clock(engine.remaining_secs()),
            state,
            engine.pomodoros_completed() % POMODOROS_PER_CYCLE,
            POMODOROS_PER_CYCLE,
            engine.cycles_completed() + 1
        )?;
        writeln!(out, "{}", engine.mode().motto())
    }

    fn render_tasks(&self, out: &mut impl Write) -> std::io::Result<()> {
        let tasks = self.session.tasks();
        if tasks.is_empty() {
            return writeln!(out, "(no tasks)");
        }
        for (index, task) in tasks.iter().enumerate() {
            let mark = if task.completed { 'x' } else { ' ' };
            let id = task.id.to_string();
            writeln!(
                out,
                "{:>3}. [{mark}] {}  ({})",
                index + 1,
                task.text,
                &id[..8]
            )?;
        }
        Ok(())
    }
}
