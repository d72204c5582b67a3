//! The session controller: the single owner of all mutable state.
//!
//! Every user command and clock tick goes through one method here. Each
//! method applies its change to the engine or task list, persists the full
//! snapshot, and keeps the tick clock in step with the running flag before
//! returning.
//!
//! ```ignore
//! let gateway = storage::open_gateway();
//! let (mut session, pending) = SessionController::restore(gateway, alert, clock);
//! session.toggle_running();
//! // Once per clock tick:
//! session.tick();
//! ```

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::alert::AlertSink;
use crate::clock::Clock;
use crate::error::ValidationError;
use crate::events::Event;
use crate::storage::PersistenceGateway;
use crate::task::{Task, TaskId, TaskStore};
use crate::timer::{format_clock, TimerEngine, TimerMode};

pub struct SessionController {
    engine: TimerEngine,
    tasks: TaskStore,
    gateway: PersistenceGateway,
    alert: Box<dyn AlertSink>,
    clock: Box<dyn Clock>,
    /// Task currently open for editing. Never persisted.
    editing: Option<TaskId>,
}

impl SessionController {
    /// Load the stored snapshot (or defaults) and bring the clock in line.
    ///
    /// A snapshot that was saved running at zero still owes its completion;
    /// that completion runs here, once, and is returned alongside the
    /// controller.
    pub fn restore(
        gateway: PersistenceGateway,
        alert: Box<dyn AlertSink>,
        clock: Box<dyn Clock>,
    ) -> (Self, Option<Event>) {
        let (engine, tasks) = match gateway.load() {
            Some(snapshot) => {
                debug!(
                    mode = %snapshot.session.mode,
                    remaining_secs = snapshot.session.remaining_secs,
                    tasks = snapshot.tasks.len(),
                    "snapshot restored"
                );
                (
                    TimerEngine::from_session(snapshot.session),
                    TaskStore::from_tasks(snapshot.tasks),
                )
            }
            None => (TimerEngine::new(), TaskStore::new()),
        };
        let mut controller = Self {
            engine,
            tasks,
            gateway,
            alert,
            clock,
            editing: None,
        };
        let pending = controller.engine.on_reach_zero();
        if let Some(event) = &pending {
            controller.completed(event);
            controller.persist();
        }
        controller.sync_clock();
        (controller, pending)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.tasks()
    }

    pub fn editing(&self) -> Option<TaskId> {
        self.editing
    }

    pub fn is_clock_scheduled(&self) -> bool {
        self.clock.is_scheduled()
    }

    /// Look a task up by 1-based position or unique id prefix.
    pub fn resolve_task(&self, reference: &str) -> Option<TaskId> {
        self.tasks.resolve(reference)
    }

    /// Like [`resolve_task`](Self::resolve_task), but a miss is an error
    /// naming the reference.
    pub fn require_task(&self, reference: &str) -> Result<TaskId, ValidationError> {
        self.resolve_task(reference)
            .ok_or_else(|| ValidationError::UnknownTask(reference.to_string()))
    }

    /// Everything a status display needs, as one event.
    pub fn snapshot(&self) -> Event {
        let session = self.engine.session();
        Event::StateSnapshot {
            mode: session.mode,
            label: session.mode.label().to_string(),
            is_running: session.is_running,
            is_break: session.mode.is_break(),
            remaining_secs: session.remaining_secs,
            clock: format_clock(session.remaining_secs),
            pomodoros_completed: session.pomodoros_completed,
            cycles_completed: session.cycles_completed,
            cycle_number: session.cycles_completed + 1,
            motto: session.mode.motto().to_string(),
            open_tasks: self.tasks.open_count(),
            done_tasks: self.tasks.done_count(),
            at: Utc::now(),
        }
    }

    // ── Timer commands ───────────────────────────────────────────────

    /// Flip the running flag.
    ///
    /// Starting a period that is already at zero completes it on the spot,
    /// and the completion event is returned instead of `TimerStarted`.
    pub fn toggle_running(&mut self) -> Event {
        let event = self.engine.toggle_running();
        let event = self.settle().unwrap_or(event);
        self.commit();
        event
    }

    pub fn start(&mut self) -> Option<Event> {
        let event = self.engine.start()?;
        let event = self.settle().unwrap_or(event);
        self.commit();
        Some(event)
    }

    pub fn pause(&mut self) -> Option<Event> {
        let event = self.engine.pause()?;
        self.commit();
        Some(event)
    }

    /// Advance the countdown by one second.
    ///
    /// Returns the completion event on the tick that reaches zero; the alert
    /// has already been raised by then.
    pub fn tick(&mut self) -> Option<Event> {
        let before = self.engine.remaining_secs();
        let completion = match self.engine.tick() {
            Some(event) => {
                self.completed(&event);
                Some(event)
            }
            None => self.settle(),
        };
        if completion.is_some() || self.engine.remaining_secs() != before {
            self.commit();
        }
        completion
    }

    pub fn switch_mode(&mut self, target: TimerMode) -> Event {
        let event = self.engine.switch_mode(target);
        self.commit();
        event
    }

    pub fn reset_all(&mut self) -> Event {
        let event = self.engine.reset_all();
        info!("timer reset");
        self.commit();
        event
    }

    // ── Task commands ────────────────────────────────────────────────

    pub fn add_task(&mut self, text: &str) -> Result<Event, ValidationError> {
        let task = self.tasks.add(text)?;
        let event = Event::TaskAdded {
            id: task.id,
            text: task.text.clone(),
            at: Utc::now(),
        };
        self.commit();
        Ok(event)
    }

    /// `None` when no task has this id.
    pub fn toggle_task(&mut self, id: TaskId) -> Option<Event> {
        let task = self.tasks.toggle(id)?;
        let event = Event::TaskToggled {
            id,
            completed: task.completed,
            at: Utc::now(),
        };
        self.commit();
        Some(event)
    }

    /// Empty text is rejected; `Ok(None)` when no task has this id.
    pub fn edit_task(&mut self, id: TaskId, text: &str) -> Result<Option<Event>, ValidationError> {
        let Some(task) = self.tasks.edit(id, text)? else {
            return Ok(None);
        };
        let event = Event::TaskEdited {
            id,
            text: task.text.clone(),
            at: Utc::now(),
        };
        self.commit();
        Ok(Some(event))
    }

    /// `None` when no task has this id.
    pub fn delete_task(&mut self, id: TaskId) -> Option<Event> {
        self.tasks.delete(id)?;
        if self.editing == Some(id) {
            self.editing = None;
        }
        self.commit();
        Some(Event::TaskDeleted { id, at: Utc::now() })
    }

    // ── Edit mode ────────────────────────────────────────────────────

    /// Make `id` the edit target, replacing any previous target.
    ///
    /// Returns the task's current text, or `None` (and leaves the previous
    /// target untouched) if the id is unknown.
    pub fn begin_edit(&mut self, id: TaskId) -> Option<&str> {
        let task = self.tasks.get(id)?;
        self.editing = Some(id);
        Some(task.text.as_str())
    }

    /// Apply `text` to the edit target.
    ///
    /// The target is cleared only when the edit goes through, so a rejected
    /// blank entry leaves the prompt open.
    pub fn submit_edit(&mut self, text: &str) -> Result<Option<Event>, ValidationError> {
        let id = self.editing.ok_or(ValidationError::NoEditTarget)?;
        let event = self.edit_task(id, text)?;
        self.editing = None;
        Ok(event)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn completed(&mut self, event: &Event) {
        if let Event::TimerCompleted {
            from,
            to,
            pomodoros_completed,
            cycles_completed,
            ..
        } = event
        {
            info!(
                %from,
                %to,
                pomodoros_completed,
                cycles_completed,
                "period completed"
            );
        }
        if let Err(e) = self.alert.alert(event) {
            warn!(error = %e, "completion alert failed");
        }
    }

    /// Run the completion owed by a running timer sitting at zero.
    fn settle(&mut self) -> Option<Event> {
        let event = self.engine.on_reach_zero()?;
        self.completed(&event);
        Some(event)
    }

    fn commit(&mut self) {
        self.persist();
        self.sync_clock();
    }

    fn persist(&mut self) {
        if let Err(e) = self.gateway.save(self.engine.session(), self.tasks.tasks()) {
            warn!(error = %e, "failed to persist snapshot");
        }
    }

    fn sync_clock(&mut self) {
        if self.engine.is_running() {
            self.clock.schedule();
        } else {
            self.clock.cancel();
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.clock.cancel();
    }
}
