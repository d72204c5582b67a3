//! Insertion-ordered to-do list.
//!
//! Invalid text is rejected before anything changes. Unknown ids are not
//! errors: the operation reports that nothing matched and leaves the list as
//! it was.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Opaque task identifier. Assigned at creation, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn open_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    pub fn done_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    /// Find a task by 1-based position or by a unique id prefix.
    pub fn resolve(&self, reference: &str) -> Option<TaskId> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        if let Ok(pos) = reference.parse::<usize>() {
            if let Some(task) = pos.checked_sub(1).and_then(|i| self.tasks.get(i)) {
                return Some(task.id);
            }
        }
        let needle = reference.to_ascii_lowercase();
        let mut matches = self
            .tasks
            .iter()
            .filter(|t| t.id.to_string().starts_with(&needle));
        match (matches.next(), matches.next()) {
            (Some(task), None) => Some(task.id),
            _ => None,
        }
    }

    /// Append a new open task with trimmed text.
    pub fn add(&mut self, text: &str) -> Result<&Task, ValidationError> {
        let text = normalize(text)?;
        self.tasks.push(Task {
            id: TaskId::new(),
            text,
            completed: false,
        });
        let last = self.tasks.len() - 1;
        Ok(&self.tasks[last])
    }

    /// Flip completion. `None` if no task has this id.
    pub fn toggle(&mut self, id: TaskId) -> Option<&Task> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        Some(task)
    }

    /// Replace the text, keeping id and completion.
    ///
    /// Empty text is rejected even when the id is unknown; `Ok(None)` means
    /// the text was fine but nothing matched.
    pub fn edit(&mut self, id: TaskId, new_text: &str) -> Result<Option<&Task>, ValidationError> {
        let text = normalize(new_text)?;
        Ok(self.tasks.iter_mut().find(|t| t.id == id).map(|task| {
            task.text = text;
            &*task
        }))
    }

    /// Remove the task. Returns it if it existed.
    pub fn delete(&mut self, id: TaskId) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(pos))
    }
}

fn normalize(text: &str) -> Result<String, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTaskText);
    }
    Ok(trimmed.to_string())
}
