//! To-do list sharing the persisted snapshot with the timer.
//!
//! The store knows nothing about the timer; the session controller sequences
//! both and persists after each change.

mod store;

pub use store::{Task, TaskId, TaskStore};
