//! # Tomatodo Core Library
//!
//! Pomodoro timer and to-do list state, with everything the CLI needs to
//! drive them. The library owns no threads of its own apart from the
//! optional tokio interval clock.
//!
//! ## Architecture
//!
//! - **Timer Engine**: pure countdown state machine; the caller invokes
//!   `tick()` once per second
//! - **Task Store**: insertion-ordered to-do list
//! - **Storage**: the combined snapshot in a SQLite key-value slot, plus a
//!   TOML configuration file
//! - **Session Controller**: single owner of all state; persists after every
//!   change and keeps the tick clock in step with the running flag
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`TaskStore`]: To-do list
//! - [`PersistenceGateway`]: Snapshot save/load
//! - [`SessionController`]: Command entry points
//! - [`Config`]: Application configuration management

pub mod alert;
pub mod clock;
pub mod error;
pub mod events;
pub mod input;
pub mod session;
pub mod storage;
pub mod task;
pub mod timer;

pub use alert::AlertSink;
pub use clock::{Clock, IntervalClock, ManualClock, Tick, TickReceiver};
pub use error::{AlertError, ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use session::SessionController;
pub use storage::{Config, Database, PersistedSnapshot, PersistenceGateway};
pub use task::{Task, TaskId, TaskStore};
pub use timer::{TimerEngine, TimerMode, TimerSession};
