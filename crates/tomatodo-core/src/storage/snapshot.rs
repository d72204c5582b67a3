//! Snapshot serialization and the persistence gateway.
//!
//! The snapshot is one flat JSON object:
//!
//! ```json
//! {"remaining_secs":1500,"mode":"focus","is_running":false,
//!  "pomodoros_completed":0,"cycles_completed":0,
//!  "tasks":[{"id":"…","text":"buy milk","completed":false}]}
//! ```
//!
//! There is no version field. Unknown fields are ignored and a missing
//! `tasks` list reads as empty; anything else that fails to parse is treated
//! exactly like an empty slot.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::slot::SlotStore;
use crate::error::Result;
use crate::task::Task;
use crate::timer::TimerSession;

/// Fixed slot name the snapshot is stored under.
pub const SNAPSHOT_KEY: &str = "pomodoro_state";

/// Timer session plus the ordered task list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    #[serde(flatten)]
    pub session: TimerSession,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    #[serde(flatten)]
    session: &'a TimerSession,
    tasks: &'a [Task],
}

/// Reads and writes the snapshot slot.
pub struct PersistenceGateway {
    slots: Box<dyn SlotStore>,
    key: String,
}

impl PersistenceGateway {
    pub fn new(slots: impl SlotStore + 'static) -> Self {
        Self::with_key(slots, SNAPSHOT_KEY)
    }

    pub fn with_key(slots: impl SlotStore + 'static, key: &str) -> Self {
        Self {
            slots: Box::new(slots),
            key: key.to_string(),
        }
    }

    /// Serialize and overwrite the slot.
    ///
    /// # Errors
    /// Returns an error if serialization or the underlying write fails.
    pub fn save(&mut self, session: &TimerSession, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string(&SnapshotRef { session, tasks })?;
        self.slots.write(&self.key, &json)?;
        debug!(key = %self.key, bytes = json.len(), "snapshot saved");
        Ok(())
    }

    /// Read the slot. Empty, unreadable and malformed slots all yield `None`.
    pub fn load(&self) -> Option<PersistedSnapshot> {
        let raw = match self.slots.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "no snapshot stored");
                return None;
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "snapshot slot unreadable, using defaults");
                return None;
            }
        };
        match serde_json::from_str::<PersistedSnapshot>(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(key = %self.key, error = %e, "snapshot malformed, using defaults");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::MemorySlots;
    use crate::task::TaskStore;
    use crate::timer::TimerMode;

    struct BrokenSlots;

    impl SlotStore for BrokenSlots {
        fn read(&self, _key: &str) -> std::result::Result<Option<String>, StorageError> {
            Err(StorageError::Locked)
        }

        fn write(&mut self, _key: &str, _value: &str) -> std::result::Result<(), StorageError> {
            Err(StorageError::Locked)
        }
    }

    fn gateway_with(raw: &str) -> PersistenceGateway {
        PersistenceGateway::new(MemorySlots::new().with(SNAPSHOT_KEY, raw))
    }

    #[test]
    fn empty_slot_is_absent() {
        let gateway = PersistenceGateway::new(MemorySlots::new());
        assert!(gateway.load().is_none());
    }

    #[test]
    fn save_then_load_roundtrips() {
        let mut gateway = PersistenceGateway::new(MemorySlots::new());
        let session = TimerSession {
            remaining_secs: 123,
            mode: TimerMode::LongBreak,
            is_running: true,
            pomodoros_completed: 8,
            cycles_completed: 2,
        };
        let mut store = TaskStore::new();
        let id = store.add("first").unwrap().id;
        store.add("second").unwrap();
        store.toggle(id);

        gateway.save(&session, store.tasks()).unwrap();
        let loaded = gateway.load().unwrap();
        assert_eq!(loaded.session, session);
        assert_eq!(loaded.tasks, store.tasks());
    }

    #[test]
    fn garbage_is_absent() {
        assert!(gateway_with("not json at all").load().is_none());
        assert!(gateway_with("{\"remaining_secs\": -5}").load().is_none());
        assert!(gateway_with("[]").load().is_none());
    }

    #[test]
    fn missing_tasks_read_as_empty() {
        let raw = r#"{"remaining_secs":300,"mode":"short_break","is_running":false,
                      "pomodoros_completed":1,"cycles_completed":0}"#;
        let loaded = gateway_with(raw).load().unwrap();
        assert_eq!(loaded.session.mode, TimerMode::ShortBreak);
        assert!(loaded.tasks.is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let raw = r#"{"remaining_secs":10,"mode":"focus","is_running":false,
                      "pomodoros_completed":0,"cycles_completed":0,
                      "theme":"dark","tasks":[]}"#;
        assert_eq!(gateway_with(raw).load().unwrap().session.remaining_secs, 10);
    }

    #[test]
    fn unreadable_slot_is_absent() {
        let gateway = PersistenceGateway::new(BrokenSlots);
        assert!(gateway.load().is_none());
    }

    #[test]
    fn write_failure_is_reported() {
        let mut gateway = PersistenceGateway::new(BrokenSlots);
        assert!(gateway.save(&TimerSession::default(), &[]).is_err());
    }

    #[test]
    fn snapshot_is_flat() {
        let json = serde_json::to_value(PersistedSnapshot::default()).unwrap();
        let obj = json.as_object().unwrap();
        for field in [
            "remaining_secs",
            "mode",
            "is_running",
            "pomodoros_completed",
            "cycles_completed",
            "tasks",
        ] {
            assert!(obj.contains_key(field), "missing {field}");
        }
    }
}
