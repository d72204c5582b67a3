//! Property tests for cycle counting and snapshot round-trips.

use proptest::prelude::*;

use tomatodo_core::storage::{MemorySlots, PersistenceGateway};
use tomatodo_core::{TaskStore, TimerEngine, TimerMode, TimerSession};

/// Drive the engine through one full period, restarting it if paused.
fn complete_period(engine: &mut TimerEngine) -> usize {
    engine.start();
    let ticks = engine.remaining_secs();
    (0..ticks).filter_map(|_| engine.tick()).count()
}

fn mode_strategy() -> impl Strategy<Value = TimerMode> {
    prop_oneof![
        Just(TimerMode::Focus),
        Just(TimerMode::ShortBreak),
        Just(TimerMode::LongBreak),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn counters_track_focus_completions(n in 0u32..14) {
        let mut engine = TimerEngine::new();
        for i in 1..=n {
            prop_assert_eq!(engine.mode(), TimerMode::Focus);
            prop_assert_eq!(complete_period(&mut engine), 1);
            let expected = if i % 4 == 0 { TimerMode::LongBreak } else { TimerMode::ShortBreak };
            prop_assert_eq!(engine.mode(), expected);
            prop_assert_eq!(complete_period(&mut engine), 1);
            prop_assert_eq!(engine.mode(), TimerMode::Focus);
        }
        prop_assert_eq!(engine.pomodoros_completed(), n);
        prop_assert_eq!(engine.cycles_completed(), n / 4);
    }

    #[test]
    fn ticks_never_underflow(remaining in 0u32..5, extra in 0usize..20, mode in mode_strategy()) {
        let mut engine = TimerEngine::from_session(TimerSession {
            remaining_secs: remaining,
            mode,
            is_running: true,
            pomodoros_completed: 0,
            cycles_completed: 0,
        });
        let fired = (0..remaining as usize + extra).filter_map(|_| engine.tick()).count();
        prop_assert_eq!(fired, usize::from(remaining > 0));
    }

    #[test]
    fn switch_mode_leaves_counters(
        mode in mode_strategy(),
        target in mode_strategy(),
        remaining in 0u32..2000,
        running in any::<bool>(),
        pomodoros in 0u32..100,
        cycles in 0u32..25,
    ) {
        let mut engine = TimerEngine::from_session(TimerSession {
            remaining_secs: remaining,
            mode,
            is_running: running,
            pomodoros_completed: pomodoros,
            cycles_completed: cycles,
        });
        engine.switch_mode(target);
        prop_assert!(!engine.is_running());
        prop_assert_eq!(engine.remaining_secs(), target.duration_secs());
        prop_assert_eq!(engine.pomodoros_completed(), pomodoros);
        prop_assert_eq!(engine.cycles_completed(), cycles);

        engine.reset_all();
        prop_assert_eq!(engine, TimerEngine::new());
    }

    #[test]
    fn snapshot_roundtrip(
        mode in mode_strategy(),
        remaining in 0u32..2000,
        running in any::<bool>(),
        pomodoros in 0u32..100,
        cycles in 0u32..25,
        texts in proptest::collection::vec("[a-zA-Z0-9 ]{0,12}", 0..6),
        toggles in proptest::collection::vec(any::<bool>(), 6),
    ) {
        let session = TimerSession {
            remaining_secs: remaining,
            mode,
            is_running: running,
            pomodoros_completed: pomodoros,
            cycles_completed: cycles,
        };
        let mut store = TaskStore::new();
        for text in &texts {
            let _ = store.add(text);
        }
        let ids: Vec<_> = store.tasks().iter().map(|t| t.id).collect();
        for (id, flip) in ids.into_iter().zip(toggles) {
            if flip {
                store.toggle(id);
            }
        }

        let mut gateway = PersistenceGateway::new(MemorySlots::new());
        gateway.save(&session, store.tasks()).unwrap();
        let loaded = gateway.load().unwrap();
        prop_assert_eq!(loaded.session, session);
        prop_assert_eq!(loaded.tasks.as_slice(), store.tasks());
    }
}
