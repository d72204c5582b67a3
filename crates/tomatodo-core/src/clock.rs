//! The one-second tick source that drives `TimerEngine::tick`.
//!
//! A clock is a schedule/cancel pair. The session controller schedules it
//! whenever the timer starts running and cancels it on every path that stops
//! the timer, and again when the controller is dropped.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// One second of wall time has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

pub trait Clock {
    /// Begin delivering ticks. Scheduling an already scheduled clock is a no-op.
    fn schedule(&mut self);
    /// Stop delivering ticks. Cancelling an idle clock is a no-op.
    fn cancel(&mut self);
    fn is_scheduled(&self) -> bool;
}

/// Tokio interval that sends a [`Tick`] down a channel every period.
///
/// `schedule` spawns onto the current tokio runtime and must be called from
/// within one. Ticks missed while the process was suspended are skipped, not
/// replayed in a burst.
pub struct IntervalClock {
    tx: mpsc::UnboundedSender<u64>,
    period: Duration,
    generation: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl IntervalClock {
    /// Create a one-second clock and the receiver its ticks arrive on.
    pub fn new() -> (Self, TickReceiver) {
        Self::with_period(TICK_PERIOD)
    }

    pub fn with_period(period: Duration) -> (Self, TickReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let generation = Arc::new(AtomicU64::new(0));
        (
            Self {
                tx,
                period,
                generation: generation.clone(),
                handle: None,
            },
            TickReceiver { rx, generation },
        )
    }
}

impl Clock for IntervalClock {
    fn schedule(&mut self) {
        if self.is_scheduled() {
            return;
        }
        let tx = self.tx.clone();
        let period = self.period;
        let generation = self.generation.load(Ordering::SeqCst);
        self.handle = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(generation).is_err() {
                    break;
                }
            }
        }));
        debug!(period_ms = period.as_millis() as u64, generation, "clock scheduled");
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            // Ticks already queued by the aborted task are now stale.
            self.generation.fetch_add(1, Ordering::SeqCst);
            debug!("clock cancelled");
        }
    }

    fn is_scheduled(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

/// Receiving end of an [`IntervalClock`].
///
/// Ticks sent before the most recent `cancel` are dropped on receipt, so a
/// pause followed by a quick restart never sees a leftover tick.
pub struct TickReceiver {
    rx: mpsc::UnboundedReceiver<u64>,
    generation: Arc<AtomicU64>,
}

impl TickReceiver {
    /// Wait for the next current tick. `None` once the clock is dropped.
    pub async fn recv(&mut self) -> Option<Tick> {
        while let Some(sent) = self.rx.recv().await {
            if sent == self.generation.load(Ordering::SeqCst) {
                return Some(Tick);
            }
        }
        None
    }

    /// Take a current tick if one is already queued.
    pub fn try_recv(&mut self) -> Option<Tick> {
        while let Ok(sent) = self.rx.try_recv() {
            if sent == self.generation.load(Ordering::SeqCst) {
                return Some(Tick);
            }
        }
        None
    }
}

impl Drop for IntervalClock {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A clock whose ticks are delivered by hand.
///
/// Clones share state, so a test can keep one copy to observe what the
/// controller did with the other.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    scheduled: Arc<AtomicBool>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for ManualClock {
    fn schedule(&mut self) {
        self.scheduled.store(true, Ordering::SeqCst);
    }

    fn cancel(&mut self) {
        self.scheduled.store(false, Ordering::SeqCst);
    }

    fn is_scheduled(&self) -> bool {
        self.scheduled.load(Ordering::SeqCst)
    }
}
