//! Completion cue delivery.
//!
//! The engine only reports a completion event; sinks turn it into a sound.
//! A sink may fail for reasons unrelated to the timer (missing file, no
//! terminal), so callers log the error and carry on.

use std::io::Write;
use std::path::PathBuf;

use tracing::warn;

use crate::error::AlertError;
use crate::events::Event;
use crate::storage::AlertConfig;

/// Consumer of completion events.
pub trait AlertSink {
    fn alert(&mut self, event: &Event) -> Result<(), AlertError>;
}

/// Does nothing. Used when alerts are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAlert;

impl AlertSink for SilentAlert {
    fn alert(&mut self, _event: &Event) -> Result<(), AlertError> {
        Ok(())
    }
}

/// Rings the terminal bell (BEL on stderr).
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl AlertSink for TerminalBell {
    fn alert(&mut self, _event: &Event) -> Result<(), AlertError> {
        let mut out = std::io::stderr();
        out.write_all(b"\x07")?;
        out.flush()?;
        Ok(())
    }
}

/// Opens an audio file with the system's default player.
#[derive(Debug, Clone)]
pub struct SoundFile {
    path: PathBuf,
}

impl SoundFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AlertSink for SoundFile {
    fn alert(&mut self, _event: &Event) -> Result<(), AlertError> {
        if !self.path.is_file() {
            return Err(AlertError::MissingSound(self.path.clone()));
        }
        open::that_detached(&self.path)?;
        Ok(())
    }
}

/// Fans one event out to several sinks.
///
/// Every sink gets the event; a failing sink is logged and skipped.
#[derive(Default)]
pub struct CompositeAlert {
    sinks: Vec<Box<dyn AlertSink>>,
}

impl CompositeAlert {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, sink: impl AlertSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl AlertSink for CompositeAlert {
    fn alert(&mut self, event: &Event) -> Result<(), AlertError> {
        for sink in &mut self.sinks {
            if let Err(e) = sink.alert(event) {
                warn!(error = %e, "alert sink failed");
            }
        }
        Ok(())
    }
}

/// Build the sink described by the `[alert]` config section.
pub fn from_config(cfg: &AlertConfig) -> Box<dyn AlertSink> {
    if !cfg.enabled {
        return Box::new(SilentAlert);
    }
    let mut composite = CompositeAlert::new();
    if cfg.bell {
        composite = composite.push(TerminalBell);
    }
    if let Some(path) = cfg.sound_file.as_deref().filter(|p| !p.trim().is_empty()) {
        composite = composite.push(SoundFile::new(path));
    }
    if composite.is_empty() {
        Box::new(SilentAlert)
    } else {
        Box::new(composite)
    }
}
