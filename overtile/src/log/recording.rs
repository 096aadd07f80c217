//! Logger that keeps messages in memory.

use super::{LogLevel, Logger};
use parking_lot::Mutex;
use std::fmt::Arguments;

/// Records every message so tests can assert on what a component logged.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    records: Mutex<Vec<(LogLevel, String)>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages logged so far, oldest first.
    pub fn records(&self) -> Vec<(LogLevel, String)> {
        self.records.lock().clone()
    }

    /// True if a message at `level` contains `needle`.
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.records
            .lock()
            .iter()
            .any(|(l, message)| *l == level && message.contains(needle))
    }

    pub fn count(&self, level: LogLevel) -> usize {
        self.records.lock().iter().filter(|(l, _)| *l == level).count()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Logger for RecordingLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        self.records.lock().push((level, args.to_string()));
    }
}
