//! [`Logger`] backed by the global `tracing` subscriber.

use super::{LogLevel, Logger};
use std::fmt::Arguments;

/// Forwards messages to `tracing` under the `overtile` target.
///
/// Output only appears once a subscriber is installed, for example by
/// [`init_logging`](crate::logging::init_logging).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "overtile", "{}", args),
            LogLevel::Debug => tracing::debug!(target: "overtile", "{}", args),
            LogLevel::Info => tracing::info!(target: "overtile", "{}", args),
            LogLevel::Warn => tracing::warn!(target: "overtile", "{}", args),
            LogLevel::Error => tracing::error!(target: "overtile", "{}", args),
        }
    }
}
