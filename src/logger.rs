//! Custom logging module.
//!
//! This module provides a custom logger implementation that captures log entries
//! and forwards them to a bounded buffer displayed in the log pane.

use crate::error::AppError;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Number of log lines kept for display.
///
pub const LOG_CAPACITY: usize = 200;

/// Format a log record into a string for display
///
pub fn format_log(record: &Record) -> String {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let level_str = match record.level() {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    };
    format!("{} {} {}", timestamp, level_str, record.args())
}

/// Shared, bounded list of formatted log lines. Oldest lines are dropped
/// first.
///
#[derive(Clone, Debug)]
pub struct LogBuffer {
    entries: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        LogBuffer {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn push(&self, line: String) {
        if let Ok(mut entries) = self.entries.lock() {
            while entries.len() >= self.capacity {
                entries.pop_front();
            }
            entries.push_back(line);
        }
    }

    /// Copy of the buffered lines, oldest first.
    ///
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        LogBuffer::new(LOG_CAPACITY)
    }
}

/// Custom logger that captures logs to the log pane
///
pub struct CustomLogger {
    level: LevelFilter,
    log_callback: Arc<Mutex<Option<Box<dyn Fn(String) + Send + Sync>>>>,
}

impl CustomLogger {
    pub fn new(level: LevelFilter) -> Self {
        CustomLogger {
            level,
            log_callback: Arc::new(Mutex::new(None)),
        }
    }

    pub fn set_log_callback(&self, callback: Box<dyn Fn(String) + Send + Sync>) {
        if let Ok(mut guard) = self.log_callback.lock() {
            *guard = Some(callback);
        }
    }

    /// Install as the global logger, forwarding every entry to `buffer`.
    ///
    pub fn install(self, buffer: LogBuffer) -> Result<(), AppError> {
        let level = self.level;
        self.set_log_callback(Box::new(move |line| buffer.push(line)));
        let logger: &'static CustomLogger = Box::leak(Box::new(self));
        log::set_logger(logger).map_err(|e| AppError::Logger(e.to_string()))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if let Ok(callback) = self.log_callback.lock() {
                if let Some(ref cb) = *callback {
                    cb(format_log(record));
                }
            }
        }
    }

    fn flush(&self) {}
}
