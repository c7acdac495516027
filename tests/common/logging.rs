//! Verbose test logging with dump-on-failure.
//!
//! Entries are buffered silently; when a test panics, the harness dumps
//! the full log so the failure comes with its history attached.

#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Instant;

/// Log entry severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO ",
            Self::Warn => "WARN ",
            Self::Error => "ERROR",
        }
    }
}

/// A single buffered log entry.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub elapsed_ms: u64,
    pub level: LogLevel,
    pub category: String,
    pub message: String,
}

/// Buffering logger for one test.
pub struct TestLogger {
    start: Instant,
    entries: Mutex<Vec<LogEntry>>,
}

impl TestLogger {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            entries: Mutex::new(Vec::new()),
        }
    }

    fn push(&self, level: LogLevel, category: &str, message: impl Into<String>) {
        let entry = LogEntry {
            elapsed_ms: self.start.elapsed().as_millis() as u64,
            level,
            category: category.to_string(),
            message: message.into(),
        };
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }

    pub fn debug(&self, category: &str, message: impl Into<String>) {
        self.push(LogLevel::Debug, category, message);
    }

    pub fn info(&self, category: &str, message: impl Into<String>) {
        self.push(LogLevel::Info, category, message);
    }

    pub fn warn(&self, category: &str, message: impl Into<String>) {
        self.push(LogLevel::Warn, category, message);
    }

    pub fn error(&self, category: &str, message: impl Into<String>) {
        self.push(LogLevel::Error, category, message);
    }

    /// Print every buffered entry to stderr.
    pub fn dump(&self) {
        let Ok(entries) = self.entries.lock() else {
            return;
        };
        eprintln!("──── test log ({} entries) ────", entries.len());
        for entry in entries.iter() {
            eprintln!(
                "[{:>7.3}s] {} [{}] {}",
                entry.elapsed_ms as f64 / 1000.0,
                entry.level.as_str(),
                entry.category,
                entry.message
            );
        }
    }
}

impl Default for TestLogger {
    fn default() -> Self {
        Self::new()
    }
}
