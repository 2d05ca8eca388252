use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;
use thiserror::Error;

/// Correlation identity carried through every operation so log lines and
/// published notifications can be traced back to the triggering request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub context_id: String,
}

impl RequestContext {
    pub fn new(context_id: &str) -> Self {
        Self {
            context_id: context_id.to_string(),
        }
    }
}

/// Severity levels honoured by the runtime log-level override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Returns the canonical uppercase representation.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "TRACE" => Some(LogLevel::Trace),
            "DEBUG" => Some(LogLevel::Debug),
            "INFO" => Some(LogLevel::Info),
            "WARN" => Some(LogLevel::Warn),
            "ERROR" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rotation policy (default mirrors 1 GiB x 10 files).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRotationPolicy {
    pub max_bytes: usize,
    pub max_files: usize,
}

impl Default for LogRotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 1 << 30,
            max_files: 10,
        }
    }
}

/// Accumulated log lines for a rotated file.
#[derive(Debug, Default, Clone)]
pub struct LogFile {
    lines: Vec<String>,
    bytes_written: usize,
}

impl LogFile {
    /// Lines contained within the log segment.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Total bytes recorded before rotation.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }
}

/// JSON-line logger with deterministic rotation semantics.
#[derive(Debug, Clone)]
pub struct JsonLineLogger {
    policy: LogRotationPolicy,
    current_level: LogLevel,
    files: VecDeque<LogFile>,
    active: LogFile,
}

impl JsonLineLogger {
    /// Creates a logger anchored to the provided rotation policy.
    pub fn new(policy: LogRotationPolicy) -> Self {
        Self {
            policy,
            current_level: LogLevel::Info,
            files: VecDeque::new(),
            active: LogFile::default(),
        }
    }

    pub fn level(&self) -> LogLevel {
        self.current_level
    }

    /// Applies a dynamic log-level override.
    pub fn set_level(&mut self, level: LogLevel) {
        self.current_level = level;
    }

    /// Emits a JSON-line log entry.
    pub fn log(
        &mut self,
        ts: DateTime<Utc>,
        level: LogLevel,
        event: &str,
        context_id: &str,
        company_number: Option<&str>,
        appointment_id: Option<&str>,
        message: &str,
    ) -> Result<(), LoggingError> {
        if level < self.current_level {
            return Ok(());
        }
        let record = LogRecord {
            ts: ts.to_rfc3339(),
            level: level.as_str(),
            event,
            context_id,
            company_number,
            appointment_id,
            message,
        };
        let line = serde_json::to_string(&record).map_err(LoggingError::Serialize)?;
        self.rotate_if_needed(line.len());
        self.active.bytes_written = self.active.bytes_written.saturating_add(line.len());
        self.active.lines.push(line);
        Ok(())
    }

    /// Returns the current file + rotated history.
    pub fn files(&self) -> impl Iterator<Item = &LogFile> {
        self.files.iter().chain(std::iter::once(&self.active))
    }

    fn rotate_if_needed(&mut self, next_line_len: usize) {
        if self.active.bytes_written + next_line_len <= self.policy.max_bytes {
            return;
        }
        if !self.active.lines.is_empty() {
            self.files.push_back(std::mem::take(&mut self.active));
            while self.files.len() > self.policy.max_files {
                self.files.pop_front();
            }
        }
        self.active = LogFile::default();
    }
}

/// Errors surfaced while serializing JSON-line logs.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to serialize log record: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct LogRecord<'a> {
    ts: String,
    level: &'a str,
    event: &'a str,
    context_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    company_number: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    appointment_id: Option<&'a str>,
    message: &'a str,
}

/// Thread-safe wrapper shared between the engines. Logging never fails an
/// operation: serialization errors are swallowed after best effort.
#[derive(Debug)]
pub struct ServiceLogger {
    inner: Mutex<JsonLineLogger>,
}

impl ServiceLogger {
    pub fn new(policy: LogRotationPolicy) -> Self {
        Self {
            inner: Mutex::new(JsonLineLogger::new(policy)),
        }
    }

    pub fn set_level(&self, level: LogLevel) {
        if let Ok(mut logger) = self.inner.lock() {
            logger.set_level(level);
        }
    }

    pub fn log(
        &self,
        level: LogLevel,
        event: &str,
        context: &RequestContext,
        company_number: Option<&str>,
        appointment_id: Option<&str>,
        message: &str,
    ) {
        if let Ok(mut logger) = self.inner.lock() {
            let _ = logger.log(
                Utc::now(),
                level,
                event,
                &context.context_id,
                company_number,
                appointment_id,
                message,
            );
        }
    }

    /// Snapshot of all lines across rotated segments (tests, diagnostics).
    pub fn lines(&self) -> Vec<String> {
        match self.inner.lock() {
            Ok(logger) => logger
                .files()
                .flat_map(|file| file.lines().iter().cloned())
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl Default for ServiceLogger {
    fn default() -> Self {
        Self::new(LogRotationPolicy::default())
    }
}
