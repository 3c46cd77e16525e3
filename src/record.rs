use std::error::Error;
use std::fmt::{self, Display, Write};
use std::sync::Arc;

/// Level names indexed by [`Event::level`].
pub const LEVEL_NAMES: [&str; 6] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR", "FATAL"];

/// Map a `tracing` level onto an index into [`LEVEL_NAMES`].
pub fn level_index(level: &tracing::Level) -> usize {
    match *level {
        tracing::Level::TRACE => 0,
        tracing::Level::DEBUG => 1,
        tracing::Level::INFO => 2,
        tracing::Level::WARN => 3,
        _ => 4,
    }
}

/// Read-only view of a log event consumed by the pattern formatter.
///
/// The logging framework owns the event; the formatter never mutates it.
pub trait Event {
    /// Short name of the originating logger (`%c`).
    fn logger_name(&self) -> &str;

    /// Fully qualified name of the originating logger (`%C`).
    fn logger_full_name(&self) -> &str;

    /// Severity as an index into the level name table.
    fn level(&self) -> usize;

    /// Human-readable severity (`%l`).
    fn level_name(&self) -> &str {
        LEVEL_NAMES.get(self.level()).copied().unwrap_or("UNKNOWN")
    }

    /// Data payload (`%m`, `%M`).
    fn data(&self) -> &LogData;

    /// Call trace, innermost entry first (`%t`).
    fn trace(&self) -> &[String];
}

/// Payload carried by a log event.
#[derive(Clone)]
pub enum LogData {
    Text(String),
    Json(serde_json::Value),
    Error(Arc<dyn Error + Send + Sync>),
    Display(Arc<dyn Display + Send + Sync>),
}

impl LogData {
    /// Write the raw form of the payload, as used by `%m`.
    pub fn write_raw(&self, out: &mut String) -> fmt::Result {
        match self {
            LogData::Text(text) => {
                out.push_str(text);
                Ok(())
            }
            LogData::Json(serde_json::Value::String(text)) => {
                out.push_str(text);
                Ok(())
            }
            LogData::Json(value) => write!(out, "{}", value),
            LogData::Error(err) => write!(out, "{}", err),
            LogData::Display(value) => write!(out, "{}", value),
        }
    }

    /// Write the payload through the object formatter, as used by `%M`.
    ///
    /// JSON values are pretty-printed and errors are expanded with their
    /// `source()` chain.
    pub fn write_object(&self, out: &mut String) -> fmt::Result {
        match self {
            LogData::Json(value) if !value.is_string() => {
                let pretty = serde_json::to_string_pretty(value).map_err(|_| fmt::Error)?;
                out.push_str(&pretty);
                Ok(())
            }
            LogData::Error(err) => {
                write!(out, "Caught {}", err)?;
                let mut source = err.source();
                while let Some(cause) = source {
                    write!(out, "\n\tcaused by: {}", cause)?;
                    source = cause.source();
                }
                Ok(())
            }
            _ => self.write_raw(out),
        }
    }
}

impl fmt::Debug for LogData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogData::Text(text) => f.debug_tuple("Text").field(text).finish(),
            LogData::Json(value) => f.debug_tuple("Json").field(value).finish(),
            LogData::Error(err) => f.debug_tuple("Error").field(&err.to_string()).finish(),
            LogData::Display(_) => f.write_str("Display(..)"),
        }
    }
}

impl From<String> for LogData {
    fn from(text: String) -> Self {
        LogData::Text(text)
    }
}

impl From<&str> for LogData {
    fn from(text: &str) -> Self {
        LogData::Text(text.to_string())
    }
}

impl From<serde_json::Value> for LogData {
    fn from(value: serde_json::Value) -> Self {
        LogData::Json(value)
    }
}

/// Owned event type implementing [`Event`], produced by the tracing layer
/// and convenient for callers that build events by hand.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub name: String,
    pub fullname: String,
    pub level: usize,
    pub level_name: Option<String>,
    pub data: LogData,
    pub trace: Vec<String>,
}

impl LogRecord {
    /// Build a record for the logger `fullname`; the short name is the last
    /// `::`-separated component.
    pub fn new(fullname: impl Into<String>, level: usize, data: impl Into<LogData>) -> Self {
        let fullname = fullname.into();
        let name = short_name(&fullname).to_string();
        LogRecord {
            name,
            fullname,
            level,
            level_name: None,
            data: data.into(),
            trace: Vec::new(),
        }
    }

    pub fn with_trace(mut self, trace: Vec<String>) -> Self {
        self.trace = trace;
        self
    }

    /// Override the name looked up from [`LEVEL_NAMES`].
    pub fn with_level_name(mut self, name: impl Into<String>) -> Self {
        self.level_name = Some(name.into());
        self
    }
}

impl Event for LogRecord {
    fn logger_name(&self) -> &str {
        &self.name
    }

    fn logger_full_name(&self) -> &str {
        &self.fullname
    }

    fn level(&self) -> usize {
        self.level
    }

    fn level_name(&self) -> &str {
        match &self.level_name {
            Some(name) => name,
            None => LEVEL_NAMES.get(self.level).copied().unwrap_or("UNKNOWN"),
        }
    }

    fn data(&self) -> &LogData {
        &self.data
    }

    fn trace(&self) -> &[String] {
        &self.trace
    }
}

fn short_name(fullname: &str) -> &str {
    fullname.rsplit("::").next().unwrap_or(fullname)
}
