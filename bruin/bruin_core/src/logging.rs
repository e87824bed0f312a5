//! Logging utilities.
//!
//! This module defines log levels and structured log records, a
//! formatter that wraps long messages to the terminal width, and a
//! simple stream logger that plugs into the `log` facade.

use crate::error::LoggingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Width used when the `COLUMNS` environment variable is absent or unusable.
const DEFAULT_WRAP_WIDTH: usize = 79;

/// Indent prefixed to wrapped continuation lines.
const WRAP_INDENT: &str = "    ";

/// Log level.
///
/// The variants are ordered by increasing severity. The numeric values
/// follow the conventional 10-to-50 scale so that thresholds can be
/// stored and compared as plain integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Verbose debug information.
    Trace,

    /// Debug information.
    Debug,

    /// Informational messages.
    Info,

    /// Warning messages.
    Warning,

    /// Error messages.
    Error,
}

impl LogLevel {
    /// Get the name of this log level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    /// Get the numeric value of this log level. Higher values indicate
    /// higher severity.
    pub fn as_number(&self) -> u8 {
        match self {
            Self::Trace => 10,
            Self::Debug => 20,
            Self::Info => 30,
            Self::Warning => 40,
            Self::Error => 50,
        }
    }

    /// Check if this log level is at least as severe as the given level.
    pub fn is_at_least(&self, level: LogLevel) -> bool {
        self.as_number() >= level.as_number()
    }

    /// The `log` crate filter admitting this level and everything more
    /// severe.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Trace => log::LevelFilter::Trace,
            Self::Debug => log::LevelFilter::Debug,
            Self::Info => log::LevelFilter::Info,
            Self::Warning => log::LevelFilter::Warn,
            Self::Error => log::LevelFilter::Error,
        }
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace => Self::Trace,
            log::Level::Debug => Self::Debug,
            log::Level::Info => Self::Info,
            log::Level::Warn => Self::Warning,
            log::Level::Error => Self::Error,
        }
    }
}

impl FromStr for LogLevel {
    type Err = LoggingError;

    /// Convert from a string. Case-insensitive; `warn` and `err` are
    /// accepted as aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" | "err" => Ok(Self::Error),
            _ => Err(LoggingError::InvalidLevel(s.to_string())),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured log record: level, message, source location, timestamp,
/// and free-form metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    /// The log level.
    pub level: LogLevel,

    /// The log message.
    pub message: String,

    /// The module path where the log was recorded.
    pub module_path: String,

    /// The file where the log was recorded.
    pub file: String,

    /// The line number where the log was recorded.
    pub line: u32,

    /// The timestamp when the log was recorded.
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// Additional metadata.
    pub metadata: std::collections::HashMap<String, String>,
}

impl LogRecord {
    /// Create a new log record with the current timestamp and no
    /// metadata.
    pub fn new(
        level: LogLevel,
        message: impl Into<String>,
        module_path: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            level,
            message: message.into(),
            module_path: module_path.into(),
            file: file.into(),
            line,
            timestamp: chrono::Utc::now(),
            metadata: std::collections::HashMap::new(),
        }
    }

    /// Add a metadata entry, consuming and returning the record for
    /// chaining.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Format this log record for display.
    pub fn format(&self) -> String {
        let mut result = format!(
            "{} [{}] - {} [{}:{}]",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.level,
            self.message,
            self.file,
            self.line
        );

        if !self.metadata.is_empty() {
            let metadata_str = self
                .metadata
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(" ");
            result = format!("{} - {}", result, metadata_str);
        }

        result
    }
}

/// Greedily word-wrap `text` to `width` columns.
///
/// Each input line wraps independently; continuation lines are prefixed
/// with `subsequent_indent`. Words are never split, so a single word
/// longer than the width occupies its own line.
pub fn wrap_text(text: &str, width: usize, subsequent_indent: &str) -> String {
    let mut wrapped = Vec::new();

    for line in text.split('\n') {
        if line.chars().count() <= width {
            wrapped.push(line.to_string());
            continue;
        }

        let mut current = String::new();
        for word in line.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            if current.chars().count() + 1 + word.chars().count() > width {
                wrapped.push(current);
                current = format!("{}{}", subsequent_indent, word);
            } else {
                current.push(' ');
                current.push_str(word);
            }
        }
        if !current.is_empty() {
            wrapped.push(current);
        }
    }

    wrapped.join("\n")
}

/// Formatter that wraps each line of a formatted record to a maximum
/// width, with a hanging indent on continuation lines.
///
/// The default width comes from the `COLUMNS` environment variable,
/// minus one column, falling back to 79.
#[derive(Debug, Clone)]
pub struct WrappingFormatter {
    /// Maximum output width in columns.
    pub max_width: usize,
}

impl WrappingFormatter {
    /// Create a formatter sized from the environment.
    pub fn new() -> Self {
        let max_width = std::env::var("COLUMNS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .map(|w| w.saturating_sub(1))
            .filter(|w| *w > 0)
            .unwrap_or(DEFAULT_WRAP_WIDTH);
        Self { max_width }
    }

    /// Create a formatter with an explicit width.
    pub fn with_width(max_width: usize) -> Self {
        Self { max_width }
    }

    /// Format a record and wrap the result.
    pub fn format(&self, record: &LogRecord) -> String {
        wrap_text(&record.format(), self.max_width, WRAP_INDENT)
    }
}

impl Default for WrappingFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Logger that writes `HH:MM:SS message` lines to stderr, wrapped to
/// the formatter's width.
struct StreamLogger {
    max_level: LogLevel,
    max_width: usize,
}

impl log::Log for StreamLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        LogLevel::from(metadata.level()).is_at_least(self.max_level)
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "{} {}",
            chrono::Local::now().format("%H:%M:%S"),
            record.args()
        );
        eprintln!("{}", wrap_text(&line, self.max_width, WRAP_INDENT));
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Install a stream logger on the `log` facade, writing to stderr.
///
/// Records above `max_level` in verbosity are discarded. Fails with
/// `LoggingError::InitFailed` if a global logger is already installed.
pub fn init_stream_logging(max_level: LogLevel) -> Result<(), LoggingError> {
    let logger = StreamLogger {
        max_level,
        max_width: WrappingFormatter::new().max_width,
    };
    log::set_boxed_logger(Box::new(logger))
        .map_err(|e| LoggingError::InitFailed(e.to_string()))?;
    log::set_max_level(max_level.to_level_filter());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Error > LogLevel::Warning);
        assert!(LogLevel::Warning > LogLevel::Info);
        assert!(LogLevel::Info > LogLevel::Debug);
        assert!(LogLevel::Debug > LogLevel::Trace);
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!("trace".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!("error".parse::<LogLevel>().unwrap(), LogLevel::Error);
        assert_eq!("err".parse::<LogLevel>().unwrap(), LogLevel::Error);

        let err = "loud".parse::<LogLevel>().unwrap_err();
        assert!(matches!(err, LoggingError::InvalidLevel(_)));
    }

    #[test]
    fn test_log_level_numbers() {
        assert_eq!(LogLevel::Trace.as_number(), 10);
        assert_eq!(LogLevel::Debug.as_number(), 20);
        assert_eq!(LogLevel::Info.as_number(), 30);
        assert_eq!(LogLevel::Warning.as_number(), 40);
        assert_eq!(LogLevel::Error.as_number(), 50);
    }

    #[test]
    fn test_log_level_is_at_least() {
        assert!(LogLevel::Error.is_at_least(LogLevel::Error));
        assert!(LogLevel::Error.is_at_least(LogLevel::Trace));
        assert!(!LogLevel::Trace.is_at_least(LogLevel::Debug));
        assert!(!LogLevel::Info.is_at_least(LogLevel::Warning));
    }

    #[test]
    fn test_log_level_facade_conversion() {
        assert_eq!(LogLevel::from(log::Level::Warn), LogLevel::Warning);
        assert_eq!(LogLevel::from(log::Level::Trace), LogLevel::Trace);
        assert_eq!(
            LogLevel::Warning.to_level_filter(),
            log::LevelFilter::Warn
        );
        assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    }

    #[test]
    fn test_log_record() {
        let record = LogRecord::new(
            LogLevel::Info,
            "Test message",
            "test_module",
            "test_file.rs",
            42,
        )
        .with_metadata("key1", "value1")
        .with_metadata("key2", "value2");

        assert_eq!(record.level, LogLevel::Info);
        assert_eq!(record.metadata.get("key1").unwrap(), "value1");

        let formatted = record.format();
        assert!(formatted.contains("[INFO]"));
        assert!(formatted.contains("Test message"));
        assert!(formatted.contains("test_file.rs:42"));
        assert!(formatted.contains("key1=value1"));
        assert!(formatted.contains("key2=value2"));
    }

    #[test]
    fn test_wrap_text_short_line_unchanged() {
        assert_eq!(wrap_text("hello world", 79, "    "), "hello world");
    }

    #[test]
    fn test_wrap_text_wraps_with_indent() {
        let text = "alpha beta gamma delta";
        let wrapped = wrap_text(text, 11, "    ");
        assert_eq!(wrapped, "alpha beta\n    gamma\n    delta");
    }

    #[test]
    fn test_wrap_text_long_word_stands_alone() {
        let wrapped = wrap_text("x incomprehensibilities y", 10, "  ");
        let lines: Vec<&str> = wrapped.split('\n').collect();
        assert_eq!(lines[0], "x");
        assert_eq!(lines[1], "  incomprehensibilities");
        assert_eq!(lines[2], "  y");
    }

    #[test]
    fn test_wrapping_formatter() {
        let formatter = WrappingFormatter::with_width(40);
        let record = LogRecord::new(
            LogLevel::Warning,
            "a message long enough that the formatted record cannot fit one line",
            "m",
            "f.rs",
            1,
        );

        let formatted = formatter.format(&record);
        let mut lines = formatted.split('\n');
        let first = lines.next().unwrap();
        assert!(first.chars().count() <= 40);
        for continuation in lines {
            assert!(continuation.starts_with(WRAP_INDENT));
        }
    }

    #[test]
    fn test_init_stream_logging_rejects_second_logger() {
        // The first installation in this process wins; the second must
        // report failure.
        assert!(init_stream_logging(LogLevel::Info).is_ok());
        let err = init_stream_logging(LogLevel::Debug).unwrap_err();
        assert!(matches!(err, LoggingError::InitFailed(_)));
    }

    #[test]
    fn test_log_record_serialization() {
        let record = LogRecord::new(LogLevel::Info, "Test message", "m", "f.rs", 42)
            .with_metadata("key1", "value1");

        let serialized = serde_json::to_string(&record).unwrap();
        let deserialized: LogRecord = serde_json::from_str(&serialized).unwrap();

        assert_eq!(record.level, deserialized.level);
        assert_eq!(record.message, deserialized.message);
        assert_eq!(record.line, deserialized.line);
        assert_eq!(
            record.metadata.get("key1"),
            deserialized.metadata.get("key1")
        );
    }
}
