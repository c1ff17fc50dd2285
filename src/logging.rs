/// Structured logging for the storm monitoring service
///
/// Provides context-rich logging with a data-source tag, an optional
/// subject identifier (storm or location name), timestamps, and severity
/// levels. Supports both console output and file-based logging for
/// scheduled runs.
///
/// The logger is an owned value injected into the components that need
/// it (parser, report builder, verification runner) rather than a
/// process-global, so callers decide where warnings go.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Nhc,
    Config,
    Report,
    Output,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Nhc => write!(f, "NHC"),
            DataSource::Config => write!(f, "CFG"),
            DataSource::Report => write!(f, "RPT"),
            DataSource::Output => write!(f, "OUT"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger
// ---------------------------------------------------------------------------

pub struct Logger {
    /// Minimum log level to emit.
    min_level: LogLevel,
    /// Optional file path for logging.
    log_file: Option<String>,
    /// Whether to include timestamps in console output.
    console_timestamps: bool,
}

impl Logger {
    pub fn new(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) -> Logger {
        Logger {
            min_level,
            log_file: log_file.map(String::from),
            console_timestamps,
        }
    }

    /// A logger that stays quiet below Error and writes no file.
    /// Used in tests exercising the tolerant parser.
    pub fn quiet() -> Logger {
        Logger::new(LogLevel::Error, None, false)
    }

    /// Log an informational message.
    pub fn info(&self, source: DataSource, subject: Option<&str>, message: &str) {
        self.log(LogLevel::Info, source, subject, message);
    }

    /// Log a warning message (skipped entries, degraded output).
    pub fn warn(&self, source: DataSource, subject: Option<&str>, message: &str) {
        self.log(LogLevel::Warning, source, subject, message);
    }

    /// Log an error message.
    pub fn error(&self, source: DataSource, subject: Option<&str>, message: &str) {
        self.log(LogLevel::Error, source, subject, message);
    }

    /// Log a debug message.
    pub fn debug(&self, source: DataSource, subject: Option<&str>, message: &str) {
        self.log(LogLevel::Debug, source, subject, message);
    }

    fn log(&self, level: LogLevel, source: DataSource, subject: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let subject_part = subject.map(|s| format!(" [{}]", s)).unwrap_or_default();
        let log_entry = format!(
            "{} {} {}{}: {}",
            timestamp, level, source, subject_part, message
        );

        // Console output
        if self.console_timestamps {
            match level {
                LogLevel::Error | LogLevel::Warning => eprintln!("{}", log_entry),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", source, subject_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", source, subject_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => {} // Skip debug in non-timestamp mode
            }
        }

        // File output
        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_source_tags_are_short_and_distinct() {
        let tags = [
            DataSource::Nhc.to_string(),
            DataSource::Config.to_string(),
            DataSource::Report.to_string(),
            DataSource::Output.to_string(),
            DataSource::System.to_string(),
        ];
        let mut seen = std::collections::HashSet::new();
        for tag in &tags {
            assert!(tag.len() <= 3, "source tag '{}' should stay compact", tag);
            assert!(seen.insert(tag), "duplicate source tag '{}'", tag);
        }
    }

    #[test]
    fn test_quiet_logger_filters_below_error() {
        // Smoke test: a quiet logger must not panic on suppressed levels.
        let logger = Logger::quiet();
        logger.debug(DataSource::System, None, "suppressed");
        logger.info(DataSource::System, None, "suppressed");
        logger.warn(DataSource::Nhc, Some("Tammy"), "suppressed");
    }
}
