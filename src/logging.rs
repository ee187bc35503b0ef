/// Structured logging for the incident review service
///
/// Provides context-rich logging with component tags, optional subject
/// identifiers (issue key, field name, file name), timestamps, and severity
/// levels. Supports both console output and file-based logging.
///
/// The analytics and filter functions are pure and never log; ingestion,
/// the session store and export do.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::{Mutex, MutexGuard};

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
// Components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Ingest,
    Store,
    Export,
    Config,
    System,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Ingest => write!(f, "INGEST"),
            Component::Store => write!(f, "STORE"),
            Component::Export => write!(f, "EXPORT"),
            Component::Config => write!(f, "CONFIG"),
            Component::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

fn global() -> MutexGuard<'static, Option<Logger>> {
    // a panic while holding the lock leaves the logger itself intact
    LOGGER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        *global() = Some(logger);
    }

    /// Formats the line written to the log file.
    fn format_entry(level: LogLevel, component: Component, subject: Option<&str>, message: &str) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let subject_part = subject.map(|s| format!(" [{}]", s)).unwrap_or_default();
        format!("{} {} {}{}: {}", timestamp, level, component, subject_part, message)
    }

    fn log(&self, level: LogLevel, component: Component, subject: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let log_entry = Self::format_entry(level, component, subject, message);
        let subject_part = subject.map(|s| format!(" [{}]", s)).unwrap_or_default();

        // Console output
        if self.console_timestamps {
            match level {
                LogLevel::Error => eprintln!("{}", log_entry),
                LogLevel::Warning => eprintln!("   {}", log_entry),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", component, subject_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", component, subject_part, message),
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
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

/// Initialize the global logger from the `[logging]` config section
pub fn init_from_config(config: &crate::config::LoggingConfig) -> Result<(), crate::config::ConfigError> {
    let level = config.min_level()?;
    init_logger(level, config.file.as_deref(), config.timestamps);
    debug(Component::System, None, &format!("logger initialised at level {}", level));
    Ok(())
}

/// Log a general informational message
pub fn info(component: Component, subject: Option<&str>, message: &str) {
    if let Some(logger) = global().as_ref() {
        logger.log(LogLevel::Info, component, subject, message);
    }
}

/// Log a warning message
pub fn warn(component: Component, subject: Option<&str>, message: &str) {
    if let Some(logger) = global().as_ref() {
        logger.log(LogLevel::Warning, component, subject, message);
    }
}

/// Log an error message
pub fn error(component: Component, subject: Option<&str>, message: &str) {
    if let Some(logger) = global().as_ref() {
        logger.log(LogLevel::Error, component, subject, message);
    }
}

/// Log a debug message
pub fn debug(component: Component, subject: Option<&str>, message: &str) {
    if let Some(logger) = global().as_ref() {
        logger.log(LogLevel::Debug, component, subject, message);
    }
}

// ---------------------------------------------------------------------------
// Upload Summary Logging
// ---------------------------------------------------------------------------

/// Severity of an upload outcome: clean, partially skipped, or nothing kept.
pub fn classify_ingest(total_rows: usize, kept: usize) -> LogLevel {
    if kept == total_rows {
        LogLevel::Info
    } else if kept == 0 {
        LogLevel::Error
    } else {
        LogLevel::Warning
    }
}

/// Log a summary of one ingested table
pub fn log_ingest_summary(source_format: &str, total_rows: usize, kept: usize) {
    let skipped = total_rows.saturating_sub(kept);
    let message = format!(
        "Upload parsed: {}/{} rows kept, {} blank rows skipped",
        kept, total_rows, skipped
    );

    match classify_ingest(total_rows, kept) {
        LogLevel::Info | LogLevel::Debug => info(Component::Ingest, Some(source_format), &message),
        LogLevel::Warning => warn(Component::Ingest, Some(source_format), &message),
        LogLevel::Error => error(Component::Ingest, Some(source_format), &message),
    }
}
