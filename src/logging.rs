/// Structured logging for the flow comparison service.
///
/// Context-rich logging with backend/station identifiers, timestamps, and
/// severity levels. Supports console output and an optional file sink for
/// scripted batch runs.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

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
    Hdb,
    Usgs,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Hdb => write!(f, "HDB"),
            DataSource::Usgs => write!(f, "USGS"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger
// ---------------------------------------------------------------------------

static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    min_level: LogLevel,
    log_file: Option<String>,
}

impl Logger {
    /// Initialize the global logger. Until this is called, log calls are
    /// silently dropped — unit tests stay quiet by default.
    pub fn init(min_level: LogLevel, log_file: Option<String>) {
        *LOGGER.lock().unwrap() = Some(Logger { min_level, log_file });
    }

    fn log(&self, level: LogLevel, source: DataSource, station_id: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let station_part = station_id.map(|s| format!(" [{}]", s)).unwrap_or_default();
        let entry = format!("{} {} {}{}: {}", timestamp, level, source, station_part, message);

        match level {
            LogLevel::Error | LogLevel::Warning => eprintln!("{}", entry),
            _ => println!("{}", entry),
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &entry) {
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
// Public logging functions
// ---------------------------------------------------------------------------

pub fn init_logger(min_level: LogLevel, log_file: Option<&str>) {
    Logger::init(min_level, log_file.map(String::from));
}

pub fn info(source: DataSource, station_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Info, source, station_id, message);
    }
}

pub fn warn(source: DataSource, station_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Warning, source, station_id, message);
    }
}

pub fn error(source: DataSource, station_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Error, source, station_id, message);
    }
}

pub fn debug(source: DataSource, station_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Debug, source, station_id, message);
    }
}

// ---------------------------------------------------------------------------
// Failure classification
// ---------------------------------------------------------------------------

/// Whether a fetch failure points at the service or at the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// The window genuinely has no data (empty response, gaps).
    Expected,
    /// Transport or schema trouble — the backend or our parser degraded.
    Unexpected,
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

pub fn classify_fetch_failure(error_message: &str) -> FailureType {
    if error_message.contains("no data")
        || error_message.contains("No timeSeries")
        || error_message.contains("no readings")
    {
        FailureType::Expected
    } else if error_message.contains("API error")
        || error_message.contains("request failed")
        || error_message.contains("Parse error")
        || error_message.contains("deserialization failed")
    {
        FailureType::Unexpected
    } else {
        FailureType::Unknown
    }
}

/// Log a backend fetch failure with automatic classification.
pub fn log_fetch_failure(source: DataSource, station_id: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = classify_fetch_failure(&error_msg);
    let message = format!("fetch failed [{}]: {}", failure_type, error_msg);

    match failure_type {
        FailureType::Expected => debug(source, Some(station_id), &message),
        FailureType::Unexpected => error(source, Some(station_id), &message),
        FailureType::Unknown => warn(source, Some(station_id), &message),
    }
}

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
    fn test_failure_classification() {
        assert_eq!(
            classify_fetch_failure("HDB returned no data for sdid 2166"),
            FailureType::Expected
        );
        assert_eq!(classify_fetch_failure("HDB API error: 500"), FailureType::Unexpected);
        assert_eq!(
            classify_fetch_failure("USGS JSON deserialization failed: eof"),
            FailureType::Unexpected
        );
        assert_eq!(classify_fetch_failure("something else entirely"), FailureType::Unknown);
    }
}
