//! Structured logging with sensitive-field redaction.

use serde_json::Value;

/// Field names whose values never reach a log line.
const SENSITIVE_KEYS: [&str; 10] = [
    "api_key",
    "apikey",
    "key",
    "token",
    "access_token",
    "accesstoken",
    "secret",
    "password",
    "authorization",
    "x-goog-api-key",
];

const REDACTED: &str = "***REDACTED***";

/// Log level, ordered from least to most verbose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Errors and warnings.
    Warn,
    /// General information.
    #[default]
    Info,
    /// Detailed information.
    Debug,
    /// Very detailed information.
    Trace,
}

impl From<LogLevel> for tracing::level_filters::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}

/// Logger trait for structured logging.
pub trait Logger: Send + Sync {
    /// Log a debug message with structured context.
    fn debug(&self, message: &str, fields: Value);

    /// Log an info message with structured context.
    fn info(&self, message: &str, fields: Value);

    /// Log a warning message with structured context.
    fn warn(&self, message: &str, fields: Value);

    /// Log an error message with structured context.
    fn error(&self, message: &str, fields: Value);
}

/// Logger that emits `tracing` events tagged with a component name.
///
/// Sensitive keys (credentials, tokens) are replaced at any nesting depth
/// before the event is emitted.
pub struct StructuredLogger {
    name: String,
    level: LogLevel,
}

impl StructuredLogger {
    /// Create a new structured logger for the named component.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            level: LogLevel::Info,
        }
    }

    /// Set the most verbose level this logger emits.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    fn should_log(&self, level: LogLevel) -> bool {
        level <= self.level
    }

    fn redact_sensitive_fields(fields: Value) -> Value {
        match fields {
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| {
                        if SENSITIVE_KEYS.contains(&key.to_ascii_lowercase().as_str()) {
                            (key, Value::String(REDACTED.to_string()))
                        } else {
                            (key, Self::redact_sensitive_fields(value))
                        }
                    })
                    .collect(),
            ),
            Value::Array(items) => {
                Value::Array(items.into_iter().map(Self::redact_sensitive_fields).collect())
            }
            other => other,
        }
    }
}

impl Logger for StructuredLogger {
    fn debug(&self, message: &str, fields: Value) {
        if self.should_log(LogLevel::Debug) {
            let fields = Self::redact_sensitive_fields(fields);
            tracing::debug!(logger = %self.name, fields = %fields, "{}", message);
        }
    }

    fn info(&self, message: &str, fields: Value) {
        if self.should_log(LogLevel::Info) {
            let fields = Self::redact_sensitive_fields(fields);
            tracing::info!(logger = %self.name, fields = %fields, "{}", message);
        }
    }

    fn warn(&self, message: &str, fields: Value) {
        if self.should_log(LogLevel::Warn) {
            let fields = Self::redact_sensitive_fields(fields);
            tracing::warn!(logger = %self.name, fields = %fields, "{}", message);
        }
    }

    fn error(&self, message: &str, fields: Value) {
        if self.should_log(LogLevel::Error) {
            let fields = Self::redact_sensitive_fields(fields);
            tracing::error!(logger = %self.name, fields = %fields, "{}", message);
        }
    }
}

/// Logger that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn debug(&self, _message: &str, _fields: Value) {}
    fn info(&self, _message: &str, _fields: Value) {}
    fn warn(&self, _message: &str, _fields: Value) {}
    fn error(&self, _message: &str, _fields: Value) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_should_log() {
        let logger = StructuredLogger::new("test").with_level(LogLevel::Info);
        assert!(logger.should_log(LogLevel::Error));
        assert!(logger.should_log(LogLevel::Warn));
        assert!(logger.should_log(LogLevel::Info));
        assert!(!logger.should_log(LogLevel::Debug));
        assert!(!logger.should_log(LogLevel::Trace));
    }

    #[test]
    fn test_redact_sensitive_fields() {
        let redacted = StructuredLogger::redact_sensitive_fields(json!({
            "api_key": "secret-key-123",
            "model": "gemini-2.5-pro",
            "project": "my-project"
        }));

        assert_eq!(redacted["api_key"], REDACTED);
        assert_eq!(redacted["model"], "gemini-2.5-pro");
        assert_eq!(redacted["project"], "my-project");
    }

    #[test]
    fn test_redact_nested_and_case_insensitive() {
        let redacted = StructuredLogger::redact_sensitive_fields(json!({
            "headers": {"Authorization": "Bearer ya29.abc", "Accept": "application/json"},
            "attempts": [{"accessToken": "t"}]
        }));

        assert_eq!(redacted["headers"]["Authorization"], REDACTED);
        assert_eq!(redacted["headers"]["Accept"], "application/json");
        assert_eq!(redacted["attempts"][0]["accessToken"], REDACTED);
    }

    #[test]
    fn test_logger_methods_do_not_panic_without_subscriber() {
        let logger = StructuredLogger::new("test").with_level(LogLevel::Trace);
        logger.debug("debug", json!({}));
        logger.info("info", json!({"token": "x"}));
        logger.warn("warn", Value::Null);
        logger.error("error", json!([1, 2]));

        NoopLogger.info("ignored", json!({}));
    }
}
