//! Observability for the study-guide service.
//!
//! - [`StructuredLogger`]: per-component structured events with secret
//!   redaction, emitted through `tracing`.
//! - [`LoggingConfig`]: one-shot `tracing-subscriber` setup for the binary.
//!
//! ```rust
//! use study_buddy::observability::{LogLevel, Logger, StructuredLogger};
//! use serde_json::json;
//!
//! let logger = StructuredLogger::new("study_buddy.vertex").with_level(LogLevel::Debug);
//! logger.info("Calling model", json!({"model": "gemini-2.5-pro", "api_key": "hidden"}));
//! ```

pub mod logging;
pub mod subscriber;

pub use logging::{LogLevel, Logger, NoopLogger, StructuredLogger};
pub use subscriber::{LogFormat, LoggingConfig};
