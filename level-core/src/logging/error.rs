//! Error types for the logging subsystem

use thiserror::Error;

/// Errors raised while installing the subscriber or parsing levels
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoggingError {
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    #[error("Unknown log level: {0}")]
    UnknownLevel(String),
}
