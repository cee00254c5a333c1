//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested file does not exist.
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// The file extension has no enabled format feature.
    #[error("Unsupported or disabled configuration format: {0}")]
    UnsupportedFormat(PathBuf),

    /// The layered sources could not be read into [`QuiverConfig`](super::QuiverConfig).
    #[error("Failed to read configuration: {0}")]
    Extract(#[from] figment::Error),

    #[error("Invalid configuration: {message}")]
    ValidationError { message: String },

    #[error("Missing required configuration field: {field}")]
    MissingField { field: String },

    /// The command prefix cannot mark a line as a command.
    #[error("Invalid command prefix {prefix:?}: {reason}")]
    InvalidPrefix { prefix: String, reason: String },

    /// An alias override that can never be typed as one word.
    #[error("Invalid alias {alias:?} for command {command}")]
    InvalidAlias { command: String, alias: String },
}

impl ConfigError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn invalid_prefix(prefix: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPrefix {
            prefix: prefix.into(),
            reason: reason.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
