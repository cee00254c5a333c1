//! Runtime error types.

use thiserror::Error;

use crate::config::ConfigError;
use crate::logging::LoggingError;
use quiver_framework::RegistryError;

/// Errors that can occur during runtime operations.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A command could not be registered.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Logging could not be installed.
    #[error(transparent)]
    Logging(#[from] LoggingError),

    /// Reading input lines failed.
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
