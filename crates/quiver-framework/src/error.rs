//! Error types for the Quiver framework.

use thiserror::Error;

/// Errors raised while registering a command.
///
/// Dispatch itself never fails: unknown commands and denied senders are
/// reported as [`DispatchOutcome`](crate::registry::DispatchOutcome) values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A required configuration field is still missing after defaulting.
    #[error("missing required command field: {field}")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A command identifier or alias cannot be matched by the tokenizer.
    #[error("invalid command label '{label}': {reason}")]
    InvalidLabel {
        /// The offending identifier or alias.
        label: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}

impl RegistryError {
    /// Creates a missing field error.
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Creates an invalid label error.
    pub fn invalid_label(label: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidLabel {
            label: label.into(),
            reason,
        }
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
