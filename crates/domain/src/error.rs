//! Unified error type for domain parsing and validation.

use thiserror::Error;

/// Errors produced when turning raw strings into domain vocabulary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A role tag not in the known set
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// A phase name not in the known set
    #[error("Unknown phase: {0}")]
    UnknownPhase(String),

    /// A winning-side name not in the known set
    #[error("Unknown winner: {0}")]
    UnknownWinner(String),

    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    /// Create a validation error for invariant violations.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_role_message() {
        let err = DomainError::UnknownRole("jester".into());
        assert_eq!(err.to_string(), "Unknown role: jester");
    }

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("candidates must not be empty");
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
