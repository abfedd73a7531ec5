use thiserror::Error;

/// The only failure code the core recognizes: a uniqueness-constraint
/// violation reported by the table store.
pub const UNIQUE_VIOLATION: &str = "23505";

/// Failure reported by the table-store collaborator. `code` is an opaque
/// backend string; absence of a code still counts as a generic failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StoreError {
    pub code: Option<String>,
    pub message: String,
}

impl StoreError {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        self.code.as_deref() == Some(UNIQUE_VIOLATION)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A required draft field was empty after trimming. Handled entirely
/// locally; never reaches the collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{field} must not be empty")]
pub struct ValidationError {
    pub field: &'static str,
}

/// Everything a mutation can fail with, fully absorbed at the controller
/// boundary and surfaced only as a notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("uniqueness conflict: {0}")]
    Conflict(StoreError),
    #[error("remote failure: {0}")]
    Remote(StoreError),
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_unique_violation_code() {
        assert!(StoreError::with_code("23505", "duplicate key").is_unique_violation());
        assert!(!StoreError::with_code("42P01", "missing table").is_unique_violation());
        assert!(!StoreError::message("connection refused").is_unique_violation());
    }
}
