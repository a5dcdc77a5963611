use thiserror::Error;

/// Failure taxonomy for the scoring core.
///
/// `Validation` is always raised before any aggregate is touched, so a
/// validation failure never leaves partial state behind. `NotFound` aborts
/// the enclosing transaction. `State` covers requests that are well-formed
/// but illegal for the current match state (e.g. removing a delivery that
/// is not the most recent one).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("validation failed: {reason}")]
    Validation { reason: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("invalid state: {reason}")]
    State { reason: String },
}

impl ScoringError {
    pub fn validation(reason: impl Into<String>) -> Self {
        ScoringError::Validation { reason: reason.into() }
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        ScoringError::NotFound { entity, id: id.into() }
    }

    pub fn state(reason: impl Into<String>) -> Self {
        ScoringError::State { reason: reason.into() }
    }

    /// Whether the caller may retry the same request unchanged.
    ///
    /// Validation and state errors are deterministic, so a retry without a
    /// changed payload can never succeed. Lookups may race with fixture
    /// registration in a larger system, so those are left retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ScoringError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScoringError>;
