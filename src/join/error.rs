//! Join errors.

use thiserror::Error;

/// Result type for join operations.
pub type JoinResult<T> = Result<T, JoinError>;

/// Join errors.
#[derive(Debug, Error)]
pub enum JoinError {
    /// A required key column could not be located in one of the datasets.
    #[error("required headers missing ({}); need {required}", missing.join(", "))]
    MissingHeaders {
        /// Logical fields that did not resolve, e.g. `churn new path`.
        missing: Vec<String>,
        /// Accepted spellings for both datasets.
        required: String,
    },

    /// Clashing churn columns cannot be renamed with an empty suffix.
    #[error("clash suffix must not be empty")]
    EmptyClashSuffix,
}

impl JoinError {
    /// Check if error is a configuration problem rather than a data problem.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            JoinError::MissingHeaders { .. } | JoinError::EmptyClashSuffix
        )
    }
}
