//! Mapper errors.

use thiserror::Error;

use crate::join::JoinError;
use crate::table::TableError;

/// Result type for a mapping run.
pub type MapperResult<T> = Result<T, MapperError>;

/// Mapping errors. Every variant aborts the run before output is written.
#[derive(Debug, Error)]
pub enum MapperError {
    #[error("table error: {0}")]
    Table(#[from] TableError),

    #[error("join error: {0}")]
    Join(#[from] JoinError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl MapperError {
    /// Check if the error is caused by the inputs' headers or the options.
    pub fn is_configuration(&self) -> bool {
        matches!(self, MapperError::Join(j) if j.is_configuration())
    }
}
