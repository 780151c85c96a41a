//! Table layer error types

use std::path::PathBuf;

use thiserror::Error;

/// the main error type for reading and writing tables
#[derive(Debug, Error)]
pub enum TableError {
    /// the input file could not be opened
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// the output file (or its parent directory) could not be created
    #[error("cannot create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// malformed CSV framing or invalid UTF-8 reported by the parser
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// a quoted field was still open at end of input
    #[error("unterminated quoted field starting on line {line}")]
    UnterminatedQuote { line: usize },

    /// I/O error (filesystem level)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl TableError {
    /// check if this error came from a missing input or output location
    pub fn is_not_found(&self) -> bool {
        match self {
            TableError::Open { source, .. } | TableError::Create { source, .. } => {
                source.kind() == std::io::ErrorKind::NotFound
            }
            TableError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            TableError::Csv(_) | TableError::UnterminatedQuote { .. } => false,
        }
    }
}

/// result type alias for table operations
pub type TableResult<T> = Result<T, TableError>;
