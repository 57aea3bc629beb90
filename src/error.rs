//! Error types for table operations and CSV serialization.

use std::io;

use thiserror::Error;

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Errors raised by the table core and its reader/writer.
///
/// Lookups never fail on a missing column or an empty table; those cases
/// produce empty results. Errors are reserved for caller contract violations,
/// cell coercion failures, and stream problems.
#[derive(Debug, Error)]
pub enum TableError {
    /// A cell could not be coerced to the requested numeric type.
    #[error("Key='{column}' - {message}")]
    Format { column: String, message: String },

    /// The caller passed arguments that violate an operation's contract.
    #[error("{0}")]
    InvalidArgument(String),

    /// Serialized input is not valid for the configured dialect.
    #[error("Malformed CSV at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// Text could not be converted to or from the requested encoding.
    #[error("Failed to {action} text using {encoding}")]
    Encoding {
        action: &'static str,
        encoding: &'static str,
    },

    #[error("CSV I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl TableError {
    pub(crate) fn format(column: impl std::fmt::Display, message: impl std::fmt::Display) -> Self {
        TableError::Format {
            column: column.to_string(),
            message: message.to_string(),
        }
    }
}
