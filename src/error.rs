//! Error type shared by every table operation

use std::io;

use thiserror::Error;

use crate::model::ColumnType;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, TableError>;

/// Errors raised by table and column operations
#[derive(Debug, Error)]
pub enum TableError {
    /// A column name was not present in the table
    #[error("column not found: {0}")]
    NotFound(String),

    /// A numeric operation was invoked on a text column
    #[error("column '{column}' has type {column_type}, expected a numeric column")]
    Type {
        column: String,
        column_type: ColumnType,
    },

    /// A fill replacement could not be coerced to the column's type
    #[error("cannot store '{value}' in {column_type} column '{column}'")]
    Coercion {
        column: String,
        column_type: ColumnType,
        value: String,
    },

    /// A mask did not have one entry per row
    #[error("mask has {mask_len} entries but table has {row_count} rows")]
    Shape { mask_len: usize, row_count: usize },

    /// Malformed input record
    #[error("line {line}: {message}")]
    Format { line: u64, message: String },

    /// Delimiters are single ASCII bytes
    #[error("delimiter must be an ASCII byte, got 0x{0:02X}")]
    Delimiter(u8),

    /// Two columns would share a name
    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    /// Reading or writing failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl TableError {
    pub(crate) fn format(line: u64, message: impl Into<String>) -> Self {
        TableError::Format {
            line,
            message: message.into(),
        }
    }
}
