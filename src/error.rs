//! Error types for wirestruct.

use thiserror::Error;

/// Main error type for all wirestruct operations.
///
/// Every failure category has its own variant so callers can react
/// programmatically (e.g. retry on [`SizeMismatch`](Self::SizeMismatch),
/// abort on [`Schema`](Self::Schema)). There is no catch-all variant.
#[derive(Debug, Error)]
pub enum StructError {
    /// Schema compilation error (unknown type, bad count, duplicate name,
    /// incompatible default). Never raised once a `StructType` exists.
    #[error("schema error: {0}")]
    Schema(String),

    /// A byte buffer did not have exactly the layout's total size, or an
    /// in-place import could not obtain that many bytes.
    #[error("size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// The layout's total size.
        expected: usize,
        /// The number of bytes actually supplied.
        actual: usize,
    },

    /// Field name not present in the layout.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Write attempted on a field declared read-only. The buffer is left
    /// unmodified.
    #[error("field is read-only: {0}")]
    ReadOnlyField(String),

    /// A value could not be encoded into a field: out of range, wrong
    /// arity, or too long to fit without loss. The buffer is left
    /// unmodified.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// I/O error from a byte sink or source during export/import.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error while reading or writing a schema definition.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using StructError.
pub type Result<T> = std::result::Result<T, StructError>;
