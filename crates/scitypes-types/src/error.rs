//! Errors raised while building scitypes, values and tables

use scitypes_diagnostics::{
    Diagnostic, ErrorCode, SCI0001, SCI0002, SCI0003, SCI0004, SCI0005, SCI0102, SCI0104,
    SCI0105, SCI0203,
};
use thiserror::Error;

/// Result type for type-level operations
pub type TypeResult<T> = Result<T, TypeError>;

/// Type-level errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// Not a recognized scientific type, or not valid in this position
    #[error("Invalid scientific type `{scitype}`: {reason}")]
    InvalidScitype { scitype: String, reason: String },

    /// Scitype expression could not be parsed
    #[error("Malformed scientific type expression `{input}`: {message}")]
    MalformedScitype { input: String, message: String },

    /// Pixel buffer does not match the image dimensions
    #[error("Invalid image buffer: expected {expected} pixel values, found {found}")]
    InvalidImage { expected: usize, found: usize },

    /// Image dimensions whose pixel count does not fit in memory
    #[error("Image dimensions {width}x{height} are too large")]
    ImageTooLarge { width: usize, height: usize },

    /// Array shape does not match the number of elements
    #[error("Invalid array shape {shape:?} for {len} elements")]
    InvalidShape { shape: Vec<usize>, len: usize },

    /// Element not admitted by the declared element type
    #[error("Element {index} ({found}) does not match element type {expected}")]
    ElementTypeMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    /// Columns of one table disagree on their length
    #[error("Column `{column}` has {found} rows, expected {expected}")]
    InconsistentLength {
        column: String,
        expected: usize,
        found: usize,
    },

    /// Column name used twice
    #[error("Duplicate column name `{name}`")]
    DuplicateColumn { name: String },

    /// Column not present in the table
    #[error("Unknown column `{name}`")]
    UnknownColumn { name: String },

    /// Container lacks the requested capability
    #[error("{container} does not support {operation}")]
    UnsupportedOperation { container: String, operation: String },
}

impl TypeError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidScitype { .. } => SCI0001,
            Self::MalformedScitype { .. } => SCI0002,
            Self::InvalidImage { .. } | Self::ImageTooLarge { .. } => SCI0003,
            Self::InvalidShape { .. } => SCI0004,
            Self::ElementTypeMismatch { .. } => SCI0005,
            Self::InconsistentLength { .. } => SCI0102,
            Self::UnknownColumn { .. } => SCI0104,
            Self::DuplicateColumn { .. } => SCI0105,
            Self::UnsupportedOperation { .. } => SCI0203,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code(), self.to_string())
    }
}
