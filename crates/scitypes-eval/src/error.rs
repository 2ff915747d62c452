//! Classification and coercion errors

use scitypes_diagnostics::{
    DataLocation, Diagnostic, ErrorCode, SCI0001, SCI0100, SCI0101, SCI0102, SCI0103, SCI0104,
    SCI0200, SCI0201, SCI0202, SCI0203,
};
use scitypes_types::TypeError;
use thiserror::Error;

/// Result type for classification and coercion
pub type ScitypeResult<T> = Result<T, ScitypeError>;

/// Errors raised by classification, schema extraction and coercion
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScitypeError {
    /// Value lacks the tabular capability
    #[error("Expected a table, found {found}")]
    NotTabular { found: String },

    /// Target or type argument is not a usable scientific type
    #[error("Invalid scientific type `{scitype}`: {reason}")]
    InvalidScitype { scitype: String, reason: String },

    /// Container does not support the requested operation
    #[error("{container} does not support {operation}")]
    UnsupportedOperation { container: String, operation: String },

    /// `scitype_union` called on an empty sequence
    #[error("Cannot take the scitype union of an empty sequence")]
    EmptySequence,

    /// Tight coercion found an absent value
    #[error("Cannot tightly coerce to {target}: missing value at position {index}")]
    TightViolation { target: String, index: usize },

    /// Table columns disagree on their length
    #[error("Column `{column}` has {found} rows, expected {expected}")]
    InconsistentLength {
        column: String,
        expected: usize,
        found: usize,
    },

    /// Column named in a coercion spec is not in the table
    #[error("Unknown column `{name}`")]
    UnknownColumn { name: String },

    /// Element cannot be represented under the target scitype
    #[error("Cannot coerce {value} to {target}: {reason}")]
    CannotCoerce {
        value: String,
        target: String,
        reason: String,
    },

    /// Explicit class count disagrees with the observed levels
    #[error("Cannot coerce to {target}: found {found} distinct levels")]
    CardinalityMismatch { target: String, found: usize },

    /// Kind registered twice
    #[error("Kind `{kind}` is already registered")]
    DuplicateKind { kind: String },

    /// Error from the type layer
    #[error(transparent)]
    Type(#[from] TypeError),
}

impl ScitypeError {
    /// Create an invalid scitype error
    pub fn invalid_scitype(scitype: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidScitype {
            scitype: scitype.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a coercion failure
    pub fn cannot_coerce(
        value: impl ToString,
        target: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::CannotCoerce {
            value: value.to_string(),
            target: target.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported operation error
    pub fn unsupported(container: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            container: container.into(),
            operation: operation.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotTabular { .. } => SCI0100,
            Self::InvalidScitype { .. } => SCI0001,
            Self::UnsupportedOperation { .. } => SCI0203,
            Self::EmptySequence => SCI0101,
            Self::TightViolation { .. } => SCI0201,
            Self::InconsistentLength { .. } => SCI0102,
            Self::UnknownColumn { .. } => SCI0104,
            Self::CannotCoerce { .. } => SCI0200,
            Self::CardinalityMismatch { .. } => SCI0202,
            Self::DuplicateKind { .. } => SCI0103,
            Self::Type(e) => e.code(),
        }
    }

    /// Check if this is an unsupported-operation error from either layer
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedOperation { .. } | Self::Type(TypeError::UnsupportedOperation { .. })
        )
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code(), self.to_string())
    }

    /// Convert to a diagnostic pointing at a column
    pub fn to_diagnostic_at(&self, location: DataLocation) -> Diagnostic {
        self.to_diagnostic().with_location(location)
    }
}
