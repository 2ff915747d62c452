//! Scitypes error codes following a structured numbering system
//!
//! Error code ranges:
//! - SCI0001-SCI0099: Type errors (scitype expressions, values, shapes)
//! - SCI0100-SCI0199: Classification errors (registry, tables, schemas)
//! - SCI0200-SCI0299: Coercion errors
//! - SCI0300-SCI0399: Advisories (never raised as errors)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a type error (0001-0099)
    pub const fn is_type_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is a classification error (0100-0199)
    pub const fn is_classification_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is a coercion error (0200-0299)
    pub const fn is_coercion_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Check if this is an advisory (0300-0399)
    pub const fn is_advisory(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SCI{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

use std::collections::HashMap;
use std::sync::LazyLock;

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Type errors (0001-0099)
    map.insert(1, ErrorInfo::new("Invalid scientific type")
        .with_help("Column-level scitypes exclude arrays and tuples"));
    map.insert(2, ErrorInfo::new("Malformed scientific type expression")
        .with_help("Expected a form such as `Multiclass{3}` or `Union{Missing, Continuous}`"));
    map.insert(3, ErrorInfo::new("Invalid image dimensions or buffer"));
    map.insert(4, ErrorInfo::new("Invalid array shape"));
    map.insert(5, ErrorInfo::new("Element does not match declared element type"));

    // Classification errors (0100-0199)
    map.insert(100, ErrorInfo::new("Value is not tabular")
        .with_help("Register a kind whose predicate recognises the container"));
    map.insert(101, ErrorInfo::new("Empty sequence has no scitype union"));
    map.insert(102, ErrorInfo::new("Columns have inconsistent lengths"));
    map.insert(103, ErrorInfo::new("Kind already registered"));
    map.insert(104, ErrorInfo::new("Unknown column"));
    map.insert(105, ErrorInfo::new("Duplicate column name"));

    // Coercion errors (0200-0299)
    map.insert(200, ErrorInfo::new("Value cannot be coerced to the target scitype"));
    map.insert(201, ErrorInfo::new("Missing values present in a tight coercion")
        .with_help("Drop `tight` or remove the missing values first"));
    map.insert(202, ErrorInfo::new("Observed cardinality differs from the requested one"));
    map.insert(203, ErrorInfo::new("Operation not supported by this container")
        .with_help("Use the rebuilding coercion instead of the in-place one"));

    // Advisories (0300-0399)
    map.insert(300, ErrorInfo::new("Target scitype widened to admit missing values"));

    map
});

// Convenient error code constants

// Type errors
pub const SCI0001: ErrorCode = ErrorCode::new(1);
pub const SCI0002: ErrorCode = ErrorCode::new(2);
pub const SCI0003: ErrorCode = ErrorCode::new(3);
pub const SCI0004: ErrorCode = ErrorCode::new(4);
pub const SCI0005: ErrorCode = ErrorCode::new(5);

// Classification errors
pub const SCI0100: ErrorCode = ErrorCode::new(100);
pub const SCI0101: ErrorCode = ErrorCode::new(101);
pub const SCI0102: ErrorCode = ErrorCode::new(102);
pub const SCI0103: ErrorCode = ErrorCode::new(103);
pub const SCI0104: ErrorCode = ErrorCode::new(104);
pub const SCI0105: ErrorCode = ErrorCode::new(105);

// Coercion errors
pub const SCI0200: ErrorCode = ErrorCode::new(200);
pub const SCI0201: ErrorCode = ErrorCode::new(201);
pub const SCI0202: ErrorCode = ErrorCode::new(202);
pub const SCI0203: ErrorCode = ErrorCode::new(203);

// Advisories
pub const SCI0300: ErrorCode = ErrorCode::new(300);
