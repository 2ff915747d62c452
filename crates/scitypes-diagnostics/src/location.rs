//! Locations inside tabular data

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where in a table or array a diagnostic applies
///
/// Both parts are optional: a whole-column advisory has no row, an
/// array-level advisory has neither.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DataLocation {
    /// Column name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Row index (0-based)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
}

impl DataLocation {
    /// Location of a whole column
    pub fn column(name: impl Into<String>) -> Self {
        Self {
            column: Some(name.into()),
            row: None,
        }
    }

    /// Location of a single element of an array
    pub const fn row(row: usize) -> Self {
        Self {
            column: None,
            row: Some(row),
        }
    }

    /// Location of a single cell
    pub fn cell(column: impl Into<String>, row: usize) -> Self {
        Self {
            column: Some(column.into()),
            row: Some(row),
        }
    }

    /// Check whether the location carries no information
    pub const fn is_unspecified(&self) -> bool {
        self.column.is_none() && self.row.is_none()
    }
}

impl fmt::Display for DataLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.column, self.row) {
            (Some(column), Some(row)) => write!(f, "column `{}`, row {}", column, row),
            (Some(column), None) => write!(f, "column `{}`", column),
            (None, Some(row)) => write!(f, "row {}", row),
            (None, None) => write!(f, "<unspecified>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        assert_eq!(DataLocation::column("height").to_string(), "column `height`");
        assert_eq!(DataLocation::cell("height", 1).to_string(), "column `height`, row 1");
        assert_eq!(DataLocation::row(4).to_string(), "row 4");
        assert!(DataLocation::default().is_unspecified());
    }

    #[test]
    fn test_location_serialization_skips_empty_parts() {
        let json = serde_json::to_string(&DataLocation::column("x")).unwrap();
        assert_eq!(json, r#"{"column":"x"}"#);
    }
}
