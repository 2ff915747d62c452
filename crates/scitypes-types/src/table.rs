//! Tabular containers
//!
//! `Tabular` is the capability the classifier, schema extractor and coercion
//! engine rely on. Containers are never recognised by name: anything that
//! implements the trait (directly, or through `DataObject::as_tabular`) is a
//! table.

use crate::{ArrayValue, TypeError, TypeResult};
use indexmap::IndexMap;
use std::fmt;

/// Ordered name → column map used to build tables
pub type Columns = IndexMap<String, ArrayValue>;

/// Column-oriented tabular capability
pub trait Tabular: fmt::Debug + Send + Sync {
    /// Name used in messages
    fn container_name(&self) -> &str;

    /// Column names in table order; names are unique
    fn column_names(&self) -> Vec<String>;

    /// Column by name
    fn column(&self, name: &str) -> Option<&ArrayValue>;

    /// Build a new table of the same kind from an ordered set of columns
    fn rebuild(&self, columns: Columns) -> TypeResult<Box<dyn Tabular>>;

    /// Whether `set_column` is supported
    fn supports_in_place(&self) -> bool {
        false
    }

    /// Replace a whole column
    fn set_column(&mut self, _name: &str, _column: ArrayValue) -> TypeResult<()> {
        Err(TypeError::UnsupportedOperation {
            container: self.container_name().to_string(),
            operation: "in-place column replacement".to_string(),
        })
    }

    /// Number of columns
    fn ncols(&self) -> usize {
        self.column_names().len()
    }

    /// Number of rows, taken from the first column
    fn nrows(&self) -> usize {
        self.column_names()
            .first()
            .and_then(|name| self.column(name))
            .map_or(0, ArrayValue::len)
    }
}

fn check_rank(column: &ArrayValue) -> TypeResult<()> {
    if column.rank() == 1 {
        Ok(())
    } else {
        Err(TypeError::InvalidShape {
            shape: column.shape().to_vec(),
            len: column.len(),
        })
    }
}

// ============================================================================
// ColumnTable
// ============================================================================

/// Mutable column table
///
/// Columns must be one-dimensional and share a length. Supports whole-column
/// replacement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnTable {
    columns: Columns,
}

impl ColumnTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from named columns
    pub fn from_columns<N: Into<String>>(
        columns: impl IntoIterator<Item = (N, ArrayValue)>,
    ) -> TypeResult<Self> {
        let mut table = Self::new();
        for (name, column) in columns {
            table.push_column(name, column)?;
        }
        Ok(table)
    }

    /// Add a column, builder style
    pub fn with_column(mut self, name: impl Into<String>, column: ArrayValue) -> TypeResult<Self> {
        self.push_column(name, column)?;
        Ok(self)
    }

    /// Append a column
    pub fn push_column(&mut self, name: impl Into<String>, column: ArrayValue) -> TypeResult<()> {
        let name = name.into();
        if self.columns.contains_key(&name) {
            return Err(TypeError::DuplicateColumn { name });
        }
        check_rank(&column)?;
        if let Some(first) = self.columns.values().next() {
            if first.len() != column.len() {
                return Err(TypeError::InconsistentLength {
                    column: name,
                    expected: first.len(),
                    found: column.len(),
                });
            }
        }
        self.columns.insert(name, column);
        Ok(())
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    pub fn into_columns(self) -> Columns {
        self.columns
    }
}

impl Tabular for ColumnTable {
    fn container_name(&self) -> &str {
        "ColumnTable"
    }

    fn column_names(&self) -> Vec<String> {
        self.columns.keys().cloned().collect()
    }

    fn column(&self, name: &str) -> Option<&ArrayValue> {
        self.columns.get(name)
    }

    fn rebuild(&self, columns: Columns) -> TypeResult<Box<dyn Tabular>> {
        Ok(Box::new(Self::from_columns(columns)?))
    }

    fn supports_in_place(&self) -> bool {
        true
    }

    fn set_column(&mut self, name: &str, column: ArrayValue) -> TypeResult<()> {
        check_rank(&column)?;
        let expected = self.nrows();
        let slot = self
            .columns
            .get_mut(name)
            .ok_or_else(|| TypeError::UnknownColumn {
                name: name.to_string(),
            })?;
        if column.len() != expected {
            return Err(TypeError::InconsistentLength {
                column: name.to_string(),
                expected,
                found: column.len(),
            });
        }
        *slot = column;
        Ok(())
    }

    fn ncols(&self) -> usize {
        self.columns.len()
    }
}

// ============================================================================
// FrozenTable
// ============================================================================

/// Immutable column table
///
/// Only rebuilding is supported. Column lengths are not checked, so a
/// ragged frozen table is reported by whoever reads it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrozenTable {
    columns: Columns,
}

impl FrozenTable {
    /// Create a frozen table from named columns
    pub fn from_columns<N: Into<String>>(
        columns: impl IntoIterator<Item = (N, ArrayValue)>,
    ) -> TypeResult<Self> {
        let mut map = Columns::new();
        for (name, column) in columns {
            let name = name.into();
            check_rank(&column)?;
            if map.contains_key(&name) {
                return Err(TypeError::DuplicateColumn { name });
            }
            map.insert(name, column);
        }
        Ok(Self { columns: map })
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }
}

impl From<ColumnTable> for FrozenTable {
    fn from(table: ColumnTable) -> Self {
        Self {
            columns: table.into_columns(),
        }
    }
}

impl Tabular for FrozenTable {
    fn container_name(&self) -> &str {
        "FrozenTable"
    }

    fn column_names(&self) -> Vec<String> {
        self.columns.keys().cloned().collect()
    }

    fn column(&self, name: &str) -> Option<&ArrayValue> {
        self.columns.get(name)
    }

    fn rebuild(&self, columns: Columns) -> TypeResult<Box<dyn Tabular>> {
        Ok(Box::new(Self { columns }))
    }

    fn ncols(&self) -> usize {
        self.columns.len()
    }
}
