//! Table schemas
//!
//! A schema is a snapshot of a table's column names, element types,
//! column scitypes and row count. It is built fresh on every call and keeps
//! no reference to the table it came from.

use crate::classifier::element_scitype;
use crate::context::ClassificationContext;
use crate::error::{ScitypeError, ScitypeResult};
use scitypes_types::{ElementType, ScientificType, TableType, Tabular, Value};
use serde::Serialize;
use std::fmt;
use tabled::{Table, Tabled, settings::Style};

/// Column-level view of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    names: Vec<String>,
    types: Vec<ElementType>,
    scitypes: Vec<ScientificType>,
    nrows: usize,
}

/// One row of a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSchema<'a> {
    pub name: &'a str,
    pub eltype: ElementType,
    pub scitype: &'a ScientificType,
}

impl Schema {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Element types, parallel to `names`
    pub fn types(&self) -> &[ElementType] {
        &self.types
    }

    /// Column scitypes, parallel to `names`
    pub fn scitypes(&self) -> &[ScientificType] {
        &self.scitypes
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.names.len()
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<ColumnSchema<'_>> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|index| self.column_at(index))
    }

    fn column_at(&self, index: usize) -> ColumnSchema<'_> {
        ColumnSchema {
            name: &self.names[index],
            eltype: self.types[index],
            scitype: &self.scitypes[index],
        }
    }

    /// Iterate over columns in table order
    pub fn columns(&self) -> impl Iterator<Item = ColumnSchema<'_>> {
        (0..self.names.len()).map(|index| self.column_at(index))
    }

    /// Check every column against a table type
    pub fn conforms_to(&self, table_type: &TableType) -> bool {
        table_type.matches_columns(&self.scitypes)
    }

    /// The narrowest table type this schema conforms to
    pub fn table_type(&self) -> ScitypeResult<TableType> {
        TableType::new(self.scitypes.iter().cloned()).map_err(ScitypeError::from)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[derive(Tabled)]
        struct Row {
            #[tabled(rename = "names")]
            name: String,
            #[tabled(rename = "scitypes")]
            scitype: String,
            #[tabled(rename = "types")]
            eltype: String,
        }

        let rows: Vec<Row> = self
            .columns()
            .map(|c| Row {
                name: c.name.to_string(),
                scitype: c.scitype.to_string(),
                eltype: c.eltype.to_string(),
            })
            .collect();

        let table = Table::new(rows).with(Style::modern()).to_string();
        writeln!(f, "{}", table)?;
        write!(f, "rows: {}", self.nrows)
    }
}

/// Schema of a value with the tabular capability
///
/// Fails with `NotTabular` otherwise.
pub fn schema(ctx: &ClassificationContext, value: &Value) -> ScitypeResult<Schema> {
    let table = value.as_tabular().ok_or_else(|| ScitypeError::NotTabular {
        found: value.storage_type().to_string(),
    })?;
    schema_of(ctx, table)
}

/// Schema of a tabular container
///
/// Fails with `InconsistentLength` when columns disagree on their length.
pub fn schema_of(ctx: &ClassificationContext, table: &dyn Tabular) -> ScitypeResult<Schema> {
    let names = table.column_names();
    let mut types = Vec::with_capacity(names.len());
    let mut scitypes = Vec::with_capacity(names.len());
    let mut nrows = None;

    for name in &names {
        let column = table
            .column(name)
            .ok_or_else(|| ScitypeError::UnknownColumn { name: name.clone() })?;

        match nrows {
            None => nrows = Some(column.len()),
            Some(expected) if expected != column.len() => {
                return Err(ScitypeError::InconsistentLength {
                    column: name.clone(),
                    expected,
                    found: column.len(),
                });
            }
            Some(_) => {}
        }

        types.push(column.eltype());
        scitypes.push(element_scitype(ctx, column));
    }

    Ok(Schema {
        names,
        types,
        scitypes,
        nrows: nrows.unwrap_or(0),
    })
}
