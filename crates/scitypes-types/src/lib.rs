//! Scientific type system
//!
//! This crate defines the data model shared by classification and coercion:
//! - `ScientificType`: the scitype hierarchy, unions and subtyping
//! - textual scitype expressions (`"Union{Missing, Continuous}"`)
//! - storage types and element types of arrays and columns
//! - runtime values, arrays, categorical and image values
//! - the `Tabular` capability and two reference tables
//! - `TableType` predicates over table scitypes

pub mod error;
pub mod parse;
pub mod storage;
pub mod table;
pub mod table_type;
pub mod type_system;
pub mod value;

pub use error::{TypeError, TypeResult};
pub use parse::parse_scitype;
pub use storage::{ElementType, StorageType};
pub use table::{ColumnTable, Columns, FrozenTable, Tabular};
pub use table_type::TableType;
pub use type_system::{ImageSize, ScientificType};
pub use value::{
    ArrayValue, CategoricalPool, CategoricalValue, ColorSpace, DataObject, ImageValue, Level,
    ObjectRef, TableRef, Value,
};
