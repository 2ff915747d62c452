//! Scientific types for Rust
//!
//! This crate ties together the scitypes workspace:
//! - The scientific type hierarchy and its textual form
//! - Runtime values, arrays and the `Tabular` capability
//! - Classification of values and tables into scitypes
//! - Table schemas and `TableType` checks
//! - Coercion of arrays and table columns to a target scitype
//!
//! # Example
//!
//! ```ignore
//! use scitypes::{ClassificationContext, CoercionOptions, CoercionSpec, ScientificType};
//!
//! let ctx = ClassificationContext::default();
//! let spec = CoercionSpec::new()
//!     .column("name", ScientificType::Multiclass(None))
//!     .rule(ScientificType::Count, ScientificType::Continuous);
//!
//! let coerced = scitypes::coerce(&ctx, &table, &spec, CoercionOptions::default())?;
//! println!("{}", scitypes::schema(&ctx, &coerced.value)?);
//! ```

// Re-export all public APIs from internal crates
pub use scitypes_diagnostics as diagnostics;
pub use scitypes_eval as eval;
pub use scitypes_types as types;

// Convenience re-exports
pub use scitypes_diagnostics::{Diagnostic, ErrorCode, Severity};
pub use scitypes_eval::{
    ClassificationContext, CoercionOptions, CoercionOutcome, CoercionSpec, Schema, ScitypeError,
    ScitypeResult, SharedContext, coerce, coerce_array, coerce_table, coerce_table_in_place,
    schema, scitype, scitype_union,
};
pub use scitypes_types::{
    ArrayValue, ColumnTable, FrozenTable, ScientificType, TableType, Tabular, Value,
    parse_scitype,
};
