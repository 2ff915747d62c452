//! Scitype classification and coercion
//!
//! This crate classifies runtime values into scientific types and changes
//! their representation to realise a requested scitype:
//!
//! - **Registry**: ordered kind predicates (`table`, user kinds, `other`)
//! - **Context**: registry, active convention and per-kind classifiers
//! - **Conventions**: scalar scitype rules and array realisation
//! - **Classifier**: `scitype`, `scitype_union`, element and table scitypes
//! - **Schema**: column names, element types, scitypes and row count
//! - **Coercion**: array, table and in-place coercion with the missing lift
//!
//! # Example
//!
//! ```ignore
//! use scitypes_eval::{ClassificationContext, CoercionOptions, CoercionSpec, coerce, scitype};
//! use scitypes_types::ScientificType;
//!
//! let ctx = ClassificationContext::default();
//! let spec = CoercionSpec::new().column("rating", ScientificType::OrderedFactor(None));
//! let coerced = coerce(&ctx, &table, &spec, CoercionOptions::default())?;
//! println!("{}", scitype(&ctx, &coerced.value));
//! ```
//!
//! # Missing Values
//!
//! A column whose element type admits absent values keeps a missing-aware
//! representation through coercion unless `tight` is requested. The lift is
//! reported as an advisory `Diagnostic` (and a `log` warning) at verbosity 1
//! and above.

pub mod classifier;
pub mod coercion;
pub mod context;
pub mod convention;
pub mod error;
pub mod registry;
pub mod schema;

pub use classifier::{element_scitype, scitype, scitype_union, table_scitype};
pub use coercion::{
    CoercionOptions, CoercionOutcome, CoercionSpec, coerce, coerce_array, coerce_table,
    coerce_table_in_place,
};
pub use context::{ClassificationContext, ClassificationContextBuilder, KindClassifier, SharedContext};
pub use convention::{Convention, DefaultConvention, Realised};
pub use error::{ScitypeError, ScitypeResult};
pub use registry::{Kind, KindPredicate, TraitRegistry};
pub use schema::{ColumnSchema, Schema, schema, schema_of};
