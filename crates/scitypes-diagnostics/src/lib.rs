//! Scitypes diagnostics
//!
//! This crate provides the diagnostic infrastructure shared by the scitypes
//! crates: stable error codes, data locations (which column, which row) and
//! the `Diagnostic` records used to report advisories such as missing-value
//! promotion during coercion.

mod error;
mod error_code;
mod location;

pub use error::*;
pub use error_code::*;
pub use location::*;
