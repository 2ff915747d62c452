//! Storage representation tags
//!
//! A scitype says what a value *means*; a storage type says how it is
//! *stored*. Schemas report both, and coercion changes the second to
//! realise the first.

use crate::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stored representation of a single element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageType {
    /// Only absent values
    Missing,
    Bool,
    Int64,
    Float64,
    Decimal,
    Text,
    Date,
    Time,
    DateTime,
    /// Categorical value drawn from a level pool
    Categorical { ordered: bool },
    GrayImage,
    ColorImage,
    Tuple,
    Array,
    Table,
    /// Opaque foreign object
    Object,
    /// Heterogeneous storage
    Any,
}

impl StorageType {
    /// Storage type of a single value
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Missing => Self::Missing,
            Value::Boolean(_) => Self::Bool,
            Value::Integer(_) => Self::Int64,
            Value::Float(_) => Self::Float64,
            Value::Decimal(_) => Self::Decimal,
            Value::Text(_) => Self::Text,
            Value::Date(_) => Self::Date,
            Value::Time(_) => Self::Time,
            Value::DateTime(_) => Self::DateTime,
            Value::Categorical(c) => Self::Categorical {
                ordered: c.is_ordered(),
            },
            Value::Image(image) if image.is_gray() => Self::GrayImage,
            Value::Image(_) => Self::ColorImage,
            Value::Tuple(_) => Self::Tuple,
            Value::Array(_) => Self::Array,
            Value::Table(_) => Self::Table,
            Value::Object(_) => Self::Object,
        }
    }

    /// Get the name of this storage type
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Missing => "Missing",
            Self::Bool => "Bool",
            Self::Int64 => "Int64",
            Self::Float64 => "Float64",
            Self::Decimal => "Decimal",
            Self::Text => "String",
            Self::Date => "Date",
            Self::Time => "Time",
            Self::DateTime => "DateTime",
            Self::Categorical { ordered: false } => "Categorical",
            Self::Categorical { ordered: true } => "OrderedCategorical",
            Self::GrayImage => "GrayImage",
            Self::ColorImage => "ColorImage",
            Self::Tuple => "Tuple",
            Self::Array => "Array",
            Self::Table => "Table",
            Self::Object => "Object",
            Self::Any => "Any",
        }
    }

    /// Check if this storage type holds numbers
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Bool | Self::Int64 | Self::Float64 | Self::Decimal)
    }

    /// Check if this storage type holds categorical values
    pub const fn is_categorical(&self) -> bool {
        matches!(self, Self::Categorical { .. })
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared element type of an array or column
///
/// `nullable` records that the representation admits absent values, whether
/// or not one is currently present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementType {
    pub base: StorageType,
    pub nullable: bool,
}

impl ElementType {
    /// Non-nullable element type
    pub const fn new(base: StorageType) -> Self {
        Self {
            base,
            nullable: false,
        }
    }

    /// Nullable element type
    pub const fn nullable(base: StorageType) -> Self {
        Self {
            base,
            nullable: true,
        }
    }

    /// Same base with the given nullability
    pub const fn with_nullable(self, nullable: bool) -> Self {
        Self {
            base: self.base,
            nullable,
        }
    }

    /// Infer the narrowest element type describing `values`
    ///
    /// Mixed storage types widen to `Any`; an empty sequence is `Any`.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut base: Option<StorageType> = None;
        let mut nullable = false;

        for value in values {
            if value.is_missing() {
                nullable = true;
                continue;
            }
            let storage = StorageType::of(value);
            base = match base {
                None => Some(storage),
                Some(current) if current == storage => Some(current),
                Some(_) => Some(StorageType::Any),
            };
        }

        match base {
            Some(base) => Self { base, nullable },
            None if nullable => Self::nullable(StorageType::Missing),
            None => Self::new(StorageType::Any),
        }
    }

    /// Check whether a value may be stored under this element type
    pub fn admits(&self, value: &Value) -> bool {
        if value.is_missing() {
            return self.nullable || matches!(self.base, StorageType::Any | StorageType::Missing);
        }
        self.base == StorageType::Any || StorageType::of(value) == self.base
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable && self.base != StorageType::Missing {
            write!(f, "Union{{Missing, {}}}", self.base)
        } else {
            write!(f, "{}", self.base)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_element_type() {
        let values = [Value::from(1), Value::Missing, Value::from(3)];
        assert_eq!(
            ElementType::infer(&values),
            ElementType::nullable(StorageType::Int64)
        );

        let mixed = [Value::from(1), Value::from(2.5)];
        assert_eq!(ElementType::infer(&mixed), ElementType::new(StorageType::Any));

        let only_missing = [Value::Missing];
        assert_eq!(
            ElementType::infer(&only_missing),
            ElementType::nullable(StorageType::Missing)
        );

        assert_eq!(
            ElementType::infer(std::iter::empty()),
            ElementType::new(StorageType::Any)
        );
    }

    #[test]
    fn test_admits() {
        let ints = ElementType::new(StorageType::Int64);
        assert!(ints.admits(&Value::from(4)));
        assert!(!ints.admits(&Value::Missing));
        assert!(!ints.admits(&Value::from("4")));
        assert!(ints.with_nullable(true).admits(&Value::Missing));
        assert!(ElementType::new(StorageType::Any).admits(&Value::Missing));
    }

    #[test]
    fn test_element_type_display() {
        assert_eq!(ElementType::new(StorageType::Float64).to_string(), "Float64");
        assert_eq!(
            ElementType::nullable(StorageType::Text).to_string(),
            "Union{Missing, String}"
        );
        assert_eq!(ElementType::nullable(StorageType::Missing).to_string(), "Missing");
    }
}
