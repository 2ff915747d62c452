//! Runtime values - the data that gets classified and coerced
//!
//! This module defines the `Value` enum and its supporting types:
//! - `ArrayValue`: homogeneous, possibly multi-dimensional sequence with a
//!   declared element type (table columns are rank-1 arrays)
//! - `CategoricalValue`: an index into a shared, sorted level pool
//! - `ImageValue`: image dimensions and a flat pixel buffer
//! - `DataObject`: opaque foreign containers exposing capabilities by probing

use crate::{ElementType, StorageType, Tabular, TypeError, TypeResult};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a tabular container
pub type TableRef = Arc<dyn Tabular>;

/// Shared handle to an opaque foreign object
pub type ObjectRef = Arc<dyn DataObject>;

/// Opaque container supplied by a caller
///
/// The classifier never inspects objects by name; registered kind predicates
/// probe them through `as_any` (downcasting) or the capability accessors.
pub trait DataObject: fmt::Debug + Send + Sync {
    /// Name used in messages
    fn type_name(&self) -> &str;

    /// Access for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Tabular capability, if the object has one
    fn as_tabular(&self) -> Option<&dyn Tabular> {
        None
    }
}

/// A dynamically typed value
#[derive(Debug, Clone)]
pub enum Value {
    // === Absent ===
    /// Absent value
    Missing,

    // === Scalars ===
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),

    // === Temporal ===
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),

    // === Convention-specific ===
    Categorical(CategoricalValue),
    Image(ImageValue),

    // === Containers ===
    /// Fixed-length heterogeneous product
    Tuple(Vec<Value>),
    /// Homogeneous array
    Array(ArrayValue),
    /// Tabular container
    Table(TableRef),
    /// Opaque foreign object
    Object(ObjectRef),
}

/// 2^63, the first float past the `i64` range
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

impl Value {
    /// Check if this value is absent
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Get the storage type of this value
    pub fn storage_type(&self) -> StorageType {
        StorageType::of(self)
    }

    /// Tabular capability of this value, if any
    pub fn as_tabular(&self) -> Option<&dyn Tabular> {
        match self {
            Self::Table(table) => Some(table.as_ref()),
            Self::Object(object) => object.as_tabular(),
            _ => None,
        }
    }

    /// Try to get as an opaque object
    pub fn as_object(&self) -> Option<&dyn DataObject> {
        match self {
            Self::Object(object) => Some(object.as_ref()),
            _ => None,
        }
    }

    /// Numeric view as a float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Integer(i) => Some(*i as f64),
            Self::Float(x) => Some(*x),
            Self::Decimal(d) => d.to_f64(),
            _ => None,
        }
    }

    /// Exact integer view
    ///
    /// Floats and decimals convert only when they hold an integral value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Boolean(b) => Some(i64::from(*b)),
            Self::Integer(i) => Some(*i),
            // 2^63 is exact in f64 while i64::MAX is not
            Self::Float(x) if x.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(x) => {
                Some(*x as i64)
            }
            Self::Decimal(d) if d.fract().is_zero() => d.to_i64(),
            _ => None,
        }
    }

    // === Constructors ===

    /// Create a text value
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Create an array value from elements, inferring the element type
    pub fn array(values: Vec<Value>) -> Self {
        Self::Array(ArrayValue::from_values(values))
    }

    /// Wrap a tabular container
    pub fn table(table: impl Tabular + 'static) -> Self {
        Self::Table(Arc::new(table))
    }

    /// Wrap an opaque object
    pub fn object(object: impl DataObject + 'static) -> Self {
        Self::Object(Arc::new(object))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "missing"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Decimal(d) => write!(f, "{}", d),
            Self::Text(s) => write!(f, "{}", s),
            Self::Date(d) => write!(f, "{}", d),
            Self::Time(t) => write!(f, "{}", t),
            Self::DateTime(dt) => write!(f, "{}", dt),
            Self::Categorical(c) => write!(f, "{}", c),
            Self::Image(image) => write!(f, "{}", image),
            Self::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            Self::Array(array) => write!(f, "{}", array),
            Self::Table(table) => write!(f, "<table with {} columns>", table.ncols()),
            Self::Object(object) => write!(f, "<{}>", object.type_name()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Missing, Self::Missing) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Decimal(a), Self::Decimal(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Time(a), Self::Time(b)) => a == b,
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            (Self::Categorical(a), Self::Categorical(b)) => a == b,
            (Self::Image(a), Self::Image(b)) => a == b,
            (Self::Tuple(a), Self::Tuple(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            // Containers compare by identity
            (Self::Table(a), Self::Table(b)) => Arc::ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveTime> for Value {
    fn from(value: NaiveTime) -> Self {
        Self::Time(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<CategoricalValue> for Value {
    fn from(value: CategoricalValue) -> Self {
        Self::Categorical(value)
    }
}

impl From<ImageValue> for Value {
    fn from(value: ImageValue) -> Self {
        Self::Image(value)
    }
}

impl From<ArrayValue> for Value {
    fn from(value: ArrayValue) -> Self {
        Self::Array(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

// ============================================================================
// Arrays
// ============================================================================

/// Homogeneous array stored in row-major order
///
/// Rank is the number of dimensions in `shape`. The element type is either
/// inferred from the data or declared (and then validated).
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    eltype: ElementType,
    shape: SmallVec<[usize; 2]>,
    data: Vec<Value>,
}

impl ArrayValue {
    /// Create a rank-1 array, inferring the element type
    pub fn from_values(data: Vec<Value>) -> Self {
        let eltype = ElementType::infer(&data);
        Self {
            eltype,
            shape: SmallVec::from_slice(&[data.len()]),
            data,
        }
    }

    /// Create a rank-1 array with a declared element type
    pub fn with_eltype(eltype: ElementType, data: Vec<Value>) -> TypeResult<Self> {
        let len = data.len();
        Self::from_parts(eltype, &[len], data)
    }

    /// Create an array of any rank, inferring the element type
    pub fn with_shape(shape: &[usize], data: Vec<Value>) -> TypeResult<Self> {
        let eltype = ElementType::infer(&data);
        Self::from_parts(eltype, shape, data)
    }

    /// Create an array from all of its parts, validating them
    pub fn from_parts(eltype: ElementType, shape: &[usize], data: Vec<Value>) -> TypeResult<Self> {
        if shape.is_empty() || shape.iter().product::<usize>() != data.len() {
            return Err(TypeError::InvalidShape {
                shape: shape.to_vec(),
                len: data.len(),
            });
        }
        if let Some((index, value)) = data.iter().enumerate().find(|(_, v)| !eltype.admits(v)) {
            return Err(TypeError::ElementTypeMismatch {
                index,
                expected: eltype.to_string(),
                found: value.storage_type().to_string(),
            });
        }
        Ok(Self {
            eltype,
            shape: SmallVec::from_slice(shape),
            data,
        })
    }

    /// Get the declared element type
    pub fn eltype(&self) -> ElementType {
        self.eltype
    }

    /// Get the shape
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Get the number of dimensions
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Get the total number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the array has no elements
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get an element by linear index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.data.get(index)
    }

    /// Get all elements in storage order
    pub fn values(&self) -> &[Value] {
        &self.data
    }

    /// Iterate over elements
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.data.iter()
    }

    /// Count absent elements
    pub fn missing_count(&self) -> usize {
        self.data.iter().filter(|v| v.is_missing()).count()
    }

    /// Check whether any element is absent
    pub fn has_missing(&self) -> bool {
        self.data.iter().any(Value::is_missing)
    }

    /// Index of the first absent element
    pub fn first_missing(&self) -> Option<usize> {
        self.data.iter().position(Value::is_missing)
    }
}

impl<T: Into<Value>> FromIterator<T> for ArrayValue {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_values(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for ArrayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}

// ============================================================================
// Categorical Values
// ============================================================================

/// A categorical level
///
/// Levels sort by kind first, then by value, so integer levels sort
/// numerically rather than lexically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    Bool(bool),
    Integer(i64),
    Decimal(Decimal),
    Text(String),
}

impl Level {
    /// Level for a value, if it can act as one
    ///
    /// Temporal values become their ISO text, which sorts chronologically.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Boolean(b) => Some(Self::Bool(*b)),
            Value::Integer(i) => Some(Self::Integer(*i)),
            Value::Float(x) => Decimal::try_from(*x).ok().map(Self::Decimal),
            Value::Decimal(d) => Some(Self::Decimal(*d)),
            Value::Text(s) => Some(Self::Text(s.clone())),
            Value::Categorical(c) => Some(c.level().clone()),
            Value::Date(_) | Value::Time(_) | Value::DateTime(_) => {
                Some(Self::Text(value.to_string()))
            }
            _ => None,
        }
    }

    /// Plain value carried by this level
    pub fn to_value(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Boolean(*b),
            Self::Integer(i) => Value::Integer(*i),
            Self::Decimal(d) => Value::Decimal(*d),
            Self::Text(s) => Value::Text(s.clone()),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Decimal(d) => write!(f, "{}", d),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Sorted, deduplicated set of levels shared by categorical values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalPool {
    levels: Vec<Level>,
    ordered: bool,
}

impl CategoricalPool {
    /// Create a pool; levels are sorted and deduplicated
    pub fn new(levels: impl IntoIterator<Item = Level>, ordered: bool) -> Self {
        let mut levels: Vec<Level> = levels.into_iter().collect();
        levels.sort();
        levels.dedup();
        Self { levels, ordered }
    }

    /// Same levels with a different orderedness
    pub fn with_ordered(&self, ordered: bool) -> Self {
        Self {
            levels: self.levels.clone(),
            ordered,
        }
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    /// Number of levels
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Position of a level in the pool
    pub fn index_of(&self, level: &Level) -> Option<usize> {
        self.levels.binary_search(level).ok()
    }
}

/// A value drawn from a categorical pool
#[derive(Debug, Clone)]
pub struct CategoricalValue {
    pool: Arc<CategoricalPool>,
    index: usize,
}

impl CategoricalValue {
    /// Create a categorical value; `None` if the level is not in the pool
    pub fn new(pool: Arc<CategoricalPool>, level: &Level) -> Option<Self> {
        let index = pool.index_of(level)?;
        Some(Self { pool, index })
    }

    pub fn level(&self) -> &Level {
        &self.pool.levels[self.index]
    }

    pub fn pool(&self) -> &Arc<CategoricalPool> {
        &self.pool
    }

    pub fn is_ordered(&self) -> bool {
        self.pool.ordered
    }

    /// Number of levels in the pool
    pub fn cardinality(&self) -> usize {
        self.pool.len()
    }
}

impl PartialEq for CategoricalValue {
    fn eq(&self, other: &Self) -> bool {
        self.level() == other.level() && self.pool == other.pool
    }
}

impl fmt::Display for CategoricalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

// ============================================================================
// Images
// ============================================================================

/// Colour space of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorSpace {
    Gray,
    Rgb,
}

impl ColorSpace {
    /// Number of channels per pixel
    pub const fn channels(&self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Rgb => 3,
        }
    }
}

/// Image with a flat, row-major pixel buffer
#[derive(Debug, Clone, PartialEq)]
pub struct ImageValue {
    width: usize,
    height: usize,
    color: ColorSpace,
    pixels: Arc<[f32]>,
}

impl ImageValue {
    /// Create an image, checking the buffer length against the dimensions
    pub fn new(width: usize, height: usize, color: ColorSpace, pixels: Vec<f32>) -> TypeResult<Self> {
        let expected = Self::buffer_len(width, height, color)?;
        if pixels.len() != expected {
            return Err(TypeError::InvalidImage {
                expected,
                found: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            color,
            pixels: pixels.into(),
        })
    }

    /// Zero-filled image
    pub fn blank(width: usize, height: usize, color: ColorSpace) -> TypeResult<Self> {
        let len = Self::buffer_len(width, height, color)?;
        Ok(Self {
            width,
            height,
            color,
            pixels: vec![0.0; len].into(),
        })
    }

    fn buffer_len(width: usize, height: usize, color: ColorSpace) -> TypeResult<usize> {
        width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(color.channels()))
            .ok_or(TypeError::ImageTooLarge { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn color(&self) -> ColorSpace {
        self.color
    }

    pub fn is_gray(&self) -> bool {
        self.color == ColorSpace::Gray
    }

    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }
}

impl fmt::Display for ImageValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.color {
            ColorSpace::Gray => "gray",
            ColorSpace::Rgb => "rgb",
        };
        write!(f, "<{} image {}x{}>", kind, self.width, self.height)
    }
}
