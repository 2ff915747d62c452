//! Scientific type system
//!
//! This module defines the closed scientific type hierarchy:
//! - `ScientificType` enum with every tag, parametrized variants carrying
//!   their parameters as data
//! - The fixed subtype relation of the lattice
//! - Normalised unions and the missing-value lift
//! - Canonical display (the same grammar `FromStr` accepts)
//!
//! The hierarchy, with abstract nodes in brackets:
//!
//! ```text
//! Missing
//! [Found]
//! ├── Unknown
//! └── [Known]
//!     ├── [Infinite] ── Continuous, Count
//!     ├── [Finite{N}] ── Multiclass{N}, OrderedFactor{N}      (Binary = Finite{2})
//!     ├── [Image{W,H}] ── GrayImage{W,H}, ColorImage{W,H}
//!     ├── [ScientificTimeType] ── ScientificDate, ScientificTime, ScientificDateTime
//!     ├── Textual
//!     └── Table{K}
//! ```
//!
//! `Tuple` and `AbstractArray` are structural formers and sit outside `Found`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pixel dimensions of an image scitype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: usize,
    pub height: usize,
}

impl ImageSize {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

/// The complete scientific type representation
///
/// Parametrized variants take an `Option`: `None` stands for "any value of
/// the parameter", so `Multiclass(Some(3))` is a subtype of `Multiclass(None)`.
///
/// Variant order is significant: it is the canonical order of union members,
/// which puts `Missing` first (`Union{Missing, Continuous}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScientificType {
    // === Special Types ===
    /// Scitype of an absent value
    Missing,
    /// Fallback when no classification rule matches
    Unknown,
    /// Supertype of `Known` and `Unknown`
    Found,
    /// Supertype of every classified, non-missing scitype
    Known,

    // === Infinite Types ===
    /// Supertype of `Continuous` and `Count`
    Infinite,
    /// Real-valued measurements
    Continuous,
    /// Non-negative integer counts
    Count,

    // === Finite Types ===
    /// Categorical with `N` classes
    Finite(Option<usize>),
    /// Unordered categorical with `N` classes
    Multiclass(Option<usize>),
    /// Ordered categorical with `N` classes
    OrderedFactor(Option<usize>),

    // === Image Types ===
    /// Image with the given dimensions
    Image(Option<ImageSize>),
    /// Single-channel image
    GrayImage(Option<ImageSize>),
    /// Colour image
    ColorImage(Option<ImageSize>),

    // === Other Known Types ===
    /// Free text
    Textual,
    /// Supertype of the temporal scitypes
    ScientificTimeType,
    /// Calendar date
    ScientificDate,
    /// Time of day
    ScientificTime,
    /// Date with time of day
    ScientificDateTime,
    /// Table whose column scitypes are all subtypes of the parameter
    Table(Box<ScientificType>),

    // === Structural Types ===
    /// Fixed-length positional product
    Tuple(Vec<ScientificType>),
    /// Homogeneous container of the given rank
    Array {
        element: Box<ScientificType>,
        rank: usize,
    },

    // === Union Type ===
    /// Normalised union; build with [`ScientificType::union_of`]
    Union(Vec<ScientificType>),
}

impl ScientificType {
    // === Constructors ===

    /// `Finite{2}`
    pub const fn binary() -> Self {
        Self::Finite(Some(2))
    }

    /// `Multiclass{n}`
    pub const fn multiclass(n: usize) -> Self {
        Self::Multiclass(Some(n))
    }

    /// `OrderedFactor{n}`
    pub const fn ordered_factor(n: usize) -> Self {
        Self::OrderedFactor(Some(n))
    }

    /// `Finite{n}`
    pub const fn finite(n: usize) -> Self {
        Self::Finite(Some(n))
    }

    /// `GrayImage{width,height}`
    pub const fn gray_image(width: usize, height: usize) -> Self {
        Self::GrayImage(Some(ImageSize::new(width, height)))
    }

    /// `ColorImage{width,height}`
    pub const fn color_image(width: usize, height: usize) -> Self {
        Self::ColorImage(Some(ImageSize::new(width, height)))
    }

    /// `Table{K}`
    pub fn table(columns: ScientificType) -> Self {
        Self::Table(Box::new(columns))
    }

    /// `AbstractArray{element, rank}`
    pub fn array(element: ScientificType, rank: usize) -> Self {
        Self::Array {
            element: Box::new(element),
            rank,
        }
    }

    /// `AbstractVector{element}`
    pub fn vector(element: ScientificType) -> Self {
        Self::array(element, 1)
    }

    /// Positional product
    pub fn tuple(elements: Vec<ScientificType>) -> Self {
        Self::Tuple(elements)
    }

    /// The empty union, a subtype of every scitype
    pub const fn bottom() -> Self {
        Self::Union(Vec::new())
    }

    /// Build a normalised union
    ///
    /// Nested unions are flattened, members that are subtypes of another
    /// member are absorbed and the rest sorted canonically. A single
    /// surviving member is returned as is.
    pub fn union_of(types: impl IntoIterator<Item = ScientificType>) -> Self {
        let mut flat = Vec::new();
        for ty in types {
            match ty {
                Self::Union(members) => flat.extend(members),
                other => flat.push(other),
            }
        }
        flat.sort();
        flat.dedup();

        let mut kept: Vec<ScientificType> = flat
            .iter()
            .enumerate()
            .filter(|(i, ty)| {
                !flat
                    .iter()
                    .enumerate()
                    .any(|(j, other)| *i != j && ty.is_subtype_of(other))
            })
            .map(|(_, ty)| ty.clone())
            .collect();

        if kept.len() == 1 {
            kept.remove(0)
        } else {
            Self::Union(kept)
        }
    }

    /// Union of `self` and `other`
    pub fn union(&self, other: &ScientificType) -> Self {
        Self::union_of([self.clone(), other.clone()])
    }

    // === Missing Lift ===

    /// `Union{Missing, self}`
    pub fn with_missing(&self) -> Self {
        self.union(&Self::Missing)
    }

    /// The non-missing part of `self`
    ///
    /// `Missing` itself maps to the empty union.
    pub fn without_missing(&self) -> Self {
        match self {
            Self::Missing => Self::bottom(),
            Self::Union(members) => {
                Self::union_of(members.iter().filter(|m| !m.is_missing()).cloned())
            }
            other => other.clone(),
        }
    }

    /// Check whether `Missing` is part of this scitype
    pub fn has_missing(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Union(members) => members.iter().any(Self::is_missing),
            _ => false,
        }
    }

    // === Type Properties ===

    /// Check if this is exactly `Missing`
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Check if this is exactly `Unknown`
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Check if this is the empty union
    pub fn is_bottom(&self) -> bool {
        matches!(self, Self::Union(members) if members.is_empty())
    }

    /// Check if this is a union
    pub fn is_union(&self) -> bool {
        matches!(self, Self::Union(_))
    }

    /// Check if this scitype sits under `Known`
    pub fn is_known(&self) -> bool {
        matches!(
            self,
            Self::Known
                | Self::Infinite
                | Self::Continuous
                | Self::Count
                | Self::Finite(_)
                | Self::Multiclass(_)
                | Self::OrderedFactor(_)
                | Self::Image(_)
                | Self::GrayImage(_)
                | Self::ColorImage(_)
                | Self::Textual
                | Self::ScientificTimeType
                | Self::ScientificDate
                | Self::ScientificTime
                | Self::ScientificDateTime
                | Self::Table(_)
        )
    }

    /// Check if this scitype sits under `Found`
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found | Self::Unknown) || self.is_known()
    }

    /// Check if this scitype is a finite (categorical) scitype
    pub fn is_finite(&self) -> bool {
        matches!(
            self,
            Self::Finite(_) | Self::Multiclass(_) | Self::OrderedFactor(_)
        )
    }

    /// Check if this scitype can describe the elements of a table column
    ///
    /// Arrays and tuples are structural and never column scitypes.
    pub fn is_column_scitype(&self) -> bool {
        match self {
            Self::Array { .. } | Self::Tuple(_) => false,
            Self::Union(members) => members.iter().all(Self::is_column_scitype),
            _ => true,
        }
    }

    /// Category count of a finite scitype, if fixed
    pub fn cardinality(&self) -> Option<usize> {
        match self {
            Self::Finite(n) | Self::Multiclass(n) | Self::OrderedFactor(n) => *n,
            _ => None,
        }
    }

    /// Dimensions of an image scitype, if fixed
    pub fn image_size(&self) -> Option<ImageSize> {
        match self {
            Self::Image(size) | Self::GrayImage(size) | Self::ColorImage(size) => *size,
            _ => None,
        }
    }

    /// Members of a union, or `self` alone
    pub fn members(&self) -> &[ScientificType] {
        match self {
            Self::Union(members) => members,
            other => std::slice::from_ref(other),
        }
    }

    /// Column union of a `Table` scitype
    pub fn table_columns(&self) -> Option<&ScientificType> {
        match self {
            Self::Table(columns) => Some(columns),
            _ => None,
        }
    }

    /// Element scitype and rank of an array scitype
    pub fn array_parts(&self) -> Option<(&ScientificType, usize)> {
        match self {
            Self::Array { element, rank } => Some((element, *rank)),
            _ => None,
        }
    }

    /// Get the simple name of this scitype, without parameters
    pub fn name(&self) -> &'static str {
        match self {
            Self::Missing => "Missing",
            Self::Unknown => "Unknown",
            Self::Found => "Found",
            Self::Known => "Known",
            Self::Infinite => "Infinite",
            Self::Continuous => "Continuous",
            Self::Count => "Count",
            Self::Finite(_) => "Finite",
            Self::Multiclass(_) => "Multiclass",
            Self::OrderedFactor(_) => "OrderedFactor",
            Self::Image(_) => "Image",
            Self::GrayImage(_) => "GrayImage",
            Self::ColorImage(_) => "ColorImage",
            Self::Textual => "Textual",
            Self::ScientificTimeType => "ScientificTimeType",
            Self::ScientificDate => "ScientificDate",
            Self::ScientificTime => "ScientificTime",
            Self::ScientificDateTime => "ScientificDateTime",
            Self::Table(_) => "Table",
            Self::Tuple(_) => "Tuple",
            Self::Array { .. } => "AbstractArray",
            Self::Union(_) => "Union",
        }
    }

    // === Type Relationships ===

    /// Check if this scitype is a subtype of another
    ///
    /// - a union is a subtype iff every member is (the empty union always is)
    /// - anything is a subtype of a union iff it is a subtype of some member
    /// - `Found ⊇ Known ∪ {Unknown}`, `Known ⊇` every classified scitype
    /// - `Infinite ⊇ {Continuous, Count}`
    /// - `Finite{N} ⊇ {Multiclass{N}, OrderedFactor{N}}`, unparametrized
    ///   nodes contain every parameter value
    /// - `Image{W,H} ⊇ {GrayImage{W,H}, ColorImage{W,H}}`
    /// - tables, tuples and arrays are covariant in their parameters
    pub fn is_subtype_of(&self, other: &ScientificType) -> bool {
        if self == other {
            return true;
        }

        match (self, other) {
            (Self::Union(members), _) => members.iter().all(|m| m.is_subtype_of(other)),
            (_, Self::Union(members)) => members.iter().any(|m| self.is_subtype_of(m)),
            _ => self.is_atomic_subtype_of(other),
        }
    }

    /// Check if this scitype is a supertype of another
    pub fn is_supertype_of(&self, other: &ScientificType) -> bool {
        other.is_subtype_of(self)
    }

    fn is_atomic_subtype_of(&self, other: &ScientificType) -> bool {
        match (self, other) {
            (_, Self::Found) => self.is_found(),
            (_, Self::Known) => self.is_known(),
            (Self::Continuous | Self::Count, Self::Infinite) => true,

            (Self::Finite(n) | Self::Multiclass(n) | Self::OrderedFactor(n), Self::Finite(m)) => {
                parameter_matches(n, m)
            }
            (Self::Multiclass(n), Self::Multiclass(m))
            | (Self::OrderedFactor(n), Self::OrderedFactor(m)) => parameter_matches(n, m),

            (Self::Image(s) | Self::GrayImage(s) | Self::ColorImage(s), Self::Image(t)) => {
                parameter_matches(s, t)
            }
            (Self::GrayImage(s), Self::GrayImage(t)) | (Self::ColorImage(s), Self::ColorImage(t)) => {
                parameter_matches(s, t)
            }

            (
                Self::ScientificDate | Self::ScientificTime | Self::ScientificDateTime,
                Self::ScientificTimeType,
            ) => true,

            (Self::Table(a), Self::Table(b)) => a.is_subtype_of(b),

            (Self::Tuple(a), Self::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.is_subtype_of(y))
            }

            (
                Self::Array {
                    element: a,
                    rank: ra,
                },
                Self::Array {
                    element: b,
                    rank: rb,
                },
            ) => ra == rb && a.is_subtype_of(b),

            _ => false,
        }
    }
}

/// A parameter matches when the supertype leaves it open or both agree
fn parameter_matches<T: PartialEq>(sub: &Option<T>, sup: &Option<T>) -> bool {
    sup.is_none() || sub == sup
}

impl fmt::Display for ScientificType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(Some(n)) | Self::Multiclass(Some(n)) | Self::OrderedFactor(Some(n)) => {
                write!(f, "{}{{{}}}", self.name(), n)
            }
            Self::Image(Some(size)) | Self::GrayImage(Some(size)) | Self::ColorImage(Some(size)) => {
                write!(f, "{}{{{},{}}}", self.name(), size.width, size.height)
            }
            Self::Table(columns) => write!(f, "Table{{{}}}", columns),
            Self::Array { element, rank: 1 } => write!(f, "AbstractVector{{{}}}", element),
            Self::Array { element, rank } => write!(f, "AbstractArray{{{}, {}}}", element, rank),
            Self::Tuple(elements) => write_list(f, "Tuple", elements),
            Self::Union(members) => write_list(f, "Union", members),
            other => f.write_str(other.name()),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, head: &str, items: &[ScientificType]) -> fmt::Result {
    write!(f, "{}{{", head)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "}}")
}

impl Default for ScientificType {
    fn default() -> Self {
        Self::Unknown
    }
}

impl From<ScientificType> for String {
    fn from(scitype: ScientificType) -> Self {
        scitype.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ScientificType::*;

    #[test]
    fn test_scitype_properties() {
        assert!(Continuous.is_known());
        assert!(Unknown.is_found());
        assert!(!Unknown.is_known());
        assert!(!Missing.is_found());
        assert!(Multiclass(Some(3)).is_finite());
        assert!(!ScientificType::vector(Count).is_column_scitype());
        assert_eq!(OrderedFactor(Some(4)).cardinality(), Some(4));
        assert_eq!(
            ScientificType::gray_image(10, 20).image_size(),
            Some(ImageSize::new(10, 20))
        );
    }

    #[test]
    fn test_lattice_subtyping() {
        assert!(Continuous.is_subtype_of(&Infinite));
        assert!(Count.is_subtype_of(&Infinite));
        assert!(Infinite.is_subtype_of(&Known));
        assert!(Known.is_subtype_of(&Found));
        assert!(Unknown.is_subtype_of(&Found));
        assert!(!Unknown.is_subtype_of(&Known));
        assert!(!Missing.is_subtype_of(&Found));
        assert!(ScientificDate.is_subtype_of(&ScientificTimeType));
        assert!(!Continuous.is_subtype_of(&Count));
    }

    #[test]
    fn test_parametrized_subtyping() {
        assert!(Multiclass(Some(3)).is_subtype_of(&Multiclass(None)));
        assert!(Multiclass(Some(3)).is_subtype_of(&Finite(Some(3))));
        assert!(Multiclass(Some(3)).is_subtype_of(&Finite(None)));
        assert!(!Multiclass(Some(3)).is_subtype_of(&Finite(Some(2))));
        assert!(!Multiclass(None).is_subtype_of(&Multiclass(Some(3))));
        assert!(OrderedFactor(Some(2)).is_subtype_of(&ScientificType::binary()));
        assert!(!OrderedFactor(Some(2)).is_subtype_of(&Multiclass(None)));

        let gray = ScientificType::gray_image(4, 4);
        assert!(gray.is_subtype_of(&Image(None)));
        assert!(gray.is_subtype_of(&Image(Some(ImageSize::new(4, 4)))));
        assert!(!gray.is_subtype_of(&Image(Some(ImageSize::new(4, 5)))));
        assert!(!gray.is_subtype_of(&ColorImage(None)));
    }

    #[test]
    fn test_union_normalisation() {
        let u = ScientificType::union_of([Continuous, Missing, Continuous]);
        assert_eq!(u, Union(vec![Missing, Continuous]));

        // Absorption
        assert_eq!(ScientificType::union_of([Continuous, Infinite]), Infinite);
        assert_eq!(
            ScientificType::union_of([Multiclass(Some(3)), Finite(None)]),
            Finite(None)
        );

        // Flattening and collapse
        let nested = ScientificType::union_of([Union(vec![Count, Textual]), Count]);
        assert_eq!(nested, Union(vec![Count, Textual]));
        assert_eq!(ScientificType::union_of([Count]), Count);
        assert!(ScientificType::union_of([]).is_bottom());
    }

    #[test]
    fn test_union_subtyping() {
        let nullable = Continuous.with_missing();
        assert!(Continuous.is_subtype_of(&nullable));
        assert!(Missing.is_subtype_of(&nullable));
        assert!(!nullable.is_subtype_of(&Continuous));
        assert!(nullable.is_subtype_of(&Union(vec![Missing, Infinite])));
        assert!(ScientificType::bottom().is_subtype_of(&Count));
    }

    #[test]
    fn test_missing_lift() {
        let lifted = Count.with_missing();
        assert_ne!(lifted, Count);
        assert!(lifted.has_missing());
        assert_eq!(lifted.without_missing(), Count);
        assert_eq!(lifted.with_missing(), lifted);
        assert!(Missing.without_missing().is_bottom());
        assert!(!Count.has_missing());
    }

    #[test]
    fn test_structural_subtyping() {
        let a = ScientificType::vector(Count);
        assert!(a.is_subtype_of(&ScientificType::vector(Infinite)));
        assert!(!a.is_subtype_of(&ScientificType::array(Infinite, 2)));

        let t = ScientificType::tuple(vec![Count, Textual]);
        assert!(t.is_subtype_of(&ScientificType::tuple(vec![Infinite, Known])));
        assert!(!t.is_subtype_of(&ScientificType::tuple(vec![Infinite])));

        let table = ScientificType::table(ScientificType::union_of([Count, Continuous]));
        assert!(table.is_subtype_of(&ScientificType::table(Infinite)));
        assert!(!table.is_subtype_of(&ScientificType::table(Count)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Continuous.to_string(), "Continuous");
        assert_eq!(Multiclass(Some(4)).to_string(), "Multiclass{4}");
        assert_eq!(Multiclass(None).to_string(), "Multiclass");
        assert_eq!(ScientificType::binary().to_string(), "Finite{2}");
        assert_eq!(ScientificType::color_image(8, 6).to_string(), "ColorImage{8,6}");
        assert_eq!(Continuous.with_missing().to_string(), "Union{Missing, Continuous}");
        assert_eq!(ScientificType::vector(Count).to_string(), "AbstractVector{Count}");
        assert_eq!(ScientificType::array(Count, 2).to_string(), "AbstractArray{Count, 2}");
        assert_eq!(
            ScientificType::table(ScientificType::union_of([Count, Continuous])).to_string(),
            "Table{Union{Continuous, Count}}"
        );
        assert_eq!(ScientificType::bottom().to_string(), "Union{}");
    }
}
