//! Kind registry
//!
//! Maps values to a symbolic kind (`table`, user kinds, or the `other`
//! sentinel) through an ordered list of predicates. The registry is
//! append-only: kinds are never overwritten or removed, and resolution is
//! first match in registration order.

use crate::error::{ScitypeError, ScitypeResult};
use scitypes_types::Value;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Type alias for kind predicates
pub type KindPredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Symbolic kind tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Kind(Cow<'static, str>);

impl Kind {
    /// Values with the tabular capability
    pub const TABLE: Kind = Kind(Cow::Borrowed("table"));

    /// Sentinel for values no predicate claims
    pub const OTHER: Kind = Kind(Cow::Borrowed("other"));

    /// Create a kind
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_other(&self) -> bool {
        *self == Self::OTHER
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Kind {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

/// Ordered kind predicates
///
/// Predicates are expected to be mutually exclusive. `resolve` does not
/// check this; `matching_kinds` lists every match for callers that want to.
#[derive(Clone, Default)]
pub struct TraitRegistry {
    entries: Vec<(Kind, KindPredicate)>,
}

impl TraitRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in `table` kind
    pub fn with_builtin_kinds() -> Self {
        let mut registry = Self::new();
        registry.entries.push((
            Kind::TABLE,
            Arc::new(|value: &Value| value.as_tabular().is_some()),
        ));
        registry
    }

    /// Register a kind
    ///
    /// Fails with `DuplicateKind` if the kind (or the `other` sentinel) is
    /// already taken.
    pub fn register<F>(&mut self, kind: impl Into<Kind>, predicate: F) -> ScitypeResult<()>
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let kind = kind.into();
        if kind.is_other() || self.contains(&kind) {
            return Err(ScitypeError::DuplicateKind {
                kind: kind.to_string(),
            });
        }
        log::debug!("registered kind `{}`", kind);
        self.entries.push((kind, Arc::new(predicate)));
        Ok(())
    }

    /// Resolve the kind of a value: first matching predicate, else `other`
    pub fn resolve(&self, value: &Value) -> Kind {
        self.entries
            .iter()
            .find(|(_, predicate)| predicate(value))
            .map_or(Kind::OTHER, |(kind, _)| kind.clone())
    }

    /// Every kind whose predicate accepts the value
    pub fn matching_kinds(&self, value: &Value) -> Vec<Kind> {
        self.entries
            .iter()
            .filter(|(_, predicate)| predicate(value))
            .map(|(kind, _)| kind.clone())
            .collect()
    }

    /// Check if a kind is registered
    pub fn contains(&self, kind: &Kind) -> bool {
        self.entries.iter().any(|(k, _)| k == kind)
    }

    /// Registered kinds in resolution order
    pub fn kinds(&self) -> impl Iterator<Item = &Kind> {
        self.entries.iter().map(|(kind, _)| kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for TraitRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.kinds()).finish()
    }
}
