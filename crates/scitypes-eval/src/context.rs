//! Classification context
//!
//! Holds everything classification depends on: the kind registry, the
//! active convention and optional per-kind classifiers. Contexts are built
//! explicitly and passed by reference; there is no global state.

use crate::convention::{Convention, DefaultConvention};
use crate::error::ScitypeResult;
use crate::registry::{Kind, TraitRegistry};
use indexmap::IndexMap;
use parking_lot::RwLock;
use scitypes_types::{ScientificType, Value};
use std::fmt;
use std::sync::Arc;

/// Classifier for values of a registered kind
pub type KindClassifier =
    Arc<dyn Fn(&Value, &ClassificationContext) -> ScientificType + Send + Sync>;

/// Context shared between threads
///
/// Reads take the read lock; late kind registration and convention switches
/// take the write lock.
pub type SharedContext = Arc<RwLock<ClassificationContext>>;

/// Classification context
#[derive(Clone)]
pub struct ClassificationContext {
    registry: TraitRegistry,
    convention: Arc<dyn Convention>,
    kind_classifiers: IndexMap<Kind, KindClassifier>,
}

impl Default for ClassificationContext {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ClassificationContext {
    /// Context with the built-in kinds and the default convention
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a context
    pub fn builder() -> ClassificationContextBuilder {
        ClassificationContextBuilder::new()
    }

    /// Wrap this context for shared use
    pub fn into_shared(self) -> SharedContext {
        Arc::new(RwLock::new(self))
    }

    pub fn registry(&self) -> &TraitRegistry {
        &self.registry
    }

    /// The active convention
    pub fn convention(&self) -> &dyn Convention {
        self.convention.as_ref()
    }

    /// Classifier registered for a kind
    pub fn kind_classifier(&self, kind: &Kind) -> Option<&KindClassifier> {
        self.kind_classifiers.get(kind)
    }

    /// Resolve the kind of a value
    pub fn resolve_kind(&self, value: &Value) -> Kind {
        let kind = self.registry.resolve(value);
        log::trace!("resolved kind `{}` for {}", kind, value.storage_type());
        kind
    }

    /// Register a kind predicate
    pub fn register_kind<F>(&mut self, kind: impl Into<Kind>, predicate: F) -> ScitypeResult<()>
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.registry.register(kind, predicate)
    }

    /// Register a kind predicate together with the classifier for that kind
    pub fn register_kind_with<F, C>(
        &mut self,
        kind: impl Into<Kind>,
        predicate: F,
        classifier: C,
    ) -> ScitypeResult<()>
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
        C: Fn(&Value, &ClassificationContext) -> ScientificType + Send + Sync + 'static,
    {
        let kind = kind.into();
        self.registry.register(kind.clone(), predicate)?;
        self.kind_classifiers.insert(kind, Arc::new(classifier));
        Ok(())
    }

    /// Switch the active convention
    pub fn set_convention(&mut self, convention: impl Convention + 'static) {
        log::debug!(
            "switching convention from `{}` to `{}`",
            self.convention.name(),
            convention.name()
        );
        self.convention = Arc::new(convention);
    }

    /// Make the built-in convention the active one
    pub fn activate_default_convention(&mut self) {
        self.set_convention(DefaultConvention);
    }
}

impl fmt::Debug for ClassificationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassificationContext")
            .field("registry", &self.registry)
            .field("convention", &self.convention.name())
            .field("kind_classifiers", &self.kind_classifiers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for `ClassificationContext`
pub struct ClassificationContextBuilder {
    registry: TraitRegistry,
    convention: Arc<dyn Convention>,
    kind_classifiers: IndexMap<Kind, KindClassifier>,
}

impl Default for ClassificationContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassificationContextBuilder {
    /// Start from the built-in kinds and the default convention
    pub fn new() -> Self {
        Self {
            registry: TraitRegistry::with_builtin_kinds(),
            convention: Arc::new(DefaultConvention),
            kind_classifiers: IndexMap::new(),
        }
    }

    /// Replace the kind registry
    pub fn registry(mut self, registry: TraitRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Set the active convention
    pub fn convention(mut self, convention: impl Convention + 'static) -> Self {
        self.convention = Arc::new(convention);
        self
    }

    /// Register a kind
    pub fn kind<F>(mut self, kind: impl Into<Kind>, predicate: F) -> ScitypeResult<Self>
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.registry.register(kind, predicate)?;
        Ok(self)
    }

    /// Register a kind with its classifier
    pub fn kind_with<F, C>(
        mut self,
        kind: impl Into<Kind>,
        predicate: F,
        classifier: C,
    ) -> ScitypeResult<Self>
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
        C: Fn(&Value, &ClassificationContext) -> ScientificType + Send + Sync + 'static,
    {
        let kind = kind.into();
        self.registry.register(kind.clone(), predicate)?;
        self.kind_classifiers.insert(kind, Arc::new(classifier));
        Ok(self)
    }

    /// Build the context
    pub fn build(self) -> ClassificationContext {
        ClassificationContext {
            registry: self.registry,
            convention: self.convention,
            kind_classifiers: self.kind_classifiers,
        }
    }
}
