//! Context shared by technology construction.

use std::sync::{Arc, Mutex, MutexGuard};

use arcstr::ArcStr;
use indexmap::IndexSet;

use crate::technology::Technology;

/// State available to [`Technology::setup`] and to technology factories.
#[derive(Debug, Clone, Default)]
pub struct GenericContext {
    generic: Option<Arc<Technology>>,
    foundry: Option<ArcStr>,
    missing: MissingTechnologies,
}

impl GenericContext {
    /// Creates a context with no generic technology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the generic technology.
    pub fn with_generic(mut self, generic: Arc<Technology>) -> Self {
        self.generic = Some(generic);
        self
    }

    /// Sets the foundry requested for every technology built in this context.
    pub fn with_foundry(mut self, foundry: impl Into<ArcStr>) -> Self {
        self.foundry = Some(foundry.into());
        self
    }

    /// Shares the given missing technologies list.
    pub fn with_missing(mut self, missing: MissingTechnologies) -> Self {
        self.missing = missing;
        self
    }

    /// The generic technology, if one has been built.
    pub fn generic(&self) -> Option<&Technology> {
        self.generic.as_deref()
    }

    /// The requested foundry.
    pub fn foundry(&self) -> Option<&ArcStr> {
        self.foundry.as_ref()
    }

    /// Technologies whose implementation was not available.
    pub fn missing(&self) -> &MissingTechnologies {
        &self.missing
    }
}

/// An ordered, deduplicated list of technologies that could not be built
/// because their implementation is absent.
///
/// Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct MissingTechnologies(Arc<Mutex<IndexSet<ArcStr>>>);

impl MissingTechnologies {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, IndexSet<ArcStr>> {
        // The set is valid after any panic; insertion is the only mutation.
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Records `name`, returning `true` if it was not already recorded.
    pub fn record(&self, name: impl Into<ArcStr>) -> bool {
        self.lock().insert(name.into())
    }

    /// The recorded names, in the order they were first recorded.
    pub fn names(&self) -> Vec<ArcStr> {
        self.lock().iter().cloned().collect()
    }

    /// Returns `true` if `name` has been recorded.
    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains(name)
    }

    /// The number of recorded names.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
