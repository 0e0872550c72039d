//! Registered technology implementations.
//!
//! Every implementation is a plain function registered by name, so the set
//! of constructible technologies is fixed when the [`Implementations`]
//! table is built.

use arcstr::ArcStr;
use indexmap::IndexMap;

use crate::builtin;
use crate::definition::TechDefinition;
use crate::error::{Result, TechError};
use crate::param::{Param, ParamMap};
use crate::technology::Technology;

/// The implementation used for definitions that do not name one.
pub const DEFAULT_IMPLEMENTATION: &str = "default";

/// Builds a technology with no parameters.
pub type BuildFn = fn() -> Result<Technology>;

/// Produces a definition tailored to a set of parameter values.
pub type PatchFn = fn(&ParamMap) -> Result<TechDefinition>;

/// Builds a technology from a definition and its parameter values.
pub type DefinitionFn = fn(&TechDefinition, &ParamMap) -> Result<Technology>;

/// Declares the parameters of a parametrized technology.
pub type SchemaFn = fn() -> Vec<Param>;

/// A technology whose definition depends on parameter values.
#[derive(Clone, Copy)]
pub struct Parametrized {
    /// The declared parameters.
    pub schema: SchemaFn,
    /// Produces the definition for a set of parameter values.
    pub patch: PatchFn,
    /// Builds the technology from the patched definition.
    pub build: DefinitionFn,
}

impl std::fmt::Debug for Parametrized {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params: Vec<_> = (self.schema)().into_iter().map(|p| p.path().clone()).collect();
        f.debug_struct("Parametrized").field("params", &params).finish_non_exhaustive()
    }
}

/// The table of available implementations, keyed by name.
#[derive(Clone, Default)]
pub struct Implementations {
    builtins: IndexMap<ArcStr, BuildFn>,
    parametrized: IndexMap<ArcStr, Parametrized>,
    definitions: IndexMap<ArcStr, DefinitionFn>,
}

impl std::fmt::Debug for Implementations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Implementations")
            .field("builtins", &self.builtins.keys().collect::<Vec<_>>())
            .field("parametrized", &self.parametrized.keys().collect::<Vec<_>>())
            .field("definitions", &self.definitions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Implementations {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The implementations shipped with this crate.
    pub fn standard() -> Self {
        let mut impls = Self::new();
        impls.register_builtin(builtin::generic::NAME, builtin::generic::build);
        impls.register_builtin(builtin::artwork::NAME, builtin::artwork::build);
        impls.register_builtin(builtin::schematic::NAME, builtin::schematic::build);
        impls.register_parametrized(
            builtin::mocmos::NAME,
            Parametrized {
                schema: builtin::mocmos::schema,
                patch: builtin::mocmos::patch,
                build: Technology::from_definition,
            },
        );
        impls.register_definition(DEFAULT_IMPLEMENTATION, Technology::from_definition);
        impls
    }

    /// Registers a technology with no parameters.
    pub fn register_builtin(&mut self, name: impl Into<ArcStr>, build: BuildFn) -> &mut Self {
        self.builtins.insert(name.into(), build);
        self
    }

    /// Registers a parametrized technology.
    pub fn register_parametrized(
        &mut self,
        name: impl Into<ArcStr>,
        implementation: Parametrized,
    ) -> &mut Self {
        self.parametrized.insert(name.into(), implementation);
        self
    }

    /// Registers a definition-driven implementation.
    pub fn register_definition(
        &mut self,
        name: impl Into<ArcStr>,
        build: DefinitionFn,
    ) -> &mut Self {
        self.definitions.insert(name.into(), build);
        self
    }

    /// Looks up a technology with no parameters.
    pub fn builtin(&self, name: &str) -> Option<BuildFn> {
        self.builtins.get(name).copied()
    }

    /// Looks up a parametrized technology.
    pub fn parametrized(&self, name: &str) -> Option<&Parametrized> {
        self.parametrized.get(name)
    }

    /// Looks up a definition-driven implementation.
    pub fn definition(&self, name: &str) -> Option<DefinitionFn> {
        self.definitions.get(name).copied()
    }

    /// Looks up a definition-driven implementation, failing with
    /// [`TechError::MissingImplementation`] if it is absent.
    pub fn require_definition(&self, technology: &ArcStr, name: &str) -> Result<DefinitionFn> {
        self.definition(name)
            .ok_or_else(|| TechError::MissingImplementation {
                technology: technology.clone(),
                implementation: name.into(),
            })
    }
}
