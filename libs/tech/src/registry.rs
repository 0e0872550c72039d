//! The registry of known technologies.

use std::sync::Arc;

use arcstr::ArcStr;
use indexmap::IndexMap;
use once_cell::sync::OnceCell;

use crate::builtin;
use crate::config::TechConfig;
use crate::context::{GenericContext, MissingTechnologies};
use crate::definition::path_to_url;
use crate::factory::TechnologyFactory;
use crate::implementation::Implementations;
use crate::param::ParamMap;
use crate::technology::Technology;

/// How a registered technology is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeKind {
    /// Built in code, with no parameters.
    Builtin,
    /// Built in code from parameters.
    Parametrized,
    /// Described by a definition document found in a resource directory.
    Resource,
}

/// A technology known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recipe {
    /// The technology name.
    pub name: &'static str,
    /// How the technology is constructed.
    pub kind: RecipeKind,
}

const fn recipe(name: &'static str, kind: RecipeKind) -> Recipe {
    Recipe { name, kind }
}

/// The technologies registered by [`Registry::bootstrap`], in order.
pub const RECIPES: &[Recipe] = &[
    recipe(builtin::generic::NAME, RecipeKind::Builtin),
    recipe(builtin::artwork::NAME, RecipeKind::Builtin),
    recipe(builtin::schematic::NAME, RecipeKind::Builtin),
    recipe(builtin::mocmos::NAME, RecipeKind::Parametrized),
    recipe("bicmos", RecipeKind::Resource),
    recipe("bipolar", RecipeKind::Resource),
    recipe("cmos", RecipeKind::Resource),
    recipe("nmos", RecipeKind::Resource),
    recipe("rcmos", RecipeKind::Resource),
    recipe("cmos90", RecipeKind::Parametrized),
    recipe("tsmc180", RecipeKind::Parametrized),
];

/// Technologies whose implementation is distributed separately.
///
/// Their absence is expected and is not reported as a warning.
pub const RESTRICTED: &[&str] = &["cmos90", "tsmc180"];

/// Returns `true` if `name` is a restricted technology.
pub fn is_restricted(name: &str) -> bool {
    RESTRICTED.contains(&name)
}

/// The set of technologies available to a session.
///
/// Built once by [`Registry::bootstrap`] and read-only afterwards.
#[derive(Debug)]
pub struct Registry {
    factories: IndexMap<ArcStr, Arc<TechnologyFactory>>,
    implementations: Arc<Implementations>,
    missing: MissingTechnologies,
    foundry: Option<ArcStr>,
    generic: OnceCell<GenericContext>,
}

impl Registry {
    /// Registers every technology in [`RECIPES`].
    ///
    /// Resource technologies whose definition is not found in any of the
    /// configured resource directories are left out.
    pub fn bootstrap(config: &TechConfig, implementations: Implementations) -> Self {
        let implementations = Arc::new(implementations);
        let mut factories = IndexMap::with_capacity(RECIPES.len());
        for recipe in RECIPES {
            let factory = match recipe.kind {
                RecipeKind::Builtin => TechnologyFactory::builtin(
                    recipe.name,
                    implementations.builtin(recipe.name),
                ),
                RecipeKind::Parametrized => TechnologyFactory::parametrized(
                    recipe.name,
                    implementations.parametrized(recipe.name).copied(),
                ),
                RecipeKind::Resource => match config.find_resource(recipe.name) {
                    Some(path) => TechnologyFactory::resource(
                        recipe.name,
                        path_to_url(path),
                        implementations.clone(),
                    ),
                    None => {
                        tracing::debug!("no definition found for technology `{}`", recipe.name);
                        continue;
                    }
                },
            };
            factories.insert(ArcStr::from(recipe.name), Arc::new(factory));
        }
        tracing::debug!("registered {} technologies", factories.len());

        Self {
            factories,
            implementations,
            missing: MissingTechnologies::new(),
            foundry: config.foundry.clone(),
            generic: OnceCell::new(),
        }
    }

    /// Registers every technology in [`RECIPES`] with the standard implementations.
    pub fn standard(config: &TechConfig) -> Self {
        Self::bootstrap(config, Implementations::standard())
    }

    /// Looks up the factory of a technology.
    pub fn get(&self, name: &str) -> Option<&Arc<TechnologyFactory>> {
        self.factories.get(name)
    }

    /// The registered technology names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &ArcStr> {
        self.factories.keys()
    }

    /// Iterates over the registered factories, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TechnologyFactory>> {
        self.factories.values()
    }

    /// Returns `true` if `name` is a restricted technology.
    pub fn is_restricted(&self, name: &str) -> bool {
        is_restricted(name)
    }

    /// Technologies that could not be built because their implementation
    /// is absent.
    pub fn missing(&self) -> &MissingTechnologies {
        &self.missing
    }

    /// The implementations available to definition-driven technologies.
    pub fn implementations(&self) -> &Arc<Implementations> {
        &self.implementations
    }

    /// The context used to build technologies of this registry.
    ///
    /// Builds the generic technology on first use.
    pub fn generic_context(&self) -> &GenericContext {
        self.generic.get_or_init(|| {
            let mut ctx = GenericContext::new().with_missing(self.missing.clone());
            if let Some(foundry) = &self.foundry {
                ctx = ctx.with_foundry(foundry.clone());
            }
            let generic = self
                .get(builtin::generic::NAME)
                .and_then(|factory| factory.new_instance(&ctx, &ParamMap::new()));
            match generic {
                Some(generic) => ctx.with_generic(Arc::new(generic)),
                None => ctx,
            }
        })
    }

    /// Builds technology `name` in `ctx`.
    ///
    /// Returns [`None`] if the name is not registered or construction fails.
    pub fn new_instance(
        &self,
        name: &str,
        ctx: &GenericContext,
        overrides: &ParamMap,
    ) -> Option<Technology> {
        let Some(factory) = self.get(name) else {
            tracing::warn!("unknown technology `{}`", name);
            return None;
        };
        factory.new_instance(ctx, overrides)
    }
}
