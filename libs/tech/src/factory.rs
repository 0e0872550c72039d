//! Technology factories.
//!
//! A [`TechnologyFactory`] knows how to construct one named technology. The
//! factory is shared; each call to [`TechnologyFactory::new_instance`] builds
//! a fresh [`Technology`] from a set of parameter overrides.

use std::fmt::Debug;
use std::sync::Arc;

use arcstr::ArcStr;
use once_cell::sync::OnceCell;

use crate::context::GenericContext;
use crate::definition::TechDefinition;
use crate::error::{Result, TechError};
use crate::implementation::{BuildFn, Implementations, Parametrized, DEFAULT_IMPLEMENTATION};
use crate::param::{fill_params, Param, ParamMap};
use crate::registry::is_restricted;
use crate::technology::Technology;

/// Constructs instances of a named technology.
#[derive(Debug)]
pub enum TechnologyFactory {
    /// A technology built in code, with no parameters.
    Builtin(Builtin),
    /// A technology built in code from a definition patched by parameters.
    Parametrized(ParametrizedBuiltin),
    /// A technology described by an external definition document.
    External(ExternalDefinition),
}

/// A technology built in code, with no parameters.
pub struct Builtin {
    name: ArcStr,
    build: Option<BuildFn>,
}

/// A technology built in code from a definition patched by parameters.
#[derive(Debug)]
pub struct ParametrizedBuiltin {
    name: ArcStr,
    params: Vec<Param>,
    implementation: Option<Parametrized>,
}

/// A technology described by an external definition document.
///
/// The document is loaded at most once, on first use. A failed load is
/// remembered and reported by every later construction attempt.
#[derive(Debug)]
pub struct ExternalDefinition {
    name: ArcStr,
    user_defined: bool,
    url: Option<ArcStr>,
    definition: OnceCell<Result<Arc<TechDefinition>>>,
    implementations: Arc<Implementations>,
}

impl Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin")
            .field("name", &self.name)
            .field("available", &self.build.is_some())
            .finish()
    }
}

impl TechnologyFactory {
    /// A technology built by `build`.
    ///
    /// A missing `build` produces a factory whose instances always fail with
    /// [`TechError::MissingImplementation`].
    pub fn builtin(name: impl Into<ArcStr>, build: Option<BuildFn>) -> Self {
        Self::Builtin(Builtin {
            name: name.into(),
            build,
        })
    }

    /// A parametrized technology.
    ///
    /// The parameter schema is taken from `implementation` and fixed here.
    pub fn parametrized(name: impl Into<ArcStr>, implementation: Option<Parametrized>) -> Self {
        let params = implementation
            .as_ref()
            .map(|implementation| (implementation.schema)())
            .unwrap_or_default();
        Self::Parametrized(ParametrizedBuiltin {
            name: name.into(),
            params,
            implementation,
        })
    }

    /// A technology defined by a definition document shipped with the tool.
    pub fn resource(
        name: impl Into<ArcStr>,
        url: impl Into<ArcStr>,
        implementations: Arc<Implementations>,
    ) -> Self {
        Self::External(ExternalDefinition {
            name: name.into(),
            user_defined: false,
            url: Some(url.into()),
            definition: OnceCell::new(),
            implementations,
        })
    }

    /// A user-defined technology backed by the definition document at `url`.
    pub fn from_url(
        name: impl Into<ArcStr>,
        url: impl Into<ArcStr>,
        implementations: Arc<Implementations>,
    ) -> Self {
        Self::External(ExternalDefinition {
            name: name.into(),
            user_defined: true,
            url: Some(url.into()),
            definition: OnceCell::new(),
            implementations,
        })
    }

    /// A user-defined technology with an already available definition.
    pub fn from_definition(
        name: impl Into<ArcStr>,
        url: Option<ArcStr>,
        definition: TechDefinition,
        implementations: Arc<Implementations>,
    ) -> Self {
        Self::External(ExternalDefinition {
            name: name.into(),
            user_defined: true,
            url,
            definition: OnceCell::with_value(Ok(Arc::new(definition))),
            implementations,
        })
    }

    /// The technology name.
    pub fn name(&self) -> &ArcStr {
        match self {
            Self::Builtin(factory) => &factory.name,
            Self::Parametrized(factory) => &factory.name,
            Self::External(factory) => &factory.name,
        }
    }

    /// The declared parameters.
    pub fn params(&self) -> &[Param] {
        match self {
            Self::Parametrized(factory) => &factory.params,
            Self::Builtin(_) | Self::External(_) => &[],
        }
    }

    /// Returns `true` if the technology was defined by a user rather than
    /// shipped with the tool.
    pub fn is_user_defined(&self) -> bool {
        match self {
            Self::External(factory) => factory.user_defined,
            Self::Builtin(_) | Self::Parametrized(_) => false,
        }
    }

    /// The location of the definition document, if any.
    pub fn url(&self) -> Option<&ArcStr> {
        match self {
            Self::External(factory) => factory.url.as_ref(),
            Self::Builtin(_) | Self::Parametrized(_) => None,
        }
    }

    /// The definition document backing an external technology.
    ///
    /// Loads the document on first use.
    pub fn definition(&self) -> Option<Result<Arc<TechDefinition>>> {
        match self {
            Self::External(factory) => Some(factory.definition()),
            Self::Builtin(_) | Self::Parametrized(_) => None,
        }
    }

    /// Builds a new technology, applying `overrides` to the declared parameters.
    ///
    /// Never fails: errors are logged and [`None`] is returned. Technologies
    /// whose implementation is absent are recorded in the missing
    /// technologies list of `ctx`.
    #[tracing::instrument(level = "debug", skip_all, fields(technology = %self.name()))]
    pub fn new_instance(&self, ctx: &GenericContext, overrides: &ParamMap) -> Option<Technology> {
        match self.try_new_instance(ctx, overrides) {
            Ok(tech) => Some(tech),
            Err(err @ TechError::MissingImplementation { .. }) => {
                let name = self.name();
                ctx.missing().record(name.clone());
                if is_restricted(name) {
                    tracing::debug!("technology `{}` is not available: {}", name, err);
                } else {
                    tracing::warn!("technology `{}` is not available: {}", name, err);
                }
                None
            }
            Err(err) => {
                tracing::error!(
                    error = ?err,
                    "failed to build technology `{}`: {}",
                    self.name(),
                    err
                );
                None
            }
        }
    }

    /// Builds a new technology, returning any error encountered.
    pub fn try_new_instance(
        &self,
        ctx: &GenericContext,
        overrides: &ParamMap,
    ) -> Result<Technology> {
        let params = fill_params(self.params(), overrides);
        let mut tech = match self {
            Self::Builtin(factory) => (factory.implementation()?)()?,
            Self::Parametrized(factory) => {
                let implementation = factory.implementation()?;
                let def = (implementation.patch)(&params)?;
                (implementation.build)(&def, &params)?
            }
            Self::External(factory) => factory.build(&params)?,
        };
        tech.setup(ctx)?;
        Ok(tech)
    }
}

impl Builtin {
    fn implementation(&self) -> Result<BuildFn> {
        self.build.ok_or_else(|| TechError::MissingImplementation {
            technology: self.name.clone(),
            implementation: self.name.clone(),
        })
    }
}

impl ParametrizedBuiltin {
    fn implementation(&self) -> Result<&Parametrized> {
        self.implementation
            .as_ref()
            .ok_or_else(|| TechError::MissingImplementation {
                technology: self.name.clone(),
                implementation: self.name.clone(),
            })
    }
}

impl ExternalDefinition {
    fn definition(&self) -> Result<Arc<TechDefinition>> {
        self.definition
            .get_or_init(|| {
                let url = self.url.as_ref().ok_or_else(|| TechError::DefinitionLoad {
                    url: ArcStr::default(),
                    reason: arcstr::format!("technology `{}` has no definition location", self.name),
                })?;
                TechDefinition::load(url).map(Arc::new)
            })
            .clone()
    }

    fn build(&self, params: &ParamMap) -> Result<Technology> {
        let def = self.definition()?;
        if def.name != self.name {
            return Err(TechError::NameMismatch {
                expected: self.name.clone(),
                found: def.name.clone(),
            });
        }
        let class = def.class.as_deref().unwrap_or(DEFAULT_IMPLEMENTATION);
        let build = self.implementations.require_definition(&self.name, class)?;
        build(&def, params)
    }
}
