//! Construction, parametrization and persistence of fabrication technologies.
//!
//! A [`Registry`] holds one [`TechnologyFactory`] per known technology.
//! Factories build [`Technology`] values on demand: shipped technologies
//! are built in code, optionally patched by parameters, while other
//! technologies are described by external definition documents that are
//! loaded lazily and at most once.
//!
//! # Examples
//!
//! ```
//! use tech::prelude::*;
//!
//! let registry = Registry::standard(&TechConfig::default());
//! let mut overrides = ParamMap::new();
//! overrides.insert("MoCMOS.NumMetalLayers".into(), ParamValue::Int(4));
//!
//! let mocmos = registry
//!     .new_instance("mocmos", registry.generic_context(), &overrides)
//!     .unwrap();
//! assert!(mocmos.layer("metal-4").is_some());
//! assert!(mocmos.layer("metal-5").is_none());
//! ```
#![warn(missing_docs)]

pub mod builtin;
pub mod config;
pub mod context;
pub mod definition;
pub mod error;
pub mod factory;
pub mod implementation;
pub mod param;
pub mod persist;
pub mod prelude;
pub mod registry;
pub mod technology;

#[cfg(test)]
mod tests;

pub use config::TechConfig;
pub use context::{GenericContext, MissingTechnologies};
pub use error::{EmbedError, PersistError, Result, TechError};
pub use factory::TechnologyFactory;
pub use registry::Registry;
pub use technology::Technology;
