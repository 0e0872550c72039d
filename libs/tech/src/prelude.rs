//! Commonly used types.

pub use crate::config::TechConfig;
pub use crate::context::{GenericContext, MissingTechnologies};
pub use crate::definition::{LayerFunction, TechDefinition};
pub use crate::error::{PersistError, TechError};
pub use crate::factory::TechnologyFactory;
pub use crate::implementation::Implementations;
pub use crate::param::{Param, ParamMap, ParamValue};
pub use crate::registry::Registry;
pub use crate::technology::{Layer, NodeLayer, PrimitiveNode, Technology};
pub use geometry::prelude::*;
pub use layerspec::{LayerMapping, LayerVariant, StreamLayer};
