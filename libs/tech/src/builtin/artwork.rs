//! The artwork technology: graphical shapes with no fabrication meaning.

use crate::definition::{EdgeDef, LayerFunction, NodeDef, NodeLayerDef, TechDefinition};
use crate::error::Result;
use crate::param::ParamMap;
use crate::technology::Technology;

/// The technology name.
pub const NAME: &str = "artwork";

/// The definition of the artwork technology.
pub fn definition() -> TechDefinition {
    TechDefinition::new(NAME)
        .with_description("General purpose artwork")
        .layer("graphics", LayerFunction::Art)
        .node(NodeDef::new("pin", 1.0, 1.0).full("graphics"))
        .node(NodeDef::new("box", 6.0, 6.0).full("graphics"))
        .node(NodeDef::new("crossed-box", 6.0, 6.0).full("graphics"))
        // Circles are approximated by their bounding box.
        .node(NodeDef::new("circle", 6.0, 6.0).full("graphics"))
        // The arrow head occupies the right half of the node.
        .node(NodeDef::new("arrow", 2.0, 2.0).layer(NodeLayerDef::new(
            "graphics",
            EdgeDef::new(0.0, 0.0),
            EdgeDef::high(),
            EdgeDef::low(),
            EdgeDef::high(),
        )))
}

/// Builds the artwork technology.
pub fn build() -> Result<Technology> {
    Technology::from_definition(&definition(), &ParamMap::new())
}
