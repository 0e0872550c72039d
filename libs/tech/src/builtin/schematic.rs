//! The schematic technology.

use crate::definition::{EdgeDef, LayerFunction, NodeDef, NodeLayerDef, TechDefinition};
use crate::error::Result;
use crate::param::ParamMap;
use crate::technology::Technology;

/// The technology name.
pub const NAME: &str = "schematic";

/// The definition of the schematic technology.
pub fn definition() -> TechDefinition {
    TechDefinition::new(NAME)
        .with_description("Schematic capture")
        .layer("arc", LayerFunction::Art)
        .layer("bus", LayerFunction::Art)
        .layer("node", LayerFunction::Art)
        .layer("text", LayerFunction::Art)
        .node(NodeDef::new("wire-pin", 0.5, 0.5).full("arc"))
        .node(NodeDef::new("bus-pin", 2.0, 2.0).full("bus"))
        .node(NodeDef::new("off-page", 6.0, 3.0).full("node"))
        .node(
            NodeDef::new("transistor", 4.0, 4.0)
                .with_offset(0.0, 0.0, 0.0, 1.0)
                // Channel, spanning the middle half of the node.
                .layer(NodeLayerDef::new(
                    "node",
                    EdgeDef::new(-0.25, 0.0),
                    EdgeDef::new(0.25, 0.0),
                    EdgeDef::new(0.0, 0.0),
                    EdgeDef::new(0.0, 0.25),
                ))
                // Gate.
                .layer(NodeLayerDef::new(
                    "node",
                    EdgeDef::new(-0.25, 0.0),
                    EdgeDef::new(0.25, 0.0),
                    EdgeDef::new(0.0, 0.75),
                    EdgeDef::new(0.0, 1.0),
                )),
        )
        .node(
            NodeDef::new("resistor", 6.0, 1.0).layer(NodeLayerDef::new(
                "node",
                EdgeDef::new(-0.33, 0.0),
                EdgeDef::new(0.33, 0.0),
                EdgeDef::low(),
                EdgeDef::high(),
            )),
        )
}

/// Builds the schematic technology.
pub fn build() -> Result<Technology> {
    Technology::from_definition(&definition(), &ParamMap::new())
}
