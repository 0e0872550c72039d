//! The generic technology.
//!
//! Holds the layers every other technology may draw on: universal,
//! invisible and unrouted pins, and the glyphs used for cell annotations.

use crate::definition::{LayerFunction, NodeDef, TechDefinition};
use crate::error::Result;
use crate::param::ParamMap;
use crate::technology::Technology;

/// The technology name.
pub const NAME: &str = "generic";

/// The definition of the generic technology.
pub fn definition() -> TechDefinition {
    TechDefinition::new(NAME)
        .with_description("Useful primitives shared by all technologies")
        .layer("universal", LayerFunction::Unknown)
        .layer("invisible", LayerFunction::Unknown)
        .layer("unrouted", LayerFunction::Unknown)
        .layer("glyph", LayerFunction::Art)
        .node(NodeDef::new("universal-pin", 1.0, 1.0).full("universal"))
        .node(NodeDef::new("invisible-pin", 1.0, 1.0).full("invisible"))
        .node(NodeDef::new("unrouted-pin", 1.0, 1.0).full("unrouted"))
        .node(NodeDef::new("cell-center", 0.0, 0.0).full("glyph"))
        .node(NodeDef::new("essential-bounds", 0.0, 0.0).full("glyph"))
}

/// Builds the generic technology.
pub fn build() -> Result<Technology> {
    Technology::from_definition(&definition(), &ParamMap::new())
}
