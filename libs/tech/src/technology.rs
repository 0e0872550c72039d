//! The in-memory technology model.

use arcstr::ArcStr;
use geometry::prelude::*;
use indexmap::IndexMap;
use layerspec::LayerMapping;

pub use crate::definition::LayerFunction;
use crate::context::GenericContext;
use crate::definition::TechDefinition;
use crate::error::{Result, TechError};
use crate::param::{ParamMap, ParamValue};

/// A fabrication technology.
///
/// Built by a [`TechnologyFactory`](crate::factory::TechnologyFactory) and
/// completed by [`Technology::setup`].
#[derive(Debug, Clone, PartialEq)]
pub struct Technology {
    name: ArcStr,
    description: ArcStr,
    scale_nm: f64,
    params: ParamMap,
    layers: IndexMap<ArcStr, Layer>,
    nodes: IndexMap<ArcStr, PrimitiveNode>,
    foundries: IndexMap<ArcStr, Foundry>,
    default_foundry: Option<ArcStr>,
    foundry: Option<ArcStr>,
    generic: Option<ArcStr>,
    stream_layers: IndexMap<ArcStr, LayerMapping>,
    setup_done: bool,
}

/// A mask layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    name: ArcStr,
    function: LayerFunction,
}

/// A foundry and its stream layer specifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Foundry {
    name: ArcStr,
    stream: IndexMap<ArcStr, ArcStr>,
}

/// A primitive node whose layer geometry scales with the instance size.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveNode {
    name: ArcStr,
    default_size: Dims,
    offset: BoundsOffset,
    layers: Vec<NodeLayer>,
}

/// A layer drawn by a primitive node, bounded by four edge coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeLayer {
    layer: ArcStr,
    lx: EdgeH,
    hx: EdgeH,
    ly: EdgeV,
    hy: EdgeV,
}

impl Technology {
    /// Builds a technology from a definition.
    ///
    /// This is the default definition-driven implementation. Layer
    /// references of nodes are checked later, by [`Technology::setup`],
    /// since nodes may draw on layers of the generic technology.
    pub fn from_definition(def: &TechDefinition, params: &ParamMap) -> Result<Self> {
        let invalid = |reason: String| TechError::InvalidDefinition {
            technology: def.name.clone(),
            reason: reason.into(),
        };

        if def.name.is_empty() {
            return Err(invalid("technology name is empty".to_string()));
        }
        if def.scale_nm.is_nan() || def.scale_nm <= 0.0 {
            return Err(invalid(format!("scale must be positive, found {}", def.scale_nm)));
        }

        let mut layers = IndexMap::with_capacity(def.layers.len());
        for layer in def.layers.iter() {
            let prev = layers.insert(
                layer.name.clone(),
                Layer {
                    name: layer.name.clone(),
                    function: layer.function,
                },
            );
            if prev.is_some() {
                return Err(invalid(format!("duplicate layer `{}`", layer.name)));
            }
        }

        let mut foundries = IndexMap::with_capacity(def.foundries.len());
        for foundry in def.foundries.iter() {
            let prev = foundries.insert(
                foundry.name.clone(),
                Foundry {
                    name: foundry.name.clone(),
                    stream: foundry.stream.clone(),
                },
            );
            if prev.is_some() {
                return Err(invalid(format!("duplicate foundry `{}`", foundry.name)));
            }
        }

        let mut nodes = IndexMap::with_capacity(def.nodes.len());
        for node in def.nodes.iter() {
            let layers = node
                .layers
                .iter()
                .map(|layer| NodeLayer {
                    layer: layer.layer.clone(),
                    lx: layer.lx.to_edge_h(),
                    hx: layer.hx.to_edge_h(),
                    ly: layer.ly.to_edge_v(),
                    hy: layer.hy.to_edge_v(),
                })
                .collect();
            let prev = nodes.insert(
                node.name.clone(),
                PrimitiveNode {
                    name: node.name.clone(),
                    default_size: node.default_size(),
                    offset: node.offset.into(),
                    layers,
                },
            );
            if prev.is_some() {
                return Err(invalid(format!("duplicate node `{}`", node.name)));
            }
        }

        Ok(Self {
            name: def.name.clone(),
            description: def.description.clone(),
            scale_nm: def.scale_nm,
            params: params.clone(),
            layers,
            nodes,
            foundries,
            default_foundry: def.default_foundry.clone(),
            foundry: None,
            generic: None,
            stream_layers: IndexMap::new(),
            setup_done: false,
        })
    }

    /// Completes construction of the technology.
    ///
    /// Records the generic technology, checks that every node layer exists
    /// here or in the generic technology, selects the foundry and resolves
    /// its stream layers. Specifications that fail to parse are skipped.
    pub fn setup(&mut self, ctx: &GenericContext) -> Result<()> {
        let generic = ctx.generic();
        self.generic = generic.map(|tech| tech.name().clone());

        for node in self.nodes.values() {
            for layer in node.layers.iter() {
                let known = self.layers.contains_key(&layer.layer)
                    || generic.is_some_and(|tech| tech.layer(&layer.layer).is_some());
                if !known {
                    return Err(TechError::Setup {
                        technology: self.name.clone(),
                        reason: format!(
                            "node `{}` draws on unknown layer `{}`",
                            node.name, layer.layer
                        )
                        .into(),
                    });
                }
            }
        }

        self.foundry = self.select_foundry(ctx.foundry());
        self.stream_layers.clear();
        if let Some(foundry) = self.foundry.as_ref().and_then(|name| self.foundries.get(name)) {
            for (layer, spec) in foundry.stream.iter() {
                match layerspec::parse_checked(spec) {
                    Ok(mapping) => {
                        self.stream_layers.insert(layer.clone(), mapping);
                    }
                    Err(err) => {
                        tracing::warn!(
                            "skipping stream layers of `{}` for foundry `{}` in technology `{}`: {}",
                            layer,
                            foundry.name,
                            self.name,
                            err
                        );
                    }
                }
            }
        }

        self.setup_done = true;
        Ok(())
    }

    fn select_foundry(&self, requested: Option<&ArcStr>) -> Option<ArcStr> {
        if let Some(name) = requested {
            if self.foundries.contains_key(name) {
                return Some(name.clone());
            }
            tracing::debug!(
                "technology `{}` has no foundry `{}`, using its default",
                self.name,
                name
            );
        }
        self.default_foundry
            .as_ref()
            .filter(|name| self.foundries.contains_key(*name))
            .cloned()
            .or_else(|| self.foundries.keys().next().cloned())
    }

    /// The technology name.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// A human readable description.
    #[inline]
    pub fn description(&self) -> &ArcStr {
        &self.description
    }

    /// The size of one lambda, in nanometers.
    #[inline]
    pub fn scale_nm(&self) -> f64 {
        self.scale_nm
    }

    /// The parameters the technology was built with.
    #[inline]
    pub fn params(&self) -> &ParamMap {
        &self.params
    }

    /// Looks up a parameter value by path.
    pub fn param(&self, path: &str) -> Option<&ParamValue> {
        self.params.get(path)
    }

    /// Looks up a layer by name.
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.get(name)
    }

    /// Iterates over the layers in declaration order.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.values()
    }

    /// Looks up a primitive node by name.
    pub fn node(&self, name: &str) -> Option<&PrimitiveNode> {
        self.nodes.get(name)
    }

    /// Iterates over the primitive nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &PrimitiveNode> {
        self.nodes.values()
    }

    /// Looks up a foundry by name.
    pub fn foundry_named(&self, name: &str) -> Option<&Foundry> {
        self.foundries.get(name)
    }

    /// Iterates over the foundries in declaration order.
    pub fn foundries(&self) -> impl Iterator<Item = &Foundry> {
        self.foundries.values()
    }

    /// The foundry selected by [`Technology::setup`].
    pub fn foundry(&self) -> Option<&ArcStr> {
        self.foundry.as_ref()
    }

    /// The name of the generic technology recorded by [`Technology::setup`].
    pub fn generic(&self) -> Option<&ArcStr> {
        self.generic.as_ref()
    }

    /// Returns `true` once [`Technology::setup`] has completed.
    #[inline]
    pub fn is_setup(&self) -> bool {
        self.setup_done
    }

    /// The resolved stream layers of `layer` for the selected foundry.
    pub fn stream_layers(&self, layer: &str) -> Option<&LayerMapping> {
        self.stream_layers.get(layer)
    }

    /// Parses the stream layers of `layer` for any foundry.
    ///
    /// Returns [`None`] if the foundry or layer is unknown, or if its
    /// specification has no usable mapping.
    pub fn stream_layers_for(&self, foundry: &str, layer: &str) -> Option<LayerMapping> {
        let spec = self.foundries.get(foundry)?.stream.get(layer)?;
        layerspec::parse(spec)
    }

    /// The shapes drawn by node `node` at size `size`.
    pub fn node_geometry(&self, node: &str, size: Dims) -> Option<Vec<(ArcStr, Rect)>> {
        self.node(node).map(|node| node.shapes(size).collect())
    }

    /// The bounds of node `node` at size `size`.
    pub fn node_bounds(&self, node: &str, size: Dims) -> Option<Rect> {
        self.node(node).map(|node| node.bounds(size))
    }
}

impl Layer {
    /// The layer name.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// What the layer is used for.
    #[inline]
    pub fn function(&self) -> LayerFunction {
        self.function
    }
}

impl Foundry {
    /// The foundry name.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The unparsed stream layer specification of `layer`.
    pub fn spec(&self, layer: &str) -> Option<&ArcStr> {
        self.stream.get(layer)
    }
}

impl PrimitiveNode {
    /// The node name.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The size of a newly placed instance.
    #[inline]
    pub fn default_size(&self) -> Dims {
        self.default_size
    }

    /// The inset of the reported bounds from the full node box.
    #[inline]
    pub fn offset(&self) -> BoundsOffset {
        self.offset
    }

    /// The layers drawn by the node.
    #[inline]
    pub fn layers(&self) -> &[NodeLayer] {
        &self.layers
    }

    /// The shapes drawn at size `size`, centered on the origin.
    pub fn shapes(&self, size: Dims) -> impl Iterator<Item = (ArcStr, Rect)> + '_ {
        self.layers
            .iter()
            .map(move |layer| (layer.layer.clone(), layer.rect(size)))
    }

    /// The full node box at size `size`, with the bounds offset applied.
    pub fn bounds(&self, size: Dims) -> Rect {
        let full = Rect::from_sides(
            EdgeH::left_edge().evaluate(size),
            EdgeV::bottom_edge().evaluate(size),
            EdgeH::right_edge().evaluate(size),
            EdgeV::top_edge().evaluate(size),
        );
        self.offset.apply_to(full)
    }
}

impl NodeLayer {
    /// Creates a node layer.
    pub fn new(layer: impl Into<ArcStr>, lx: EdgeH, hx: EdgeH, ly: EdgeV, hy: EdgeV) -> Self {
        Self {
            layer: layer.into(),
            lx,
            hx,
            ly,
            hy,
        }
    }

    /// The layer drawn.
    #[inline]
    pub fn layer(&self) -> &ArcStr {
        &self.layer
    }

    /// The left edge.
    pub fn lx(&self) -> EdgeH {
        self.lx
    }

    /// The right edge.
    pub fn hx(&self) -> EdgeH {
        self.hx
    }

    /// The bottom edge.
    pub fn ly(&self) -> EdgeV {
        self.ly
    }

    /// The top edge.
    pub fn hy(&self) -> EdgeV {
        self.hy
    }

    /// The rectangle covered at size `size`.
    ///
    /// Edges are not reordered, so crossed edges give a degenerate rectangle.
    pub fn rect(&self, size: Dims) -> Rect {
        Rect::from_sides(
            self.lx.evaluate(size),
            self.ly.evaluate(size),
            self.hx.evaluate(size),
            self.hy.evaluate(size),
        )
    }
}
