//! Technology definition documents.
//!
//! A [`TechDefinition`] is the declarative description of a technology:
//! its layers, the stream layer specifications of each foundry, and the
//! geometry of its primitive nodes. Definitions are stored on disk as TOML
//! and embedded in persisted records as flexbuffers.

use std::path::{Path, PathBuf};

use arcstr::ArcStr;
use geometry::prelude::*;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TechError};

/// The URL scheme accepted by [`TechDefinition::load`].
pub const FILE_SCHEME: &str = "file://";

/// A declarative technology description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechDefinition {
    /// The technology name.
    pub name: ArcStr,
    /// A human readable description.
    #[serde(default)]
    pub description: ArcStr,
    /// The implementation used to build the technology.
    ///
    /// When absent, the default definition-driven implementation is used.
    #[serde(default)]
    pub class: Option<ArcStr>,
    /// The size of one lambda, in nanometers.
    #[serde(default = "default_scale_nm")]
    pub scale_nm: f64,
    /// The foundry selected when no override is given.
    #[serde(default)]
    pub default_foundry: Option<ArcStr>,
    /// Mask layers.
    #[serde(default)]
    pub layers: Vec<LayerDef>,
    /// Foundries and their stream layer specifications.
    #[serde(default)]
    pub foundries: Vec<FoundryDef>,
    /// Primitive nodes.
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
}

fn default_scale_nm() -> f64 {
    200.0
}

/// A mask layer declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDef {
    /// The layer name.
    pub name: ArcStr,
    /// What the layer is used for.
    #[serde(default)]
    pub function: LayerFunction,
}

/// The function of a mask layer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerFunction {
    /// Unclassified.
    #[default]
    Unknown,
    /// The n-th metal layer, counting from 1.
    Metal(u8),
    /// The n-th polysilicon layer, counting from 1.
    Poly(u8),
    /// Active diffusion.
    Diffusion,
    /// A well.
    Well,
    /// An implant.
    Implant,
    /// A contact to poly or diffusion.
    Contact,
    /// A via above the n-th metal layer.
    Via(u8),
    /// A graphical layer with no fabrication meaning.
    Art,
}

/// A foundry and the stream layer specification of each layer it supports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundryDef {
    /// The foundry name.
    pub name: ArcStr,
    /// Layer name to layer specification text, e.g. `"49/0,49/2p"`.
    #[serde(default)]
    pub stream: IndexMap<ArcStr, ArcStr>,
}

/// A primitive node declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
    /// The node name.
    pub name: ArcStr,
    /// Default width in lambda.
    pub width: f64,
    /// Default height in lambda.
    pub height: f64,
    /// Inset of the reported bounds from the full node box.
    #[serde(default)]
    pub offset: OffsetDef,
    /// The layers drawn by the node.
    #[serde(default)]
    pub layers: Vec<NodeLayerDef>,
}

/// A bounds offset, in lambda.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffsetDef {
    /// Left inset.
    pub lx: f64,
    /// Right inset.
    pub hx: f64,
    /// Bottom inset.
    pub ly: f64,
    /// Top inset.
    pub hy: f64,
}

/// One layer drawn by a primitive node.
///
/// Edges default to the sides of the node box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLayerDef {
    /// The layer name.
    pub layer: ArcStr,
    /// Left edge.
    #[serde(default = "EdgeDef::low")]
    pub lx: EdgeDef,
    /// Right edge.
    #[serde(default = "EdgeDef::high")]
    pub hx: EdgeDef,
    /// Bottom edge.
    #[serde(default = "EdgeDef::low")]
    pub ly: EdgeDef,
    /// Top edge.
    #[serde(default = "EdgeDef::high")]
    pub hy: EdgeDef,
}

/// An edge expression `multiplier * extent + adder`, with the adder in lambda.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeDef {
    /// Multiple of the node extent.
    pub multiplier: f64,
    /// Constant offset in lambda.
    pub adder: f64,
}

impl TechDefinition {
    /// Creates an empty definition with the given name.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: ArcStr::default(),
            class: None,
            scale_nm: default_scale_nm(),
            default_foundry: None,
            layers: Vec::new(),
            foundries: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the implementation class.
    pub fn with_class(mut self, class: impl Into<ArcStr>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Sets the lambda scale.
    pub fn with_scale(mut self, scale_nm: f64) -> Self {
        self.scale_nm = scale_nm;
        self
    }

    /// Adds a layer.
    pub fn layer(mut self, name: impl Into<ArcStr>, function: LayerFunction) -> Self {
        self.layers.push(LayerDef {
            name: name.into(),
            function,
        });
        self
    }

    /// Adds a foundry.
    pub fn foundry(mut self, foundry: FoundryDef) -> Self {
        self.foundries.push(foundry);
        self
    }

    /// Adds a node.
    pub fn node(mut self, node: NodeDef) -> Self {
        self.nodes.push(node);
        self
    }

    /// Returns `true` if the definition declares a layer named `name`.
    pub fn has_layer(&self, name: &str) -> bool {
        self.layers.iter().any(|layer| layer.name == name)
    }

    /// Removes every layer for which `keep` returns `false`.
    ///
    /// Nodes drawing on a removed layer and stream specifications of
    /// removed layers are removed with it.
    pub fn retain_layers(&mut self, mut keep: impl FnMut(&LayerDef) -> bool) {
        let mut removed = Vec::new();
        self.layers.retain(|layer| {
            let kept = keep(layer);
            if !kept {
                removed.push(layer.name.clone());
            }
            kept
        });
        if removed.is_empty() {
            return;
        }
        self.nodes
            .retain(|node| !node.layers.iter().any(|layer| removed.contains(&layer.layer)));
        for foundry in self.foundries.iter_mut() {
            foundry.stream.retain(|layer, _| !removed.contains(layer));
        }
    }

    /// Loads a TOML definition from a `file://` URL or a bare path.
    pub fn load(url: &str) -> Result<Self> {
        let path = url_to_path(url);
        tracing::debug!("loading technology definition from {:?}", path);
        let text = std::fs::read_to_string(&path).map_err(|err| TechError::DefinitionLoad {
            url: url.into(),
            reason: err.to_string().into(),
        })?;
        Self::from_toml_str(&text).map_err(|err| TechError::DefinitionLoad {
            url: url.into(),
            reason: err.to_string().into(),
        })
    }

    /// Parses a TOML definition.
    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Serializes the definition to its embedded binary form.
    pub fn to_bytes(&self) -> std::result::Result<Vec<u8>, flexbuffers::SerializationError> {
        flexbuffers::to_vec(self)
    }

    /// Deserializes a definition from its embedded binary form.
    pub fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, flexbuffers::DeserializationError> {
        flexbuffers::from_slice(bytes)
    }
}

/// Converts a definition URL to a filesystem path.
pub fn url_to_path(url: &str) -> PathBuf {
    Path::new(url.strip_prefix(FILE_SCHEME).unwrap_or(url)).to_path_buf()
}

/// Converts a filesystem path to a `file://` URL.
pub fn path_to_url(path: impl AsRef<Path>) -> ArcStr {
    format!("{}{}", FILE_SCHEME, path.as_ref().display()).into()
}

impl FoundryDef {
    /// Creates a foundry with no stream layers.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            stream: IndexMap::new(),
        }
    }

    /// Adds the stream layer specification of `layer`.
    pub fn stream(mut self, layer: impl Into<ArcStr>, spec: impl Into<ArcStr>) -> Self {
        self.stream.insert(layer.into(), spec.into());
        self
    }
}

impl NodeDef {
    /// Creates a node of the given default size with no layers.
    pub fn new(name: impl Into<ArcStr>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            offset: OffsetDef::default(),
            layers: Vec::new(),
        }
    }

    /// Sets the bounds offset.
    pub fn with_offset(mut self, lx: f64, hx: f64, ly: f64, hy: f64) -> Self {
        self.offset = OffsetDef { lx, hx, ly, hy };
        self
    }

    /// Adds a layer covering the whole node box.
    pub fn full(self, layer: impl Into<ArcStr>) -> Self {
        self.inset(layer, 0.0)
    }

    /// Adds a layer inset by `inset` lambda from every side of the node box.
    pub fn inset(mut self, layer: impl Into<ArcStr>, inset: f64) -> Self {
        self.layers.push(NodeLayerDef {
            layer: layer.into(),
            lx: EdgeDef::new(-0.5, inset),
            hx: EdgeDef::new(0.5, -inset),
            ly: EdgeDef::new(-0.5, inset),
            hy: EdgeDef::new(0.5, -inset),
        });
        self
    }

    /// Adds a layer with explicit edges.
    pub fn layer(mut self, layer: NodeLayerDef) -> Self {
        self.layers.push(layer);
        self
    }

    /// The default size of the node.
    pub fn default_size(&self) -> Dims {
        Dims::from_lambda(self.width, self.height)
    }
}

impl From<OffsetDef> for BoundsOffset {
    fn from(value: OffsetDef) -> Self {
        BoundsOffset::new(value.lx, value.hx, value.ly, value.hy)
    }
}

impl NodeLayerDef {
    /// Creates a node layer from explicit edges.
    pub fn new(layer: impl Into<ArcStr>, lx: EdgeDef, hx: EdgeDef, ly: EdgeDef, hy: EdgeDef) -> Self {
        Self {
            layer: layer.into(),
            lx,
            hx,
            ly,
            hy,
        }
    }
}

impl EdgeDef {
    /// Creates an edge expression.
    pub const fn new(multiplier: f64, adder: f64) -> Self {
        Self { multiplier, adder }
    }

    /// The low side of the node box.
    pub const fn low() -> Self {
        Self::new(-0.5, 0.0)
    }

    /// The high side of the node box.
    pub const fn high() -> Self {
        Self::new(0.5, 0.0)
    }

    /// Converts to a horizontal edge coordinate.
    pub fn to_edge_h(self) -> EdgeH {
        EdgeH::new(self.multiplier, self.adder)
    }

    /// Converts to a vertical edge coordinate.
    pub fn to_edge_v(self) -> EdgeV {
        EdgeV::new(self.multiplier, self.adder)
    }
}
