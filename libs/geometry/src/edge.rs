//! Parametric edge coordinates.
//!
//! An edge coordinate maps the size of a node instance to an absolute offset
//! from the node's center: `adder + multiplier * extent`. The multipliers
//! `-0.5`, `0` and `0.5` (the low edge, the center and the high edge) are by
//! far the most common and are evaluated with exact integer shifts; any other
//! multiplier goes through a floating-point multiply and a rounding step.

use std::fmt::{Debug, Display};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::dims::Dims;
use crate::dir::Dir;
use crate::units::{grid_to_fixp, grid_to_lambda, lambda_to_grid};

/// An axis along which an [`EdgeCoord`] is evaluated.
pub trait Axis: Copy + Debug + Default + Send + Sync + 'static {
    /// The direction of the axis.
    const DIR: Dir;
    /// A human-readable name for the low edge.
    const LOW: &'static str;
    /// A human-readable name for the high edge.
    const HIGH: &'static str;
    /// The symbol used for the node extent along this axis.
    const EXTENT: char;
}

/// The horizontal axis; edges are evaluated against node width.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Horiz;

/// The vertical axis; edges are evaluated against node height.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vert;

impl Axis for Horiz {
    const DIR: Dir = Dir::Horiz;
    const LOW: &'static str = "left";
    const HIGH: &'static str = "right";
    const EXTENT: char = 'W';
}

impl Axis for Vert {
    const DIR: Dir = Dir::Vert;
    const LOW: &'static str = "bottom";
    const HIGH: &'static str = "top";
    const EXTENT: char = 'H';
}

/// The quantized form of an edge multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeCode {
    /// A multiplier of exactly `-0.5`: the low edge.
    Neg1,
    /// A multiplier of exactly `0`: the center.
    Zero,
    /// A multiplier of exactly `0.5`: the high edge.
    Pos1,
    /// Any other multiplier.
    General,
}

impl EdgeCode {
    /// Classifies a multiplier by exact comparison.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(EdgeCode::of(-0.5), EdgeCode::Neg1);
    /// assert_eq!(EdgeCode::of(0.0), EdgeCode::Zero);
    /// assert_eq!(EdgeCode::of(0.5), EdgeCode::Pos1);
    /// assert_eq!(EdgeCode::of(0.4999999), EdgeCode::General);
    /// ```
    pub fn of(multiplier: f64) -> Self {
        if multiplier == -0.5 {
            Self::Neg1
        } else if multiplier == 0.0 {
            Self::Zero
        } else if multiplier == 0.5 {
            Self::Pos1
        } else {
            Self::General
        }
    }
}

/// A scalar formula mapping a node extent to an offset from the node center.
///
/// The adder is rounded to the grid at construction; the real-valued adder
/// is not retained. Equality and hashing use the raw bits of the multiplier
/// and the grid adder, not evaluated results.
pub struct EdgeCoord<A> {
    multiplier: f64,
    code: EdgeCode,
    grid_adder: i64,
    axis: PhantomData<A>,
}

/// A horizontal edge coordinate, evaluated against node width.
pub type EdgeH = EdgeCoord<Horiz>;

/// A vertical edge coordinate, evaluated against node height.
pub type EdgeV = EdgeCoord<Vert>;

impl<A> Clone for EdgeCoord<A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for EdgeCoord<A> {}

impl<A> PartialEq for EdgeCoord<A> {
    fn eq(&self, other: &Self) -> bool {
        self.multiplier.to_bits() == other.multiplier.to_bits()
            && self.grid_adder == other.grid_adder
    }
}

impl<A> Eq for EdgeCoord<A> {}

impl<A> Hash for EdgeCoord<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.multiplier.to_bits().hash(state);
        self.grid_adder.hash(state);
    }
}

impl<A: Axis> Debug for EdgeCoord<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgeCoord")
            .field("dir", &A::DIR)
            .field("multiplier", &self.multiplier)
            .field("code", &self.code)
            .field("grid_adder", &self.grid_adder)
            .finish()
    }
}

impl<A: Axis> EdgeCoord<A> {
    /// Creates an edge from a multiplier and an adder in lambda.
    ///
    /// The adder is rounded to the nearest grid unit.
    pub fn new(multiplier: f64, adder: f64) -> Self {
        Self::from_grid(multiplier, lambda_to_grid(adder))
    }

    /// Creates an edge from a multiplier and an adder in grid units.
    pub fn from_grid(multiplier: f64, grid_adder: i64) -> Self {
        Self {
            multiplier,
            code: EdgeCode::of(multiplier),
            grid_adder,
            axis: PhantomData,
        }
    }

    /// The center of the node.
    pub fn center() -> Self {
        Self::from_grid(0.0, 0)
    }

    /// An edge `adder` lambda from the center of the node.
    pub fn from_center(adder: f64) -> Self {
        Self::new(0.0, adder)
    }

    /// An edge at fraction `fraction` of a node of extent `extent` (in lambda).
    ///
    /// Produces multiplier `fraction / 2` and adder `fraction * extent / 2`.
    pub fn by_fraction(fraction: f64, extent: f64) -> Self {
        Self::new(fraction / 2.0, fraction * extent / 2.0)
    }

    /// The multiplier applied to the node extent.
    #[inline]
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// The quantized multiplier.
    #[inline]
    pub fn code(&self) -> EdgeCode {
        self.code
    }

    /// The adder, in grid units.
    #[inline]
    pub fn grid_adder(&self) -> i64 {
        self.grid_adder
    }

    /// The adder, re-derived in lambda from the grid value.
    #[inline]
    pub fn adder(&self) -> f64 {
        grid_to_lambda(self.grid_adder)
    }

    /// The direction along which this edge is evaluated.
    #[inline]
    pub fn dir(&self) -> Dir {
        A::DIR
    }

    /// Returns an edge with the same multiplier and the given grid adder.
    ///
    /// Returns `self` unchanged if the adder is already `grid_adder`.
    pub fn with_grid_adder(self, grid_adder: i64) -> Self {
        if grid_adder == self.grid_adder {
            self
        } else {
            Self {
                grid_adder,
                ..self
            }
        }
    }

    /// Returns an edge with the same multiplier and the given adder in lambda.
    pub fn with_adder(self, adder: f64) -> Self {
        self.with_grid_adder(lambda_to_grid(adder))
    }

    /// Evaluates the edge against a grid extent.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(EdgeH::right_edge().evaluate_extent(101), 50);
    /// assert_eq!(EdgeH::left_edge().evaluate_extent(101), -50);
    /// assert_eq!(EdgeH::new(0.25, 0.0).evaluate_extent(102), 26);
    /// ```
    #[inline]
    pub fn evaluate_extent(&self, extent: i64) -> i64 {
        match self.code {
            EdgeCode::Neg1 => self.grid_adder - (extent >> 1),
            EdgeCode::Zero => self.grid_adder,
            EdgeCode::Pos1 => self.grid_adder + (extent >> 1),
            EdgeCode::General => self.grid_adder + (self.multiplier * extent as f64).round() as i64,
        }
    }

    /// Evaluates the edge against a fixed-point extent, returning fixed point.
    #[inline]
    pub fn evaluate_fixp_extent(&self, fixp_extent: i64) -> i64 {
        let adder = grid_to_fixp(self.grid_adder);
        match self.code {
            EdgeCode::Neg1 => adder - (fixp_extent >> 1),
            EdgeCode::Zero => adder,
            EdgeCode::Pos1 => adder + (fixp_extent >> 1),
            EdgeCode::General => adder + (self.multiplier * fixp_extent as f64).round() as i64,
        }
    }

    /// Evaluates the edge against the grid size of a node.
    #[inline]
    pub fn evaluate(&self, dims: Dims) -> i64 {
        self.evaluate_extent(dims.extent(A::DIR))
    }

    /// Evaluates the edge against the fixed-point size of a node.
    #[inline]
    pub fn evaluate_fixp(&self, dims: Dims) -> i64 {
        self.evaluate_fixp_extent(dims.fixp_extent(A::DIR))
    }
}

impl EdgeCoord<Horiz> {
    /// The left edge of the node.
    pub fn left_edge() -> Self {
        Self::from_grid(-0.5, 0)
    }

    /// The right edge of the node.
    pub fn right_edge() -> Self {
        Self::from_grid(0.5, 0)
    }

    /// An edge `adder` lambda to the right of the left edge.
    pub fn from_left(adder: f64) -> Self {
        Self::new(-0.5, adder)
    }

    /// An edge `adder` lambda to the left of the right edge.
    pub fn from_right(adder: f64) -> Self {
        Self::new(0.5, -adder)
    }
}

impl EdgeCoord<Vert> {
    /// The bottom edge of the node.
    pub fn bottom_edge() -> Self {
        Self::from_grid(-0.5, 0)
    }

    /// The top edge of the node.
    pub fn top_edge() -> Self {
        Self::from_grid(0.5, 0)
    }

    /// An edge `adder` lambda above the bottom edge.
    pub fn from_bottom(adder: f64) -> Self {
        Self::new(-0.5, adder)
    }

    /// An edge `adder` lambda below the top edge.
    pub fn from_top(adder: f64) -> Self {
        Self::new(0.5, -adder)
    }
}

impl<A: Axis> Display for EdgeCoord<A> {
    /// Formats the edge as an expression, eg. `left + 1.5` or `0.25W - 2`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            EdgeCode::Neg1 => write!(f, "{}", A::LOW)?,
            EdgeCode::Zero => write!(f, "center")?,
            EdgeCode::Pos1 => write!(f, "{}", A::HIGH)?,
            EdgeCode::General => write!(f, "{}{}", self.multiplier, A::EXTENT)?,
        }
        let adder = self.adder();
        if self.grid_adder > 0 {
            write!(f, " + {}", adder)?;
        } else if self.grid_adder < 0 {
            write!(f, " - {}", -adder)?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct RawEdge {
    multiplier: f64,
    grid_adder: i64,
}

impl<A> Serialize for EdgeCoord<A> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawEdge {
            multiplier: self.multiplier,
            grid_adder: self.grid_adder,
        }
        .serialize(serializer)
    }
}

impl<'de, A: Axis> Deserialize<'de> for EdgeCoord<A> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawEdge::deserialize(deserializer)?;
        Ok(Self::from_grid(raw.multiplier, raw.grid_adder))
    }
}
