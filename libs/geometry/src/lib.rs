//! 2-D geometric primitives for technology-defined layout shapes.
//!
//! All persisted geometry lives on an integer grid (see [`units`]).
//! Parametric shapes are described with [`edge::EdgeH`] / [`edge::EdgeV`]
//! formulas that are evaluated against the [`dims::Dims`] of a node
//! instance, and [`offset::BoundsOffset`] insets that shrink a node's
//! full extent to its visible bounds.
//!
//! # Examples
//!
//! Evaluate the left edge of a node inset by one lambda:
//!
//! ```
//! # use geometry::prelude::*;
//! let edge = EdgeH::from_left(1.0);
//! let dims = Dims::from_lambda(10.0, 4.0);
//! assert_eq!(edge.evaluate(dims), -1600);
//! ```
#![warn(missing_docs)]

pub mod dims;
pub mod dir;
pub mod edge;
pub mod offset;
pub mod point;
pub mod prelude;
pub mod rect;
pub mod units;
