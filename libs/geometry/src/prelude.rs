//! An import prelude that re-exports commonly used items.

pub use crate::dims::Dims;
pub use crate::dir::Dir;
pub use crate::edge::{EdgeCode, EdgeCoord, EdgeH, EdgeV};
pub use crate::offset::BoundsOffset;
pub use crate::point::Point;
pub use crate::rect::Rect;
pub use crate::units::{grid_to_lambda, lambda_to_grid, GRID};
