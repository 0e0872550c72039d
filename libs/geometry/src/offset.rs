//! Insets from the full extent of a node to its visible bounds.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::rect::Rect;
use crate::units::{grid_to_lambda, lambda_to_grid};

/// Four independent edge insets, stored in grid units.
///
/// Each inset is rounded to the grid once, at construction. Lambda values
/// are re-derived from the grid values on access.
#[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundsOffset {
    grid_lx: i64,
    grid_hx: i64,
    grid_ly: i64,
    grid_hy: i64,
}

impl BoundsOffset {
    /// The offset that leaves a rectangle unchanged.
    pub const ZERO: BoundsOffset = BoundsOffset::from_grid(0, 0, 0, 0);

    /// Creates an offset from insets in lambda, rounding each to the grid.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let offset = BoundsOffset::new(1.0, 1.0, 0.5, 0.25);
    /// assert_eq!(offset.grid_lx(), 400);
    /// assert_eq!(offset.grid_hy(), 100);
    /// assert_eq!(offset.ly(), 0.5);
    /// ```
    pub fn new(lx: f64, hx: f64, ly: f64, hy: f64) -> Self {
        Self::from_grid(
            lambda_to_grid(lx),
            lambda_to_grid(hx),
            lambda_to_grid(ly),
            lambda_to_grid(hy),
        )
    }

    /// Creates an offset from insets in grid units.
    pub const fn from_grid(grid_lx: i64, grid_hx: i64, grid_ly: i64, grid_hy: i64) -> Self {
        Self {
            grid_lx,
            grid_hx,
            grid_ly,
            grid_hy,
        }
    }

    /// The low-x inset in grid units.
    #[inline]
    pub const fn grid_lx(&self) -> i64 {
        self.grid_lx
    }

    /// The high-x inset in grid units.
    #[inline]
    pub const fn grid_hx(&self) -> i64 {
        self.grid_hx
    }

    /// The low-y inset in grid units.
    #[inline]
    pub const fn grid_ly(&self) -> i64 {
        self.grid_ly
    }

    /// The high-y inset in grid units.
    #[inline]
    pub const fn grid_hy(&self) -> i64 {
        self.grid_hy
    }

    /// The low-x inset in lambda.
    pub fn lx(&self) -> f64 {
        grid_to_lambda(self.grid_lx)
    }

    /// The high-x inset in lambda.
    pub fn hx(&self) -> f64 {
        grid_to_lambda(self.grid_hx)
    }

    /// The low-y inset in lambda.
    pub fn ly(&self) -> f64 {
        grid_to_lambda(self.grid_ly)
    }

    /// The high-y inset in lambda.
    pub fn hy(&self) -> f64 {
        grid_to_lambda(self.grid_hy)
    }

    /// Returns `true` if every inset is zero.
    pub const fn is_zero(&self) -> bool {
        self.grid_lx == 0 && self.grid_hx == 0 && self.grid_ly == 0 && self.grid_hy == 0
    }

    /// Insets `rect` by this offset.
    ///
    /// The left and bottom edges move in by the low insets; the width and
    /// height shrink by the sum of the low and high insets. The result is
    /// not validated and may be degenerate.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let offset = BoundsOffset::from_grid(10, 20, 5, 5);
    /// let rect = offset.apply_to(Rect::from_xywh(0, 0, 100, 50));
    /// assert_eq!(rect, Rect::from_xywh(10, 5, 70, 40));
    ///
    /// let collapsed = offset.apply_to(Rect::from_xywh(0, 0, 20, 50));
    /// assert_eq!(collapsed.width(), -10);
    /// ```
    pub const fn apply_to(&self, rect: Rect) -> Rect {
        Rect::from_xywh(
            rect.left() + self.grid_lx,
            rect.bot() + self.grid_ly,
            rect.width() - self.grid_lx - self.grid_hx,
            rect.height() - self.grid_ly - self.grid_hy,
        )
    }
}

impl Display for BoundsOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[lx={}, hx={}, ly={}, hy={}]",
            self.lx(),
            self.hx(),
            self.ly(),
            self.hy()
        )
    }
}
