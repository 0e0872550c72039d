//! Axis-aligned rectangles.

use serde::{Deserialize, Serialize};

use crate::dims::Dims;
use crate::dir::Dir;
use crate::point::Point;

/// An axis-aligned rectangle in grid units, stored as its low and high corners.
///
/// Rectangles produced by insetting may be degenerate: the right edge may
/// lie left of the left edge (negative width), and likewise vertically.
/// Such rectangles are representable and are never silently reordered by
/// the operations in this module.
#[derive(
    Debug, Default, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct Rect {
    p0: Point,
    p1: Point,
}

impl Rect {
    /// Creates a rectangle from all 4 sides (left, bottom, right, top).
    ///
    /// The sides are taken as given; see [`Rect::is_degenerate`].
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_sides(15, 20, 30, 40);
    /// assert_eq!(rect.width(), 15);
    /// assert_eq!(rect.height(), 20);
    ///
    /// let inverted = Rect::from_sides(10, 0, 0, 10);
    /// assert_eq!(inverted.width(), -10);
    /// assert!(inverted.is_degenerate());
    /// ```
    #[inline]
    pub const fn from_sides(left: i64, bot: i64, right: i64, top: i64) -> Self {
        Self {
            p0: Point::new(left, bot),
            p1: Point::new(right, top),
        }
    }

    /// Creates a rectangle from its lower-left corner, width and height.
    pub const fn from_xywh(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self::from_sides(x, y, x + w, y + h)
    }

    /// Creates a rectangle with corners `(0, 0), (dims.w(), dims.h())`.
    pub const fn from_dims(dims: Dims) -> Self {
        Self::from_sides(0, 0, dims.w(), dims.h())
    }

    /// Creates a rectangle of size `dims` centered on the origin.
    ///
    /// Odd extents put the extra grid unit on the high side.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let r = Rect::from_dims_centered(Dims::new(10, 5));
    /// assert_eq!((r.left(), r.bot(), r.right(), r.top()), (-5, -2, 5, 3));
    /// ```
    pub const fn from_dims_centered(dims: Dims) -> Self {
        let left = -(dims.w() >> 1);
        let bot = -(dims.h() >> 1);
        Self::from_xywh(left, bot, dims.w(), dims.h())
    }

    /// Returns the left x-coordinate of the rectangle.
    #[inline]
    pub const fn left(&self) -> i64 {
        self.p0.x
    }

    /// Returns the bottom y-coordinate of the rectangle.
    #[inline]
    pub const fn bot(&self) -> i64 {
        self.p0.y
    }

    /// Returns the right x-coordinate of the rectangle.
    #[inline]
    pub const fn right(&self) -> i64 {
        self.p1.x
    }

    /// Returns the top y-coordinate of the rectangle.
    #[inline]
    pub const fn top(&self) -> i64 {
        self.p1.y
    }

    /// Returns the horizontal width of the rectangle, which may be negative.
    #[inline]
    pub const fn width(&self) -> i64 {
        self.p1.x - self.p0.x
    }

    /// Returns the vertical height of the rectangle, which may be negative.
    #[inline]
    pub const fn height(&self) -> i64 {
        self.p1.y - self.p0.y
    }

    /// The length of the rectangle along `dir`.
    pub const fn length(&self, dir: Dir) -> i64 {
        match dir {
            Dir::Horiz => self.width(),
            Dir::Vert => self.height(),
        }
    }

    /// Returns `true` if the rectangle has a negative width or height.
    pub const fn is_degenerate(&self) -> bool {
        self.width() < 0 || self.height() < 0
    }

    /// Translates the rectangle by the given offset.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_sides(0, 0, 10, 20).translate(Point::new(5, -5));
    /// assert_eq!(rect, Rect::from_sides(5, -5, 15, 15));
    /// ```
    pub fn translate(self, p: Point) -> Self {
        Self {
            p0: self.p0 + p,
            p1: self.p1 + p,
        }
    }
}
