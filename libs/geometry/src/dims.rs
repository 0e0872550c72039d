//! The size of a node instance.

use serde::{Deserialize, Serialize};

use crate::dir::Dir;
use crate::units::{fixp_to_grid, fixp_to_lambda, grid_to_fixp, lambda_to_fixp};

/// A width and height, in both grid and fixed-point units.
///
/// The fixed-point values are authoritative; the grid values are the
/// fixed-point values rounded to the nearest grid unit.
#[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dims {
    w: i64,
    h: i64,
    fixp_w: i64,
    fixp_h: i64,
}

impl Dims {
    /// Creates dimensions from a grid width and height.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let dims = Dims::new(100, 200);
    /// assert_eq!(dims.w(), 100);
    /// assert_eq!(dims.h(), 200);
    /// assert_eq!(dims.fixp_w(), 100 << 20);
    /// ```
    pub const fn new(w: i64, h: i64) -> Self {
        Self {
            w,
            h,
            fixp_w: grid_to_fixp(w),
            fixp_h: grid_to_fixp(h),
        }
    }

    /// Creates dimensions from a fixed-point width and height.
    ///
    /// The grid values are rounded from the fixed-point values.
    pub const fn from_fixp(fixp_w: i64, fixp_h: i64) -> Self {
        Self {
            w: fixp_to_grid(fixp_w),
            h: fixp_to_grid(fixp_h),
            fixp_w,
            fixp_h,
        }
    }

    /// Creates dimensions from a width and height in lambda.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let dims = Dims::from_lambda(3.0, 0.5);
    /// assert_eq!(dims, Dims::new(1200, 200));
    /// ```
    pub fn from_lambda(w: f64, h: f64) -> Self {
        Self::from_fixp(lambda_to_fixp(w), lambda_to_fixp(h))
    }

    /// The grid width.
    #[inline]
    pub const fn w(&self) -> i64 {
        self.w
    }

    /// The grid height.
    #[inline]
    pub const fn h(&self) -> i64 {
        self.h
    }

    /// The grid width. An alias for [`Dims::w`].
    #[inline]
    pub const fn width(&self) -> i64 {
        self.w
    }

    /// The grid height. An alias for [`Dims::h`].
    #[inline]
    pub const fn height(&self) -> i64 {
        self.h
    }

    /// The fixed-point width.
    #[inline]
    pub const fn fixp_w(&self) -> i64 {
        self.fixp_w
    }

    /// The fixed-point height.
    #[inline]
    pub const fn fixp_h(&self) -> i64 {
        self.fixp_h
    }

    /// The width in lambda.
    pub fn lambda_w(&self) -> f64 {
        fixp_to_lambda(self.fixp_w)
    }

    /// The height in lambda.
    pub fn lambda_h(&self) -> f64 {
        fixp_to_lambda(self.fixp_h)
    }

    /// The grid extent along `dir`: width for [`Dir::Horiz`], height for [`Dir::Vert`].
    pub const fn extent(&self, dir: Dir) -> i64 {
        match dir {
            Dir::Horiz => self.w,
            Dir::Vert => self.h,
        }
    }

    /// The fixed-point extent along `dir`.
    pub const fn fixp_extent(&self, dir: Dir) -> i64 {
        match dir {
            Dir::Horiz => self.fixp_w,
            Dir::Vert => self.fixp_h,
        }
    }
}

impl From<(i64, i64)> for Dims {
    fn from(value: (i64, i64)) -> Self {
        Self::new(value.0, value.1)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::units::FIXP_ONE;

    #[test]
    fn lambda_sizes_come_from_fixed_point() {
        let dims = Dims::from_lambda(2.75, 0.5);
        assert_relative_eq!(dims.lambda_w(), 2.75);
        assert_relative_eq!(dims.lambda_h(), 0.5);
        assert_eq!((dims.w(), dims.h()), (1100, 200));

        let dims = Dims::new(400, 1000);
        assert_relative_eq!(dims.lambda_w(), 1.0);
        assert_relative_eq!(dims.lambda_h(), 2.5);
    }

    #[test]
    fn grid_sizes_round_from_fixed_point() {
        let half = FIXP_ONE / 2;
        let dims = Dims::from_fixp(grid_to_fixp(3) + half, grid_to_fixp(3) + half - 1);
        assert_eq!((dims.w(), dims.h()), (4, 3));
        assert_eq!(dims.fixp_extent(Dir::Horiz), grid_to_fixp(3) + half);
        assert_relative_eq!(dims.lambda_w(), 3.5 / 400.0);
    }
}
