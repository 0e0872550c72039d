//! Conversions between lambda, grid and fixed-point units.
//!
//! Technologies describe shapes in real-valued lambda units. Everything
//! that is persisted or compared is first rounded to the grid, where one
//! lambda is [`GRID`] grid units. Fixed-point values carry
//! [`FIXP_SHIFT`] additional fractional bits below one grid unit.

/// The number of grid units per lambda.
pub const GRID: f64 = 400.0;

/// The number of fractional bits in a fixed-point coordinate.
pub const FIXP_SHIFT: u32 = 20;

/// One grid unit, in fixed point.
pub const FIXP_ONE: i64 = 1 << FIXP_SHIFT;

/// Rounds a lambda value to the nearest grid unit.
///
/// Ties round away from zero.
///
/// # Example
///
/// ```
/// # use geometry::units::lambda_to_grid;
/// assert_eq!(lambda_to_grid(1.5), 600);
/// assert_eq!(lambda_to_grid(-1.5), -600);
/// assert_eq!(lambda_to_grid(0.001), 0);
/// ```
#[inline]
pub fn lambda_to_grid(lambda: f64) -> i64 {
    (lambda * GRID).round() as i64
}

/// Converts a grid value back to lambda.
///
/// # Example
///
/// ```
/// # use geometry::units::grid_to_lambda;
/// assert_eq!(grid_to_lambda(600), 1.5);
/// ```
#[inline]
pub fn grid_to_lambda(grid: i64) -> f64 {
    grid as f64 / GRID
}

/// Converts a grid value to fixed point.
#[inline]
pub const fn grid_to_fixp(grid: i64) -> i64 {
    grid << FIXP_SHIFT
}

/// Rounds a fixed-point value to the nearest grid unit.
///
/// Ties round away from zero, matching [`f64::round`].
///
/// # Example
///
/// ```
/// # use geometry::units::*;
/// assert_eq!(fixp_to_grid(grid_to_fixp(7)), 7);
/// assert_eq!(fixp_to_grid(FIXP_ONE / 2), 1);
/// assert_eq!(fixp_to_grid(-FIXP_ONE / 2), -1);
/// assert_eq!(fixp_to_grid(FIXP_ONE / 2 - 1), 0);
/// ```
#[inline]
pub const fn fixp_to_grid(fixp: i64) -> i64 {
    let half = FIXP_ONE >> 1;
    if fixp >= 0 {
        (fixp + half) >> FIXP_SHIFT
    } else {
        -((half - fixp) >> FIXP_SHIFT)
    }
}

/// Rounds a lambda value to the nearest fixed-point unit.
#[inline]
pub fn lambda_to_fixp(lambda: f64) -> i64 {
    (lambda * GRID * FIXP_ONE as f64).round() as i64
}

/// Converts a fixed-point value to lambda.
#[inline]
pub fn fixp_to_lambda(fixp: i64) -> f64 {
    fixp as f64 / (GRID * FIXP_ONE as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_round_trip_is_stable() {
        for g in -5_000..5_000 {
            assert_eq!(lambda_to_grid(grid_to_lambda(g)), g);
            assert_eq!(fixp_to_grid(grid_to_fixp(g)), g);
        }
    }

    #[test]
    fn fixp_rounding_matches_float_rounding() {
        for fixp in (-10 * FIXP_ONE..10 * FIXP_ONE).step_by(4099) {
            let expected = (fixp as f64 / FIXP_ONE as f64).round() as i64;
            assert_eq!(fixp_to_grid(fixp), expected, "fixp = {fixp}");
        }
    }

    #[test]
    fn lambda_to_fixp_agrees_with_grid() {
        approx::assert_relative_eq!(fixp_to_lambda(lambda_to_fixp(2.75)), 2.75);
        assert_eq!(fixp_to_grid(lambda_to_fixp(2.75)), lambda_to_grid(2.75));
    }
}
