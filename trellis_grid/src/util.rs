// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell coordinate helpers.

/// Map a coordinate to a cell coordinate along one axis, rounding towards -∞.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Grid cell indices are intentionally i32; out-of-range values are saturated."
)]
#[inline]
pub(crate) fn floor_cell(value: f64, cell_size: f64) -> i32 {
    debug_assert!(cell_size > 0.0, "grid cell_size must be strictly positive");
    let t = value / cell_size;
    let coord = t as i32;

    // The cast above has already truncated towards zero.
    if t < 0.0 && f64::from(coord) > t {
        coord.saturating_sub(1)
    } else {
        coord
    }
}

/// Map a coordinate to a cell coordinate along one axis, rounding towards +∞.
#[inline]
pub(crate) fn ceil_cell(value: f64, cell_size: f64) -> i32 {
    floor_cell(-value, cell_size).saturating_neg()
}

/// Number of cells needed to cover `extent` along one axis.
#[allow(
    clippy::cast_sign_loss,
    reason = "The value is clamped to be non-negative first."
)]
#[inline]
pub(crate) fn cells_for_extent(extent: f64, cell_size: f64) -> usize {
    ceil_cell(extent, cell_size).max(0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_rounds_towards_negative_infinity() {
        assert_eq!(floor_cell(0.0, 10.0), 0);
        assert_eq!(floor_cell(9.99, 10.0), 0);
        assert_eq!(floor_cell(10.0, 10.0), 1);
        assert_eq!(floor_cell(-0.5, 10.0), -1);
        assert_eq!(floor_cell(-10.0, 10.0), -1);
        assert_eq!(floor_cell(-10.5, 10.0), -2);
    }

    #[test]
    fn ceil_rounds_towards_positive_infinity() {
        assert_eq!(ceil_cell(0.0, 10.0), 0);
        assert_eq!(ceil_cell(0.1, 10.0), 1);
        assert_eq!(ceil_cell(10.0, 10.0), 1);
        assert_eq!(ceil_cell(-5.0, 10.0), 0);
    }

    #[test]
    fn floor_saturates() {
        assert_eq!(floor_cell(1e20, 1.0), i32::MAX);
        assert_eq!(floor_cell(-1e20, 1.0), i32::MIN);
    }

    #[test]
    fn extent_cell_count() {
        assert_eq!(cells_for_extent(800.0, 64.0), 13);
        assert_eq!(cells_for_extent(640.0, 64.0), 10);
        assert_eq!(cells_for_extent(0.0, 64.0), 0);
        assert_eq!(cells_for_extent(-5.0, 64.0), 0);
    }
}
