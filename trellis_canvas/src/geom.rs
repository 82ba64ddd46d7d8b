// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle helpers used by layout.

use kurbo::Rect;

/// Edge trimming and clamping on [`Rect`].
///
/// Trims are exact: cutting `n` units from an edge moves that edge by exactly `n`,
/// unless the rectangle is smaller than `n`, in which case it collapses to zero extent
/// on that axis.
pub trait RectExt {
    /// Remove `amount` from the top edge.
    fn cut_top(self, amount: f64) -> Rect;
    /// Remove `amount` from the bottom edge.
    fn cut_bottom(self, amount: f64) -> Rect;
    /// Remove `amount` from the left edge.
    fn cut_left(self, amount: f64) -> Rect;
    /// Remove `amount` from the right edge.
    fn cut_right(self, amount: f64) -> Rect;
    /// Whether both width and height are strictly positive.
    fn has_area(&self) -> bool;
    /// Normalize so that `x1 >= x0` and `y1 >= y0`, collapsing inverted extents to zero.
    fn clamp_non_negative(self) -> Rect;
}

impl RectExt for Rect {
    fn cut_top(self, amount: f64) -> Rect {
        Rect::new(self.x0, (self.y0 + amount).min(self.y1), self.x1, self.y1)
    }

    fn cut_bottom(self, amount: f64) -> Rect {
        Rect::new(self.x0, self.y0, self.x1, (self.y1 - amount).max(self.y0))
    }

    fn cut_left(self, amount: f64) -> Rect {
        Rect::new((self.x0 + amount).min(self.x1), self.y0, self.x1, self.y1)
    }

    fn cut_right(self, amount: f64) -> Rect {
        Rect::new(self.x0, self.y0, (self.x1 - amount).max(self.x0), self.y1)
    }

    fn has_area(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    fn clamp_non_negative(self) -> Rect {
        Rect::new(self.x0, self.y0, self.x1.max(self.x0), self.y1.max(self.y0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Size};

    #[test]
    fn cut_top_is_exact() {
        let r = Rect::from_origin_size(Point::ZERO, Size::new(100.0, 200.0));
        let cut = r.cut_top(40.0);
        assert_eq!(cut.origin(), Point::new(0.0, 40.0));
        assert_eq!(cut.size(), Size::new(100.0, 160.0));
    }

    #[test]
    fn cuts_collapse_instead_of_inverting() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(r.cut_bottom(25.0), Rect::new(0.0, 0.0, 10.0, 0.0));
        assert_eq!(r.cut_left(3.0), Rect::new(3.0, 0.0, 10.0, 10.0));
        assert_eq!(r.cut_right(3.0).width(), 7.0);
        assert!(!r.cut_top(10.0).has_area());
    }

    #[test]
    fn clamp() {
        let r = Rect {
            x0: 10.0,
            y0: 10.0,
            x1: 5.0,
            y1: 20.0,
        };
        assert_eq!(r.clamp_non_negative(), Rect::new(10.0, 10.0, 10.0, 20.0));
    }
}
