// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row-major cell layout.

use kurbo::{Point, Rect, Size};
use trellis_canvas::{ContainerKind, RenderCx, Renderer, Widget};

/// Places children into `rows × columns` equal cells, filling each row left to right.
///
/// Children past the last cell get an empty area and are not drawn.
#[derive(Clone, Debug)]
pub struct GridLayout {
    rows: usize,
    columns: usize,
    spacing: f64,
}

impl GridLayout {
    /// A grid with the given shape. Zero rows or columns are treated as one.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows: rows.max(1),
            columns: columns.max(1),
            spacing: 0.0,
        }
    }

    /// Gap between neighboring cells, in unscaled canvas units.
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing.max(0.0);
        self
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Cells available to children.
    pub fn capacity(&self) -> usize {
        self.rows * self.columns
    }

    /// Cell `index` of a grid laid over `content`, if it exists.
    pub fn cell(&self, content: Rect, index: usize) -> Option<Rect> {
        if index >= self.capacity() {
            return None;
        }
        let (row, column) = (index / self.columns, index % self.columns);
        let (rows, columns, row, column) =
            (self.rows as f64, self.columns as f64, row as f64, column as f64);
        let width = ((content.width() - self.spacing * (columns - 1.0)) / columns).max(0.0);
        let height = ((content.height() - self.spacing * (rows - 1.0)) / rows).max(0.0);
        let origin = Point::new(
            content.x0 + column * (width + self.spacing),
            content.y0 + row * (height + self.spacing),
        );
        Some(Rect::from_origin_size(origin, Size::new(width, height)))
    }
}

impl Widget for GridLayout {
    fn kind(&self) -> &'static str {
        "grid"
    }

    fn container(&self) -> ContainerKind {
        ContainerKind::List
    }

    fn child_area(&self, content: Rect, index: usize, _count: usize) -> Rect {
        self.cell(content, index)
            .unwrap_or_else(|| Rect::from_origin_size(content.origin(), Size::ZERO))
    }

    fn render(&self, cx: &RenderCx<'_>, renderer: &mut dyn Renderer) {
        cx.draw_frame(renderer);
    }
}

#[cfg(test)]
mod tests {
    use trellis_canvas::Canvas;

    use super::*;
    use crate::{Button, Plane};

    #[test]
    fn cells_fill_rows_first() {
        let mut canvas = Canvas::new(Size::new(300.0, 200.0), None);
        let grid = canvas.create(GridLayout::new(2, 3));
        canvas.add(grid);
        let cells: Vec<_> = (0..7).map(|_| canvas.create(Plane::new())).collect();
        for &cell in &cells {
            canvas.add_child(grid, cell);
        }
        canvas.update();

        assert_eq!(canvas.bounds(cells[0]), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert_eq!(canvas.bounds(cells[2]), Some(Rect::new(200.0, 0.0, 300.0, 100.0)));
        assert_eq!(canvas.bounds(cells[4]), Some(Rect::new(100.0, 100.0, 200.0, 200.0)));
        assert!(
            !canvas.is_rendered(cells[6]),
            "a child past the last cell has no area"
        );
        assert!(canvas.is_rendered(cells[5]));
    }

    #[test]
    fn spacing_between_cells() {
        let grid = GridLayout::new(1, 2).with_spacing(10.0);
        let content = Rect::new(0.0, 0.0, 110.0, 50.0);
        assert_eq!(grid.cell(content, 0), Some(Rect::new(0.0, 0.0, 50.0, 50.0)));
        assert_eq!(grid.cell(content, 1), Some(Rect::new(60.0, 0.0, 110.0, 50.0)));
        assert_eq!(grid.cell(content, 2), None);
    }

    #[test]
    fn click_reaches_the_right_cell() {
        let mut canvas = Canvas::new(Size::new(200.0, 100.0), None);
        let grid = canvas.create(GridLayout::new(1, 2));
        let left = canvas.create(Button::new("left"));
        let right = canvas.create(Button::new("right"));
        canvas.add(grid);
        canvas.add_child(grid, left);
        canvas.add_child(grid, right);
        canvas.update();
        assert_eq!(canvas.hit_test(Point::new(150.0, 50.0)), Some(right));
        assert_eq!(canvas.hit_test(Point::new(50.0, 50.0)), Some(left));
    }
}
