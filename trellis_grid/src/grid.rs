// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform control grid.
//!
//! The grid buckets control bounds into fixed-size cells laid over the canvas plane
//! and answers queries by touching only the cells overlapping the query primitive.
//! Inside a cell, controls are grouped by render level so that candidates come out
//! back-to-front.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;
use kurbo::{Point, Rect, Size};
use smallvec::SmallVec;

use crate::types::{Level, Presence};
use crate::util::{ceil_cell, cells_for_extent, floor_cell};

/// Spatial broad-phase index over control bounds.
///
/// `K` is the control handle stored in the cells; it must be a small copyable key.
///
/// The grid covers the rectangle `(0, 0)..(columns * cell_size, rows * cell_size)`.
/// It only grows: [`ControlGrid::resize`] never drops rows or columns, so a canvas
/// that shrinks keeps its historical maximum grid.
pub struct ControlGrid<K> {
    cell_size: f64,
    columns: usize,
    rows: usize,
    /// Row-major cells, `rows * columns` long.
    cells: Vec<Cell<K>>,
    entries: HashMap<K, Entry>,
    /// Global render stage, bumped once per [`ControlGrid::render`] pass.
    stage: u64,
}

#[derive(Clone, Debug)]
struct Entry {
    bounds: Rect,
    presence: Option<Presence>,
    level: Level,
    // Stage of the last render pass that drew this control.
    stage: u64,
}

struct Cell<K> {
    levels: BTreeMap<Level, SmallVec<[K; 4]>>,
}

impl<K> Default for Cell<K> {
    fn default() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }
}

impl<K> Debug for ControlGrid<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let occupied = self.cells.iter().filter(|c| !c.levels.is_empty()).count();
        f.debug_struct("ControlGrid")
            .field("cell_size", &self.cell_size)
            .field("columns", &self.columns)
            .field("rows", &self.rows)
            .field("occupied_cells", &occupied)
            .field("controls", &self.entries.len())
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq + Hash> ControlGrid<K> {
    /// Create an empty grid (no cells) with the given cell size.
    pub fn new(cell_size: f64) -> Self {
        debug_assert!(cell_size > 0.0, "cell_size must be strictly positive");
        Self {
            cell_size,
            columns: 0,
            rows: 0,
            cells: Vec::new(),
            entries: HashMap::new(),
            stage: 0,
        }
    }

    /// Create a grid with the given cell size, already covering `extent`.
    pub fn with_extent(cell_size: f64, extent: Size) -> Self {
        let mut grid = Self::new(cell_size);
        grid.resize(extent);
        grid
    }

    /// Cell size in canvas units.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of cell columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of cell rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of controls with metadata in the grid (with or without presence).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the grid tracks no controls.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `key` is tracked by the grid.
    pub fn contains(&self, key: K) -> bool {
        self.entries.contains_key(&key)
    }

    /// The cell range currently occupied by `key`, if it has any.
    pub fn presence(&self, key: K) -> Option<Presence> {
        self.entries.get(&key).and_then(|e| e.presence)
    }

    /// The bounds last stored for `key`.
    pub fn bounds(&self, key: K) -> Option<Rect> {
        self.entries.get(&key).map(|e| e.bounds)
    }

    /// The level last stored for `key`.
    pub fn level(&self, key: K) -> Option<Level> {
        self.entries.get(&key).map(|e| e.level)
    }

    /// Grow the grid so it covers `extent`.
    ///
    /// Existing cell contents are preserved. Controls whose bounds were clipped by the
    /// old extents are re-inserted so that their presence covers the newly added cells.
    /// Returns `true` if the grid grew.
    pub fn resize(&mut self, extent: Size) -> bool {
        let columns = cells_for_extent(extent.width, self.cell_size).max(self.columns);
        let rows = cells_for_extent(extent.height, self.cell_size).max(self.rows);
        if columns == self.columns && rows == self.rows {
            return false;
        }

        let mut cells: Vec<Cell<K>> = Vec::with_capacity(columns * rows);
        cells.resize_with(columns * rows, Cell::default);
        let old_columns = self.columns;
        for (i, cell) in core::mem::take(&mut self.cells).into_iter().enumerate() {
            let (col, row) = (i % old_columns, i / old_columns);
            cells[row * columns + col] = cell;
        }
        self.cells = cells;
        self.columns = columns;
        self.rows = rows;

        // Presence was clipped to the old extents; recompute for controls that may now
        // reach into the new cells.
        let stale: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, e)| self.compute_presence(e.bounds) != e.presence)
            .map(|(k, _)| *k)
            .collect();
        for key in stale {
            self.relocate(key);
        }
        true
    }

    /// Store `bounds` and `level` for `key`, updating its cell membership.
    ///
    /// New controls are inserted into every cell of their presence. For known controls,
    /// unchanged bounds and level are a no-op; otherwise the control is fully removed
    /// from its old cells before being inserted at the new presence.
    ///
    /// Returns `true` if anything changed.
    pub fn set_control_bounds(&mut self, key: K, bounds: Rect, level: Level) -> bool {
        if let Some(entry) = self.entries.get(&key) {
            if entry.bounds == bounds && entry.level == level {
                return false;
            }
            let (presence, old_level) = (entry.presence, entry.level);
            self.remove_from_cells(key, presence, old_level);
        }

        let presence = self.compute_presence(bounds);
        self.insert_into_cells(key, presence, level);
        let stage = self.entries.get(&key).map_or(0, |e| e.stage);
        self.entries.insert(
            key,
            Entry {
                bounds,
                presence,
                level,
                stage,
            },
        );
        true
    }

    /// Change the stored level of `key` without touching its bounds.
    ///
    /// Returns `false` if the key is unknown or already at `level`.
    pub fn set_control_level(&mut self, key: K, level: Level) -> bool {
        let Some(bounds) = self.entries.get(&key).map(|e| e.bounds) else {
            return false;
        };
        self.set_control_bounds(key, bounds, level)
    }

    /// Remove `key` from every occupied cell and drop its metadata.
    ///
    /// Returns `true` if the key was tracked.
    pub fn remove_control(&mut self, key: K) -> bool {
        let Some(entry) = self.entries.remove(&key) else {
            return false;
        };
        self.remove_from_cells(key, entry.presence, entry.level);
        true
    }

    /// Drop every control; the grid keeps its size.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.levels.clear();
        }
        self.entries.clear();
    }

    /// Candidates registered in the single cell containing `point`, ascending by level.
    ///
    /// This is a broad-phase answer: a control whose bounds only partly cover the cell is
    /// returned even if `point` is outside those bounds. Callers apply their own exact test.
    /// Points outside the grid yield nothing.
    pub fn query(&self, point: Point) -> impl Iterator<Item = (Level, K)> + '_ {
        self.cell_at(point)
            .into_iter()
            .flat_map(|cell| cell.levels.iter())
            .flat_map(|(level, keys)| keys.iter().map(move |k| (*level, *k)))
    }

    /// Invoke `draw` once for every control present in the cells overlapping `viewport`.
    ///
    /// A control spanning several visited cells is drawn exactly once per pass: each pass
    /// bumps the global stage, and a control is drawn only while its stored stage lags
    /// behind it, after which its stage is caught up. Within a cell, controls are visited
    /// by ascending level.
    pub fn render<F: FnMut(Level, K)>(&mut self, viewport: Rect, mut draw: F) {
        self.stage = self.stage.wrapping_add(1);
        let Some(range) = self.compute_presence(viewport) else {
            return;
        };
        let stage = self.stage;
        let Self {
            cells,
            entries,
            columns,
            ..
        } = self;
        for (col, row) in range.cells() {
            for (level, keys) in &cells[row * *columns + col].levels {
                for key in keys {
                    let Some(entry) = entries.get_mut(key) else {
                        unreachable!("grid cell references an unknown control");
                    };
                    if entry.stage != stage {
                        entry.stage = stage;
                        draw(*level, *key);
                    }
                }
            }
        }
    }

    // --- internals ---

    fn cell_at(&self, point: Point) -> Option<&Cell<K>> {
        let col = usize::try_from(floor_cell(point.x, self.cell_size)).ok()?;
        let row = usize::try_from(floor_cell(point.y, self.cell_size)).ok()?;
        if col >= self.columns || row >= self.rows {
            return None;
        }
        self.cells.get(row * self.columns + col)
    }

    /// Cell range overlapped by `bounds`, clipped to the grid extents.
    ///
    /// Bounds are treated as half-open: a rectangle ending exactly on a cell edge does not
    /// occupy the next cell.
    fn compute_presence(&self, bounds: Rect) -> Option<Presence> {
        if !(bounds.width() > 0.0 && bounds.height() > 0.0) || self.columns == 0 || self.rows == 0
        {
            return None;
        }
        let (col0, col1) = clip_span(
            floor_cell(bounds.x0, self.cell_size),
            ceil_cell(bounds.x1, self.cell_size).saturating_sub(1),
            self.columns,
        )?;
        let (row0, row1) = clip_span(
            floor_cell(bounds.y0, self.cell_size),
            ceil_cell(bounds.y1, self.cell_size).saturating_sub(1),
            self.rows,
        )?;
        Some(Presence {
            col0,
            row0,
            col1,
            row1,
        })
    }

    fn insert_into_cells(&mut self, key: K, presence: Option<Presence>, level: Level) {
        let Some(presence) = presence else {
            return;
        };
        for (col, row) in presence.cells() {
            self.cells[row * self.columns + col]
                .levels
                .entry(level)
                .or_default()
                .push(key);
        }
    }

    fn remove_from_cells(&mut self, key: K, presence: Option<Presence>, level: Level) {
        let Some(presence) = presence else {
            return;
        };
        for (col, row) in presence.cells() {
            let cell = &mut self.cells[row * self.columns + col];
            let keys = cell
                .levels
                .get_mut(&level)
                .expect("grid invariant violated: missing level bucket while removing control");
            let pos = keys
                .iter()
                .position(|k| *k == key)
                .expect("grid invariant violated: control not found in expected cell");
            keys.remove(pos);
            if keys.is_empty() {
                cell.levels.remove(&level);
            }
        }
    }

    fn relocate(&mut self, key: K) {
        let Some(entry) = self.entries.get(&key).cloned() else {
            return;
        };
        self.remove_from_cells(key, entry.presence, entry.level);
        let presence = self.compute_presence(entry.bounds);
        self.insert_into_cells(key, presence, entry.level);
        if let Some(e) = self.entries.get_mut(&key) {
            e.presence = presence;
        }
    }
}

/// Clip an inclusive cell span `[c0, c1]` to `[0, count)`.
#[allow(
    clippy::cast_sign_loss,
    reason = "Both ends are clamped to be non-negative before the cast."
)]
fn clip_span(c0: i32, c1: i32, count: usize) -> Option<(usize, usize)> {
    let last = i32::try_from(count).unwrap_or(i32::MAX).saturating_sub(1);
    if c1 < 0 || c0 > last || c0 > c1 {
        return None;
    }
    Some((c0.max(0) as usize, c1.min(last) as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn grid() -> ControlGrid<u32> {
        ControlGrid::with_extent(10.0, Size::new(100.0, 100.0))
    }

    fn hits(grid: &ControlGrid<u32>, x: f64, y: f64) -> Vec<u32> {
        grid.query(Point::new(x, y)).map(|(_, k)| k).collect()
    }

    #[test]
    fn presence_round_trip() {
        let mut g = grid();
        assert!(g.set_control_bounds(1, Rect::new(5.0, 5.0, 35.0, 25.0), 1));
        assert_eq!(
            g.presence(1),
            Some(Presence {
                col0: 0,
                row0: 0,
                col1: 3,
                row1: 2,
            })
        );

        for (x, y) in [(5.0, 5.0), (34.9, 24.9), (20.0, 12.0)] {
            assert_eq!(hits(&g, x, y), vec![1], "point ({x}, {y}) is inside");
        }
        // Outside the presence range.
        assert!(hits(&g, 45.0, 5.0).is_empty());
        assert!(hits(&g, 5.0, 35.0).is_empty());

        assert!(g.remove_control(1));
        assert!(hits(&g, 20.0, 12.0).is_empty());
        assert!(!g.contains(1));
        assert!(!g.remove_control(1), "second remove is a miss");
    }

    #[test]
    fn moving_leaves_no_stale_cells() {
        let mut g = grid();
        g.set_control_bounds(7, Rect::new(0.0, 0.0, 20.0, 20.0), 1);
        g.set_control_bounds(7, Rect::new(50.0, 50.0, 60.0, 60.0), 1);
        assert!(hits(&g, 5.0, 5.0).is_empty());
        assert!(hits(&g, 15.0, 15.0).is_empty());
        assert_eq!(hits(&g, 55.0, 55.0), vec![7]);
    }

    #[test]
    fn unchanged_bounds_are_noop() {
        let mut g = grid();
        let r = Rect::new(0.0, 0.0, 20.0, 20.0);
        assert!(g.set_control_bounds(1, r, 2));
        assert!(!g.set_control_bounds(1, r, 2));
        assert_eq!(hits(&g, 5.0, 5.0), vec![1], "no duplicate membership");
    }

    #[test]
    fn non_positive_area_has_no_presence() {
        let mut g = grid();
        g.set_control_bounds(1, Rect::new(10.0, 10.0, 10.0, 50.0), 1);
        g.set_control_bounds(2, Rect::new(10.0, 10.0, 50.0, 5.0), 1);
        assert!(g.contains(1));
        assert_eq!(g.presence(1), None);
        assert_eq!(g.presence(2), None);
        assert!(hits(&g, 10.0, 10.0).is_empty());
    }

    #[test]
    fn presence_is_clamped_to_grid() {
        let mut g = grid();
        g.set_control_bounds(1, Rect::new(-50.0, 90.0, 15.0, 500.0), 1);
        assert_eq!(
            g.presence(1),
            Some(Presence {
                col0: 0,
                row0: 9,
                col1: 1,
                row1: 9,
            })
        );
        g.set_control_bounds(2, Rect::new(200.0, 200.0, 300.0, 300.0), 1);
        assert_eq!(g.presence(2), None, "fully outside the grid");
        assert!(hits(&g, -5.0, 95.0).is_empty(), "out-of-grid point");
        assert!(hits(&g, 150.0, 95.0).is_empty(), "out-of-grid point");
    }

    #[test]
    fn query_is_ascending_by_level() {
        let mut g = grid();
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        g.set_control_bounds(3, r, 3);
        g.set_control_bounds(1, r, 1);
        g.set_control_bounds(2, r, 1);
        let found: Vec<_> = g.query(Point::new(1.0, 1.0)).collect();
        assert_eq!(found, vec![(1, 1), (1, 2), (3, 3)]);

        assert!(g.set_control_level(3, 0));
        let found: Vec<_> = g.query(Point::new(1.0, 1.0)).collect();
        assert_eq!(found, vec![(0, 3), (1, 1), (1, 2)]);
    }

    #[test]
    fn render_draws_multi_cell_controls_once() {
        let mut g = grid();
        // Spans 6 x 6 cells.
        g.set_control_bounds(1, Rect::new(2.0, 2.0, 58.0, 58.0), 1);
        g.set_control_bounds(2, Rect::new(70.0, 70.0, 80.0, 80.0), 2);

        for _ in 0..3 {
            let mut drawn = Vec::new();
            g.render(Rect::new(0.0, 0.0, 100.0, 100.0), |level, key| {
                drawn.push((level, key));
            });
            drawn.sort_unstable();
            assert_eq!(drawn, vec![(1, 1), (2, 2)], "each control drawn once per pass");
        }
    }

    #[test]
    fn render_only_visits_viewport_cells() {
        let mut g = grid();
        g.set_control_bounds(1, Rect::new(0.0, 0.0, 10.0, 10.0), 1);
        g.set_control_bounds(2, Rect::new(80.0, 80.0, 90.0, 90.0), 1);
        let mut drawn = Vec::new();
        g.render(Rect::new(0.0, 0.0, 40.0, 40.0), |_, key| drawn.push(key));
        assert_eq!(drawn, vec![1]);

        // A control skipped in one pass is drawn in the next pass that reaches it.
        drawn.clear();
        g.render(Rect::new(60.0, 60.0, 100.0, 100.0), |_, key| drawn.push(key));
        assert_eq!(drawn, vec![2]);
    }

    #[test]
    fn resize_only_grows_and_extends_presence() {
        let mut g: ControlGrid<u32> = ControlGrid::with_extent(10.0, Size::new(50.0, 50.0));
        g.set_control_bounds(1, Rect::new(40.0, 0.0, 80.0, 10.0), 1);
        g.set_control_bounds(2, Rect::new(0.0, 0.0, 10.0, 10.0), 1);
        assert_eq!(g.presence(1).map(|p| p.col1), Some(4));

        assert!(g.resize(Size::new(100.0, 60.0)));
        assert_eq!((g.columns(), g.rows()), (10, 6));
        assert_eq!(g.presence(1).map(|p| p.col1), Some(7), "presence extended");
        assert_eq!(hits(&g, 75.0, 5.0), vec![1]);
        assert_eq!(hits(&g, 5.0, 5.0), vec![2], "existing cells preserved");

        assert!(!g.resize(Size::new(20.0, 20.0)), "never shrinks");
        assert_eq!((g.columns(), g.rows()), (10, 6));
    }
}
