// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the grid: render levels and cell presence ranges.

/// Render level of a control. The root of a tree is level 0; deeper controls paint later.
pub type Level = u32;

/// Rectangular, inclusive range of grid cells occupied by a control.
///
/// A presence is always non-empty and always inside the grid extents at the time it
/// was computed. Controls without positive area, or entirely outside the grid, have
/// no presence at all (`Option<Presence>::None`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Presence {
    /// First occupied column.
    pub col0: usize,
    /// First occupied row.
    pub row0: usize,
    /// Last occupied column (inclusive).
    pub col1: usize,
    /// Last occupied row (inclusive).
    pub row1: usize,
}

impl Presence {
    /// Whether the cell at `(col, row)` is part of this presence.
    #[inline]
    pub fn contains(&self, col: usize, row: usize) -> bool {
        self.col0 <= col && col <= self.col1 && self.row0 <= row && row <= self.row1
    }

    /// Number of cells covered by this presence.
    #[inline]
    pub fn cell_count(&self) -> usize {
        (self.col1 - self.col0 + 1) * (self.row1 - self.row0 + 1)
    }

    /// Iterate `(col, row)` pairs covered by this presence, row-major.
    pub fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        (self.row0..=self.row1).flat_map(move |row| (self.col0..=self.col1).map(move |col| (col, row)))
    }
}
