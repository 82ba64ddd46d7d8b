// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Grid: a uniform spatial grid over control bounds.
//!
//! Trellis Grid is the broad phase behind hit-testing and culled rendering in a Trellis canvas.
//!
//! - Lay a fixed-size cell grid over the canvas plane.
//! - Register control bounds with a render level; each control occupies the rectangular
//!   range of cells its bounds overlap (its *presence*), clipped to the grid extents.
//! - Query the single cell under a point to get candidates bucketed by level.
//! - Render the cells overlapping a viewport, drawing each control at most once per pass.
//!
//! It does not decide which candidate was actually hit: cells are coarser than the
//! geometry of individual controls, so callers run their own exact test over the
//! candidates returned by [`ControlGrid::query`].
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Point, Rect, Size};
//! use trellis_grid::ControlGrid;
//!
//! let mut grid: ControlGrid<u32> = ControlGrid::with_extent(64.0, Size::new(800.0, 600.0));
//! grid.set_control_bounds(1, Rect::new(10.0, 10.0, 200.0, 40.0), 1);
//! grid.set_control_bounds(2, Rect::new(20.0, 20.0, 60.0, 30.0), 2);
//!
//! let candidates: Vec<_> = grid.query(Point::new(25.0, 25.0)).collect();
//! assert_eq!(candidates, vec![(1, 1), (2, 2)]);
//!
//! let mut drawn = Vec::new();
//! grid.render(Rect::new(0.0, 0.0, 800.0, 600.0), |_, key| drawn.push(key));
//! assert_eq!(drawn.len(), 2);
//! ```
//!
//! ## Growth policy
//!
//! [`ControlGrid::resize`] only grows the grid. Shrinking the canvas keeps the cells
//! allocated for the largest extent seen so far; controls outside the canvas simply stop
//! being visited by viewport-bounded passes.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod grid;
mod types;
mod util;

pub use grid::ControlGrid;
pub use types::{Level, Presence};
