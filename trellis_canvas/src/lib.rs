// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Canvas: a retained control tree with its update and render pipeline.
//!
//! A [`Canvas`] owns a tree of controls. Each control pairs canvas-side state (bounds,
//! padding, overflow, flags, level) with a [`Widget`] supplying layout, drawing and input
//! reactions. Once per frame the host calls:
//!
//! - [`Canvas::update`]: lays the tree out top-down, runs requested extra updates, then
//!   drains the input queue and routes each event (keyboard to the focused control, mouse
//!   through a grid-accelerated hit test);
//! - [`Canvas::render`]: draws every visible control through a [`Renderer`], by ascending
//!   level and, within a level, in attachment order. [`Canvas::render_viewport`] redraws
//!   just the controls over one region, found through the spatial grid.
//!
//! Levels encode depth: detached controls are at 0, top-level controls at 1, and every
//! child one below its parent. Attaching, moving or detaching a control re-levels its
//! whole subtree and moves it between render buckets as needed.
//!
//! Controls are addressed by generational [`ControlId`]s and released explicitly with
//! [`Canvas::destroy`]. Widget hooks run with the widget temporarily taken out of the
//! tree, after the canvas has finished its own bookkeeping, so a hook may restructure the
//! tree it is part of.
//!
//! [`spawn_window`] runs a canvas on its own thread with a frame-rate cap; the windowing
//! layer feeds it input through an [`InputHandle`].
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events: structural changes at `trace`, focus, bucket moves
//! and scale changes at `debug`, dropped input and font failures at `warn`.

mod buckets;
mod canvas;
mod config;
mod dispatch;
mod error;
mod geom;
mod handle;
mod layout;
mod render;
mod runner;
mod style;
mod text;
mod tree;
mod types;
mod widget;

pub use canvas::Canvas;
pub use config::CanvasConfig;
pub use error::{Error, Result};
pub use geom::RectExt;
pub use handle::InputHandle;
pub use render::{DrawCommand, RecordingRenderer, Renderer, TextureId};
pub use runner::{FrameLimiter, WindowHandle, spawn_window};
pub use style::{Color, Padding, Style, StyleSheet};
pub use text::{FontFace, FontLibrary, FontLoader, GlyphSpan, MonospaceFace, TextSequence};
pub use types::{ContainerKind, ControlFlags, ControlId, Link, Overflow};
pub use widget::{ControlCx, RenderCx, Widget};

pub use trellis_input::{InputEvent, Key, Modifiers, MouseButton};
