// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Widgets: stock controls for a [`Canvas`](trellis_canvas::Canvas).
//!
//! Every control here is a plain [`Widget`](trellis_canvas::Widget); create one with
//! [`Canvas::create`](trellis_canvas::Canvas::create) and attach it like any other
//! control. Styles are looked up under each widget's kind:
//!
//! | Widget          | Kind        | Children       |
//! |-----------------|-------------|----------------|
//! | [`Plane`]       | `plane`     | any number     |
//! | [`Label`]       | `label`     | none           |
//! | [`Button`]      | `button`    | at most one    |
//! | [`Checkbox`]    | `checkbox`  | none           |
//! | [`TextBox`]     | `textbox`   | none           |
//! | [`GridLayout`]  | `grid`      | any number     |
//! | [`TabWindow`]   | `tab`       | one per page   |
//!
//! Callbacks receive the control's [`ControlCx`](trellis_canvas::ControlCx), so they can
//! restructure the canvas directly.

mod button;
mod checkbox;
mod grid_layout;
mod label;
mod plane;
mod tab_window;
mod textbox;

pub use button::{Button, ClickHandler};
pub use checkbox::{Checkbox, ToggleHandler};
pub use grid_layout::GridLayout;
pub use label::Label;
pub use plane::Plane;
pub use tab_window::{SelectHandler, TabWindow};
pub use textbox::{EditHandler, TextBox};

use kurbo::{Point, Rect};
use trellis_canvas::{ControlCx, InputEvent, TextSequence};

/// Whether `event` is a release of the canvas's primary button.
fn is_primary_release(cx: &ControlCx<'_>, event: &InputEvent) -> bool {
    matches!(*event, InputEvent::MouseRelease { button, .. }
        if button == cx.canvas().config().primary_button)
}

/// Whether `event` is the first press of the canvas's primary button.
fn is_primary_press(cx: &ControlCx<'_>, event: &InputEvent) -> bool {
    matches!(*event, InputEvent::MouseJustPressed { button, .. }
        if button == cx.canvas().config().primary_button)
}

/// Top-left corner that centers `text` inside `area`.
fn centered(area: Rect, text: &TextSequence) -> Point {
    Point::new(
        area.x0 + ((area.width() - text.width()) * 0.5).max(0.0),
        area.y0 + ((area.height() - text.line_height()) * 0.5).max(0.0),
    )
}
