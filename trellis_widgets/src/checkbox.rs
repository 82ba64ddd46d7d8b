// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-state check box.

use kurbo::{Point, Rect, Size};
use trellis_canvas::{ControlCx, InputEvent, RenderCx, Renderer, Widget};

use crate::{is_primary_press, is_primary_release};

/// Callback run with the new state whenever a checkbox is toggled by the user.
pub type ToggleHandler = Box<dyn FnMut(&mut ControlCx<'_>, bool) + Send>;

/// A box that toggles between checked and unchecked on click, followed by a caption.
pub struct Checkbox {
    caption: String,
    checked: bool,
    armed: bool,
    on_change: Option<ToggleHandler>,
}

impl core::fmt::Debug for Checkbox {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Checkbox")
            .field("caption", &self.caption)
            .field("checked", &self.checked)
            .field("armed", &self.armed)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

impl Checkbox {
    /// An unchecked box with `caption`.
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            checked: false,
            armed: false,
            on_change: None,
        }
    }

    /// Start in the given state.
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Run `f` whenever a click toggles the box.
    pub fn on_change(mut self, f: impl FnMut(&mut ControlCx<'_>, bool) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    /// Whether the box is checked.
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Set the state without running the change callback.
    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    /// Caption text.
    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// The square part of the control: as tall as the content area, at its left edge.
    fn check_area(content: Rect) -> Rect {
        let side = content.height().min(content.width());
        Rect::from_origin_size(content.origin(), Size::new(side, side))
    }
}

impl Widget for Checkbox {
    fn kind(&self) -> &'static str {
        "checkbox"
    }

    fn measure(&mut self, cx: &mut ControlCx<'_>, available: Rect) -> Rect {
        let line = cx.layout_text(&self.caption);
        let side = line.line_height();
        let gap = if self.caption.is_empty() {
            0.0
        } else {
            cx.scale_value(4.0)
        };
        Rect::from_origin_size(
            available.origin(),
            Size::new(side + gap + line.width(), side),
        )
        .intersect(available)
    }

    fn render(&self, cx: &RenderCx<'_>, renderer: &mut dyn Renderer) {
        let content = cx.content_bounds();
        let style = cx.style();
        let square = Self::check_area(content);
        if let Some(bg) = style.background {
            renderer.draw_quad(square.origin(), square.size(), bg);
        }
        if let Some(border) = style.border_color {
            let width = cx.canvas().scale_value(style.border_width.max(1.0));
            renderer.draw_border(square, width, border);
        }
        if self.checked {
            let mark = square.inset(-square.width() * 0.25);
            renderer.draw_quad(mark.origin(), mark.size(), style.text_color);
        }
        if !self.caption.is_empty() {
            let line = cx.layout_text(&self.caption);
            let at = Point::new(
                square.x1 + cx.canvas().scale_value(4.0),
                content.y0 + ((content.height() - line.line_height()) * 0.5).max(0.0),
            );
            renderer.draw_text(at, &self.caption, cx.font_size(), style.text_color);
        }
    }

    fn handle_input(&mut self, cx: &mut ControlCx<'_>, event: &InputEvent) {
        if is_primary_press(cx, event) {
            self.armed = cx.is_hovered();
        } else if is_primary_release(cx, event) {
            let toggled = self.armed && cx.is_hovered();
            self.armed = false;
            if toggled {
                self.checked = !self.checked;
                tracing::trace!(id = ?cx.id(), checked = self.checked, "checkbox toggled");
                if let Some(on_change) = self.on_change.as_mut() {
                    on_change(cx, self.checked);
                }
            }
        }
    }

    fn on_active_change(&mut self, _cx: &mut ControlCx<'_>, active: bool) {
        if !active {
            self.armed = false;
        }
    }
}
