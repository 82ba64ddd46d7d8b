// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The widget trait and the contexts widget code runs with.

use std::any::Any;
use std::sync::Arc;

use kurbo::{Rect, Size, Vec2};
use trellis_input::{InputEvent, Modifiers};

use crate::canvas::Canvas;
use crate::render::Renderer;
use crate::style::Style;
use crate::text::{FontFace, FontLibrary, TextSequence};
use crate::types::{ContainerKind, ControlId};

/// Behavior attached to a control.
///
/// The canvas owns structure, geometry and flags; a widget supplies layout, drawing and
/// reactions. Every hook runs with the widget taken out of the tree, so hooks may freely
/// mutate the canvas through their [`ControlCx`], including the control's own children.
#[allow(unused_variables, reason = "Default hook implementations ignore their arguments.")]
pub trait Widget: Any + Send {
    /// Style selector used when the control has no explicit class.
    fn kind(&self) -> &'static str;

    /// How many children this control can hold. Read once, when the control is created.
    fn container(&self) -> ContainerKind {
        ContainerKind::Leaf
    }

    /// Choose bounds within `available`. The default fills it.
    fn measure(&mut self, cx: &mut ControlCx<'_>, available: Rect) -> Rect {
        available
    }

    /// Rectangle offered to child `index` of `count`, given this control's content area.
    fn child_area(&self, content: Rect, index: usize, count: usize) -> Rect {
        content
    }

    /// Draw this control. Children are drawn separately, by level.
    fn render(&self, cx: &RenderCx<'_>, renderer: &mut dyn Renderer) {}

    /// Handle a routed input event.
    fn handle_input(&mut self, cx: &mut ControlCx<'_>, event: &InputEvent) {}

    /// Region that receives pointer input, given the control's bounds.
    fn select_bounds(&self, bounds: Rect) -> Rect {
        bounds
    }

    /// Bounds changed.
    fn on_resize(&mut self, cx: &mut ControlCx<'_>) {}

    /// The control became enabled.
    fn on_enable(&mut self, cx: &mut ControlCx<'_>) {}

    /// The control became disabled.
    fn on_disable(&mut self, cx: &mut ControlCx<'_>) {}

    /// Keyboard focus arrived (`true`) or left (`false`).
    fn on_active_change(&mut self, cx: &mut ControlCx<'_>, active: bool) {}

    /// The pointer entered (`true`) or left (`false`).
    fn on_hover_change(&mut self, cx: &mut ControlCx<'_>, hovered: bool) {}

    /// A child was attached.
    fn on_add_child(&mut self, cx: &mut ControlCx<'_>, child: ControlId) {}

    /// A child was detached.
    fn on_remove_child(&mut self, cx: &mut ControlCx<'_>, child: ControlId) {}

    /// A child's bounds changed. Only sent when the control is child-bounds aware.
    fn on_child_bounds_change(&mut self, cx: &mut ControlCx<'_>, child: ControlId) {}

    /// The canvas scale factor changed.
    fn on_dpi_change(&mut self, cx: &mut ControlCx<'_>, scale: f64) {}

    /// The extra update requested through [`ControlCx::request_update`] ran.
    fn on_forced_update(&mut self, cx: &mut ControlCx<'_>) {}
}

/// Mutable context for widget hooks.
#[derive(Debug)]
pub struct ControlCx<'a> {
    pub(crate) canvas: &'a mut Canvas,
    pub(crate) id: ControlId,
}

impl ControlCx<'_> {
    /// The control this hook runs for.
    pub fn id(&self) -> ControlId {
        self.id
    }

    /// The canvas, read-only.
    pub fn canvas(&self) -> &Canvas {
        self.canvas
    }

    /// The canvas, for structural changes.
    pub fn canvas_mut(&mut self) -> &mut Canvas {
        self.canvas
    }

    /// Current bounds.
    pub fn bounds(&self) -> Rect {
        self.canvas.bounds(self.id).unwrap_or(Rect::ZERO)
    }

    /// Bounds offered by the last layout.
    pub fn available_bounds(&self) -> Rect {
        self.canvas.available_bounds(self.id).unwrap_or(Rect::ZERO)
    }

    /// Bounds minus padding.
    pub fn content_bounds(&self) -> Rect {
        self.canvas.content_bounds(self.id).unwrap_or(Rect::ZERO)
    }

    /// Set this control's bounds. See [`Canvas::set_bounds`].
    pub fn set_bounds(&mut self, bounds: Rect) -> Rect {
        self.canvas.set_bounds(self.id, bounds).unwrap_or(bounds)
    }

    /// Children of this control.
    pub fn children(&self) -> &[ControlId] {
        self.canvas.children(self.id)
    }

    /// Resolved style.
    pub fn style(&self) -> &Style {
        self.canvas.control_style(self.id)
    }

    /// Canvas scale factor.
    pub fn scale(&self) -> f64 {
        self.canvas.scale()
    }

    /// Scale a length by the canvas scale, rounding up.
    pub fn scale_value(&self, v: f64) -> f64 {
        self.canvas.scale_value(v)
    }

    /// Scale a vector by the canvas scale, rounding up.
    pub fn scale_vec(&self, v: Vec2) -> Vec2 {
        self.canvas.scale_vec(v)
    }

    /// Font face for this control's style.
    pub fn face(&self) -> Arc<dyn FontFace> {
        self.canvas
            .fonts()
            .face_or_fallback(self.style().font_family.as_deref())
    }

    /// Scaled font size for this control's style.
    pub fn font_size(&self) -> f64 {
        self.scale_value(self.style().font_size)
    }

    /// Lay out `text` with this control's font.
    pub fn layout_text(&self, text: &str) -> TextSequence {
        TextSequence::layout(self.face().as_ref(), text, self.font_size())
    }

    /// Whether this control holds keyboard focus.
    pub fn is_active(&self) -> bool {
        self.canvas.active() == Some(self.id)
    }

    /// Whether the pointer is over this control.
    pub fn is_hovered(&self) -> bool {
        self.canvas.hovered() == Some(self.id)
    }

    /// Take keyboard focus.
    pub fn activate(&mut self) -> bool {
        self.canvas.set_active(Some(self.id))
    }

    /// Give up keyboard focus if held.
    pub fn deactivate(&mut self) -> bool {
        self.is_active() && self.canvas.set_active(None)
    }

    /// Modifier keys currently down.
    ///
    /// This is live queue state: releases still waiting to be routed in this frame are
    /// already applied.
    pub fn modifiers(&self) -> Modifiers {
        self.canvas.input().modifiers()
    }

    /// Ask for one extra layout pass of this control in the next update.
    pub fn request_update(&mut self) {
        self.canvas.force_update(self.id);
    }
}

/// Read-only context for [`Widget::render`].
#[derive(Debug)]
pub struct RenderCx<'a> {
    pub(crate) canvas: &'a Canvas,
    pub(crate) id: ControlId,
}

impl RenderCx<'_> {
    /// The control being drawn.
    pub fn id(&self) -> ControlId {
        self.id
    }

    /// The canvas.
    pub fn canvas(&self) -> &Canvas {
        self.canvas
    }

    /// Bounds of the control.
    pub fn bounds(&self) -> Rect {
        self.canvas.bounds(self.id).unwrap_or(Rect::ZERO)
    }

    /// Bounds minus padding.
    pub fn content_bounds(&self) -> Rect {
        self.canvas.content_bounds(self.id).unwrap_or(Rect::ZERO)
    }

    /// Resolved style.
    pub fn style(&self) -> &Style {
        self.canvas.control_style(self.id)
    }

    /// Fonts shared by the canvas.
    pub fn fonts(&self) -> &FontLibrary {
        self.canvas.fonts()
    }

    /// Font face for this control's style.
    pub fn face(&self) -> Arc<dyn FontFace> {
        self.fonts()
            .face_or_fallback(self.style().font_family.as_deref())
    }

    /// Scaled font size for this control's style.
    pub fn font_size(&self) -> f64 {
        self.canvas.scale_value(self.style().font_size)
    }

    /// Lay out `text` with this control's font.
    pub fn layout_text(&self, text: &str) -> TextSequence {
        TextSequence::layout(self.face().as_ref(), text, self.font_size())
    }

    /// Scale a size by the canvas scale, rounding up.
    pub fn scale_size(&self, size: Size) -> Size {
        let v = self.canvas.scale_vec(size.to_vec2());
        Size::new(v.x, v.y)
    }

    /// Whether this control holds keyboard focus.
    pub fn is_active(&self) -> bool {
        self.canvas.active() == Some(self.id)
    }

    /// Whether the pointer is over this control.
    pub fn is_hovered(&self) -> bool {
        self.canvas.hovered() == Some(self.id)
    }

    /// Whether this control is enabled.
    pub fn is_enabled(&self) -> bool {
        self.canvas.is_enabled(self.id)
    }

    /// Draw the style's background and border over the control's bounds.
    pub fn draw_frame(&self, renderer: &mut dyn Renderer) {
        let bounds = self.bounds();
        let style = self.style();
        if let Some(bg) = style.background {
            renderer.draw_quad(bounds.origin(), bounds.size(), bg);
        }
        if let Some(border) = style.border_color
            && style.border_width > 0.0
        {
            renderer.draw_border(bounds, self.canvas.scale_value(style.border_width), border);
        }
    }
}
