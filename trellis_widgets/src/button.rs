// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clickable button.

use trellis_canvas::{
    Color, ContainerKind, ControlCx, InputEvent, RenderCx, Renderer, Widget,
};

use crate::{centered, is_primary_press, is_primary_release};

/// Callback run when a button is clicked.
pub type ClickHandler = Box<dyn FnMut(&mut ControlCx<'_>) + Send>;

/// A push button.
///
/// A click is a primary press followed by a primary release while the pointer is still
/// over the button. The button may hold one child, such as a [`Label`](crate::Label);
/// otherwise it draws its own caption.
pub struct Button {
    caption: String,
    pressed: bool,
    hovered: bool,
    clicks: u64,
    on_click: Option<ClickHandler>,
}

impl core::fmt::Debug for Button {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Button")
            .field("caption", &self.caption)
            .field("pressed", &self.pressed)
            .field("hovered", &self.hovered)
            .field("clicks", &self.clicks)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

impl Button {
    /// A button drawing `caption`. Pass an empty caption when a child supplies the content.
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            pressed: false,
            hovered: false,
            clicks: 0,
            on_click: None,
        }
    }

    /// Run `f` on every click.
    pub fn on_click(mut self, f: impl FnMut(&mut ControlCx<'_>) + Send + 'static) -> Self {
        self.on_click = Some(Box::new(f));
        self
    }

    /// Caption text.
    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// Replace the caption.
    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    /// Whether the primary button went down on this button and has not been released.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Whether the pointer is over the button.
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Clicks so far.
    pub fn clicks(&self) -> u64 {
        self.clicks
    }

    fn fill(&self, base: Color) -> Color {
        match (self.pressed, self.hovered) {
            (true, _) => darken(base, 0x30),
            (false, true) => darken(base, 0x10),
            (false, false) => base,
        }
    }
}

fn darken(c: Color, by: u8) -> Color {
    Color::rgba(
        c.r.saturating_sub(by),
        c.g.saturating_sub(by),
        c.b.saturating_sub(by),
        c.a,
    )
}

impl Widget for Button {
    fn kind(&self) -> &'static str {
        "button"
    }

    fn container(&self) -> ContainerKind {
        ContainerKind::Single
    }

    fn render(&self, cx: &RenderCx<'_>, renderer: &mut dyn Renderer) {
        let bounds = cx.bounds();
        let style = cx.style();
        if let Some(bg) = style.background {
            renderer.draw_quad(bounds.origin(), bounds.size(), self.fill(bg));
        }
        if let Some(border) = style.border_color
            && style.border_width > 0.0
        {
            let width = cx.canvas().scale_value(style.border_width);
            renderer.draw_border(bounds, width, border);
        }
        if self.caption.is_empty() || !cx.canvas().children(cx.id()).is_empty() {
            return;
        }
        let line = cx.layout_text(&self.caption);
        renderer.draw_text(
            centered(cx.content_bounds(), &line),
            &self.caption,
            cx.font_size(),
            style.text_color,
        );
    }

    fn handle_input(&mut self, cx: &mut ControlCx<'_>, event: &InputEvent) {
        if is_primary_press(cx, event) {
            self.pressed = cx.is_hovered();
        } else if is_primary_release(cx, event) {
            let clicked = self.pressed && cx.is_hovered();
            self.pressed = false;
            if clicked {
                self.clicks += 1;
                tracing::trace!(id = ?cx.id(), caption = %self.caption, "button clicked");
                if let Some(on_click) = self.on_click.as_mut() {
                    on_click(cx);
                }
            }
        }
    }

    fn on_hover_change(&mut self, _cx: &mut ControlCx<'_>, hovered: bool) {
        self.hovered = hovered;
    }

    fn on_active_change(&mut self, _cx: &mut ControlCx<'_>, active: bool) {
        if !active {
            self.pressed = false;
        }
    }

    fn on_disable(&mut self, _cx: &mut ControlCx<'_>) {
        self.pressed = false;
    }
}
