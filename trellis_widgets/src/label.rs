// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static text.

use kurbo::{Rect, Size};
use trellis_canvas::{ControlCx, RectExt, RenderCx, Renderer, Widget};

/// A line of text, sized to fit it.
///
/// Labels never take pointer input: their select bounds are empty, so clicks fall
/// through to whatever lies underneath, typically the button they sit in.
#[derive(Clone, Debug, Default)]
pub struct Label {
    text: String,
}

impl Label {
    /// A label showing `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The text shown.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text. Takes effect at the next layout.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl Widget for Label {
    fn kind(&self) -> &'static str {
        "label"
    }

    fn measure(&mut self, cx: &mut ControlCx<'_>, available: Rect) -> Rect {
        let line = cx.layout_text(&self.text);
        let padding = cx.canvas().padding(cx.id()).unwrap_or_default();
        let size = Size::new(
            line.width() + cx.scale_value(padding.x0) + cx.scale_value(padding.x1),
            line.line_height() + cx.scale_value(padding.y0) + cx.scale_value(padding.y1),
        );
        Rect::from_origin_size(available.origin(), size)
            .intersect(available)
            .clamp_non_negative()
    }

    fn render(&self, cx: &RenderCx<'_>, renderer: &mut dyn Renderer) {
        cx.draw_frame(renderer);
        if self.text.is_empty() {
            return;
        }
        let content = cx.content_bounds();
        renderer.draw_text(
            content.origin(),
            &self.text,
            cx.font_size(),
            cx.style().text_color,
        );
    }

    fn select_bounds(&self, _bounds: Rect) -> Rect {
        Rect::ZERO
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size};
    use trellis_canvas::{Canvas, RecordingRenderer};

    use super::*;
    use crate::Plane;

    #[test]
    fn sized_to_text() {
        let mut canvas = Canvas::new(Size::new(400.0, 300.0), None);
        let plane = canvas.create(Plane::new());
        let label = canvas.create(Label::new("hello"));
        canvas.add(plane);
        canvas.add_child(plane, label);
        canvas.update();

        // Default monospace face: 0.6 em advance, 1.2 em line at 14px.
        let bounds = canvas.bounds(label).unwrap();
        assert_eq!(bounds.origin(), Point::ZERO);
        assert!((bounds.width() - 5.0 * 0.6 * 14.0).abs() < 1e-9);
        assert!((bounds.height() - 1.2 * 14.0).abs() < 1e-9);

        let mut renderer = RecordingRenderer::new();
        canvas.render(&mut renderer);
        assert_eq!(renderer.texts().collect::<Vec<_>>(), ["hello"]);
    }

    #[test]
    fn clamped_to_available_space() {
        let mut canvas = Canvas::new(Size::new(20.0, 10.0), None);
        let label = canvas.create(Label::new("much too long for the canvas"));
        canvas.add(label);
        canvas.update();
        assert_eq!(canvas.bounds(label), Some(Rect::new(0.0, 0.0, 20.0, 10.0)));
    }

    #[test]
    fn pointer_passes_through() {
        let mut canvas = Canvas::new(Size::new(400.0, 300.0), None);
        let plane = canvas.create(Plane::new());
        let label = canvas.create(Label::new("hello"));
        canvas.add(plane);
        canvas.add_child(plane, label);
        canvas.update();
        assert_eq!(canvas.hit_test(Point::new(2.0, 2.0)), Some(plane));
    }
}
