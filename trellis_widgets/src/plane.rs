// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A plain container.

use trellis_canvas::{ContainerKind, RenderCx, Renderer, Widget};

/// A background surface holding any number of children.
///
/// Fills whatever it is offered and gives every child its full content area, so
/// children overlap unless they size themselves.
#[derive(Clone, Debug, Default)]
pub struct Plane;

impl Plane {
    /// A new plane.
    pub fn new() -> Self {
        Self
    }
}

impl Widget for Plane {
    fn kind(&self) -> &'static str {
        "plane"
    }

    fn container(&self) -> ContainerKind {
        ContainerKind::List
    }

    fn render(&self, cx: &RenderCx<'_>, renderer: &mut dyn Renderer) {
        cx.draw_frame(renderer);
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Rect, Size};
    use trellis_canvas::{
        Canvas, Color, DrawCommand, Link, RecordingRenderer, Style, StyleSheet,
    };

    use super::*;
    use crate::Button;

    #[test]
    fn fills_canvas_and_paints_background() {
        let mut sheet = StyleSheet::empty();
        sheet.insert(
            "plane",
            Style {
                background: Some(Color::rgb(1, 2, 3)),
                ..Style::default()
            },
        );
        let mut canvas = Canvas::new(Size::new(200.0, 100.0), Some(sheet));
        let plane = canvas.create(Plane::new());
        canvas.add(plane);
        canvas.update();
        assert_eq!(canvas.bounds(plane), Some(Rect::new(0.0, 0.0, 200.0, 100.0)));

        let mut renderer = RecordingRenderer::new();
        canvas.render(&mut renderer);
        assert!(renderer.commands.iter().any(|c| matches!(
            c,
            DrawCommand::Quad { color, .. } if *color == Color::rgb(1, 2, 3)
        )));
    }

    #[test]
    fn insert_at_index_sequence() {
        let mut canvas = Canvas::new(Size::new(800.0, 600.0), None);
        let list = canvas.create(Plane::new());
        canvas.add(list);
        let first = canvas.create(Button::new("first"));
        let second = canvas.create(Button::new("second"));
        let third = canvas.create(Button::new("third"));

        assert!(canvas.insert_child(list, 0, first));
        assert!(canvas.insert_child(list, 0, second));
        assert!(canvas.insert_child(list, 1, third));

        assert_eq!(
            canvas.children(list),
            &[second, third, first],
            "each insert shifts the children at and after its index"
        );
        for child in [first, second, third] {
            assert_eq!(canvas.link(child), Some(Link::Child(list)));
            assert_eq!(canvas.level(child), Some(2));
        }
    }
}
