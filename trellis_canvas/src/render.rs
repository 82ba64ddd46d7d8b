// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawing interface canvases render through.

use kurbo::{Point, Rect, Size};

use crate::style::Color;

/// Handle to a texture created by a [`Renderer`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Drawing backend.
///
/// The canvas and its widgets only ever draw through this trait; GPU resources and
/// windowing belong to the implementation.
pub trait Renderer {
    /// Fill an axis-aligned rectangle.
    fn draw_quad(&mut self, position: Point, size: Size, color: Color);

    /// Stroke the inside edge of `rect`.
    fn draw_border(&mut self, rect: Rect, width: f64, color: Color);

    /// Draw a single line of text with its top-left corner at `position`.
    fn draw_text(&mut self, position: Point, text: &str, font_size: f64, color: Color);

    /// Restrict subsequent drawing to `rect` (intersected with any enclosing mask).
    fn push_mask(&mut self, rect: Rect);

    /// Undo the most recent [`Renderer::push_mask`].
    fn pop_mask(&mut self);

    /// Allocate a texture of `size`.
    fn create_texture(&mut self, size: Size) -> TextureId;
}

/// A recorded [`Renderer`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// [`Renderer::draw_quad`].
    Quad {
        /// Top-left corner.
        position: Point,
        /// Extent.
        size: Size,
        /// Fill.
        color: Color,
    },
    /// [`Renderer::draw_border`].
    Border {
        /// Outer edge.
        rect: Rect,
        /// Stroke width.
        width: f64,
        /// Stroke color.
        color: Color,
    },
    /// [`Renderer::draw_text`].
    Text {
        /// Top-left corner.
        position: Point,
        /// Text content.
        text: String,
        /// Font size.
        font_size: f64,
        /// Text color.
        color: Color,
    },
    /// [`Renderer::push_mask`].
    PushMask(Rect),
    /// [`Renderer::pop_mask`].
    PopMask,
}

/// A renderer that records every call, for tests and headless runs.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    /// Commands in call order.
    pub commands: Vec<DrawCommand>,
    textures: Vec<Size>,
    depth: usize,
}

impl RecordingRenderer {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget recorded commands; textures survive.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Text strings drawn so far, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Size of a created texture.
    pub fn texture_size(&self, id: TextureId) -> Option<Size> {
        self.textures.get(id.0 as usize).copied()
    }

    /// Current mask nesting depth.
    pub fn mask_depth(&self) -> usize {
        self.depth
    }
}

impl Renderer for RecordingRenderer {
    fn draw_quad(&mut self, position: Point, size: Size, color: Color) {
        self.commands.push(DrawCommand::Quad {
            position,
            size,
            color,
        });
    }

    fn draw_border(&mut self, rect: Rect, width: f64, color: Color) {
        self.commands
            .push(DrawCommand::Border { rect, width, color });
    }

    fn draw_text(&mut self, position: Point, text: &str, font_size: f64, color: Color) {
        self.commands.push(DrawCommand::Text {
            position,
            text: text.to_owned(),
            font_size,
            color,
        });
    }

    fn push_mask(&mut self, rect: Rect) {
        self.depth += 1;
        self.commands.push(DrawCommand::PushMask(rect));
    }

    fn pop_mask(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.commands.push(DrawCommand::PopMask);
    }

    fn create_texture(&mut self, size: Size) -> TextureId {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Texture handles are 32-bit."
        )]
        let id = TextureId(self.textures.len() as u32);
        self.textures.push(size);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let mut r = RecordingRenderer::new();
        r.push_mask(Rect::new(0.0, 0.0, 5.0, 5.0));
        r.draw_text(Point::ZERO, "hi", 12.0, Color::BLACK);
        assert_eq!(r.mask_depth(), 1);
        r.pop_mask();
        assert_eq!(r.mask_depth(), 0);
        assert_eq!(r.commands.len(), 3);
        assert_eq!(r.texts().collect::<Vec<_>>(), ["hi"]);
    }

    #[test]
    fn textures_get_distinct_ids() {
        let mut r = RecordingRenderer::new();
        let a = r.create_texture(Size::new(4.0, 4.0));
        let b = r.create_texture(Size::new(8.0, 2.0));
        assert_ne!(a, b);
        assert_eq!(r.texture_size(b), Some(Size::new(8.0, 2.0)));
    }
}
