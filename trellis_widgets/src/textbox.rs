// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-line text entry.

use core::ops::Range;

use kurbo::{Point, Rect, Size};
use trellis_canvas::{
    Color, ControlCx, InputEvent, Key, Modifiers, RenderCx, Renderer, TextSequence, Widget,
};

use crate::{is_primary_press, is_primary_release};

/// Callback run with the new contents after every user edit.
pub type EditHandler = Box<dyn FnMut(&mut ControlCx<'_>, &str) + Send>;

const SELECTION: Color = Color::rgba(0x33, 0x99, 0xff, 0x60);

/// An editable line of text with a caret and a selection.
///
/// Positions are character indices. The selection runs between the anchor and the
/// caret; it is empty when they coincide.
///
/// Keyboard: typed characters replace the selection, Backspace and Delete remove the
/// selection or one character, Left, Right, Home and End move the caret and extend the
/// selection while Shift is held. Mouse: a primary press places the caret, dragging
/// extends the selection, and Shift-press extends from the current anchor. Losing focus
/// collapses the selection.
pub struct TextBox {
    text: String,
    caret: usize,
    anchor: Option<usize>,
    dragging: bool,
    /// Shift state as of the last routed event.
    shift: bool,
    line: TextSequence,
    dirty: bool,
    scroll: f64,
    on_change: Option<EditHandler>,
}

impl core::fmt::Debug for TextBox {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TextBox")
            .field("text", &self.text)
            .field("caret", &self.caret)
            .field("anchor", &self.anchor)
            .field("dragging", &self.dragging)
            .field("shift", &self.shift)
            .field("scroll", &self.scroll)
            .field("on_change", &self.on_change.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for TextBox {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBox {
    /// An empty text box.
    pub fn new() -> Self {
        Self {
            text: String::new(),
            caret: 0,
            anchor: None,
            dragging: false,
            shift: false,
            line: TextSequence::default(),
            dirty: true,
            scroll: 0.0,
            on_change: None,
        }
    }

    /// Start with `text`, caret at the end.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Run `f` after every user edit.
    pub fn on_change(mut self, f: impl FnMut(&mut ControlCx<'_>, &str) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    /// Current contents.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the contents, moving the caret to the end and clearing the selection.
    ///
    /// The change callback does not run.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.caret = self.char_count();
        self.anchor = None;
        self.dirty = true;
    }

    /// Caret position.
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Selected character range, if not empty.
    pub fn selection(&self) -> Option<Range<usize>> {
        let anchor = self.anchor?;
        (anchor != self.caret).then(|| anchor.min(self.caret)..anchor.max(self.caret))
    }

    /// The selected text; empty if nothing is selected.
    pub fn selected_text(&self) -> &str {
        self.selection()
            .map_or("", |r| &self.text[self.byte(r.start)..self.byte(r.end)])
    }

    /// Select everything, caret at the end.
    pub fn select_all(&mut self) {
        self.anchor = Some(0);
        self.caret = self.char_count();
    }

    /// The laid-out line as of the last layout.
    pub fn line(&self) -> &TextSequence {
        &self.line
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte(&self, index: usize) -> usize {
        self.text
            .char_indices()
            .nth(index)
            .map_or(self.text.len(), |(b, _)| b)
    }

    /// Remove the selection, if any, leaving the caret where it started.
    fn delete_selection(&mut self) -> bool {
        let Some(range) = self.selection() else {
            self.anchor = None;
            return false;
        };
        let bytes = self.byte(range.start)..self.byte(range.end);
        self.text.replace_range(bytes, "");
        self.caret = range.start;
        self.anchor = None;
        true
    }

    fn insert_char(&mut self, ch: char) {
        self.delete_selection();
        let at = self.byte(self.caret);
        self.text.insert(at, ch);
        self.caret += 1;
    }

    fn backspace(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        if self.caret == 0 {
            return false;
        }
        let at = self.byte(self.caret - 1);
        self.text.remove(at);
        self.caret -= 1;
        true
    }

    fn delete_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        if self.caret >= self.char_count() {
            return false;
        }
        let at = self.byte(self.caret);
        self.text.remove(at);
        true
    }

    /// Move the caret to `to`, extending the selection if `extend`.
    fn move_caret(&mut self, to: usize, extend: bool) {
        if extend {
            self.anchor.get_or_insert(self.caret);
        } else {
            self.anchor = None;
        }
        self.caret = to.min(self.char_count());
    }

    /// Horizontal caret motion: without Shift, a selection collapses to its edge first.
    fn step(&mut self, forward: bool, extend: bool) {
        if !extend && let Some(range) = self.selection() {
            let edge = if forward { range.end } else { range.start };
            self.move_caret(edge, false);
            return;
        }
        let to = if forward {
            self.caret + 1
        } else {
            self.caret.saturating_sub(1)
        };
        self.move_caret(to, extend);
    }

    fn relayout(&mut self, cx: &ControlCx<'_>) {
        self.line = cx.layout_text(&self.text);
        self.dirty = false;
        self.scroll_to_caret(cx.content_bounds().width());
    }

    fn scroll_to_caret(&mut self, width: f64) {
        let x = self.line.caret_x(self.caret);
        if x - self.scroll > width {
            self.scroll = x - width;
        }
        if x < self.scroll {
            self.scroll = x;
        }
        self.scroll = self.scroll.max(0.0);
    }

    fn index_at(&self, cx: &ControlCx<'_>, position: Point) -> usize {
        let content = cx.content_bounds();
        self.line.index_at(position.x - content.x0 + self.scroll)
    }

    fn key(&mut self, key: Key, shift: bool) -> bool {
        match key {
            Key::Backspace => return self.backspace(),
            Key::Delete => return self.delete_forward(),
            Key::Left => self.step(false, shift),
            Key::Right => self.step(true, shift),
            Key::Home => self.move_caret(0, shift),
            Key::End => self.move_caret(self.char_count(), shift),
            _ => {}
        }
        false
    }

    fn edited(&mut self, cx: &mut ControlCx<'_>) {
        self.relayout(cx);
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(cx, &self.text);
        }
    }
}

impl Widget for TextBox {
    fn kind(&self) -> &'static str {
        "textbox"
    }

    fn measure(&mut self, cx: &mut ControlCx<'_>, available: Rect) -> Rect {
        if self.dirty {
            self.line = cx.layout_text(&self.text);
            self.dirty = false;
        }
        let padding = cx.canvas().padding(cx.id()).unwrap_or_default();
        let height =
            self.line.line_height() + cx.scale_value(padding.y0) + cx.scale_value(padding.y1);
        Rect::from_origin_size(
            available.origin(),
            Size::new(available.width(), height.min(available.height())),
        )
    }

    fn render(&self, cx: &RenderCx<'_>, renderer: &mut dyn Renderer) {
        cx.draw_frame(renderer);
        let content = cx.content_bounds();
        let origin = Point::new(
            content.x0 - self.scroll,
            content.y0 + ((content.height() - self.line.line_height()) * 0.5).max(0.0),
        );
        renderer.push_mask(content);
        if let Some(range) = self.selection() {
            let x0 = self.line.caret_x(range.start);
            let x1 = self.line.caret_x(range.end);
            renderer.draw_quad(
                Point::new(origin.x + x0, origin.y),
                Size::new(x1 - x0, self.line.line_height()),
                SELECTION,
            );
        }
        if !self.text.is_empty() {
            renderer.draw_text(origin, &self.text, cx.font_size(), cx.style().text_color);
        }
        if cx.is_active() {
            let x = origin.x + self.line.caret_x(self.caret);
            renderer.draw_quad(
                Point::new(x, origin.y),
                Size::new(cx.canvas().scale_value(1.0), self.line.line_height()),
                cx.style().text_color,
            );
        }
        renderer.pop_mask();
    }

    fn handle_input(&mut self, cx: &mut ControlCx<'_>, event: &InputEvent) {
        if is_primary_press(cx, event) {
            if !cx.is_hovered() {
                return;
            }
            let Some(position) = event.position() else {
                return;
            };
            let index = self.index_at(cx, position);
            if self.shift {
                self.anchor = Some(self.anchor.unwrap_or(self.caret));
            } else {
                self.anchor = Some(index);
            }
            self.caret = index;
            self.dragging = true;
            self.scroll_to_caret(cx.content_bounds().width());
            return;
        }
        if is_primary_release(cx, event) {
            self.dragging = false;
            return;
        }
        match *event {
            InputEvent::MouseMove { position } | InputEvent::MouseHolding { position, .. }
                if self.dragging =>
            {
                self.caret = self.index_at(cx, position);
                self.scroll_to_caret(cx.content_bounds().width());
            }
            InputEvent::Texting { ch } if !ch.is_control() => {
                self.insert_char(ch);
                self.edited(cx);
            }
            InputEvent::KeyboardJustPressed { key: Key::Shift }
            | InputEvent::KeyboardPress { key: Key::Shift }
            | InputEvent::KeyboardHolding { key: Key::Shift } => self.shift = true,
            InputEvent::KeyboardRelease { key: Key::Shift } => self.shift = false,
            InputEvent::KeyboardPress { key } => {
                if self.key(key, self.shift) {
                    self.edited(cx);
                } else {
                    self.scroll_to_caret(cx.content_bounds().width());
                }
            }
            _ => {}
        }
    }

    fn on_active_change(&mut self, cx: &mut ControlCx<'_>, active: bool) {
        if active {
            self.shift = cx.modifiers().contains(Modifiers::SHIFT);
        } else {
            self.anchor = None;
            self.dragging = false;
            self.shift = false;
        }
    }

    fn on_resize(&mut self, cx: &mut ControlCx<'_>) {
        self.scroll_to_caret(cx.content_bounds().width());
    }

    fn on_dpi_change(&mut self, cx: &mut ControlCx<'_>, _scale: f64) {
        self.relayout(cx);
    }
}
