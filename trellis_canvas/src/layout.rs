// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout and render registration.
//!
//! Layout runs top-down: each control measures itself inside the rectangle its parent
//! offers, then offers its children slices of its content area (bounds minus padding).
//! Hidden overflow clips descendants to the content area; expanding overflow grows the
//! container around its children afterwards.
//!
//! A control is registered for drawing and hit testing while it is attached to the
//! canvas, visible along its whole parent chain, and its clipped bounds overlap the
//! canvas rectangle.

use kurbo::Rect;

use crate::buckets::Placement;
use crate::canvas::Canvas;
use crate::geom::RectExt;
use crate::types::{ControlFlags, ControlId, Link, Overflow};

impl Canvas {
    /// Set the bounds of `id`.
    ///
    /// Inverted rectangles are collapsed to zero extent. When the bounds change, the grid
    /// and render buckets are updated, `on_resize` runs (unless this call comes from inside
    /// a resize of the same control, in which case the new bounds are stored but the hook
    /// is not run again) and a child-bounds-aware parent is told. Returns the stored bounds,
    /// or `None` for unknown ids.
    pub fn set_bounds(&mut self, id: ControlId, bounds: Rect) -> Option<Rect> {
        let bounds = bounds.clamp_non_negative();
        let node = self.node_opt_mut(id)?;
        if node.bounds == bounds {
            return Some(bounds);
        }
        node.bounds = bounds;
        let link = node.link;
        let resizing = node.flags.contains(ControlFlags::RESIZING);
        if !resizing {
            node.flags.insert(ControlFlags::RESIZING);
            node.available = bounds;
        }
        self.update_control_rendering(id);

        if !resizing {
            self.with_widget(id, |w, cx| w.on_resize(cx));
            if let Some(node) = self.node_opt_mut(id) {
                node.flags.remove(ControlFlags::RESIZING);
            }
        }
        if let Link::Child(parent) = link
            && self
                .flags(parent)
                .is_some_and(|f| f.contains(ControlFlags::CHILD_BOUNDS_AWARE))
        {
            self.with_widget(parent, |w, cx| w.on_child_bounds_change(cx, id));
        }
        self.bounds(id)
    }

    /// Lay out `id` inside `available`, then its subtree.
    pub(crate) fn layout_control(&mut self, id: ControlId, available: Rect, clip: Option<Rect>) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        let clip_changed = node.clip != clip;
        node.clip = clip;

        let measured = self
            .with_widget(id, |w, cx| w.measure(cx, available))
            .unwrap_or(available);
        let Some(bounds) = self.set_bounds(id, measured) else {
            return;
        };
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        node.available = available;
        let overflow = node.overflow;
        let children = node.children.clone();
        if clip_changed {
            self.update_control_rendering(id);
        }
        if children.is_empty() {
            return;
        }

        let content = self.content_bounds(id).unwrap_or(bounds);
        let child_clip = match overflow {
            Overflow::Hidden => Some(clip.map_or(content, |c| c.intersect(content))),
            Overflow::Visible | Overflow::Expand => clip,
        };
        let count = children.len();
        let areas: Vec<Rect> = match self.node_opt(id).and_then(|n| n.widget.as_deref()) {
            Some(widget) => (0..count)
                .map(|i| widget.child_area(content, i, count))
                .collect(),
            None => vec![content; count],
        };
        for (child, area) in children.iter().zip(areas) {
            // A sibling's hooks may have moved this child elsewhere.
            if self.parent(*child) == Some(id) {
                self.layout_control(*child, area, child_clip);
            }
        }

        if overflow == Overflow::Expand {
            let Some(padding) = self.node_opt(id).map(|n| n.padding) else {
                return;
            };
            let grown = self
                .children(id)
                .iter()
                .filter_map(|c| self.bounds(*c))
                .filter(RectExt::has_area)
                .fold(bounds, |acc, r| acc.union(r + padding));
            if grown != bounds {
                self.set_bounds(id, grown);
            }
        }
    }

    /// Lay out `id` again inside the rectangle it was last offered.
    pub(crate) fn relayout(&mut self, id: ControlId) {
        let Some(node) = self.node_opt(id) else {
            return;
        };
        let (available, clip) = (node.available, node.clip);
        let available = match node.link {
            Link::Root => self.rect(),
            Link::Child(_) | Link::Detached => available,
        };
        self.layout_control(id, available, clip);
    }

    /// Whether `id` sits on the canvas with every control up its parent chain visible.
    pub fn is_shown(&self, id: ControlId) -> bool {
        let mut cursor = id;
        loop {
            let Some(node) = self.node_opt(cursor) else {
                return false;
            };
            if !node.flags.contains(ControlFlags::VISIBLE) {
                return false;
            }
            match node.link {
                Link::Root => return true,
                Link::Detached => return false,
                Link::Child(parent) => cursor = parent,
            }
        }
    }

    /// Bounds of `id` after its inherited clip.
    pub fn visible_bounds(&self, id: ControlId) -> Option<Rect> {
        let node = self.node_opt(id)?;
        Some(node.clip.map_or(node.bounds, |c| node.bounds.intersect(c)))
    }

    /// Register `id` for drawing and hit testing, or evict it, per its current state.
    ///
    /// A registered control whose level changed moves to the bucket for its new level.
    pub(crate) fn update_control_rendering(&mut self, id: ControlId) {
        let Some(rect) = self.visible_bounds(id) else {
            return;
        };
        let drawable =
            self.is_shown(id) && rect.has_area() && rect.intersect(self.rect()).has_area();
        if !drawable {
            self.evict(id);
            return;
        }
        let Some(level) = self.level(id) else {
            return;
        };
        match self.buckets.place(id, level) {
            Placement::Inserted => tracing::trace!(?id, level, "registered for rendering"),
            Placement::Moved(from) => {
                tracing::debug!(?id, from, to = level, "moved render bucket");
            }
            Placement::Unchanged => {}
        }
        self.grid.set_control_bounds(id, rect, level);
    }

    /// Drop `id` from the render buckets and the grid, releasing focus and hover.
    pub(crate) fn evict(&mut self, id: ControlId) {
        let bucketed = self.buckets.remove(id);
        self.grid.remove_control(id);
        if self.active == Some(id) {
            tracing::debug!(?id, "active control evicted");
            self.active = None;
        }
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        if bucketed {
            tracing::trace!(?id, "evicted from rendering");
        }
    }

    /// [`Self::update_control_rendering`] for `id` and all its descendants.
    pub(crate) fn refresh_subtree(&mut self, id: ControlId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            self.update_control_rendering(current);
            stack.extend_from_slice(self.children(current));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use kurbo::{Insets, Point, Size};
    use parking_lot::Mutex;

    use crate::types::ContainerKind;
    use crate::widget::{ControlCx, Widget};

    use super::*;

    struct Panel;

    impl Widget for Panel {
        fn kind(&self) -> &'static str {
            "panel"
        }

        fn container(&self) -> ContainerKind {
            ContainerKind::List
        }
    }

    /// Fixed size at the top-left of whatever it is offered.
    struct Fixed(Size);

    impl Widget for Fixed {
        fn kind(&self) -> &'static str {
            "fixed"
        }

        fn measure(&mut self, _cx: &mut ControlCx<'_>, available: Rect) -> Rect {
            Rect::from_origin_size(available.origin(), self.0)
        }
    }

    /// Counts resizes and squares itself from inside `on_resize`.
    #[derive(Default)]
    struct Squaring {
        resizes: Arc<Mutex<u32>>,
    }

    impl Widget for Squaring {
        fn kind(&self) -> &'static str {
            "squaring"
        }

        fn on_resize(&mut self, cx: &mut ControlCx<'_>) {
            *self.resizes.lock() += 1;
            let b = cx.bounds();
            let side = b.width().min(b.height());
            cx.set_bounds(Rect::from_origin_size(b.origin(), Size::new(side, side)));
        }
    }

    struct Watcher(Arc<Mutex<Vec<ControlId>>>);

    impl Widget for Watcher {
        fn kind(&self) -> &'static str {
            "watcher"
        }

        fn container(&self) -> ContainerKind {
            ContainerKind::List
        }

        fn on_child_bounds_change(&mut self, _cx: &mut ControlCx<'_>, child: ControlId) {
            self.0.lock().push(child);
        }
    }

    fn canvas() -> Canvas {
        Canvas::new(Size::new(200.0, 200.0), None)
    }

    #[test]
    fn padding_shrinks_child_area() {
        let mut canvas = canvas();
        let panel = canvas.create(Panel);
        let child = canvas.create(Panel);
        canvas.add(panel);
        canvas.add_child(panel, child);
        canvas.set_padding(panel, Insets::new(10.0, 20.0, 10.0, 0.0));
        canvas.update();
        assert_eq!(canvas.bounds(panel), Some(Rect::new(0.0, 0.0, 200.0, 200.0)));
        assert_eq!(canvas.bounds(child), Some(Rect::new(10.0, 20.0, 190.0, 200.0)));
        assert_eq!(canvas.available_bounds(child), canvas.bounds(child));
    }

    #[test]
    fn hidden_overflow_clips_descendants() {
        let mut canvas = canvas();
        let outer = canvas.create(Panel);
        let clipper = canvas.create(Panel);
        let big = canvas.create(Fixed(Size::new(120.0, 120.0)));
        canvas.add(outer);
        canvas.add_child(outer, clipper);
        canvas.add_child(clipper, big);
        canvas.update();
        assert_eq!(canvas.clip(big), None);
        assert!(canvas.is_rendered(big));

        // Padding larger than the bounds collapses the content area to a point.
        canvas.set_overflow(clipper, Overflow::Hidden);
        canvas.set_padding(clipper, Insets::uniform(150.0));
        canvas.update();
        assert_eq!(canvas.clip(big), Some(Rect::new(150.0, 150.0, 150.0, 150.0)));
        assert!(!canvas.is_rendered(big));
        assert_eq!(canvas.hit_test(Point::new(10.0, 10.0)), Some(clipper));
    }

    #[test]
    fn clip_limits_hit_area() {
        let mut canvas = canvas();
        let panel = canvas.create(Panel);
        let big = canvas.create(Fixed(Size::new(120.0, 120.0)));
        canvas.add(panel);
        canvas.add_child(panel, big);
        canvas.set_padding(panel, Insets::new(0.0, 0.0, 100.0, 100.0));
        canvas.set_overflow(panel, Overflow::Hidden);
        canvas.update();
        assert_eq!(canvas.clip(big), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert_eq!(canvas.visible_bounds(big), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert_eq!(canvas.hit_test(Point::new(50.0, 50.0)), Some(big));
        assert_eq!(canvas.hit_test(Point::new(110.0, 110.0)), Some(panel));
    }

    #[test]
    fn expand_overflow_grows_container() {
        let mut canvas = canvas();
        let holder = canvas.create(Panel);
        let panel = canvas.create(Panel);
        canvas.add(holder);
        canvas.add_child(holder, panel);
        let big = canvas.create(Fixed(Size::new(150.0, 40.0)));
        canvas.add_child(panel, big);
        canvas.set_overflow(panel, Overflow::Expand);
        canvas.set_padding(panel, Insets::uniform(5.0));
        canvas.update();
        // Fills the holder; the child fits, so no growth.
        assert_eq!(canvas.bounds(panel), Some(Rect::new(0.0, 0.0, 200.0, 200.0)));

        canvas.update_widget(big, |w: &mut Fixed, _| w.0 = Size::new(300.0, 40.0));
        canvas.update();
        assert_eq!(canvas.bounds(big), Some(Rect::new(5.0, 5.0, 305.0, 45.0)));
        assert_eq!(canvas.bounds(panel), Some(Rect::new(0.0, 0.0, 310.0, 200.0)));
    }

    #[test]
    fn resize_hook_does_not_recurse() {
        let mut canvas = canvas();
        let counter = Arc::new(Mutex::new(0));
        let sq = canvas.create(Squaring {
            resizes: counter.clone(),
        });
        canvas.add(sq);
        canvas.set_bounds(sq, Rect::new(0.0, 0.0, 80.0, 30.0));
        assert_eq!(*counter.lock(), 1);
        assert_eq!(canvas.bounds(sq), Some(Rect::new(0.0, 0.0, 30.0, 30.0)));
        assert_eq!(canvas.available_bounds(sq), Some(Rect::new(0.0, 0.0, 80.0, 30.0)));
        // Same bounds again: nothing happens.
        canvas.set_bounds(sq, Rect::new(0.0, 0.0, 30.0, 30.0));
        assert_eq!(*counter.lock(), 1);
    }

    #[test]
    fn child_bounds_aware_parent_is_told() {
        let mut canvas = canvas();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let w = canvas.create(Watcher(seen.clone()));
        let c = canvas.create(Fixed(Size::new(10.0, 10.0)));
        canvas.add(w);
        canvas.add_child(w, c);
        canvas.update();
        assert!(seen.lock().is_empty());
        canvas.set_child_bounds_aware(w, true);
        canvas.set_bounds(c, Rect::new(5.0, 5.0, 15.0, 15.0));
        assert_eq!(*seen.lock(), [c]);
    }

    #[test]
    fn culling_tracks_canvas_rect() {
        let mut canvas = canvas();
        let far = canvas.create(Fixed(Size::new(10.0, 10.0)));
        canvas.add(far);
        canvas.set_bounds(far, Rect::new(300.0, 300.0, 310.0, 310.0));
        assert!(!canvas.is_rendered(far));
        canvas.resize(Size::new(400.0, 400.0));
        assert!(canvas.is_rendered(far));
        assert_eq!(canvas.hit_test(Point::new(305.0, 305.0)), Some(far));
    }

    #[test]
    fn inverted_bounds_collapse() {
        let mut canvas = canvas();
        let a = canvas.create(Panel);
        let r = canvas.set_bounds(
            a,
            Rect {
                x0: 10.0,
                y0: 10.0,
                x1: 0.0,
                y1: 0.0,
            },
        );
        assert_eq!(r, Some(Rect::new(10.0, 10.0, 10.0, 10.0)));
    }
}
