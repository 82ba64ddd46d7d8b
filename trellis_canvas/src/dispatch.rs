// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame update: layout, forced updates and input routing.
//!
//! Keyboard events go to the active control only. Mouse events are hit tested at their
//! position; a primary-button just-pressed event moves focus to whatever was hit (or
//! clears it). The active control receives every mouse event; a hovered control that is
//! not active receives pointer movement only.

use kurbo::Point;
use trellis_input::{EventClass, InputEvent};

use crate::canvas::Canvas;
use crate::types::{ControlFlags, ControlId};

impl Canvas {
    /// Run one frame of work.
    ///
    /// 1. Lay out every top-level control inside the canvas rectangle.
    /// 2. Re-lay out controls that requested it and run their `on_forced_update`.
    /// 3. Finish the input frame and route every queued event in order.
    pub fn update(&mut self) {
        let rect = self.rect();
        for root in self.roots.clone() {
            self.layout_control(root, rect, None);
        }

        for id in core::mem::take(&mut self.forced) {
            if !self.is_alive(id) {
                continue;
            }
            self.relayout(id);
            self.with_widget(id, |w, cx| w.on_forced_update(cx));
            if let Some(node) = self.node_opt_mut(id) {
                node.flags.remove(ControlFlags::FORCE_UPDATE);
            }
        }

        let events = self.input().frame();
        if !events.is_empty() {
            tracing::trace!(count = events.len(), "routing input");
        }
        let mut memo: Option<(Point, Option<ControlId>)> = None;
        for event in &events {
            self.route(event, &mut memo);
        }
    }

    fn route(&mut self, event: &InputEvent, memo: &mut Option<(Point, Option<ControlId>)>) {
        match event.class() {
            EventClass::Keyboard => {
                if let Some(active) = self.active {
                    self.deliver(active, event);
                }
            }
            EventClass::Mouse => {
                let Some(position) = event.position() else {
                    return;
                };
                let hit = match *memo {
                    Some((at, hit))
                        if at == position && hit.is_none_or(|id| self.is_alive(id)) =>
                    {
                        hit
                    }
                    _ => {
                        let hit = self.hit_test(position);
                        *memo = Some((position, hit));
                        hit
                    }
                };

                if let InputEvent::MouseJustPressed { button, .. } = *event
                    && button == self.config().primary_button
                {
                    self.set_active(hit);
                }
                self.set_hovered(hit);

                let active = self.active;
                if let Some(active) = active {
                    self.deliver(active, event);
                }
                if let InputEvent::MouseMove { .. } = event
                    && let Some(hovered) = hit
                    && active != Some(hovered)
                {
                    self.deliver(hovered, event);
                }
            }
        }
    }

    fn deliver(&mut self, id: ControlId, event: &InputEvent) {
        let accepts = self.flags(id).is_some_and(|f| {
            f.contains(ControlFlags::ENABLED) && f.contains(ControlFlags::INPUT_ENABLED)
        });
        if accepts {
            self.with_widget(id, |w, cx| w.handle_input(cx, event));
        }
    }

    /// Move keyboard focus to `id`, or clear it.
    ///
    /// The previous holder gets `on_active_change(false)` before the new one gets
    /// `on_active_change(true)`. Setting the current holder again does nothing. Ids that
    /// are not registered for rendering (unknown, hidden, detached or off the canvas) clear
    /// focus. Returns `true` if focus moved.
    pub fn set_active(&mut self, id: Option<ControlId>) -> bool {
        let id = id.filter(|id| self.buckets.contains(*id));
        if id == self.active {
            return false;
        }
        let previous = core::mem::replace(&mut self.active, id);
        tracing::debug!(?previous, active = ?id, "focus changed");
        if let Some(previous) = previous {
            self.with_widget(previous, |w, cx| w.on_active_change(cx, false));
        }
        if let Some(id) = id {
            self.with_widget(id, |w, cx| w.on_active_change(cx, true));
        }
        true
    }

    fn set_hovered(&mut self, id: Option<ControlId>) {
        if id == self.hovered {
            return;
        }
        let previous = core::mem::replace(&mut self.hovered, id);
        if let Some(previous) = previous {
            self.with_widget(previous, |w, cx| w.on_hover_change(cx, false));
        }
        if let Some(id) = id {
            self.with_widget(id, |w, cx| w.on_hover_change(cx, true));
        }
    }

    /// Topmost control accepting input at `point`.
    ///
    /// Candidates come from the grid cell under `point`; the highest level wins and, within
    /// a level, the one painted last.
    pub fn hit_test(&self, point: Point) -> Option<ControlId> {
        self.grid
            .query(point)
            .filter(|(_, id)| self.intersects(*id, point))
            .filter_map(|(_, id)| self.buckets.order_of(id).map(|order| (order, id)))
            .max_by_key(|(order, _)| *order)
            .map(|(_, id)| id)
    }

    /// Whether `point` falls on `id`: enabled, accepting input, inside its clip and inside
    /// its widget's select bounds.
    pub fn intersects(&self, id: ControlId, point: Point) -> bool {
        let Some(node) = self.node_opt(id) else {
            return false;
        };
        if !node
            .flags
            .contains(ControlFlags::ENABLED | ControlFlags::INPUT_ENABLED)
        {
            return false;
        }
        if node.clip.is_some_and(|clip| !clip.contains(point)) {
            return false;
        }
        let select = node
            .widget
            .as_deref()
            .map_or(node.bounds, |w| w.select_bounds(node.bounds));
        select.contains(point)
    }
}
