// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural operations: attaching, detaching and re-leveling controls.
//!
//! Every operation finishes its bookkeeping before it runs any `on_add_child` or
//! `on_remove_child` hook, so hooks observe a consistent tree and may change it again.

use kurbo::Rect;

use crate::canvas::Canvas;
use crate::types::{ContainerKind, ControlId, Link};

/// Container hook owed once a structural change is complete.
#[derive(Copy, Clone, Debug)]
enum Notice {
    Added { parent: ControlId, child: ControlId },
    Removed { parent: ControlId, child: ControlId },
}

impl Canvas {
    /// Attach `child` as the last top-level control.
    ///
    /// A child attached elsewhere is moved. Returns `false` for unknown ids.
    pub fn add(&mut self, child: ControlId) -> bool {
        self.attach(Link::Root, child, None)
    }

    /// Attach `child` as a top-level control at `index` (clamped).
    pub fn insert(&mut self, index: usize, child: ControlId) -> bool {
        self.attach(Link::Root, child, Some(index))
    }

    /// Detach the top-level control `child`.
    ///
    /// Returns `false` if `child` is not top-level.
    pub fn remove(&mut self, child: ControlId) -> bool {
        if self.link(child) != Some(Link::Root) {
            return false;
        }
        self.detach(child)
    }

    /// Attach `child` as the last child of `parent`.
    ///
    /// Single-child containers evict their current child first. Fails if `parent` is a
    /// leaf, if either id is unknown, or if `child` is `parent` or one of its ancestors.
    pub fn add_child(&mut self, parent: ControlId, child: ControlId) -> bool {
        self.attach(Link::Child(parent), child, None)
    }

    /// Attach `child` to `parent` at `index` (clamped).
    pub fn insert_child(&mut self, parent: ControlId, index: usize, child: ControlId) -> bool {
        self.attach(Link::Child(parent), child, Some(index))
    }

    /// Detach `child` from `parent`.
    ///
    /// Returns `false` if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: ControlId, child: ControlId) -> bool {
        if self.link(child) != Some(Link::Child(parent)) {
            return false;
        }
        self.detach(child)
    }

    /// Detach the child of `parent` at `index`, returning it.
    pub fn remove_child_at(&mut self, parent: ControlId, index: usize) -> Option<ControlId> {
        let child = *self.children(parent).get(index)?;
        self.detach(child).then_some(child)
    }

    /// Detach every child of `parent`, returning how many were removed.
    pub fn remove_all(&mut self, parent: ControlId) -> usize {
        self.children(parent)
            .to_vec()
            .into_iter()
            .filter(|child| self.remove_child(parent, *child))
            .count()
    }

    /// Detach `child` from whatever holds it.
    ///
    /// Returns `false` if it was already detached.
    pub fn release(&mut self, child: ControlId) -> bool {
        self.detach(child)
    }

    /// Children of `id`, empty for unknown ids.
    pub fn children(&self, id: ControlId) -> &[ControlId] {
        self.node_opt(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Attachment of `id`.
    pub fn link(&self, id: ControlId) -> Option<Link> {
        self.node_opt(id).map(|n| n.link)
    }

    /// Parent control of `id`; `None` for top-level, detached or unknown controls.
    pub fn parent(&self, id: ControlId) -> Option<ControlId> {
        match self.link(id)? {
            Link::Child(parent) => Some(parent),
            Link::Root | Link::Detached => None,
        }
    }

    /// Container kind of `id`.
    pub fn container_kind(&self, id: ControlId) -> Option<ContainerKind> {
        self.node_opt(id).map(|n| n.container)
    }

    /// Depth of `id`: 0 when detached, 1 at top level, parent + 1 below.
    pub fn level(&self, id: ControlId) -> Option<u32> {
        self.node_opt(id).map(|n| n.level)
    }

    /// Set the level of `id` and, recursively, `level + 1` on its children.
    ///
    /// Render registration follows the new levels. Returns `false` if nothing changed.
    pub fn set_level(&mut self, id: ControlId, level: u32) -> bool {
        let Some(node) = self.node_opt_mut(id) else {
            return false;
        };
        if node.level == level {
            return false;
        }
        node.level = level;
        let children = node.children.clone();
        self.update_control_rendering(id);
        for child in children {
            self.set_level(child, level + 1);
        }
        true
    }

    /// Whether `ancestor` is `id` or lies on its parent chain.
    pub fn is_ancestor(&self, ancestor: ControlId, id: ControlId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    fn attach(&mut self, link: Link, child: ControlId, index: Option<usize>) -> bool {
        if !self.is_alive(child) {
            return false;
        }
        let level = match link {
            Link::Detached => return false,
            Link::Root => 1,
            Link::Child(parent) => {
                let Some(p) = self.node_opt(parent) else {
                    return false;
                };
                if !p.container.accepts_children() || self.is_ancestor(child, parent) {
                    tracing::debug!(?parent, ?child, "rejected attach");
                    return false;
                }
                p.level + 1
            }
        };

        let mut notices = Vec::new();
        self.unlink(child, &mut notices);

        match link {
            Link::Root => {
                let at = index.unwrap_or(self.roots.len()).min(self.roots.len());
                self.roots.insert(at, child);
            }
            Link::Child(parent) => {
                if self.container_kind(parent) == Some(ContainerKind::Single) {
                    for evicted in self.children(parent).to_vec() {
                        self.unlink(evicted, &mut notices);
                        self.settle_detached(evicted);
                    }
                }
                let Some(p) = self.node_opt_mut(parent) else {
                    return false;
                };
                let at = index.unwrap_or(p.children.len()).min(p.children.len());
                p.children.insert(at, child);
                notices.push(Notice::Added { parent, child });
            }
            Link::Detached => unreachable!("rejected above"),
        }
        if let Some(node) = self.node_opt_mut(child) {
            node.link = link;
        }
        self.set_level(child, level);
        self.refresh_subtree(child);
        tracing::trace!(?child, ?link, level, "attached control");

        self.notify(notices);
        true
    }

    fn detach(&mut self, child: ControlId) -> bool {
        let mut notices = Vec::new();
        if !self.unlink(child, &mut notices) {
            return false;
        }
        self.settle_detached(child);
        tracing::trace!(?child, "detached control");
        self.notify(notices);
        true
    }

    /// Remove `child` from its holder's list and mark it detached.
    fn unlink(&mut self, child: ControlId, notices: &mut Vec<Notice>) -> bool {
        let Some(link) = self.link(child) else {
            return false;
        };
        match link {
            Link::Detached => return false,
            Link::Root => self.roots.retain(|c| *c != child),
            Link::Child(parent) => {
                if let Some(p) = self.node_opt_mut(parent) {
                    p.children.retain(|c| *c != child);
                }
                notices.push(Notice::Removed { parent, child });
            }
        }
        if let Some(node) = self.node_opt_mut(child) {
            node.link = Link::Detached;
        }
        true
    }

    /// Level 0, no inherited clip, nothing registered for drawing.
    fn settle_detached(&mut self, id: ControlId) {
        self.set_level(id, 0);
        if let Some(node) = self.node_opt_mut(id) {
            node.clip = None;
        }
        self.refresh_subtree(id);
    }

    fn notify(&mut self, notices: Vec<Notice>) {
        for notice in notices {
            match notice {
                Notice::Added { parent, child } => {
                    self.with_widget(parent, |w, cx| w.on_add_child(cx, child));
                }
                Notice::Removed { parent, child } => {
                    self.with_widget(parent, |w, cx| w.on_remove_child(cx, child));
                }
            }
        }
    }

    /// Bounds of `id`.
    pub fn bounds(&self, id: ControlId) -> Option<Rect> {
        self.node_opt(id).map(|n| n.bounds)
    }

    /// Bounds offered to `id` by its last layout.
    pub fn available_bounds(&self, id: ControlId) -> Option<Rect> {
        self.node_opt(id).map(|n| n.available)
    }

    /// Clip inherited by `id` from ancestors with hidden overflow.
    pub fn clip(&self, id: ControlId) -> Option<Rect> {
        self.node_opt(id).and_then(|n| n.clip)
    }
}
