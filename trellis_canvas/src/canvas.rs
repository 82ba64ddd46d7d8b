// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The canvas: control storage, flags, styling, scale and rendering.
//!
//! Structural operations live in `tree.rs`, layout and render registration in
//! `layout.rs`, and the per-frame update with input routing in `dispatch.rs`.

use std::any::Any;
use std::sync::Arc;

use kurbo::{Insets, Point, Rect, Size, Vec2};
use trellis_grid::ControlGrid;

use crate::buckets::RenderBuckets;
use crate::config::CanvasConfig;
use crate::error::Result;
use crate::geom::RectExt;
use crate::handle::InputHandle;
use crate::render::Renderer;
use crate::style::{Style, StyleSheet};
use crate::text::FontLibrary;
use crate::types::{ContainerKind, ControlFlags, ControlId, Link, Overflow};
use crate::widget::{ControlCx, RenderCx, Widget};

pub(crate) struct Node {
    generation: u32,
    pub(crate) link: Link,
    pub(crate) children: Vec<ControlId>,
    pub(crate) container: ContainerKind,
    pub(crate) bounds: Rect,
    pub(crate) available: Rect,
    /// Clip inherited from ancestors with hidden overflow.
    pub(crate) clip: Option<Rect>,
    pub(crate) level: u32,
    pub(crate) flags: ControlFlags,
    pub(crate) padding: Insets,
    pub(crate) overflow: Overflow,
    pub(crate) selector: String,
    /// Taken out while one of its hooks runs.
    pub(crate) widget: Option<Box<dyn Widget>>,
}

/// A surface holding a tree of controls.
///
/// The canvas owns every control it creates. Controls are addressed by [`ControlId`]
/// and are either detached, top-level, or children of another control. Each
/// [`Canvas::update`] lays the tree out, runs requested extra updates and routes
/// queued input; [`Canvas::render`] then draws every visible control, lowest level first.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Point, Rect, Size};
/// use trellis_canvas::{Canvas, ContainerKind, ControlCx, RecordingRenderer, Widget};
///
/// struct Panel;
///
/// impl Widget for Panel {
///     fn kind(&self) -> &'static str {
///         "panel"
///     }
///
///     fn container(&self) -> ContainerKind {
///         ContainerKind::List
///     }
/// }
///
/// struct Swatch;
///
/// impl Widget for Swatch {
///     fn kind(&self) -> &'static str {
///         "swatch"
///     }
///
///     fn measure(&mut self, _cx: &mut ControlCx<'_>, available: Rect) -> Rect {
///         Rect::from_origin_size(available.origin(), Size::new(20.0, 20.0))
///     }
/// }
///
/// let mut canvas = Canvas::new(Size::new(200.0, 100.0), None);
/// let panel = canvas.create(Panel);
/// let swatch = canvas.create(Swatch);
/// assert!(canvas.add(panel));
/// assert!(canvas.add_child(panel, swatch));
/// assert_eq!(canvas.level(swatch), Some(2));
///
/// canvas.update();
/// assert_eq!(canvas.bounds(swatch), Some(Rect::new(0.0, 0.0, 20.0, 20.0)));
/// assert_eq!(canvas.hit_test(Point::new(5.0, 5.0)), Some(swatch));
/// assert_eq!(canvas.hit_test(Point::new(50.0, 5.0)), Some(panel));
///
/// let mut renderer = RecordingRenderer::new();
/// canvas.render(&mut renderer);
/// ```
pub struct Canvas {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    pub(crate) roots: Vec<ControlId>,
    size: Size,
    dpi: f64,
    scale: f64,
    config: CanvasConfig,
    styles: StyleSheet,
    fonts: Arc<FontLibrary>,
    input: InputHandle,
    pub(crate) buckets: RenderBuckets,
    pub(crate) grid: ControlGrid<ControlId>,
    pub(crate) active: Option<ControlId>,
    pub(crate) hovered: Option<ControlId>,
    pub(crate) forced: Vec<ControlId>,
}

impl core::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Canvas")
            .field("size", &self.size)
            .field("nodes_total", &self.nodes.len())
            .field("nodes_alive", &alive)
            .field("roots", &self.roots)
            .field("rendered", &self.buckets.len())
            .field("active", &self.active)
            .field("hovered", &self.hovered)
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

impl Canvas {
    /// Create a canvas of `size` with default configuration.
    ///
    /// Without a style sheet the built-in rules are used.
    pub fn new(size: Size, styles: Option<StyleSheet>) -> Self {
        Self::from_parts(
            size,
            styles,
            CanvasConfig::default(),
            Arc::new(FontLibrary::new()),
        )
    }

    /// Create a canvas with explicit configuration and a shared font library.
    ///
    /// Fails with [`Error::Config`](crate::Error::Config) if `config` does not pass [`CanvasConfig::validate`].
    pub fn with_config(
        size: Size,
        styles: Option<StyleSheet>,
        config: CanvasConfig,
        fonts: Arc<FontLibrary>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(size, styles, config, fonts))
    }

    fn from_parts(
        size: Size,
        styles: Option<StyleSheet>,
        config: CanvasConfig,
        fonts: Arc<FontLibrary>,
    ) -> Self {
        let size = Size::new(size.width.max(0.0), size.height.max(0.0));
        tracing::debug!(?size, "created canvas");
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            roots: Vec::new(),
            size,
            dpi: config.base_dpi,
            scale: 1.0,
            grid: ControlGrid::with_extent(config.grid_cell_size, size),
            input: InputHandle::new(config.input_capacity),
            styles: styles.unwrap_or_default(),
            fonts,
            config,
            buckets: RenderBuckets::default(),
            active: None,
            hovered: None,
            forced: Vec::new(),
        }
    }

    // --- canvas-wide state ---

    /// Canvas size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// The canvas rectangle, anchored at the origin.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.size)
    }

    /// Resize the canvas. Controls are re-laid out by the next update.
    pub fn resize(&mut self, size: Size) {
        let size = Size::new(size.width.max(0.0), size.height.max(0.0));
        if size == self.size {
            return;
        }
        self.size = size;
        if self.grid.resize(size) {
            tracing::debug!(
                columns = self.grid.columns(),
                rows = self.grid.rows(),
                "grew control grid"
            );
        }
        // Culling against the canvas rectangle changed for everything on it.
        for root in self.roots.clone() {
            self.refresh_subtree(root);
        }
    }

    /// Configuration in effect.
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// The style sheet.
    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    /// Style for `selector`, or the default style.
    pub fn style(&self, selector: &str) -> &Style {
        self.styles.resolve(selector)
    }

    /// Fonts shared by this canvas.
    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    /// Handle to the input queue, for the windowing layer.
    pub fn input(&self) -> &InputHandle {
        &self.input
    }

    /// Top-level controls in order.
    pub fn roots(&self) -> &[ControlId] {
        &self.roots
    }

    /// The control holding keyboard focus.
    pub fn active(&self) -> Option<ControlId> {
        self.active
    }

    /// The control under the pointer as of the last routed mouse event.
    pub fn hovered(&self) -> Option<ControlId> {
        self.hovered
    }

    // --- scale ---

    /// Current DPI.
    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    /// Current scale factor, `dpi / base_dpi`.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Set the DPI; the scale follows. Every control is told if it changed.
    pub fn set_dpi(&mut self, dpi: f64) {
        if dpi.is_nan() || dpi <= 0.0 || dpi == self.dpi {
            return;
        }
        self.dpi = dpi;
        self.scale = dpi / self.config.base_dpi;
        self.broadcast_scale();
    }

    /// Set the scale factor; the DPI follows. Every control is told if it changed.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_nan() || scale <= 0.0 || scale == self.scale {
            return;
        }
        self.scale = scale;
        self.dpi = scale * self.config.base_dpi;
        self.broadcast_scale();
    }

    /// Scale a length, rounding up.
    pub fn scale_value(&self, v: f64) -> f64 {
        (v * self.scale).ceil()
    }

    /// Scale a vector componentwise, rounding up.
    pub fn scale_vec(&self, v: Vec2) -> Vec2 {
        Vec2::new(self.scale_value(v.x), self.scale_value(v.y))
    }

    /// Scale a rectangle's origin and size, rounding up.
    pub fn scale_rect(&self, rect: Rect) -> Rect {
        let origin = self.scale_vec(rect.origin().to_vec2()).to_point();
        let size = self.scale_vec(rect.size().to_vec2());
        Rect::from_origin_size(origin, Size::new(size.x, size.y))
    }

    fn broadcast_scale(&mut self) {
        tracing::debug!(dpi = self.dpi, scale = self.scale, "scale changed");
        let scale = self.scale;
        for id in self.depth_first() {
            self.with_widget(id, |w, cx| w.on_dpi_change(cx, scale));
        }
    }

    // --- control storage ---

    /// Create a detached control driven by `widget`.
    ///
    /// Padding and overflow start from the style registered for the widget's kind.
    pub fn create(&mut self, widget: impl Widget) -> ControlId {
        let widget: Box<dyn Widget> = Box::new(widget);
        let kind = widget.kind();
        let container = widget.container();
        let style = self.styles.resolve(kind);
        let mut node = Node {
            generation: 0,
            link: Link::Detached,
            children: Vec::new(),
            container,
            bounds: Rect::ZERO,
            available: Rect::ZERO,
            clip: None,
            level: 0,
            flags: ControlFlags::default(),
            padding: style.padding.to_insets(),
            overflow: style.overflow,
            selector: kind.to_owned(),
            widget: Some(widget),
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            node.generation = generation;
            self.nodes[idx] = Some(node);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ControlId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            node.generation = generation;
            self.nodes.push(Some(node));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ControlId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = ControlId::new(idx, generation);
        tracing::trace!(?id, kind, "created control");
        id
    }

    /// Detach `id` from its parent, then drop it and its whole subtree.
    ///
    /// The former parent's `on_remove_child` runs; the destroyed controls get no hooks.
    /// Returns `false` for unknown ids.
    pub fn destroy(&mut self, id: ControlId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        self.release(id);
        if self.is_alive(id) {
            self.free_subtree(id);
        }
        true
    }

    fn free_subtree(&mut self, id: ControlId) {
        let Some(node) = self.node_opt(id) else {
            return;
        };
        for child in node.children.clone() {
            self.free_subtree(child);
        }
        self.evict(id);
        self.forced.retain(|c| *c != id);
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
        tracing::trace!(?id, "destroyed control");
    }

    /// Whether `id` refers to a live control.
    pub fn is_alive(&self, id: ControlId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Number of live controls.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Whether the canvas holds no controls.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn node_opt(&self, id: ControlId) -> Option<&Node> {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .filter(|n| n.generation == id.1)
    }

    pub(crate) fn node_opt_mut(&mut self, id: ControlId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.idx())
            .and_then(|n| n.as_mut())
            .filter(|n| n.generation == id.1)
    }

    /// Run `f` on the widget of `id` with a context for `id`.
    ///
    /// The widget is out of its slot while `f` runs. If the control is destroyed in the
    /// meantime the widget is dropped instead of being put back. Returns `None` for
    /// unknown ids and for controls whose widget is already out.
    pub(crate) fn with_widget<R>(
        &mut self,
        id: ControlId,
        f: impl FnOnce(&mut dyn Widget, &mut ControlCx<'_>) -> R,
    ) -> Option<R> {
        let mut widget = self.node_opt_mut(id)?.widget.take()?;
        let out = {
            let mut cx = ControlCx {
                canvas: &mut *self,
                id,
            };
            f(widget.as_mut(), &mut cx)
        };
        if let Some(node) = self.node_opt_mut(id) {
            node.widget = Some(widget);
        }
        Some(out)
    }

    /// The widget of `id`, if it is a `T`.
    pub fn widget<T: Widget>(&self, id: ControlId) -> Option<&T> {
        let widget: &dyn Widget = self.node_opt(id)?.widget.as_deref()?;
        (widget as &dyn Any).downcast_ref::<T>()
    }

    /// The widget of `id` mutably, if it is a `T`.
    ///
    /// Changes that affect layout should be followed by [`Canvas::force_update`].
    pub fn widget_mut<T: Widget>(&mut self, id: ControlId) -> Option<&mut T> {
        let widget: &mut dyn Widget = self.node_opt_mut(id)?.widget.as_deref_mut()?;
        (widget as &mut dyn Any).downcast_mut::<T>()
    }

    /// Run `f` on the widget of `id` as a `T`, with a context for `id`.
    pub fn update_widget<T: Widget, R>(
        &mut self,
        id: ControlId,
        f: impl FnOnce(&mut T, &mut ControlCx<'_>) -> R,
    ) -> Option<R> {
        self.with_widget(id, |widget, cx| {
            (widget as &mut dyn Any).downcast_mut::<T>().map(|w| f(w, cx))
        })
        .flatten()
    }

    // --- per-control state ---

    /// Style selector of `id`: its class if set, else its widget kind.
    pub fn selector(&self, id: ControlId) -> Option<&str> {
        self.node_opt(id).map(|n| n.selector.as_str())
    }

    /// Resolved style for `id`.
    pub fn control_style(&self, id: ControlId) -> &Style {
        self.styles
            .resolve(self.node_opt(id).map_or("", |n| n.selector.as_str()))
    }

    /// Restyle `id` under `class`, resetting padding and overflow from that style.
    pub fn set_class(&mut self, id: ControlId, class: impl Into<String>) -> bool {
        let class = class.into();
        let style = self.styles.resolve(&class);
        let (padding, overflow) = (style.padding.to_insets(), style.overflow);
        let Some(node) = self.node_opt_mut(id) else {
            return false;
        };
        node.selector = class;
        node.padding = padding;
        node.overflow = overflow;
        true
    }

    /// Override the padding of `id`.
    pub fn set_padding(&mut self, id: ControlId, padding: Insets) -> bool {
        self.node_opt_mut(id).map(|n| n.padding = padding).is_some()
    }

    /// Unscaled padding of `id`.
    pub fn padding(&self, id: ControlId) -> Option<Insets> {
        self.node_opt(id).map(|n| n.padding)
    }

    /// Override the overflow behavior of `id`.
    pub fn set_overflow(&mut self, id: ControlId, overflow: Overflow) -> bool {
        self.node_opt_mut(id).map(|n| n.overflow = overflow).is_some()
    }

    /// Overflow behavior of `id`.
    pub fn overflow(&self, id: ControlId) -> Option<Overflow> {
        self.node_opt(id).map(|n| n.overflow)
    }

    /// Flags of `id`.
    pub fn flags(&self, id: ControlId) -> Option<ControlFlags> {
        self.node_opt(id).map(|n| n.flags)
    }

    /// Enable `id` and, if that changed anything, its descendants.
    pub fn enable(&mut self, id: ControlId) -> bool {
        self.set_enabled(id, true)
    }

    /// Disable `id` and, if that changed anything, its descendants.
    ///
    /// Disabled controls are skipped by hit testing and input dispatch.
    pub fn disable(&mut self, id: ControlId) -> bool {
        self.set_enabled(id, false)
    }

    fn set_enabled(&mut self, id: ControlId, enabled: bool) -> bool {
        let Some(node) = self.node_opt_mut(id) else {
            return false;
        };
        if node.flags.contains(ControlFlags::ENABLED) == enabled {
            return false;
        }
        node.flags.set(ControlFlags::ENABLED, enabled);
        let children = node.children.clone();
        self.with_widget(id, |w, cx| {
            if enabled {
                w.on_enable(cx);
            } else {
                w.on_disable(cx);
            }
        });
        for child in children {
            self.set_enabled(child, enabled);
        }
        true
    }

    /// Whether `id` is enabled.
    pub fn is_enabled(&self, id: ControlId) -> bool {
        self.node_opt(id)
            .is_some_and(|n| n.flags.contains(ControlFlags::ENABLED))
    }

    /// Let `id` receive input while enabled, or not.
    pub fn set_input_enabled(&mut self, id: ControlId, enabled: bool) -> bool {
        self.node_opt_mut(id)
            .map(|n| n.flags.set(ControlFlags::INPUT_ENABLED, enabled))
            .is_some()
    }

    /// Show or hide `id`. Hidden controls and their descendants are neither drawn nor hit.
    pub fn set_visible(&mut self, id: ControlId, visible: bool) -> bool {
        let Some(node) = self.node_opt_mut(id) else {
            return false;
        };
        if node.flags.contains(ControlFlags::VISIBLE) == visible {
            return false;
        }
        node.flags.set(ControlFlags::VISIBLE, visible);
        self.refresh_subtree(id);
        true
    }

    /// Whether `id` itself is marked visible.
    pub fn is_visible(&self, id: ControlId) -> bool {
        self.node_opt(id)
            .is_some_and(|n| n.flags.contains(ControlFlags::VISIBLE))
    }

    /// Ask for `on_child_bounds_change` when children of `id` change bounds.
    pub fn set_child_bounds_aware(&mut self, id: ControlId, aware: bool) -> bool {
        self.node_opt_mut(id)
            .map(|n| n.flags.set(ControlFlags::CHILD_BOUNDS_AWARE, aware))
            .is_some()
    }

    /// Schedule an extra layout pass and `on_forced_update` for `id` in the next update.
    pub fn force_update(&mut self, id: ControlId) -> bool {
        let Some(node) = self.node_opt_mut(id) else {
            return false;
        };
        if !node.flags.contains(ControlFlags::FORCE_UPDATE) {
            node.flags.insert(ControlFlags::FORCE_UPDATE);
            self.forced.push(id);
        }
        true
    }

    /// Pre-order traversal of every attached control.
    pub fn depth_first(&self) -> Vec<ControlId> {
        let mut out = Vec::new();
        let mut stack: Vec<ControlId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    // --- rendering ---

    /// Draw the canvas background, then every rendered control by ascending level.
    ///
    /// Controls clipped by an ancestor are drawn inside a mask of that clip.
    pub fn render(&self, renderer: &mut dyn Renderer) {
        if let Some(bg) = self.styles.resolve("canvas").background {
            renderer.draw_quad(Point::ZERO, self.size, bg);
        }
        for (_, id) in self.buckets.iter() {
            self.draw_control(id, renderer);
        }
    }

    /// Redraw only the controls overlapping `viewport`, in paint order.
    ///
    /// Candidates come from the grid cells under `viewport`; a control spanning several
    /// cells is drawn once. The canvas background is not drawn.
    pub fn render_viewport(&mut self, viewport: Rect, renderer: &mut dyn Renderer) {
        let mut found = Vec::new();
        self.grid.render(viewport, |_, id| found.push(id));
        let mut ordered: Vec<_> = found
            .into_iter()
            .filter_map(|id| self.buckets.order_of(id).map(|order| (order, id)))
            .collect();
        ordered.sort_unstable_by_key(|(order, _)| *order);
        tracing::trace!(?viewport, count = ordered.len(), "partial redraw");
        for (_, id) in ordered {
            self.draw_control(id, renderer);
        }
    }

    fn draw_control(&self, id: ControlId, renderer: &mut dyn Renderer) {
        let Some(node) = self.node_opt(id) else {
            return;
        };
        let Some(widget) = node.widget.as_deref() else {
            return;
        };
        if let Some(clip) = node.clip {
            renderer.push_mask(clip);
        }
        widget.render(&RenderCx { canvas: self, id }, renderer);
        if node.clip.is_some() {
            renderer.pop_mask();
        }
    }

    /// Controls in paint order.
    pub fn render_order(&self) -> Vec<ControlId> {
        self.buckets.iter().map(|(_, id)| id).collect()
    }

    /// Whether `id` is currently registered for drawing.
    pub fn is_rendered(&self, id: ControlId) -> bool {
        self.buckets.contains(id)
    }

    /// Level of the render bucket holding `id`.
    pub fn render_level(&self, id: ControlId) -> Option<u32> {
        self.buckets.level_of(id)
    }

    /// Bounds minus scaled padding.
    pub fn content_bounds(&self, id: ControlId) -> Option<Rect> {
        let node = self.node_opt(id)?;
        let p = node.padding;
        let scaled = Insets::new(
            self.scale_value(p.x0),
            self.scale_value(p.y0),
            self.scale_value(p.x1),
            self.scale_value(p.y1),
        );
        Some((node.bounds - scaled).clamp_non_negative())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawCommand, RecordingRenderer};
    use crate::style::Color;

    struct Block;

    impl Widget for Block {
        fn kind(&self) -> &'static str {
            "block"
        }

        fn container(&self) -> ContainerKind {
            ContainerKind::List
        }

        fn render(&self, cx: &RenderCx<'_>, renderer: &mut dyn Renderer) {
            let b = cx.bounds();
            renderer.draw_quad(b.origin(), b.size(), Color::WHITE);
        }
    }

    #[derive(Default)]
    struct Scaled(Vec<f64>);

    impl Widget for Scaled {
        fn kind(&self) -> &'static str {
            "scaled"
        }

        fn on_dpi_change(&mut self, _cx: &mut ControlCx<'_>, scale: f64) {
            self.0.push(scale);
        }
    }

    #[test]
    fn liveness_create_destroy_reuse() {
        let mut canvas = Canvas::new(Size::new(10.0, 10.0), None);
        let a = canvas.create(Block);
        assert!(canvas.is_alive(a));
        assert_eq!(canvas.len(), 1);
        assert!(canvas.destroy(a));
        assert!(!canvas.is_alive(a));
        assert!(!canvas.destroy(a));
        let b = canvas.create(Block);
        assert_eq!(a.idx(), b.idx());
        assert_ne!(a, b);
        assert!(canvas.bounds(a).is_none());
        assert!(canvas.is_alive(b));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let fonts = Arc::new(FontLibrary::new());
        let size = Size::new(10.0, 10.0);
        for config in [
            CanvasConfig::default().with_grid_cell_size(0.0),
            CanvasConfig::default().with_base_dpi(0.0),
            CanvasConfig::default().with_input_capacity(0),
        ] {
            let err = Canvas::with_config(size, None, config, fonts.clone()).unwrap_err();
            assert!(matches!(err, crate::Error::Config(_)));
        }
        let config = CanvasConfig::default().with_grid_cell_size(16.0);
        let canvas = Canvas::with_config(size, None, config, fonts).unwrap();
        assert_eq!(canvas.config().grid_cell_size, 16.0);
    }

    #[test]
    fn dpi_and_scale_are_linked() {
        let mut canvas = Canvas::new(Size::new(10.0, 10.0), None);
        let s = canvas.create(Scaled::default());
        canvas.add(s);
        canvas.set_dpi(144.0);
        assert_eq!(canvas.scale(), 1.5);
        canvas.set_scale(2.0);
        assert_eq!(canvas.dpi(), 192.0);
        canvas.set_scale(2.0);
        assert_eq!(canvas.widget::<Scaled>(s).unwrap().0, [1.5, 2.0]);
    }

    #[test]
    fn scaling_rounds_up() {
        let mut canvas = Canvas::new(Size::new(10.0, 10.0), None);
        canvas.set_scale(1.5);
        assert_eq!(canvas.scale_value(3.0), 5.0);
        assert_eq!(canvas.scale_vec(Vec2::new(1.0, 2.0)), Vec2::new(2.0, 3.0));
        assert_eq!(
            canvas.scale_rect(Rect::new(1.0, 1.0, 3.0, 3.0)),
            Rect::new(2.0, 2.0, 5.0, 5.0)
        );
    }

    #[test]
    fn widget_downcast() {
        let mut canvas = Canvas::new(Size::new(10.0, 10.0), None);
        let a = canvas.create(Block);
        assert!(canvas.widget::<Block>(a).is_some());
        assert!(canvas.widget::<Scaled>(a).is_none());
        let n = canvas.update_widget(a, |_: &mut Block, cx| cx.id());
        assert_eq!(n, Some(a));
    }

    #[test]
    fn render_draws_background_then_levels() {
        let mut canvas = Canvas::new(Size::new(100.0, 100.0), None);
        let outer = canvas.create(Block);
        let inner = canvas.create(Block);
        canvas.add(outer);
        canvas.add_child(outer, inner);
        canvas.update();
        let mut r = RecordingRenderer::new();
        canvas.render(&mut r);
        assert_eq!(r.commands.len(), 3);
        assert!(matches!(
            r.commands[0],
            DrawCommand::Quad { color, .. } if color == canvas.style("canvas").background.unwrap()
        ));
        assert_eq!(canvas.render_order(), [outer, inner]);
    }

    #[test]
    fn viewport_render_draws_overlapping_controls_once() {
        let mut canvas = Canvas::new(Size::new(256.0, 256.0), None);
        let wide = canvas.create(Block);
        canvas.add(wide);
        canvas.update();
        let corner = canvas.create(Block);
        canvas.add_child(wide, corner);
        canvas.update();
        canvas.set_bounds(corner, Rect::new(200.0, 200.0, 250.0, 250.0));

        let mut r = RecordingRenderer::new();
        canvas.render_viewport(Rect::new(0.0, 0.0, 150.0, 150.0), &mut r);
        assert_eq!(r.commands.len(), 1, "the canvas-wide control spans many cells");

        r.clear();
        canvas.render_viewport(Rect::new(0.0, 0.0, 256.0, 256.0), &mut r);
        assert_eq!(r.commands.len(), 2);
    }

    #[test]
    fn hidden_controls_are_not_rendered() {
        let mut canvas = Canvas::new(Size::new(100.0, 100.0), None);
        let outer = canvas.create(Block);
        let inner = canvas.create(Block);
        canvas.add(outer);
        canvas.add_child(outer, inner);
        canvas.update();
        assert!(canvas.set_visible(outer, false));
        assert!(!canvas.is_rendered(outer));
        assert!(!canvas.is_rendered(inner));
        assert!(canvas.set_visible(outer, true));
        assert!(canvas.is_rendered(inner));
    }

    #[test]
    fn class_resets_padding_and_overflow() {
        let mut sheet = StyleSheet::empty();
        sheet.insert(
            "framed",
            Style {
                padding: crate::style::Padding::uniform(5.0),
                overflow: Overflow::Hidden,
                ..Style::default()
            },
        );
        let mut canvas = Canvas::new(Size::new(100.0, 100.0), Some(sheet));
        let a = canvas.create(Block);
        assert_eq!(canvas.padding(a), Some(Insets::ZERO));
        assert!(canvas.set_class(a, "framed"));
        assert_eq!(canvas.selector(a), Some("framed"));
        assert_eq!(canvas.padding(a), Some(Insets::uniform(5.0)));
        assert_eq!(canvas.overflow(a), Some(Overflow::Hidden));
    }
}
