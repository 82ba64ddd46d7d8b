// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paged container with a tab strip.

use hashbrown::HashMap;
use kurbo::{Point, Rect, Size};
use trellis_canvas::{
    Canvas, Color, ContainerKind, ControlCx, ControlId, InputEvent, RectExt, RenderCx, Renderer,
    Widget,
};

use crate::{centered, is_primary_press};

/// Callback run with the newly selected page and its index.
pub type SelectHandler = Box<dyn FnMut(&mut ControlCx<'_>, ControlId, usize) + Send>;

/// A stack of pages, one shown at a time, with a strip of tabs along the top.
///
/// Every child is a page. Only the selected page is visible and enabled; the others stay
/// attached but hidden and disabled. The first page added becomes selected. Clicking a
/// tab selects its page.
pub struct TabWindow {
    titles: HashMap<ControlId, String>,
    selected: Option<ControlId>,
    strip_height: f64,
    strip: f64,
    on_select: Option<SelectHandler>,
}

impl core::fmt::Debug for TabWindow {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TabWindow")
            .field("titles", &self.titles)
            .field("selected", &self.selected)
            .field("strip_height", &self.strip_height)
            .field("on_select", &self.on_select.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for TabWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl TabWindow {
    /// Default tab strip height, in unscaled canvas units.
    pub const STRIP_HEIGHT: f64 = 24.0;

    /// An empty tab window.
    pub fn new() -> Self {
        Self {
            titles: HashMap::new(),
            selected: None,
            strip_height: Self::STRIP_HEIGHT,
            strip: Self::STRIP_HEIGHT,
            on_select: None,
        }
    }

    /// Use a different strip height.
    pub fn with_strip_height(mut self, height: f64) -> Self {
        self.strip_height = height.max(0.0);
        self.strip = self.strip_height;
        self
    }

    /// Run `f` whenever the selection changes.
    pub fn on_select(
        mut self,
        f: impl FnMut(&mut ControlCx<'_>, ControlId, usize) + Send + 'static,
    ) -> Self {
        self.on_select = Some(Box::new(f));
        self
    }

    /// The selected page.
    pub fn selected(&self) -> Option<ControlId> {
        self.selected
    }

    /// Tab title of `page`.
    pub fn title(&self, page: ControlId) -> Option<&str> {
        self.titles.get(&page).map(String::as_str)
    }

    /// Attach `page` to `tabs` under `title`. Returns `false` if `tabs` is not a tab
    /// window or the page cannot be attached.
    pub fn add_page(
        canvas: &mut Canvas,
        tabs: ControlId,
        title: impl Into<String>,
        page: ControlId,
    ) -> bool {
        let Some(window) = canvas.widget_mut::<Self>(tabs) else {
            return false;
        };
        window.titles.insert(page, title.into());
        if canvas.add_child(tabs, page) {
            return true;
        }
        if let Some(window) = canvas.widget_mut::<Self>(tabs) {
            window.titles.remove(&page);
        }
        false
    }

    /// Select page `index` of `tabs`. Returns `true` if the selection changed.
    pub fn select_page(canvas: &mut Canvas, tabs: ControlId, index: usize) -> bool {
        canvas
            .update_widget::<Self, _>(tabs, |window, cx| window.select(cx, index))
            .unwrap_or(false)
    }

    fn select(&mut self, cx: &mut ControlCx<'_>, index: usize) -> bool {
        let Some(&page) = cx.children().get(index) else {
            return false;
        };
        if self.selected == Some(page) {
            return false;
        }
        self.selected = Some(page);
        self.sync(cx);
        tracing::debug!(tabs = ?cx.id(), ?page, index, "tab selected");
        if let Some(on_select) = self.on_select.as_mut() {
            on_select(cx, page, index);
        }
        true
    }

    /// Show and enable the selected page, hide and disable the rest.
    fn sync(&self, cx: &mut ControlCx<'_>) {
        let pages = cx.children().to_vec();
        let canvas = cx.canvas_mut();
        for page in pages {
            let shown = self.selected == Some(page);
            canvas.set_visible(page, shown);
            if shown {
                canvas.enable(page);
            } else {
                canvas.disable(page);
            }
        }
    }

    fn tab_rects(&self, content: Rect, count: usize) -> impl Iterator<Item = Rect> + '_ {
        let width = content.width() / count.max(1) as f64;
        let strip = self.strip.min(content.height());
        (0..count).map(move |i| {
            let x = content.x0 + width * i as f64;
            Rect::from_origin_size(Point::new(x, content.y0), Size::new(width, strip))
        })
    }
}

impl Widget for TabWindow {
    fn kind(&self) -> &'static str {
        "tab"
    }

    fn container(&self) -> ContainerKind {
        ContainerKind::List
    }

    fn measure(&mut self, cx: &mut ControlCx<'_>, available: Rect) -> Rect {
        self.strip = cx.scale_value(self.strip_height);
        available
    }

    fn child_area(&self, content: Rect, _index: usize, _count: usize) -> Rect {
        content.cut_top(self.strip)
    }

    fn render(&self, cx: &RenderCx<'_>, renderer: &mut dyn Renderer) {
        cx.draw_frame(renderer);
        let style = cx.style();
        let pages = cx.canvas().children(cx.id());
        let border = cx.canvas().scale_value(style.border_width);
        for (i, (page, tab)) in pages
            .iter()
            .zip(self.tab_rects(cx.content_bounds(), pages.len()))
            .enumerate()
        {
            if self.selected == Some(*page) {
                renderer.draw_quad(tab.origin(), tab.size(), Color::WHITE);
            }
            if let Some(color) = style.border_color
                && border > 0.0
            {
                renderer.draw_border(tab, border, color);
            }
            let title = self
                .titles
                .get(page)
                .cloned()
                .unwrap_or_else(|| format!("Tab {}", i + 1));
            let line = cx.layout_text(&title);
            renderer.draw_text(
                centered(tab, &line),
                &title,
                cx.font_size(),
                style.text_color,
            );
        }
    }

    fn handle_input(&mut self, cx: &mut ControlCx<'_>, event: &InputEvent) {
        if !is_primary_press(cx, event) || !cx.is_hovered() {
            return;
        }
        let Some(position) = event.position() else {
            return;
        };
        let count = cx.children().len();
        let hit = self
            .tab_rects(cx.content_bounds(), count)
            .position(|tab| tab.contains(position));
        if let Some(index) = hit {
            self.select(cx, index);
        }
    }

    fn on_add_child(&mut self, cx: &mut ControlCx<'_>, child: ControlId) {
        if self.selected.is_none() {
            self.selected = Some(child);
        }
        self.sync(cx);
    }

    fn on_remove_child(&mut self, cx: &mut ControlCx<'_>, child: ControlId) {
        self.titles.remove(&child);
        if self.selected == Some(child) {
            self.selected = cx.children().first().copied();
            self.sync(cx);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use trellis_canvas::RecordingRenderer;

    use super::*;
    use crate::{Label, Plane};

    fn window(pages: usize) -> (Canvas, ControlId, Vec<ControlId>) {
        let mut canvas = Canvas::new(Size::new(300.0, 200.0), None);
        let tabs = canvas.create(TabWindow::new());
        canvas.add(tabs);
        let pages: Vec<_> = (0..pages)
            .map(|i| {
                let page = canvas.create(Plane::new());
                assert!(TabWindow::add_page(&mut canvas, tabs, format!("page {i}"), page));
                page
            })
            .collect();
        canvas.update();
        (canvas, tabs, pages)
    }

    #[test]
    fn only_selected_page_is_shown() {
        let (canvas, tabs, pages) = window(3);
        assert_eq!(canvas.widget::<TabWindow>(tabs).unwrap().selected(), Some(pages[0]));
        assert!(canvas.is_rendered(pages[0]));
        assert!(canvas.is_enabled(pages[0]));
        for &page in &pages[1..] {
            assert!(!canvas.is_visible(page));
            assert!(!canvas.is_enabled(page));
            assert!(!canvas.is_rendered(page));
        }
        assert_eq!(
            canvas.bounds(pages[0]),
            Some(Rect::new(0.0, 24.0, 300.0, 200.0)),
            "pages sit below the strip"
        );
    }

    #[test]
    fn clicking_a_tab_selects_it() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        let mut canvas = Canvas::new(Size::new(300.0, 200.0), None);
        let tabs = canvas.create(TabWindow::new().on_select(move |_, _, index| {
            log.lock().push(index);
        }));
        canvas.add(tabs);
        let pages: Vec<_> = (0..3)
            .map(|i| {
                let page = canvas.create(Plane::new());
                TabWindow::add_page(&mut canvas, tabs, format!("page {i}"), page);
                page
            })
            .collect();
        canvas.update();

        canvas.input().push(InputEvent::MousePress {
            button: 0,
            position: Point::new(150.0, 10.0),
        });
        canvas.update();
        assert_eq!(canvas.widget::<TabWindow>(tabs).unwrap().selected(), Some(pages[1]));
        assert!(canvas.is_rendered(pages[1]));
        assert!(!canvas.is_rendered(pages[0]));
        assert_eq!(*seen.lock(), [1]);

        assert!(!TabWindow::select_page(&mut canvas, tabs, 1), "already selected");
        assert!(!TabWindow::select_page(&mut canvas, tabs, 7));
        assert!(TabWindow::select_page(&mut canvas, tabs, 2));
        assert_eq!(*seen.lock(), [1, 2]);
    }

    #[test]
    fn page_content_receives_clicks() {
        let (mut canvas, tabs, pages) = window(2);
        assert_eq!(canvas.hit_test(Point::new(10.0, 100.0)), Some(pages[0]));
        assert_eq!(canvas.hit_test(Point::new(10.0, 10.0)), Some(tabs));
        TabWindow::select_page(&mut canvas, tabs, 1);
        assert_eq!(canvas.hit_test(Point::new(10.0, 100.0)), Some(pages[1]));
    }

    #[test]
    fn removing_selected_page_falls_back_to_first() {
        let (mut canvas, tabs, pages) = window(3);
        TabWindow::select_page(&mut canvas, tabs, 2);
        assert!(canvas.remove_child(tabs, pages[2]));
        let window = canvas.widget::<TabWindow>(tabs).unwrap();
        assert_eq!(window.selected(), Some(pages[0]));
        assert_eq!(window.title(pages[2]), None);
        assert!(canvas.is_visible(pages[0]));
    }

    #[test]
    fn titles_are_drawn_before_pages() {
        let (mut canvas, tabs, pages) = window(2);
        let body = canvas.create(Label::new("body"));
        canvas.add_child(pages[0], body);
        canvas.update();
        assert_eq!(
            canvas.widget::<TabWindow>(tabs).unwrap().title(pages[1]),
            Some("page 1")
        );

        let mut renderer = RecordingRenderer::new();
        canvas.render(&mut renderer);
        assert_eq!(
            renderer.texts().collect::<Vec<_>>(),
            ["page 0", "page 1", "body"]
        );
    }

    #[test]
    fn add_page_rejects_non_tab_parent() {
        let mut canvas = Canvas::new(Size::new(300.0, 200.0), None);
        let plane = canvas.create(Plane::new());
        let page = canvas.create(Plane::new());
        assert!(!TabWindow::add_page(&mut canvas, plane, "x", page));
        assert_eq!(canvas.parent(page), None);
    }
}
