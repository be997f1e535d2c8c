//! Widget tree.
//!
//! Widgets live in an arena owned by the [`App`] and are referred to by
//! [`WidgetId`] handles. A parent keeps its children in insertion order;
//! that order is also the drawing order, so later siblings appear on top.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use log::{debug, warn};
use slotmap::{new_key_type, SlotMap};

use crate::app::App;
use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::{intersect, Point, Rect, Size};
use crate::pick::{id_to_color, PickTable};
use crate::placer::Placement;
use crate::surface::PixelRead;
use crate::widgetclass::{DrawContext, WidgetClass};

new_key_type! {
    /// Handle to a widget. Stale handles are detected, never reused.
    pub struct WidgetId;
}

/// Called with the widget just before it is released.
pub type Destructor = Box<dyn FnOnce(&mut Widget)>;

/// Where a widget's children are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentRect {
    /// The whole screen location.
    #[default]
    SameAsScreen,
    /// A separate area, e.g. the client area of a toplevel.
    Owned(Rect),
}

/// Common widget header plus class data.
pub struct Widget {
    pub(crate) class: Rc<dyn WidgetClass>,
    pub(crate) pick_id: u32,
    pub(crate) pick_color: Color,
    pub(crate) user_data: Option<Box<dyn Any>>,
    pub(crate) destructor: Option<Destructor>,
    pub(crate) parent: Option<WidgetId>,
    pub(crate) children: Vec<WidgetId>,
    pub(crate) placement: Option<Placement>,
    pub(crate) requested_size: Size,
    pub(crate) screen_location: Rect,
    pub(crate) content: ContentRect,
    pub(crate) data: Box<dyn Any>,
}

impl Widget {
    fn new(class: Rc<dyn WidgetClass>, parent: Option<WidgetId>) -> Self {
        let data = class.allocate();
        Self {
            class,
            pick_id: 0,
            pick_color: Color::TRANSPARENT,
            user_data: None,
            destructor: None,
            parent,
            children: Vec::new(),
            placement: None,
            requested_size: Size::default(),
            screen_location: Rect::default(),
            content: ContentRect::SameAsScreen,
            data,
        }
    }

    pub fn class_name(&self) -> &'static str {
        self.class.name()
    }

    pub fn class(&self) -> &Rc<dyn WidgetClass> {
        &self.class
    }

    pub fn pick_id(&self) -> u32 {
        self.pick_id
    }

    /// Color this widget paints into the pick surface.
    pub fn pick_color(&self) -> Color {
        self.pick_color
    }

    pub fn user_data(&self) -> Option<&dyn Any> {
        self.user_data.as_deref()
    }

    pub fn user_data_mut(&mut self) -> Option<&mut (dyn Any + 'static)> {
        self.user_data.as_deref_mut()
    }

    pub fn set_user_data(&mut self, data: Option<Box<dyn Any>>) {
        self.user_data = data;
    }

    pub fn set_destructor(&mut self, destructor: Option<Destructor>) {
        self.destructor = destructor;
    }

    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    pub fn first_child(&self) -> Option<WidgetId> {
        self.children.first().copied()
    }

    pub fn last_child(&self) -> Option<WidgetId> {
        self.children.last().copied()
    }

    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }

    /// A widget is displayed while the placer manages it.
    pub fn is_displayed(&self) -> bool {
        self.placement.is_some()
    }

    pub fn requested_size(&self) -> Size {
        self.requested_size
    }

    pub fn screen_location(&self) -> Rect {
        self.screen_location
    }

    /// Area in which children are placed.
    pub fn content_rect(&self) -> Rect {
        match self.content {
            ContentRect::SameAsScreen => self.screen_location,
            ContentRect::Owned(r) => r,
        }
    }

    pub fn content(&self) -> ContentRect {
        self.content
    }

    /// Class data, if it has type `T`.
    pub fn data<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref()
    }

    pub fn data_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.data.downcast_mut()
    }

    /// Class data, or [`Error::WrongClass`] naming `expected`.
    pub fn data_as<T: Any>(&self, expected: &'static str) -> Result<&T> {
        let found = self.class_name();
        self.data
            .downcast_ref()
            .ok_or(Error::WrongClass { expected, found })
    }

    pub fn data_as_mut<T: Any>(&mut self, expected: &'static str) -> Result<&mut T> {
        let found = self.class.name();
        self.data
            .downcast_mut()
            .ok_or(Error::WrongClass { expected, found })
    }
}

impl fmt::Debug for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Widget")
            .field("class", &self.class.name())
            .field("pick_id", &self.pick_id)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("placement", &self.placement)
            .field("requested_size", &self.requested_size)
            .field("screen_location", &self.screen_location)
            .field("content", &self.content)
            .finish()
    }
}

// ============================================================================
// WidgetTree
// ============================================================================

/// Arena of widgets plus the pick id table.
#[derive(Debug, Default)]
pub struct WidgetTree {
    nodes: SlotMap<WidgetId, Widget>,
    picks: PickTable,
}

impl WidgetTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: WidgetId) -> Option<&Widget> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.nodes.get_mut(id)
    }

    /// Children of `id` in drawing order; empty for unknown ids.
    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.nodes.get(id).map(|w| w.children.as_slice()).unwrap_or(&[])
    }

    pub fn next_sibling(&self, id: WidgetId) -> Option<WidgetId> {
        let parent = self.nodes.get(id)?.parent?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings.get(pos + 1).copied()
    }

    /// Make `id` the last child of its parent. Returns `true` if the
    /// sibling order changed.
    pub fn raise(&mut self, id: WidgetId) -> bool {
        let Some(parent) = self.nodes.get(id).and_then(|w| w.parent) else {
            return false;
        };
        let Some(p) = self.nodes.get_mut(parent) else {
            return false;
        };
        if p.children.last() == Some(&id) {
            return false;
        }
        p.children.retain(|&c| c != id);
        p.children.push(id);
        true
    }

    /// Widget owning `pick_id`.
    pub fn by_pick_id(&self, pick_id: u32) -> Option<WidgetId> {
        self.picks.widget(pick_id)
    }

    /// Widget painted with `color` in the pick surface.
    pub fn by_pick_color(&self, color: Color) -> Option<WidgetId> {
        self.picks.lookup(color)
    }

    /// Add `widget` as the last child of its parent and give it a pick id.
    fn insert(&mut self, widget: Widget) -> WidgetId {
        let parent = widget.parent;
        let id = self.nodes.insert(widget);
        let pick_id = self.picks.assign(id);
        if let Some(w) = self.nodes.get_mut(id) {
            w.pick_id = pick_id;
            w.pick_color = id_to_color(pick_id);
        }
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(p)) {
            p.children.push(id);
        }
        id
    }

    /// Unlink `id` from its parent and drop its pick id.
    fn remove(&mut self, id: WidgetId) -> Option<Widget> {
        let widget = self.nodes.remove(id)?;
        self.picks.release(widget.pick_id);
        if let Some(p) = widget.parent.and_then(|p| self.nodes.get_mut(p)) {
            p.children.retain(|&c| c != id);
        }
        Some(widget)
    }
}

// ============================================================================
// Child drawing
// ============================================================================

impl DrawContext<'_> {
    /// Draw the children of `id` that intersect the parent's content area
    /// clipped by `clipper`. Each child gets that intersection as its clip.
    pub fn draw_children(&mut self, id: WidgetId, clipper: Option<&Rect>) {
        let widgets = self.widgets;
        let Some(parent) = widgets.get(id) else {
            return;
        };
        let content = parent.content_rect();
        let area = match clipper {
            Some(c) => intersect(&content, c),
            None => Some(content),
        };
        self.draw_children_in(id, area)
    }

    /// Draw the children of `id` clipped to `area` only.
    pub fn draw_children_in(&mut self, id: WidgetId, area: Option<Rect>) {
        let Some(area) = area else {
            return;
        };
        let widgets = self.widgets;
        for &child in widgets.children(id) {
            let Some(w) = widgets.get(child) else {
                continue;
            };
            if !w.is_displayed() {
                continue;
            }
            if let Some(clip) = intersect(&w.screen_location, &area) {
                w.class.draw(self, child, Some(&clip));
            }
        }
    }
}

// ============================================================================
// Lifecycle on the application
// ============================================================================

impl App {
    /// Create a widget of class `class_name` as the last child of `parent`.
    ///
    /// The widget is not displayed until it is placed.
    pub fn create_widget(
        &mut self,
        class_name: &str,
        parent: WidgetId,
        user_data: Option<Box<dyn Any>>,
        destructor: Option<Destructor>,
    ) -> Result<WidgetId> {
        if !self.widgets.contains(parent) {
            return Err(Error::NoSuchWidget);
        }
        self.spawn_widget(class_name, Some(parent), user_data, destructor)
    }

    pub(crate) fn spawn_widget(
        &mut self,
        class_name: &str,
        parent: Option<WidgetId>,
        user_data: Option<Box<dyn Any>>,
        destructor: Option<Destructor>,
    ) -> Result<WidgetId> {
        let Some(class) = self.classes.get(class_name) else {
            warn!("unknown widget class '{}'", class_name);
            return Err(Error::UnknownClass(class_name.to_string()));
        };
        let mut widget = Widget::new(class.clone(), parent);
        widget.user_data = user_data;
        widget.destructor = destructor;

        let id = self.widgets.insert(widget);
        if let Some(p) = parent.and_then(|p| self.widgets.get(p)) {
            let area = p.screen_location;
            self.invalidate_rect(&area);
        }
        class.set_defaults(self, id);
        debug!("created {} widget {:?}", class_name, id);
        Ok(id)
    }

    /// Destroy `id` and its whole subtree.
    ///
    /// Children are destroyed first. For each widget the user destructor
    /// runs before the class release hook. Unknown ids are ignored.
    pub fn destroy_widget(&mut self, id: WidgetId) {
        let Some(w) = self.widgets.get(id) else {
            return;
        };
        let area = w.screen_location;
        let placed = w.placement.is_some();
        self.invalidate_rect(&area);
        if placed {
            self.placer_forget(id);
        }

        let children = self.widgets.children(id).to_vec();
        for child in children {
            self.destroy_widget(child);
        }

        if self.active == Some(id) {
            self.active = None;
        }
        let Some(mut widget) = self.widgets.remove(id) else {
            return;
        };
        if let Some(p) = widget.parent.and_then(|p| self.widgets.get(p)) {
            let area = p.screen_location;
            self.invalidate_rect(&area);
        }
        if let Some(destructor) = widget.destructor.take() {
            destructor(&mut widget);
        }
        let class = widget.class.clone();
        class.release(&mut widget);
        debug!("destroyed {} widget {:?}", class.name(), id);
    }

    /// Bring `id` in front of its siblings.
    pub fn raise_widget(&mut self, id: WidgetId) {
        if self.widgets.raise(id) {
            let area = self.widgets.get(id).map(|w| w.screen_location).unwrap_or_default();
            self.invalidate_rect(&area);
        }
    }

    /// Widget drawn at `where_` during the last redraw, if any.
    pub fn pick_widget(&self, where_: Point) -> Option<WidgetId> {
        let pick = self.pick_surface.lock_read();
        let color = pick.pixel(where_)?;
        self.widgets.by_pick_color(color)
    }

    pub fn widgets(&self) -> &WidgetTree {
        &self.widgets
    }

    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.get(id)
    }

    pub fn widget_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.widgets.get_mut(id)
    }

    /// Change the natural size of `id`; a placed widget is laid out again.
    pub fn set_requested_size(&mut self, id: WidgetId, size: Size) {
        let Some(w) = self.widgets.get_mut(id) else {
            return;
        };
        w.requested_size = size;
        if w.placement.is_some() {
            self.placer_run(id);
        }
    }

    /// Give `id` a content area distinct from its screen location.
    pub fn set_content_rect(&mut self, id: WidgetId, rect: Rect) {
        let Some(w) = self.widgets.get_mut(id) else {
            return;
        };
        w.content = ContentRect::Owned(rect);
        self.invalidate_rect(&rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppConfig;
    use crate::backend::HeadlessBackend;
    use crate::placer::PlaceOptions;
    use std::cell::RefCell;

    fn app() -> App {
        App::new(HeadlessBackend::new(), AppConfig::default().with_window_size(200, 100))
            .unwrap()
    }

    #[test]
    fn test_create_links_children_in_order() {
        let mut app = app();
        let root = app.root_widget();
        let a = app.create_widget("frame", root, None, None).unwrap();
        let b = app.create_widget("button", root, None, None).unwrap();
        let c = app.create_widget("frame", a, None, None).unwrap();

        assert_eq!(app.widgets().children(root), &[a, b]);
        assert_eq!(app.widgets().next_sibling(a), Some(b));
        assert_eq!(app.widgets().next_sibling(b), None);
        assert_eq!(app.widget(c).unwrap().parent(), Some(a));
        assert_eq!(app.widget(b).unwrap().class_name(), "button");
        assert!(!app.widget(a).unwrap().is_displayed());
    }

    #[test]
    fn test_unknown_class_and_parent() {
        let mut app = app();
        let root = app.root_widget();
        assert_eq!(
            app.create_widget("slider", root, None, None),
            Err(Error::UnknownClass("slider".into()))
        );
        let a = app.create_widget("frame", root, None, None).unwrap();
        app.destroy_widget(a);
        assert_eq!(
            app.create_widget("frame", a, None, None),
            Err(Error::NoSuchWidget)
        );
    }

    #[test]
    fn test_pick_ids_are_distinct() {
        let mut app = app();
        let root = app.root_widget();
        let a = app.create_widget("frame", root, None, None).unwrap();
        let b = app.create_widget("frame", root, None, None).unwrap();
        let (wa, wb) = (app.widget(a).unwrap(), app.widget(b).unwrap());
        assert_ne!(wa.pick_id(), wb.pick_id());
        assert_eq!(wa.pick_color().alpha, 0xff);
        assert_eq!(app.widgets().by_pick_id(wb.pick_id()), Some(b));
    }

    #[test]
    fn test_destroy_order_children_first() {
        let mut app = app();
        let root = app.root_widget();
        let log = Rc::new(RefCell::new(Vec::new()));
        let tag = |name: &'static str| -> Option<Destructor> {
            let log = log.clone();
            Some(Box::new(move |_w: &mut Widget| log.borrow_mut().push(name)))
        };
        let parent = app.create_widget("frame", root, None, tag("parent")).unwrap();
        let child = app.create_widget("frame", parent, None, tag("child")).unwrap();
        let grandchild = app.create_widget("frame", child, None, tag("grandchild")).unwrap();

        app.destroy_widget(parent);
        assert_eq!(*log.borrow(), vec!["grandchild", "child", "parent"]);
        for id in [parent, child, grandchild] {
            assert!(app.widget(id).is_none());
        }
        assert!(app.widgets().children(root).is_empty());
    }

    #[test]
    fn test_destroy_invalidates_and_clears_active() {
        let mut app = app();
        let root = app.root_widget();
        let a = app.create_widget("frame", root, None, None).unwrap();
        app.place(a, &PlaceOptions::new().x(10).y(10).width(20).height(20));
        app.redraw();
        app.set_active_widget(Some(a));

        app.destroy_widget(a);
        assert_eq!(app.active_widget(), None);
        assert!(app.pending_damage().iter().any(|r| r.contains_rect(&Rect::new(10, 10, 20, 20))));
    }

    #[test]
    fn test_user_data_round_trip() {
        let mut app = app();
        let root = app.root_widget();
        let a = app
            .create_widget("frame", root, Some(Box::new(42u32)), None)
            .unwrap();
        let w = app.widget_mut(a).unwrap();
        assert_eq!(w.user_data().and_then(|d| d.downcast_ref::<u32>()), Some(&42));
        w.set_user_data(None);
        assert!(w.user_data().is_none());
    }

    #[test]
    fn test_content_rect_defaults_to_screen() {
        let mut app = app();
        let root = app.root_widget();
        let a = app.create_widget("frame", root, None, None).unwrap();
        app.place(a, &PlaceOptions::new().x(5).y(6).width(30).height(40));
        let w = app.widget(a).unwrap();
        assert_eq!(w.content(), ContentRect::SameAsScreen);
        assert_eq!(w.content_rect(), Rect::new(5, 6, 30, 40));

        app.set_content_rect(a, Rect::new(7, 8, 10, 10));
        assert_eq!(app.widget(a).unwrap().content_rect(), Rect::new(7, 8, 10, 10));
    }

    #[test]
    fn test_raise() {
        let mut app = app();
        let root = app.root_widget();
        let a = app.create_widget("frame", root, None, None).unwrap();
        let b = app.create_widget("frame", root, None, None).unwrap();
        assert!(!app.widgets.raise(b));
        app.raise_widget(a);
        assert_eq!(app.widgets().children(root), &[b, a]);
        assert!(!app.widgets.raise(root));
    }

    #[test]
    fn test_pick_widget() {
        let mut app = app();
        let root = app.root_widget();
        let a = app.create_widget("frame", root, None, None).unwrap();
        let b = app.create_widget("frame", root, None, None).unwrap();
        app.place(a, &PlaceOptions::new().x(10).y(10).width(50).height(50));
        app.place(b, &PlaceOptions::new().x(40).y(40).width(50).height(50));
        app.redraw();

        assert_eq!(app.pick_widget(Point::new(15, 15)), Some(a));
        // `b` was added later and covers the overlap.
        assert_eq!(app.pick_widget(Point::new(45, 45)), Some(b));
        assert_eq!(app.pick_widget(Point::new(150, 5)), Some(root));
        assert_eq!(app.pick_widget(Point::new(500, 500)), None);
    }
}
