//! Widget classes.
//!
//! A class supplies the behavior shared by all widgets of one kind: how their
//! private data is created and released, how they draw, how they react to
//! events and to geometry changes. Classes are registered by name in the
//! [`App`]; widgets are created from a class name.

use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;

use crate::app::App;
use crate::event::Event;
use crate::geometry::Rect;
use crate::surface::SurfaceLock;
use crate::text::Font;
use crate::widget::{Widget, WidgetId, WidgetTree};

/// Behavior of a widget class.
///
/// All callbacks receive the widget by id. Class data is reached through
/// [`Widget::data`] / [`Widget::data_mut`] after looking the widget up.
pub trait WidgetClass {
    /// Registry key, e.g. `"button"`.
    fn name(&self) -> &'static str;

    /// Fresh class-specific data for a new widget.
    fn allocate(&self) -> Box<dyn Any>;

    /// Called when the widget is destroyed, after the user destructor.
    fn release(&self, _widget: &mut Widget) {}

    /// Initialize class data and requested size of a newly created widget.
    fn set_defaults(&self, app: &mut App, id: WidgetId);

    /// Draw the widget and its children, restricted to `clipper`.
    fn draw(&self, ctx: &mut DrawContext<'_>, id: WidgetId, clipper: Option<&Rect>);

    /// React to an event. Returns `true` if the event was consumed.
    fn handle(&self, _app: &mut App, _id: WidgetId, _event: &Event) -> bool {
        false
    }

    /// Called by the placer after the widget's screen location changed.
    fn geometry_changed(&self, _app: &mut App, _id: WidgetId) {}
}

/// Everything a draw callback may touch during one redraw pass.
pub struct DrawContext<'s> {
    pub widgets: &'s WidgetTree,
    /// The visible root surface.
    pub surface: SurfaceLock<'s>,
    /// The offscreen hit-test surface.
    pub pick: SurfaceLock<'s>,
    pub default_font: &'s Font,
}

impl DrawContext<'_> {
    /// Draw `id` through its class.
    pub fn draw_widget(&mut self, id: WidgetId, clipper: Option<&Rect>) {
        let widgets = self.widgets;
        if let Some(widget) = widgets.get(id) {
            widget.class.draw(self, id, clipper);
        }
    }
}

/// Classes known to an application, keyed by name.
#[derive(Default)]
pub struct ClassRegistry {
    classes: HashMap<&'static str, Rc<dyn WidgetClass>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a class. Returns the class previously registered
    /// under the same name.
    pub fn register(&mut self, class: Rc<dyn WidgetClass>) -> Option<Rc<dyn WidgetClass>> {
        self.classes.insert(class.name(), class)
    }

    pub fn get(&self, name: &str) -> Option<Rc<dyn WidgetClass>> {
        self.classes.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Registered class names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.classes.keys().copied().collect();
        names.sort_unstable();
        names
    }
}
