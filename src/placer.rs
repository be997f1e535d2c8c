//! Placer geometry manager.
//!
//! A widget is displayed once it has placement parameters. Its screen
//! location is computed from those parameters relative to the parent's
//! content area:
//!
//! - position: `x + rel_x * parent_width`, `y + rel_y * parent_height`
//! - size: relative size if non-zero, else absolute size if non-zero, else
//!   the widget's requested size
//! - the anchor point of the resulting box lands on the position

use log::debug;

use crate::app::App;
use crate::geometry::{Anchor, Point, Rect, Size};
use crate::widget::{ContentRect, WidgetId};

/// Placement parameters of a displayed widget.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    pub anchor: Anchor,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub rel_x: f32,
    pub rel_y: f32,
    pub rel_width: f32,
    pub rel_height: f32,
}

impl Placement {
    /// Screen rectangle for a widget with natural size `requested` inside
    /// `parent`.
    pub fn resolve(&self, parent: &Rect, requested: Size) -> Rect {
        let pw = parent.width() as f32;
        let ph = parent.height() as f32;
        let pos = Point::new(
            self.x + (self.rel_x * pw) as i32,
            self.y + (self.rel_y * ph) as i32,
        );
        let width = if self.rel_width > 0.0 {
            (self.rel_width * pw) as i32
        } else if self.width > 0 {
            self.width
        } else {
            requested.width
        };
        let height = if self.rel_height > 0.0 {
            (self.rel_height * ph) as i32
        } else if self.height > 0 {
            self.height
        } else {
            requested.height
        };
        let size = Size::new(width, height);
        let top_left = parent.top_left + pos - self.anchor.offset(size);
        Rect::from_parts(top_left, size)
    }
}

/// Partial update of [`Placement`]; `None` fields keep their value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaceOptions {
    pub anchor: Option<Anchor>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub rel_x: Option<f32>,
    pub rel_y: Option<f32>,
    pub rel_width: Option<f32>,
    pub rel_height: Option<f32>,
}

impl PlaceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn x(mut self, x: i32) -> Self {
        self.x = Some(x);
        self
    }

    pub fn y(mut self, y: i32) -> Self {
        self.y = Some(y);
        self
    }

    pub fn width(mut self, width: i32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: i32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn rel_x(mut self, rel_x: f32) -> Self {
        self.rel_x = Some(rel_x);
        self
    }

    pub fn rel_y(mut self, rel_y: f32) -> Self {
        self.rel_y = Some(rel_y);
        self
    }

    pub fn rel_width(mut self, rel_width: f32) -> Self {
        self.rel_width = Some(rel_width);
        self
    }

    pub fn rel_height(mut self, rel_height: f32) -> Self {
        self.rel_height = Some(rel_height);
        self
    }

    fn apply(&self, p: &mut Placement) {
        if let Some(v) = self.anchor {
            p.anchor = v;
        }
        if let Some(v) = self.x {
            p.x = v;
        }
        if let Some(v) = self.y {
            p.y = v;
        }
        if let Some(v) = self.width {
            p.width = v;
        }
        if let Some(v) = self.height {
            p.height = v;
        }
        if let Some(v) = self.rel_x {
            p.rel_x = v;
        }
        if let Some(v) = self.rel_y {
            p.rel_y = v;
        }
        if let Some(v) = self.rel_width {
            p.rel_width = v;
        }
        if let Some(v) = self.rel_height {
            p.rel_height = v;
        }
    }
}

impl App {
    /// Update the placement of `id` and lay it out. A widget placed for the
    /// first time starts from the default parameters (north-west, zeros).
    pub fn place(&mut self, id: WidgetId, options: &PlaceOptions) {
        let Some(w) = self.widgets.get_mut(id) else {
            return;
        };
        let placement = w.placement.get_or_insert_with(Placement::default);
        options.apply(placement);
        self.placer_run(id);
    }

    /// Recompute the screen location of a placed widget, notify its class,
    /// lay out its placed children and invalidate what changed.
    pub fn placer_run(&mut self, id: WidgetId) {
        let Some(w) = self.widgets.get(id) else {
            return;
        };
        let Some(placement) = w.placement else {
            return;
        };
        let parent_area = match w.parent.and_then(|p| self.widgets.get(p)) {
            Some(p) => p.content_rect(),
            None => self.root_surface.rect(),
        };
        let old = w.screen_location;
        let new = placement.resolve(&parent_area, w.requested_size);

        if let Some(w) = self.widgets.get_mut(id) {
            w.screen_location = new;
        }
        debug!("placed {:?} at {:?}", id, new);

        let class = self.widgets.get(id).map(|w| w.class.clone());
        if let Some(class) = class {
            class.geometry_changed(self, id);
        }
        let new = self.widgets.get(id).map_or(new, |w| w.screen_location);

        let children = self.widgets.children(id).to_vec();
        for child in children {
            self.placer_run(child);
        }

        if !old.is_empty() && old != new {
            self.invalidate_rect(&old);
        }
        self.invalidate_rect(&new);
    }

    /// Stop managing `id`: it disappears and its geometry is reset.
    pub fn placer_forget(&mut self, id: WidgetId) {
        let Some(w) = self.widgets.get_mut(id) else {
            return;
        };
        let area = w.screen_location;
        w.placement = None;
        w.screen_location = Rect::default();
        w.content = ContentRect::SameAsScreen;
        self.invalidate_rect(&area);
    }
}
