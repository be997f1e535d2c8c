//! The `toplevel` class: a decorated window inside the root window.
//!
//! The requested size is the size of the client area. Around it the
//! toplevel draws a border and a title bar holding the title and an
//! optional close button; an optional resize handle sits in the bottom-right
//! corner. Dragging the title bar moves the window, dragging the handle
//! resizes it.

use std::any::Any;

use log::debug;

use crate::app::App;
use crate::color::Color;
use crate::draw::{draw_polyline, draw_text, fill};
use crate::error::{Error, Result};
use crate::event::{Event, EventKind, MouseButton};
use crate::geometry::{clip, intersect, Point, Rect, Size};
use crate::placer::PlaceOptions;
use crate::relief::{draw_button, Relief};
use crate::widget::{ContentRect, WidgetId};
use crate::widgetclass::{DrawContext, WidgetClass};

pub const TOPLEVEL_CLASS: &str = "toplevel";
pub const TITLE_BAR_HEIGHT: i32 = 25;
/// Side of the close button.
pub const DECORATION_SIZE: i32 = 15;
/// Side of the resize handle.
pub const RESIZE_HANDLE_SIZE: i32 = 15;
pub const DEFAULT_TOPLEVEL_SIZE: Size = Size::new(320, 240);
pub const DEFAULT_TOPLEVEL_BORDER_WIDTH: i32 = 4;
pub const DEFAULT_TOPLEVEL_MIN_SIZE: Size = Size::new(160, 120);
pub const DEFAULT_TOPLEVEL_TITLE: &str = "Toplevel";

const BORDER_COLOR: Color = Color::rgb(0x30, 0x30, 0x30);
const TITLE_BAR_COLOR: Color = Color::rgb(0x80, 0x80, 0x80);
const CLOSE_BUTTON_COLOR: Color = Color::rgb(0xff, 0x60, 0x60);
const RESIZE_HANDLE_COLOR: Color = Color::rgb(0x60, 0x60, 0xff);

/// Axes along which a toplevel can be resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Resizable {
    None,
    X,
    Y,
    #[default]
    Both,
}

impl Resizable {
    pub fn x(self) -> bool {
        matches!(self, Resizable::X | Resizable::Both)
    }

    pub fn y(self) -> bool {
        matches!(self, Resizable::Y | Resizable::Both)
    }
}

/// Pointer interaction in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Title bar drag: pointer and placement offsets at button-down.
    Moving { start: Point, origin: Point },
    /// Resize handle drag: pointer and requested size at button-down.
    Resizing { start: Point, size: Size },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToplevelData {
    pub color: Color,
    pub border_width: i32,
    pub title: String,
    pub closable: bool,
    pub resizable: Resizable,
    pub min_size: Size,
    pub drag: DragState,
    title_bar: Rect,
    close_button: Rect,
    resize_handle: Rect,
}

impl ToplevelData {
    fn new(background: Color) -> Self {
        Self {
            color: background,
            border_width: DEFAULT_TOPLEVEL_BORDER_WIDTH,
            title: DEFAULT_TOPLEVEL_TITLE.to_string(),
            closable: true,
            resizable: Resizable::Both,
            min_size: DEFAULT_TOPLEVEL_MIN_SIZE,
            drag: DragState::Idle,
            title_bar: Rect::default(),
            close_button: Rect::default(),
            resize_handle: Rect::default(),
        }
    }

    pub fn title_bar(&self) -> Rect {
        self.title_bar
    }

    /// Empty when the toplevel is not closable.
    pub fn close_button(&self) -> Rect {
        self.close_button
    }

    /// Empty when the toplevel is not resizable.
    pub fn resize_handle(&self) -> Rect {
        self.resize_handle
    }

    /// Outer rectangle, client area and decorations for a toplevel whose
    /// client area has the size of `placed` and starts at its top-left.
    fn layout(&mut self, placed: &Rect) -> (Rect, Rect) {
        let b = self.border_width;
        let content_size = Size::new(placed.width().max(0), placed.height().max(0));
        let outer = Rect::from_parts(
            placed.top_left,
            Size::new(
                content_size.width + 2 * b,
                content_size.height + 2 * b + TITLE_BAR_HEIGHT,
            ),
        );
        let content = Rect::from_parts(outer.top_left.offset(b, b + TITLE_BAR_HEIGHT), content_size);
        self.title_bar = Rect::from_parts(
            outer.top_left.offset(b, b),
            Size::new(content_size.width, TITLE_BAR_HEIGHT),
        );
        self.close_button = if self.closable {
            Rect::new(
                self.title_bar.x() + 2,
                self.title_bar.y() + (TITLE_BAR_HEIGHT - DECORATION_SIZE) / 2,
                DECORATION_SIZE,
                DECORATION_SIZE,
            )
        } else {
            Rect::default()
        };
        self.resize_handle = if self.resizable != Resizable::None {
            Rect::new(
                outer.right() - b - RESIZE_HANDLE_SIZE,
                outer.bottom() - b - RESIZE_HANDLE_SIZE,
                RESIZE_HANDLE_SIZE,
                RESIZE_HANDLE_SIZE,
            )
        } else {
            Rect::default()
        };
        (outer, content)
    }
}

/// Toplevel attributes to change; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToplevelConfig {
    /// Size of the client area.
    pub requested_size: Option<Size>,
    pub color: Option<Color>,
    pub border_width: Option<i32>,
    pub title: Option<String>,
    pub closable: Option<bool>,
    pub resizable: Option<Resizable>,
    pub min_size: Option<Size>,
}

impl ToplevelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requested_size(mut self, size: Size) -> Self {
        self.requested_size = Some(size);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn border_width(mut self, border: i32) -> Self {
        self.border_width = Some(border);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn closable(mut self, closable: bool) -> Self {
        self.closable = Some(closable);
        self
    }

    pub fn resizable(mut self, resizable: Resizable) -> Self {
        self.resizable = Some(resizable);
        self
    }

    pub fn min_size(mut self, size: Size) -> Self {
        self.min_size = Some(size);
        self
    }
}

/// Class object for toplevels.
pub struct ToplevelClass;

impl WidgetClass for ToplevelClass {
    fn name(&self) -> &'static str {
        TOPLEVEL_CLASS
    }

    fn allocate(&self) -> Box<dyn Any> {
        Box::new(ToplevelData::new(Color::default()))
    }

    fn set_defaults(&self, app: &mut App, id: WidgetId) {
        let data = ToplevelData::new(app.config.background);
        if let Some(w) = app.widgets.get_mut(id) {
            w.requested_size = DEFAULT_TOPLEVEL_SIZE;
            w.content = ContentRect::Owned(Rect::default());
            w.data = Box::new(data);
        }
    }

    fn geometry_changed(&self, app: &mut App, id: WidgetId) {
        let Some(w) = app.widgets.get_mut(id) else {
            return;
        };
        let placed = w.screen_location;
        let Some(data) = w.data_mut::<ToplevelData>() else {
            return;
        };
        let (outer, content) = data.layout(&placed);
        w.screen_location = outer;
        w.content = ContentRect::Owned(content);
    }

    fn draw(&self, ctx: &mut DrawContext<'_>, id: WidgetId, clipper: Option<&Rect>) {
        let widgets = ctx.widgets;
        let Some(w) = widgets.get(id) else {
            return;
        };
        let Some(data) = w.data::<ToplevelData>() else {
            return;
        };
        let screen = w.screen_location;
        let Some(draw_rect) = clip(&screen, clipper) else {
            return;
        };
        let content = w.content_rect();

        fill(&mut ctx.pick, w.pick_color, Some(&draw_rect));

        let b = data.border_width;
        if b > 0 {
            let inner_h = screen.height() - 2 * b;
            let strips = [
                Rect::new(screen.x(), screen.y(), screen.width(), b),
                Rect::new(screen.x(), screen.bottom() - b, screen.width(), b),
                Rect::new(screen.x(), screen.y() + b, b, inner_h),
                Rect::new(screen.right() - b, screen.y() + b, b, inner_h),
            ];
            for strip in strips {
                if let Some(part) = intersect(&strip, &draw_rect) {
                    fill(&mut ctx.surface, BORDER_COLOR, Some(&part));
                }
            }
        }

        if let Some(bar) = intersect(&data.title_bar, &draw_rect) {
            fill(&mut ctx.surface, TITLE_BAR_COLOR, Some(&bar));
            let font = ctx.default_font;
            let text_h = font.measure(&data.title).height;
            let mut x = data.title_bar.x() + 5;
            if data.closable {
                x += DECORATION_SIZE + 2;
            }
            let y = data.title_bar.y() + (TITLE_BAR_HEIGHT - text_h) / 2;
            draw_text(&mut ctx.surface, Point::new(x, y), &data.title, font, Color::BLACK, Some(&bar));
        }

        if data.closable {
            if let Some(area) = intersect(&data.close_button, &draw_rect) {
                let r = data.close_button;
                draw_button(&mut ctx.surface, &r, 2, CLOSE_BUTTON_COLOR, 0, Relief::Raised, Some(&area));
                let (left, top) = (r.x() + 3, r.y() + 3);
                let (right, bottom) = (r.right() - 4, r.bottom() - 4);
                let cross = [
                    [Point::new(left, top), Point::new(right, bottom)],
                    [Point::new(left, bottom), Point::new(right, top)],
                ];
                for line in &cross {
                    draw_polyline(&mut ctx.surface, line, Color::BLACK, Some(&area));
                }
            }
        }

        if let Some(client) = intersect(&content, &draw_rect) {
            fill(&mut ctx.surface, data.color, Some(&client));
            ctx.draw_children(id, Some(&client));
        }

        if data.resizable != Resizable::None {
            if let Some(handle) = intersect(&data.resize_handle, &draw_rect) {
                fill(&mut ctx.surface, RESIZE_HANDLE_COLOR, Some(&handle));
            }
        }
    }

    fn handle(&self, app: &mut App, id: WidgetId, event: &Event) -> bool {
        let is_active = app.active == Some(id);
        let Some(w) = app.widgets.get(id) else {
            return false;
        };
        let placement = w.placement.unwrap_or_default();
        let requested = w.requested_size;
        let Some(data) = w.data::<ToplevelData>() else {
            return false;
        };
        let data = data.clone();

        match &event.kind {
            EventKind::MouseButtonDown(m) if m.button == Some(MouseButton::Left) => {
                let p = m.position;
                app.raise_widget(id);
                if data.closable && data.close_button.contains(p) {
                    debug!("closing toplevel {:?}", id);
                    if is_active {
                        app.active = None;
                    }
                    app.destroy_widget(id);
                    return true;
                }
                let drag = if data.resizable != Resizable::None && data.resize_handle.contains(p) {
                    DragState::Resizing {
                        start: p,
                        size: requested,
                    }
                } else if data.title_bar.contains(p) {
                    DragState::Moving {
                        start: p,
                        origin: Point::new(placement.x, placement.y),
                    }
                } else {
                    return false;
                };
                set_drag(app, id, drag);
                app.active = Some(id);
                true
            }
            EventKind::MouseMove(m) if is_active => match data.drag {
                DragState::Moving { start, origin } => {
                    let d = m.position - start;
                    app.place(id, &PlaceOptions::new().x(origin.x + d.x).y(origin.y + d.y));
                    true
                }
                DragState::Resizing { start, size } => {
                    let d = m.position - start;
                    let mut new_size = size;
                    if data.resizable.x() {
                        new_size.width = data.min_size.width.max(size.width + d.x);
                    }
                    if data.resizable.y() {
                        new_size.height = data.min_size.height.max(size.height + d.y);
                    }
                    if new_size != requested {
                        let config = ToplevelConfig::new().requested_size(new_size);
                        let _ = app.toplevel_configure(id, &config);
                    }
                    true
                }
                DragState::Idle => false,
            },
            EventKind::MouseButtonUp(m) if is_active && m.button == Some(MouseButton::Left) => {
                set_drag(app, id, DragState::Idle);
                app.active = None;
                let area = app.widgets.get(id).map(|w| w.screen_location).unwrap_or_default();
                app.invalidate_rect(&area);
                true
            }
            _ => false,
        }
    }
}

fn set_drag(app: &mut App, id: WidgetId, drag: DragState) {
    if let Some(data) = app
        .widgets
        .get_mut(id)
        .and_then(|w| w.data_mut::<ToplevelData>())
    {
        data.drag = drag;
    }
}

impl App {
    /// Change the attributes of toplevel `id`. The requested size is the
    /// size of the client area.
    pub fn toplevel_configure(&mut self, id: WidgetId, config: &ToplevelConfig) -> Result<()> {
        let w = self.widgets.get_mut(id).ok_or(Error::NoSuchWidget)?;
        let data = w.data_as_mut::<ToplevelData>(TOPLEVEL_CLASS)?;
        let mut geometry = false;

        if let Some(color) = config.color {
            data.color = color;
        }
        if let Some(border) = config.border_width {
            data.border_width = border.max(0);
            geometry = true;
        }
        if let Some(title) = &config.title {
            data.title = title.clone();
            geometry = true;
        }
        if let Some(closable) = config.closable {
            data.closable = closable;
            geometry = true;
        }
        if let Some(resizable) = config.resizable {
            data.resizable = resizable;
            geometry = true;
        }
        if let Some(min_size) = config.min_size {
            data.min_size = min_size;
        }
        if let Some(size) = config.requested_size {
            w.requested_size = size;
            geometry = true;
        }

        let placed = w.placement.is_some();
        let area = w.screen_location;
        if geometry && placed {
            self.placer_run(id);
        } else {
            self.invalidate_rect(&area);
        }
        Ok(())
    }

    /// Attributes of toplevel `id`.
    pub fn toplevel_data(&self, id: WidgetId) -> Result<&ToplevelData> {
        self.widgets
            .get(id)
            .ok_or(Error::NoSuchWidget)?
            .data_as::<ToplevelData>(TOPLEVEL_CLASS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppConfig;
    use crate::backend::HeadlessBackend;
    use crate::surface::PixelRead;

    fn setup() -> (App, WidgetId) {
        let mut app = App::new(
            HeadlessBackend::new(),
            AppConfig::default().with_window_size(600, 400),
        )
        .unwrap();
        let root = app.root_widget();
        let t = app.create_widget(TOPLEVEL_CLASS, root, None, None).unwrap();
        app.toplevel_configure(t, &ToplevelConfig::new().requested_size(Size::new(200, 100)))
            .unwrap();
        app.place(t, &PlaceOptions::new().x(50).y(40));
        app.redraw();
        (app, t)
    }

    fn left_drag(app: &mut App, from: Point, to: Point) {
        app.redraw();
        app.dispatch_event(&Event::mouse_down(from, MouseButton::Left));
        app.dispatch_event(&Event::mouse_move(to));
        app.dispatch_event(&Event::mouse_up(to, MouseButton::Left));
    }

    #[test]
    fn test_defaults() {
        let mut app = App::new(HeadlessBackend::new(), AppConfig::default()).unwrap();
        let root = app.root_widget();
        let t = app.create_widget(TOPLEVEL_CLASS, root, None, None).unwrap();
        let data = app.toplevel_data(t).unwrap();
        assert_eq!(data.title, "Toplevel");
        assert_eq!(data.border_width, 4);
        assert!(data.closable);
        assert_eq!(data.resizable, Resizable::Both);
        assert_eq!(data.min_size, Size::new(160, 120));
        assert_eq!(app.widget(t).unwrap().requested_size(), Size::new(320, 240));
    }

    #[test]
    fn test_geometry() {
        let (app, t) = setup();
        let w = app.widget(t).unwrap();
        assert_eq!(w.screen_location(), Rect::new(50, 40, 208, 133));
        assert_eq!(w.content_rect(), Rect::new(54, 69, 200, 100));
        let data = app.toplevel_data(t).unwrap();
        assert_eq!(data.title_bar(), Rect::new(54, 44, 200, 25));
        assert_eq!(data.close_button(), Rect::new(56, 49, 15, 15));
        assert_eq!(data.resize_handle(), Rect::new(239, 154, 15, 15));
    }

    #[test]
    fn test_decorations_toggle() {
        let (mut app, t) = setup();
        app.toplevel_configure(
            t,
            &ToplevelConfig::new().closable(false).resizable(Resizable::None),
        )
        .unwrap();
        let data = app.toplevel_data(t).unwrap();
        assert!(data.close_button().is_empty());
        assert!(data.resize_handle().is_empty());
    }

    #[test]
    fn test_draw_colors() {
        let (app, t) = setup();
        let s = app.root_surface().lock_read();
        assert_eq!(s.pixel(Point::new(51, 41)), Some(BORDER_COLOR));
        assert_eq!(s.pixel(Point::new(250, 45)), Some(TITLE_BAR_COLOR));
        assert_eq!(s.pixel(Point::new(100, 100)), Some(app.config().background));
        assert_eq!(s.pixel(Point::new(245, 160)), Some(RESIZE_HANDLE_COLOR));
        drop(s);
        assert_eq!(app.pick_widget(Point::new(100, 100)), Some(t));
    }

    #[test]
    fn test_move_by_title_bar() {
        let (mut app, t) = setup();
        left_drag(&mut app, Point::new(150, 50), Point::new(180, 70));
        assert_eq!(app.widget(t).unwrap().screen_location().top_left, Point::new(80, 60));
        assert_eq!(app.active_widget(), None);
        assert_eq!(app.toplevel_data(t).unwrap().drag, DragState::Idle);
    }

    #[test]
    fn test_resize_clamped_to_min() {
        let (mut app, t) = setup();
        left_drag(&mut app, Point::new(245, 160), Point::new(265, 180));
        assert_eq!(app.widget(t).unwrap().requested_size(), Size::new(220, 120));

        // Shrinking below the minimum stops at the minimum.
        left_drag(&mut app, Point::new(265, 180), Point::new(100, 100));
        assert_eq!(app.widget(t).unwrap().requested_size(), Size::new(160, 120));
    }

    #[test]
    fn test_resize_single_axis() {
        let (mut app, t) = setup();
        app.toplevel_configure(t, &ToplevelConfig::new().resizable(Resizable::X))
            .unwrap();
        left_drag(&mut app, Point::new(245, 160), Point::new(275, 200));
        assert_eq!(app.widget(t).unwrap().requested_size(), Size::new(230, 100));
    }

    #[test]
    fn test_close_button_destroys() {
        let (mut app, t) = setup();
        let child = app.create_widget("frame", t, None, None).unwrap();
        app.dispatch_event(&Event::mouse_down(Point::new(60, 55), MouseButton::Left));
        assert!(app.widget(t).is_none());
        assert!(app.widget(child).is_none());
        assert_eq!(app.active_widget(), None);
    }

    #[test]
    fn test_children_placed_in_client_area() {
        let (mut app, t) = setup();
        let child = app.create_widget("frame", t, None, None).unwrap();
        app.place(child, &PlaceOptions::new().x(10).y(10).width(20).height(20));
        assert_eq!(app.widget(child).unwrap().screen_location(), Rect::new(64, 79, 20, 20));

        left_drag(&mut app, Point::new(150, 50), Point::new(160, 50));
        assert_eq!(app.widget(child).unwrap().screen_location(), Rect::new(74, 79, 20, 20));
    }

    #[test]
    fn test_click_raises() {
        let (mut app, first) = setup();
        let root = app.root_widget();
        let second = app.create_widget(TOPLEVEL_CLASS, root, None, None).unwrap();
        app.place(second, &PlaceOptions::new().x(100).y(60));
        app.redraw();
        assert_eq!(app.widgets().children(root), &[first, second]);

        // Title bar of `first`, outside `second`.
        left_drag(&mut app, Point::new(80, 50), Point::new(80, 50));
        assert_eq!(app.widgets().children(root), &[second, first]);
    }
}
