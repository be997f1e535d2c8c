//! The `button` class: a raised, rounded frame that runs a callback when
//! clicked.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use log::{debug, warn};

use crate::app::App;
use crate::draw::copy_surface;
use crate::error::{Error, Result};
use crate::event::{Event, EventKind, KeyCode, MouseButton};
use crate::frame::{FrameConfig, FrameData};
use crate::geometry::{clip, intersect, Point, Rect, Size};
use crate::relief::{draw_button, Relief};
use crate::surface::Surface;
use crate::widget::WidgetId;
use crate::widgetclass::{DrawContext, WidgetClass};

pub const BUTTON_CLASS: &str = "button";
pub const DEFAULT_BUTTON_BORDER_WIDTH: i32 = 4;
pub const DEFAULT_BUTTON_CORNER_RADIUS: i32 = 10;

/// Called when a button is clicked, with the button's user parameter.
pub type ButtonCallback = Rc<dyn Fn(&mut App, WidgetId, &Event, Option<Rc<dyn Any>>)>;

/// State of a button widget.
#[derive(Clone)]
pub struct ButtonData {
    pub frame: FrameData,
    pub corner_radius: i32,
    pub callback: Option<ButtonCallback>,
    pub user_param: Option<Rc<dyn Any>>,
    pub pressed: bool,
}

impl fmt::Debug for ButtonData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ButtonData")
            .field("frame", &self.frame)
            .field("corner_radius", &self.corner_radius)
            .field("callback", &self.callback.is_some())
            .field("pressed", &self.pressed)
            .finish()
    }
}

/// Button attributes to change; `None` fields are left as they are.
#[derive(Clone, Default)]
pub struct ButtonConfig {
    pub frame: FrameConfig,
    pub corner_radius: Option<i32>,
    pub callback: Option<ButtonCallback>,
    pub user_param: Option<Rc<dyn Any>>,
}

impl ButtonConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from frame attributes.
    pub fn with_frame(frame: FrameConfig) -> Self {
        Self {
            frame,
            ..Self::default()
        }
    }

    pub fn corner_radius(mut self, radius: i32) -> Self {
        self.corner_radius = Some(radius);
        self
    }

    pub fn callback(
        mut self,
        callback: impl Fn(&mut App, WidgetId, &Event, Option<Rc<dyn Any>>) + 'static,
    ) -> Self {
        self.callback = Some(Rc::new(callback));
        self
    }

    pub fn user_param(mut self, param: Rc<dyn Any>) -> Self {
        self.user_param = Some(param);
        self
    }
}

/// Copy `rect` of `image` (all of it when `None`) into a new surface.
fn copy_image(image: &Surface, rect: Option<Rect>) -> Option<Surface> {
    let src_rect = rect.unwrap_or_else(|| image.rect());
    if src_rect.is_empty() {
        return None;
    }
    let mut copy = Surface::new(src_rect.size, image.channel_order(), image.has_alpha());
    let src = image.lock_read();
    let copied = copy_surface(&mut copy.lock(), None, &src, Some(&src_rect), false);
    match copied {
        Ok(()) => Some(copy),
        Err(e) => {
            warn!("cannot copy button image: {}", e);
            None
        }
    }
}

/// Class object for buttons.
pub struct ButtonClass;

impl WidgetClass for ButtonClass {
    fn name(&self) -> &'static str {
        BUTTON_CLASS
    }

    fn allocate(&self) -> Box<dyn Any> {
        Box::new(ButtonData {
            frame: FrameData::new(&Default::default()),
            corner_radius: DEFAULT_BUTTON_CORNER_RADIUS,
            callback: None,
            user_param: None,
            pressed: false,
        })
    }

    fn set_defaults(&self, app: &mut App, id: WidgetId) {
        let mut frame = FrameData::new(&app.config);
        frame.border_width = DEFAULT_BUTTON_BORDER_WIDTH;
        frame.relief = Relief::Raised;
        let data = ButtonData {
            frame,
            corner_radius: DEFAULT_BUTTON_CORNER_RADIUS,
            callback: None,
            user_param: None,
            pressed: false,
        };
        if let Some(w) = app.widgets.get_mut(id) {
            w.requested_size = Size::default();
            w.data = Box::new(data);
        }
    }

    fn draw(&self, ctx: &mut DrawContext<'_>, id: WidgetId, clipper: Option<&Rect>) {
        let widgets = ctx.widgets;
        let Some(w) = widgets.get(id) else {
            return;
        };
        let Some(data) = w.data::<ButtonData>() else {
            return;
        };
        let screen = w.screen_location;
        let Some(draw_rect) = clip(&screen, clipper) else {
            return;
        };
        let frame = &data.frame;
        let radius = data.corner_radius;

        draw_button(&mut ctx.pick, &screen, radius, w.pick_color, 0, Relief::None, Some(&draw_rect));
        let relief = if data.pressed { Relief::Sunken } else { frame.relief };
        draw_button(
            &mut ctx.surface,
            &screen,
            radius,
            frame.color,
            frame.border_width,
            relief,
            Some(&draw_rect),
        );

        let content = screen.inset(frame.border_width);
        let Some(content_clip) = intersect(&content, &draw_rect) else {
            return;
        };
        let shift = if data.pressed { Point::new(1, 1) } else { Point::default() };
        frame.draw_content(&mut ctx.surface, &content, shift, ctx.default_font, &content_clip);
        ctx.draw_children(id, Some(&content_clip));
    }

    fn handle(&self, app: &mut App, id: WidgetId, event: &Event) -> bool {
        let is_active = app.active == Some(id);
        let Some(w) = app.widgets.get_mut(id) else {
            return false;
        };
        let screen = w.screen_location;
        let Some(data) = w.data_mut::<ButtonData>() else {
            return false;
        };
        let was_pressed = data.pressed;

        let mut clicked = false;
        let handled = match &event.kind {
            EventKind::MouseButtonDown(m) if m.button == Some(MouseButton::Left) => {
                if !screen.contains(m.position) {
                    return false;
                }
                data.pressed = true;
                app.active = Some(id);
                true
            }
            EventKind::MouseMove(m) if is_active => {
                data.pressed = screen.contains(m.position);
                true
            }
            EventKind::MouseButtonUp(m) if is_active && m.button == Some(MouseButton::Left) => {
                data.pressed = false;
                clicked = was_pressed && screen.contains(m.position);
                app.active = None;
                true
            }
            EventKind::KeyDown(k) if is_active && is_activation_key(*k) => {
                data.pressed = true;
                true
            }
            EventKind::KeyUp(k) if is_active && is_activation_key(*k) => {
                data.pressed = false;
                clicked = was_pressed;
                true
            }
            _ => false,
        };

        let changed = data.pressed != was_pressed;
        let callback = if clicked { data.callback.clone() } else { None };
        let param = data.user_param.clone();
        if changed {
            app.invalidate_rect(&screen);
        }
        if let Some(callback) = callback {
            debug!("button {:?} clicked", id);
            callback(app, id, event, param);
        }
        handled
    }
}

fn is_activation_key(key: KeyCode) -> bool {
    key == KeyCode::RETURN || key == KeyCode::SPACE
}

impl App {
    /// Change the attributes of button `id`.
    ///
    /// An image is copied into the button, so the caller may drop or reuse
    /// the source surface afterwards. When the size may have changed the
    /// requested size becomes the content size plus the border, or the
    /// given requested size if that is larger.
    pub fn button_configure(&mut self, id: WidgetId, config: &ButtonConfig) -> Result<()> {
        let w = self.widgets.get_mut(id).ok_or(Error::NoSuchWidget)?;
        let data = w.data_as_mut::<ButtonData>(BUTTON_CLASS)?;

        let mut frame_config = config.frame.clone();
        let image = frame_config.image.take();
        frame_config.image_rect = None;
        let mut geometry = data.frame.apply(&frame_config);
        if let Some(image) = image {
            data.frame.image = copy_image(&image, config.frame.image_rect).map(Rc::new);
            data.frame.image_rect = None;
            data.frame.text = None;
            geometry = true;
        }
        if let Some(radius) = config.corner_radius {
            data.corner_radius = radius.max(0);
        }
        if let Some(callback) = &config.callback {
            data.callback = Some(callback.clone());
        }
        if let Some(param) = &config.user_param {
            data.user_param = Some(param.clone());
        }

        let natural = data
            .frame
            .content_size(&self.default_font)
            .unwrap_or_default()
            .expand(data.frame.border_width);
        if geometry {
            w.requested_size = match config.frame.requested_size {
                Some(size) => size.max(natural),
                None => natural,
            };
        } else if let Some(size) = config.frame.requested_size {
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

    /// Attributes of button `id`.
    pub fn button_data(&self, id: WidgetId) -> Result<&ButtonData> {
        self.widgets
            .get(id)
            .ok_or(Error::NoSuchWidget)?
            .data_as::<ButtonData>(BUTTON_CLASS)
    }
}
