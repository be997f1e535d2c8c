//! Application context and main loop.
//!
//! [`App`] owns the backend, the root and pick surfaces, the widget tree,
//! the class registry and the damage queue. The loop is strictly
//! sequential: redraw what is damaged, wait for one event, dispatch it.

use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use log::{debug, error, info, trace};

use crate::backend::Backend;
use crate::button::ButtonClass;
use crate::color::Color;
use crate::damage::DamageQueue;
use crate::draw::fill;
use crate::error::Result;
use crate::event::{Event, EventKind};
use crate::frame::{FrameClass, FRAME_CLASS};
use crate::geometry::{Rect, Size};
use crate::surface::Surface;
use crate::text::Font;
use crate::toplevel::ToplevelClass;
use crate::widget::{WidgetId, WidgetTree};
use crate::widgetclass::{ClassRegistry, DrawContext, WidgetClass};

/// Fallback for events no widget consumed.
pub type DefaultHandler = Rc<dyn Fn(&mut App, &Event) -> bool>;

// ============================================================================
// AppConfig
// ============================================================================

/// Application settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub window_size: Size,
    pub fullscreen: bool,
    /// TrueType file for the default font; `None` uses the built-in font.
    pub font_path: Option<PathBuf>,
    pub font_size: f32,
    pub background: Color,
    pub text_color: Color,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_size: Size::new(800, 600),
            fullscreen: false,
            font_path: None,
            font_size: 22.0,
            background: Color::new(0xa0, 0xa0, 0xa0, 0xff),
            text_color: Color::BLACK,
        }
    }
}

impl AppConfig {
    pub fn with_window_size(mut self, width: i32, height: i32) -> Self {
        self.window_size = Size::new(width, height);
        self
    }

    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    pub fn with_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }
}

// ============================================================================
// App
// ============================================================================

/// A running toolkit instance.
pub struct App {
    pub(crate) backend: Box<dyn Backend>,
    pub(crate) config: AppConfig,
    pub(crate) classes: ClassRegistry,
    pub(crate) widgets: WidgetTree,
    pub(crate) damage: DamageQueue,
    pub(crate) root_surface: Surface,
    pub(crate) pick_surface: Surface,
    pub(crate) default_font: Font,
    pub(crate) active: Option<WidgetId>,
    pub(crate) default_handler: Option<DefaultHandler>,
    pub(crate) quit: bool,
    pub(crate) root: WidgetId,
}

impl App {
    /// Open the main window and create the root frame covering it.
    ///
    /// The frame, button and toplevel classes are registered.
    pub fn new(backend: impl Backend + 'static, config: AppConfig) -> Result<Self> {
        let mut backend: Box<dyn Backend> = Box::new(backend);
        let root_surface = backend
            .open_window(config.window_size, config.fullscreen)
            .map_err(|e| {
                error!("cannot open main window: {}", e);
                e
            })?;
        let pick_surface = backend.create_surface(root_surface.size(), true).map_err(|e| {
            error!("cannot create pick surface: {}", e);
            e
        })?;
        let default_font = backend
            .load_font(config.font_path.as_deref(), config.font_size)
            .map_err(|e| {
                error!("cannot load default font: {}", e);
                e
            })?;

        let mut classes = ClassRegistry::new();
        classes.register(Rc::new(FrameClass));
        classes.register(Rc::new(ButtonClass));
        classes.register(Rc::new(ToplevelClass));

        let mut app = Self {
            backend,
            config,
            classes,
            widgets: WidgetTree::new(),
            damage: DamageQueue::new(),
            root_surface,
            pick_surface,
            default_font,
            active: None,
            default_handler: None,
            quit: false,
            root: WidgetId::default(),
        };
        app.root = app.spawn_widget(FRAME_CLASS, None, None, None)?;
        let area = app.root_surface.rect();
        if let Some(root) = app.widgets.get_mut(app.root) {
            root.screen_location = area;
            root.requested_size = area.size;
        }
        app.invalidate_rect(&area);
        info!(
            "application started ({}x{}, classes: {:?})",
            area.width(),
            area.height(),
            app.classes.names()
        );
        Ok(app)
    }

    /// Add a widget class; widgets of that class can then be created by
    /// name.
    pub fn register_class(&mut self, class: Rc<dyn WidgetClass>) {
        info!("registering widget class '{}'", class.name());
        self.classes.register(class);
    }

    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The frame covering the whole window.
    pub fn root_widget(&self) -> WidgetId {
        self.root
    }

    pub fn root_surface(&self) -> &Surface {
        &self.root_surface
    }

    pub fn root_surface_mut(&mut self) -> &mut Surface {
        &mut self.root_surface
    }

    pub fn pick_surface(&self) -> &Surface {
        &self.pick_surface
    }

    pub fn default_font(&self) -> &Font {
        &self.default_font
    }

    /// Schedule `rect` for redraw at the next pass.
    pub fn invalidate_rect(&mut self, rect: &Rect) {
        self.damage.invalidate(rect);
    }

    /// Rectangles waiting for the next redraw.
    pub fn pending_damage(&self) -> &[Rect] {
        self.damage.rects()
    }

    /// Redraw every damaged rectangle and present them.
    pub fn redraw(&mut self) {
        if self.damage.is_empty() || !self.widgets.contains(self.root) {
            return;
        }
        let start = Instant::now();
        let rects = self.damage.take();
        {
            let mut ctx = DrawContext {
                widgets: &self.widgets,
                surface: self.root_surface.lock(),
                pick: self.pick_surface.lock(),
                default_font: &self.default_font,
            };
            for rect in &rects {
                fill(&mut ctx.pick, Color::TRANSPARENT, Some(rect));
            }
            for rect in &rects {
                ctx.draw_widget(self.root, Some(rect));
            }
        }
        self.backend.present(&self.root_surface, &rects);
        debug!(
            "redrew {} rectangle(s) in {:?}",
            rects.len(),
            start.elapsed()
        );
    }

    /// Route one event. Returns `true` if a widget or the default handler
    /// consumed it.
    pub fn dispatch_event(&mut self, event: &Event) -> bool {
        trace!("event {:?}", event.kind);
        match event.kind {
            EventKind::Exposed => {
                let area = self.root_surface.rect();
                self.invalidate_rect(&area);
                return true;
            }
            EventKind::Close => {
                self.quit_request();
                return true;
            }
            _ => {}
        }

        let target = match self.active {
            Some(id) => Some(id),
            None => event
                .mouse()
                .and_then(|m| self.pick_widget(m.position)),
        };
        if let Some(id) = target {
            let class = self.widgets.get(id).map(|w| w.class.clone());
            if let Some(class) = class {
                if class.handle(self, id, event) {
                    return true;
                }
            }
        }
        match self.default_handler.clone() {
            Some(handler) => handler(self, event),
            None => false,
        }
    }

    /// Run until [`App::quit_request`] is called or the window is closed.
    pub fn run(&mut self) {
        info!("entering main loop");
        self.quit = false;
        while !self.quit {
            self.redraw();
            let event = self.backend.wait_event();
            self.dispatch_event(&event);
        }
        info!("main loop finished");
    }

    /// Make [`App::run`] return after the current event.
    pub fn quit_request(&mut self) {
        self.quit = true;
    }

    pub fn is_quit_requested(&self) -> bool {
        self.quit
    }

    /// Widget receiving events regardless of the pointer position.
    pub fn active_widget(&self) -> Option<WidgetId> {
        self.active
    }

    pub fn set_active_widget(&mut self, id: Option<WidgetId>) {
        self.active = id;
    }

    pub fn set_default_handler(&mut self, handler: Option<DefaultHandler>) {
        self.default_handler = handler;
    }

    pub fn default_handler(&self) -> Option<DefaultHandler> {
        self.default_handler.clone()
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let root = self.root;
        self.destroy_widget(root);
        self.active = None;
        self.default_handler = None;
        self.damage.clear();
        info!("application closed");
    }
}
