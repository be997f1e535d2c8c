//! Hardware abstraction.
//!
//! The toolkit draws into plain [`Surface`]s; a [`Backend`] supplies the
//! window surface, shows updated regions, delivers input events and loads
//! fonts. [`HeadlessBackend`] runs without a display: events are scripted
//! and presented rectangles are recorded, which is what tests and the
//! snapshot tool use.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;

use log::debug;

use crate::color::ChannelOrder;
use crate::error::{Error, Result};
use crate::event::{Event, EventKind};
use crate::geometry::{Rect, Size};
use crate::surface::Surface;
use crate::text::Font;

/// Services the toolkit needs from the platform.
pub trait Backend {
    /// Create the main window and return its drawing surface.
    fn open_window(&mut self, size: Size, fullscreen: bool) -> Result<Surface>;

    /// Create an offscreen surface in the window's pixel format.
    fn create_surface(&mut self, size: Size, has_alpha: bool) -> Result<Surface>;

    /// Show the given regions of the window surface.
    fn present(&mut self, window: &Surface, rects: &[Rect]);

    /// Block until the next input event.
    fn wait_event(&mut self) -> Event;

    /// Load the font at `path`, or the built-in font when `path` is `None`.
    fn load_font(&mut self, path: Option<&Path>, size: f32) -> Result<Font> {
        match path {
            None => Ok(Font::builtin(size)),
            #[cfg(feature = "font")]
            Some(p) => Font::from_file(p, size),
            #[cfg(not(feature = "font"))]
            Some(p) => Err(Error::Font(format!(
                "{}: TrueType support requires the `font` feature",
                p.display()
            ))),
        }
    }
}

// ============================================================================
// HeadlessBackend
// ============================================================================

#[derive(Debug, Default)]
struct HeadlessState {
    events: VecDeque<Event>,
    presented: Vec<Vec<Rect>>,
    window: Option<Size>,
}

/// Display-less backend.
///
/// Clones share the same state, so a test can keep one handle to script
/// events and inspect presentations while the application owns another.
/// When the script runs dry, [`Backend::wait_event`] returns a close event.
#[derive(Debug, Clone)]
pub struct HeadlessBackend {
    state: Rc<RefCell<HeadlessState>>,
    order: ChannelOrder,
    display: bool,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(HeadlessState::default())),
            order: ChannelOrder::BGRA,
            display: true,
        }
    }

    /// A backend whose window creation always fails.
    pub fn without_display() -> Self {
        Self {
            display: false,
            ..Self::new()
        }
    }

    /// Use another native channel order for created surfaces.
    pub fn with_channel_order(mut self, order: ChannelOrder) -> Self {
        self.order = order;
        self
    }

    pub fn push_event(&self, event: Event) {
        self.state.borrow_mut().events.push_back(event);
    }

    pub fn push_events(&self, events: impl IntoIterator<Item = Event>) {
        self.state.borrow_mut().events.extend(events);
    }

    pub fn pending_events(&self) -> usize {
        self.state.borrow().events.len()
    }

    /// Rectangle lists passed to every `present` call so far.
    pub fn presented(&self) -> Vec<Vec<Rect>> {
        self.state.borrow().presented.clone()
    }

    pub fn clear_presented(&self) {
        self.state.borrow_mut().presented.clear();
    }

    /// Size of the opened window, if any.
    pub fn window_size(&self) -> Option<Size> {
        self.state.borrow().window
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for HeadlessBackend {
    fn open_window(&mut self, size: Size, fullscreen: bool) -> Result<Surface> {
        if !self.display {
            return Err(Error::Backend("no display available".into()));
        }
        if size.is_empty() {
            return Err(Error::Backend(format!(
                "invalid window size {}x{}",
                size.width, size.height
            )));
        }
        debug!(
            "headless window {}x{} (fullscreen: {})",
            size.width, size.height, fullscreen
        );
        self.state.borrow_mut().window = Some(size);
        Ok(Surface::new(size, self.order, false))
    }

    fn create_surface(&mut self, size: Size, has_alpha: bool) -> Result<Surface> {
        Ok(Surface::new(size, self.order, has_alpha))
    }

    fn present(&mut self, _window: &Surface, rects: &[Rect]) {
        self.state.borrow_mut().presented.push(rects.to_vec());
    }

    fn wait_event(&mut self) -> Event {
        self.state
            .borrow_mut()
            .events
            .pop_front()
            .unwrap_or_else(|| Event::new(EventKind::Close))
    }
}
