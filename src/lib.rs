//! # ei-toolkit
//!
//! A small retained-mode GUI toolkit drawing into plain pixel surfaces.
//!
//! The toolkit keeps a tree of widgets (frames, buttons, toplevel windows
//! and any class registered by the application), lays them out with a
//! placer, redraws only damaged rectangles and routes input events to the
//! widget under the pointer through an offscreen pick surface.
//!
//! ## Architecture
//!
//! 1. **Geometry & color**: points, sizes, rectangles, anchors, pixel
//!    channel orders
//! 2. **Surfaces**: owned pixel buffers, accessed only through lock guards
//! 3. **Rasterizer**: Bresenham lines, edge-table polygon fill
//! 4. **Shapes**: arcs, rounded frames, beveled relief buttons
//! 5. **Drawing API**: fill, polyline, polygon, text, surface copies
//! 6. **Widgets**: widget tree, classes, placer, damage queue, event loop
//!
//! Platform services (window, event source, fonts) come from a
//! [`backend::Backend`]; [`backend::HeadlessBackend`] runs without a display.

// Foundation
pub mod color;
pub mod error;
pub mod geometry;

// Surfaces & rasterizer
pub mod raster;
pub mod surface;

// Shapes
pub mod arc;
pub mod relief;
pub mod rounded_frame;

// Drawing API & text
pub mod draw;
pub mod text;

// Platform
pub mod backend;
pub mod event;

// Widgets
pub mod app;
pub mod button;
pub mod damage;
pub mod frame;
pub mod pick;
pub mod placer;
pub mod toplevel;
pub mod widget;
pub mod widgetclass;

pub use app::{App, AppConfig};
pub use backend::{Backend, HeadlessBackend};
pub use color::{ChannelOrder, Color};
pub use error::{Error, Result};
pub use geometry::{Anchor, Point, Rect, Size};
pub use relief::Relief;
pub use surface::Surface;
pub use widget::WidgetId;
