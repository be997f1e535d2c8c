//! Beveled (3D relief) rectangles.

use crate::color::Color;
use crate::geometry::Rect;
use crate::raster::fill_polygon;
use crate::rounded_frame::{rounded_frame, FramePart};
use crate::surface::SurfaceLock;

/// Amount added to / removed from each RGB channel for the bevel halves.
pub const SHADE_DELTA: i32 = 40;

/// Bevel style of frames and buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Relief {
    #[default]
    None,
    /// Light upper-left, dark lower-right.
    Raised,
    /// Dark upper-left, light lower-right.
    Sunken,
}

/// Draw a rounded, beveled rectangle.
///
/// With [`Relief::None`] or a zero `border` the whole shape is filled flat
/// with `color`. Otherwise the upper and lower halves are filled with the
/// light and dark shades of `color` (swapped for [`Relief::Sunken`]), then
/// the rectangle inset by `border` is filled with `color`. The radius is
/// clamped to half of the shorter side.
pub fn draw_button(
    dst: &mut SurfaceLock<'_>,
    rect: &Rect,
    radius: i32,
    color: Color,
    border: i32,
    relief: Relief,
    clipper: Option<&Rect>,
) {
    if rect.is_empty() {
        return;
    }
    let radius = radius.clamp(0, rect.width().min(rect.height()) / 2);

    if relief == Relief::None || border <= 0 {
        let contour = rounded_frame(rect, radius, FramePart::Full);
        fill_polygon(dst, &contour, color, clipper);
        return;
    }

    let light = color.shade(SHADE_DELTA);
    let dark = color.shade(-SHADE_DELTA);
    let (upper, lower) = match relief {
        Relief::Sunken => (dark, light),
        _ => (light, dark),
    };
    fill_polygon(dst, &rounded_frame(rect, radius, FramePart::Top), upper, clipper);
    fill_polygon(dst, &rounded_frame(rect, radius, FramePart::Bottom), lower, clipper);

    let inner = rect.inset(border);
    if inner.is_empty() {
        return;
    }
    let inner_radius = (radius - border).clamp(0, inner.width().min(inner.height()) / 2);
    let contour = rounded_frame(&inner, inner_radius, FramePart::Full);
    fill_polygon(dst, &contour, color, clipper);
}
