//! Drawing entry points.
//!
//! Everything here works on a locked surface and takes an optional clipping
//! rectangle. Degenerate input (empty rectangles, too few points, empty text)
//! draws nothing. [`copy_surface`] is the only call that reports failure.

use log::warn;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::{clip, intersect, Point, Rect};
use crate::raster::{draw_hline, draw_line, fill_polygon};
use crate::surface::{PixelRead, SurfaceLock};
use crate::text::Font;

/// Fill `rect` (the whole surface when `None`) with `color`. Pixels are
/// replaced, not blended.
pub fn fill(dst: &mut SurfaceLock<'_>, color: Color, rect: Option<&Rect>) {
    let Some(area) = clip(&dst.rect(), rect) else {
        return;
    };
    for y in area.y()..area.bottom() {
        draw_hline(dst, area.x(), area.right() - 1, y, color, None);
    }
}

/// Join consecutive points with one-pixel lines. A single point plots one
/// pixel.
pub fn draw_polyline(
    dst: &mut SurfaceLock<'_>,
    points: &[Point],
    color: Color,
    clipper: Option<&Rect>,
) {
    match points {
        [] => {}
        [p] => draw_line(dst, *p, *p, color, clipper),
        _ => {
            for w in points.windows(2) {
                draw_line(dst, w[0], w[1], color, clipper);
            }
        }
    }
}

/// Fill the polygon through `points` (implicitly closed).
pub fn draw_polygon(
    dst: &mut SurfaceLock<'_>,
    points: &[Point],
    color: Color,
    clipper: Option<&Rect>,
) {
    fill_polygon(dst, points, color, clipper);
}

/// Render `text` with its top-left corner at `origin`, alpha-composited
/// over the destination. The alpha of `color` is ignored.
pub fn draw_text(
    dst: &mut SurfaceLock<'_>,
    origin: Point,
    text: &str,
    font: &Font,
    color: Color,
    clipper: Option<&Rect>,
) {
    if text.is_empty() {
        return;
    }
    let Some(rendered) = font.render(text, color.with_alpha(0xff)) else {
        warn!("could not render text {:?}", text);
        return;
    };
    let src = rendered.lock_read();
    blit(dst, origin, &src, None, clipper, true);
}

// ============================================================================
// Surface copies
// ============================================================================

/// Copy `src_rect` of `src` (whole source when `None`) onto `dst_rect` of
/// `dst` (whole destination when `None`).
///
/// Both rectangles must have the same size and lie inside their surfaces.
/// With `alpha`, each destination channel becomes
/// `a * src + (1 - a) * dst` using the source alpha (opaque when the source
/// has no alpha channel), and the destination alpha is set to opaque.
/// Without `alpha`, source pixels replace destination pixels.
pub fn copy_surface<S: PixelRead + ?Sized>(
    dst: &mut SurfaceLock<'_>,
    dst_rect: Option<&Rect>,
    src: &S,
    src_rect: Option<&Rect>,
    alpha: bool,
) -> Result<()> {
    let d = dst_rect.copied().unwrap_or_else(|| dst.rect());
    let s = src_rect.copied().unwrap_or_else(|| src.rect());
    if d.size != s.size {
        return Err(Error::CopySizeMismatch {
            src: s.size,
            dst: d.size,
        });
    }
    if d.is_empty() {
        return Ok(());
    }
    if !dst.rect().contains_rect(&d) {
        return Err(Error::CopyOutOfBounds(d));
    }
    if !src.rect().contains_rect(&s) {
        return Err(Error::CopyOutOfBounds(s));
    }

    let src_order = src.channel_order();
    let dst_order = dst.channel_order();
    let src_alpha = src.has_alpha();
    let (sx, dx, w) = (s.x() as usize * 4, d.x() as usize * 4, d.width() as usize * 4);

    for row in 0..d.height() {
        let src_row = &src.row(s.y() + row)[sx..sx + w];
        let dst_row = &mut dst.row_mut(d.y() + row)[dx..dx + w];

        if !alpha && src_order == dst_order {
            dst_row.copy_from_slice(src_row);
            continue;
        }
        for (sp, dp) in src_row.chunks_exact(4).zip(dst_row.chunks_exact_mut(4)) {
            let sc = src_order.unmap(sp);
            let out = if alpha {
                let sc = if src_alpha { sc } else { sc.with_alpha(0xff) };
                sc.blend_over(dst_order.unmap(dp))
            } else {
                sc
            };
            dp.copy_from_slice(&dst_order.map(out));
        }
    }
    Ok(())
}

/// Copy `src_rect` of `src` so that its top-left lands on `origin`, clipped
/// to the destination and `clipper`.
pub fn blit<S: PixelRead + ?Sized>(
    dst: &mut SurfaceLock<'_>,
    origin: Point,
    src: &S,
    src_rect: Option<&Rect>,
    clipper: Option<&Rect>,
    alpha: bool,
) {
    let Some(src_area) = clip(&src.rect(), src_rect) else {
        return;
    };
    let placed = Rect::from_parts(origin, src_area.size);
    let Some(visible) = clip(&dst.rect(), clipper).and_then(|b| intersect(&b, &placed)) else {
        return;
    };
    let shift = visible.top_left - origin;
    let from = Rect::from_parts(src_area.top_left + shift, visible.size);
    if let Err(e) = copy_surface(dst, Some(&visible), src, Some(&from), alpha) {
        warn!("blit failed: {}", e);
    }
}
