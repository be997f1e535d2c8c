//! Aliased scanline rasterizer.
//!
//! Bresenham lines, clipped horizontal spans, and an edge-table /
//! active-edge-list polygon filler. Pixels are written as-is (no blending)
//! and every primitive is clipped to both the surface and an optional
//! clipping rectangle.

use crate::color::Color;
use crate::geometry::{clip, Point, Rect};
use crate::surface::{PixelRead, SurfaceLock};

// ============================================================================
// Spans
// ============================================================================

#[inline]
fn span(dst: &mut SurfaceLock<'_>, bounds: &Rect, x1: i32, x2: i32, y: i32, px: [u8; 4]) {
    if y < bounds.y() || y >= bounds.bottom() {
        return;
    }
    let (x1, x2) = if x1 > x2 { (x2, x1) } else { (x1, x2) };
    let x1 = x1.max(bounds.x());
    let x2 = x2.min(bounds.right() - 1);
    if x1 > x2 {
        return;
    }
    dst.fill_span(x1, x2, y, px);
}

/// Fill the inclusive horizontal span between `x1` and `x2` (in either
/// order) on row `y`.
pub fn draw_hline(
    dst: &mut SurfaceLock<'_>,
    x1: i32,
    x2: i32,
    y: i32,
    color: Color,
    clipper: Option<&Rect>,
) {
    let Some(bounds) = clip(&dst.rect(), clipper) else {
        return;
    };
    let px = dst.channel_order().map(color);
    span(dst, &bounds, x1, x2, y, px);
}

// ============================================================================
// Lines
// ============================================================================

/// Draw a one-pixel Bresenham line from `p0` to `p1`, both ends included.
///
/// The endpoints are put in a canonical order along the major axis first, so
/// drawing `p0 -> p1` and `p1 -> p0` yields the same pixels.
pub fn draw_line(
    dst: &mut SurfaceLock<'_>,
    p0: Point,
    p1: Point,
    color: Color,
    clipper: Option<&Rect>,
) {
    let Some(bounds) = clip(&dst.rect(), clipper) else {
        return;
    };
    let px = dst.channel_order().map(color);

    let x_major = (p1.x - p0.x).abs() >= (p1.y - p0.y).abs();
    let (a, b) = if (x_major && p0.x > p1.x) || (!x_major && p0.y > p1.y) {
        (p1, p0)
    } else {
        (p0, p1)
    };

    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let (major, minor) = if x_major { (dx.abs(), dy.abs()) } else { (dy.abs(), dx.abs()) };
    let sx = dx.signum();
    let sy = dy.signum();

    let mut x = a.x;
    let mut y = a.y;
    let mut err = 0;
    for _ in 0..=major {
        if bounds.contains(Point::new(x, y)) {
            dst.put_native(x, y, px);
        }
        err += minor;
        if 2 * err > major {
            err -= major;
            if x_major {
                y += sy;
            } else {
                x += sx;
            }
        }
        if x_major {
            x += sx;
        } else {
            y += sy;
        }
    }
}

// ============================================================================
// Polygons
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct Edge {
    /// First scanline no longer crossed by the edge.
    y_max: i32,
    /// Crossing at the current scanline.
    x: f64,
    inv_slope: f64,
}

/// Fill a polygon given by its vertices (implicitly closed).
///
/// Fewer than three vertices draw nothing.
pub fn fill_polygon(
    dst: &mut SurfaceLock<'_>,
    points: &[Point],
    color: Color,
    clipper: Option<&Rect>,
) {
    if points.len() < 3 {
        return;
    }
    fill_contours(dst, &[points], color, clipper);
}

/// Fill several closed contours as one shape, pairing crossings on each
/// scanline (holes come out of the pairing).
pub fn fill_contours(
    dst: &mut SurfaceLock<'_>,
    contours: &[&[Point]],
    color: Color,
    clipper: Option<&Rect>,
) {
    let Some(bounds) = clip(&dst.rect(), clipper) else {
        return;
    };

    let mut ys = contours.iter().flat_map(|c| c.iter().map(|p| p.y));
    let Some(first) = ys.next() else {
        return;
    };
    let (poly_min, poly_max) = ys.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
    let y_start = poly_min.max(bounds.y());
    let y_end = poly_max.min(bounds.bottom());
    if y_start >= y_end {
        return;
    }

    // Edge table: one bucket per scanline, keyed by the edge's first line.
    let mut table: Vec<Vec<Edge>> = vec![Vec::new(); (y_end - y_start) as usize];
    for contour in contours {
        let n = contour.len();
        for i in 0..n {
            let (a, b) = (contour[i], contour[(i + 1) % n]);
            if a.y == b.y {
                continue;
            }
            let (lo, hi) = if a.y < b.y { (a, b) } else { (b, a) };
            if hi.y <= y_start || lo.y >= y_end {
                continue;
            }
            let inv_slope = (hi.x - lo.x) as f64 / (hi.y - lo.y) as f64;
            let first_line = lo.y.max(y_start);
            let x = lo.x as f64 + (first_line - lo.y) as f64 * inv_slope;
            table[(first_line - y_start) as usize].push(Edge {
                y_max: hi.y,
                x,
                inv_slope,
            });
        }
    }

    let px = dst.channel_order().map(color);
    let mut active: Vec<Edge> = Vec::new();
    for (offset, bucket) in table.iter_mut().enumerate() {
        let y = y_start + offset as i32;
        active.retain(|e| e.y_max > y);
        active.append(bucket);
        active.sort_by(|a, b| a.x.total_cmp(&b.x));

        for pair in active.chunks_exact(2) {
            let left = pair[0].x.ceil() as i32;
            let right = pair[1].x.floor() as i32;
            if left <= right {
                span(dst, &bounds, left, right, y, px);
            }
        }
        for e in active.iter_mut() {
            e.x += e.inv_slope;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ChannelOrder;
    use crate::geometry::Size;
    use crate::surface::Surface;
    use std::collections::BTreeSet;

    const INK: Color = Color::rgb(255, 0, 0);

    fn surface(w: i32, h: i32) -> Surface {
        Surface::new(Size::new(w, h), ChannelOrder::RGBA, true)
    }

    fn painted(s: &Surface) -> BTreeSet<(i32, i32)> {
        let r = s.lock_read();
        let mut out = BTreeSet::new();
        for y in 0..r.size().height {
            for x in 0..r.size().width {
                if r.pixel(Point::new(x, y)) == Some(INK) {
                    out.insert((x, y));
                }
            }
        }
        out
    }

    fn line_pixels(p0: Point, p1: Point) -> BTreeSet<(i32, i32)> {
        let mut s = surface(64, 64);
        draw_line(&mut s.lock(), p0, p1, INK, None);
        painted(&s)
    }

    #[test]
    fn test_line_single_pixel() {
        let px = line_pixels(Point::new(5, 7), Point::new(5, 7));
        assert_eq!(px.into_iter().collect::<Vec<_>>(), vec![(5, 7)]);
    }

    #[test]
    fn test_line_symmetry_and_count() {
        let ends = [
            (Point::new(3, 3), Point::new(40, 17)),
            (Point::new(0, 0), Point::new(2, 1)),
            (Point::new(10, 50), Point::new(12, 5)),
            (Point::new(60, 2), Point::new(1, 61)),
            (Point::new(7, 30), Point::new(50, 30)),
            (Point::new(20, 0), Point::new(20, 63)),
            (Point::new(0, 0), Point::new(31, 31)),
        ];
        for (p, q) in ends {
            let forward = line_pixels(p, q);
            let backward = line_pixels(q, p);
            assert_eq!(forward, backward, "{:?} {:?}", p, q);
            let expected = (q.x - p.x).abs().max((q.y - p.y).abs()) + 1;
            assert_eq!(forward.len() as i32, expected);
            assert!(forward.contains(&(p.x, p.y)));
            assert!(forward.contains(&(q.x, q.y)));
        }
    }

    #[test]
    fn test_line_is_clipped() {
        let mut s = surface(20, 20);
        let clipper = Rect::new(0, 0, 10, 20);
        draw_line(&mut s.lock(), Point::new(-5, 5), Point::new(30, 5), INK, Some(&clipper));
        let px = painted(&s);
        assert_eq!(px.len(), 10);
        assert!(px.iter().all(|&(x, y)| y == 5 && (0..10).contains(&x)));
    }

    #[test]
    fn test_hline_reorders_and_clips() {
        let mut s = surface(10, 4);
        let clipper = Rect::new(2, 0, 5, 4);
        draw_hline(&mut s.lock(), 8, -3, 1, INK, Some(&clipper));
        draw_hline(&mut s.lock(), 0, 9, 7, INK, None);
        let px = painted(&s);
        assert_eq!(px, (2..7).map(|x| (x, 1)).collect());
    }

    #[test]
    fn test_fill_rectangle_polygon() {
        let mut s = surface(40, 40);
        let pts = [
            Point::new(5, 8),
            Point::new(20, 8),
            Point::new(20, 30),
            Point::new(5, 30),
        ];
        fill_polygon(&mut s.lock(), &pts, INK, None);
        let expected: BTreeSet<_> = (8..30)
            .flat_map(|y| (5..=20).map(move |x| (x, y)))
            .collect();
        assert_eq!(painted(&s), expected);
    }

    #[test]
    fn test_fill_triangle_matches_brute_force() {
        let mut s = surface(50, 50);
        let pts = [Point::new(10, 10), Point::new(30, 10), Point::new(10, 30)];
        fill_polygon(&mut s.lock(), &pts, INK, None);
        let mut expected = BTreeSet::new();
        for y in 0..50 {
            for x in 0..50 {
                // Closed on the left/right sides, half-open at the bottom.
                if x >= 10 && y >= 10 && y < 30 && x + y <= 40 {
                    expected.insert((x, y));
                }
            }
        }
        assert_eq!(painted(&s), expected);
    }

    #[test]
    fn test_fill_vertex_order_does_not_matter() {
        let cw = [Point::new(2, 2), Point::new(25, 6), Point::new(12, 28)];
        let ccw = [cw[2], cw[1], cw[0]];
        let mut a = surface(32, 32);
        let mut b = surface(32, 32);
        fill_polygon(&mut a.lock(), &cw, INK, None);
        fill_polygon(&mut b.lock(), &ccw, INK, None);
        assert_eq!(painted(&a), painted(&b));
        assert!(!painted(&a).is_empty());
    }

    #[test]
    fn test_fill_clipped_to_rect_and_surface() {
        let mut s = surface(20, 20);
        let pts = [
            Point::new(-10, -10),
            Point::new(50, -10),
            Point::new(50, 50),
            Point::new(-10, 50),
        ];
        let clipper = Rect::new(5, 5, 4, 3);
        fill_polygon(&mut s.lock(), &pts, INK, Some(&clipper));
        let expected: BTreeSet<_> = (5..8).flat_map(|y| (5..9).map(move |x| (x, y))).collect();
        assert_eq!(painted(&s), expected);
    }

    #[test]
    fn test_fill_degenerate_input() {
        let mut s = surface(10, 10);
        fill_polygon(&mut s.lock(), &[Point::new(1, 1), Point::new(5, 5)], INK, None);
        // Collinear points have no area.
        let flat = [Point::new(1, 4), Point::new(5, 4), Point::new(8, 4)];
        fill_polygon(&mut s.lock(), &flat, INK, None);
        assert!(painted(&s).is_empty());
        assert!(!s.is_locked());
    }

    #[test]
    fn test_fill_bow_tie_pairs_crossings() {
        let mut s = surface(16, 16);
        let pts = [
            Point::new(0, 0),
            Point::new(10, 10),
            Point::new(10, 0),
            Point::new(0, 10),
        ];
        fill_polygon(&mut s.lock(), &pts, INK, None);
        let px = painted(&s);
        let row2: Vec<i32> = px.iter().filter(|p| p.1 == 2).map(|p| p.0).collect();
        assert_eq!(row2, vec![0, 1, 2, 8, 9, 10]);
        let row7: Vec<i32> = px.iter().filter(|p| p.1 == 7).map(|p| p.0).collect();
        assert_eq!(row7, vec![0, 1, 2, 3, 7, 8, 9, 10]);
    }

    #[test]
    fn test_fill_contours_with_hole() {
        let mut s = surface(30, 30);
        let outer = [
            Point::new(0, 0),
            Point::new(20, 0),
            Point::new(20, 20),
            Point::new(0, 20),
        ];
        let hole = [
            Point::new(5, 5),
            Point::new(5, 15),
            Point::new(15, 15),
            Point::new(15, 5),
        ];
        fill_contours(&mut s.lock(), &[&outer, &hole], INK, None);
        let px = painted(&s);
        assert!(px.contains(&(2, 10)));
        assert!(px.contains(&(18, 10)));
        assert!(!px.contains(&(10, 10)));
    }
}
