//! Rounded rectangle contours.
//!
//! Builds the polygon of a rectangle with circular corners, or of its upper
//! or lower half split along the 45° diagonal, out of [`arc`] samples.

use std::f64::consts::PI;

use crate::arc::arc;
use crate::geometry::{Point, Rect};

/// Which part of the rounded rectangle to outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramePart {
    Full,
    /// Upper-left half, used for the light bevel of a raised relief.
    Top,
    /// Lower-right half.
    Bottom,
}

/// Contour of `rect` with corners of `radius`.
///
/// Returns an empty contour for an empty rectangle, a negative radius, or a
/// radius larger than half of the shorter side.
pub fn rounded_frame(rect: &Rect, radius: i32, part: FramePart) -> Vec<Point> {
    let (x, y, w, h) = (rect.x(), rect.y(), rect.width(), rect.height());
    if rect.is_empty() || radius < 0 || 2 * radius > w.min(h) {
        return Vec::new();
    }

    let r = radius;
    let top_left = Point::new(x + r, y + r);
    let bottom_left = Point::new(x + r, y + h - r);
    let bottom_right = Point::new(x + w - r, y + h - r);
    let top_right = Point::new(x + w - r, y + r);

    let arcs: &[(Point, f64, f64)] = match part {
        FramePart::Full => &[
            (top_left, 1.5 * PI, PI),
            (bottom_left, PI, 0.5 * PI),
            (bottom_right, 0.5 * PI, 0.0),
            (top_right, 0.0, -0.5 * PI),
        ],
        FramePart::Top => &[
            (top_right, -0.25 * PI, -0.5 * PI),
            (top_left, 1.5 * PI, PI),
            (bottom_left, PI, 0.75 * PI),
        ],
        FramePart::Bottom => &[
            (bottom_left, 0.75 * PI, 0.5 * PI),
            (bottom_right, 0.5 * PI, 0.0),
            (top_right, 0.0, -0.25 * PI),
        ],
    };

    let mut contour: Vec<Point> = Vec::new();
    for &(center, start, end) in arcs {
        for p in arc(center, r as f64, start, end).unwrap_or_default() {
            if contour.last() != Some(&p) {
                contour.push(p);
            }
        }
    }

    // Half frames close through the two inner points of the diagonal split.
    let half = w.min(h) / 2;
    let lower_inner = Point::new(x + half, y + h - half);
    let upper_inner = Point::new(x + w - half, y + half);
    match part {
        FramePart::Full => {}
        FramePart::Top => contour.extend([lower_inner, upper_inner]),
        FramePart::Bottom => contour.extend([upper_inner, lower_inner]),
    }
    contour
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_radius_full_is_rectangle() {
        let r = Rect::new(10, 20, 30, 40);
        let pts = rounded_frame(&r, 0, FramePart::Full);
        assert_eq!(
            pts,
            vec![
                Point::new(10, 20),
                Point::new(10, 60),
                Point::new(40, 60),
                Point::new(40, 20),
            ]
        );
    }

    #[test]
    fn test_invalid_input_is_empty() {
        let r = Rect::new(0, 0, 20, 10);
        assert!(rounded_frame(&r, -1, FramePart::Full).is_empty());
        assert!(rounded_frame(&r, 6, FramePart::Full).is_empty());
        assert!(rounded_frame(&Rect::new(0, 0, 0, 10), 0, FramePart::Top).is_empty());
        assert!(!rounded_frame(&r, 5, FramePart::Full).is_empty());
    }

    #[test]
    fn test_full_contour_stays_inside_rect() {
        let r = Rect::new(100, 100, 80, 40);
        let pts = rounded_frame(&r, 12, FramePart::Full);
        for p in &pts {
            assert!(p.x >= r.x() && p.x <= r.right(), "{:?}", p);
            assert!(p.y >= r.y() && p.y <= r.bottom(), "{:?}", p);
        }
        // The corner itself is cut off.
        assert!(!pts.contains(&Point::new(100, 100)));
        assert!(pts.contains(&Point::new(100, 112)));
        assert!(pts.contains(&Point::new(112, 100)));
    }

    #[test]
    fn test_halves_share_the_diagonal() {
        let r = Rect::new(0, 0, 60, 20);
        let top = rounded_frame(&r, 4, FramePart::Top);
        let bottom = rounded_frame(&r, 4, FramePart::Bottom);
        let n = top.len();
        assert_eq!(&top[n - 2..], &[Point::new(10, 10), Point::new(50, 10)]);
        let m = bottom.len();
        assert_eq!(&bottom[m - 2..], &[Point::new(50, 10), Point::new(10, 10)]);
        assert_eq!(top[0], bottom[m - 3]);
    }
}
