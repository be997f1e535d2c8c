//! Arc point sampler.
//!
//! Produces the integer pixels along a circular arc, used to build rounded
//! frame contours.

use crate::geometry::Point;

/// Sample the arc of `radius` around `center` from `start` to `end`
/// (radians, y pointing down, so increasing angles turn clockwise on screen).
///
/// The number of segments is `ceil(radius * |end - start|)`, at least one.
/// Samples are rounded to the nearest pixel and consecutive duplicates are
/// dropped. Returns `None` for a negative radius.
pub fn arc(center: Point, radius: f64, start: f64, end: f64) -> Option<Vec<Point>> {
    if radius < 0.0 || !radius.is_finite() {
        return None;
    }
    let sweep = end - start;
    let segments = ((radius * sweep.abs()).ceil() as usize).max(1);

    let mut points: Vec<Point> = Vec::with_capacity(segments + 1);
    for i in 0..=segments {
        let angle = start + sweep * i as f64 / segments as f64;
        let p = Point::new(
            center.x + (radius * angle.cos()).round() as i32,
            center.y + (radius * angle.sin()).round() as i32,
        );
        if points.last() != Some(&p) {
            points.push(p);
        }
    }
    points.shrink_to_fit();
    Some(points)
}
