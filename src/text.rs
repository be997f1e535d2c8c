//! Fonts and text rasterization.
//!
//! A [`Font`] is a cheap, clonable handle over a [`Typeface`]. Typefaces
//! measure strings and render them into a temporary surface with an alpha
//! channel, which [`crate::draw::draw_text`] then composites.
//!
//! Two typefaces ship:
//! - [`BitmapTypeface`]: a built-in 5x7 ASCII raster font, scaled by an
//!   integer factor. Always available.
//! - `TrueTypeTypeface`: glyph outlines read with `ttf-parser` and filled by
//!   the scanline rasterizer (feature `font`).

use core::fmt;
use std::rc::Rc;

use crate::color::{ChannelOrder, Color};
use crate::geometry::Size;
use crate::surface::Surface;

/// Measures and renders strings.
pub trait Typeface {
    /// Size of the surface [`Typeface::render`] would produce.
    fn measure(&self, text: &str) -> Size;

    /// Render `text` in `color` onto a new transparent surface sized to the
    /// string. Returns `None` when there is nothing to render.
    fn render(&self, text: &str, color: Color) -> Option<Surface>;
}

/// Shared font handle.
#[derive(Clone)]
pub struct Font {
    face: Rc<dyn Typeface>,
    size: f32,
}

impl Font {
    pub fn new(face: impl Typeface + 'static, size: f32) -> Self {
        Self {
            face: Rc::new(face),
            size,
        }
    }

    /// Built-in raster font with a pixel height close to `size`.
    pub fn builtin(size: f32) -> Self {
        Self::new(BitmapTypeface::for_size(size), size)
    }

    /// Load a TrueType/OpenType font file.
    #[cfg(feature = "font")]
    pub fn from_file(path: &std::path::Path, size: f32) -> crate::error::Result<Self> {
        let data = std::fs::read(path)
            .map_err(|e| crate::error::Error::Font(format!("{}: {}", path.display(), e)))?;
        Self::from_data(data, size)
    }

    /// Parse TrueType/OpenType font data.
    #[cfg(feature = "font")]
    pub fn from_data(data: Vec<u8>, size: f32) -> crate::error::Result<Self> {
        Ok(Self::new(TrueTypeTypeface::from_data(data, size)?, size))
    }

    /// Nominal size in pixels.
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn measure(&self, text: &str) -> Size {
        self.face.measure(text)
    }

    pub fn render(&self, text: &str, color: Color) -> Option<Surface> {
        self.face.render(text, color)
    }
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font").field("size", &self.size).finish()
    }
}

// ============================================================================
// Built-in bitmap typeface
// ============================================================================

const GLYPH_W: i32 = 5;
const GLYPH_H: i32 = 7;
const CELL_W: i32 = GLYPH_W + 1;
const CELL_H: i32 = GLYPH_H + 1;
const FIRST_CHAR: u32 = 0x20;

/// Column-major 5x7 glyphs for ASCII 0x20..=0x7e; bit 0 is the top row.
#[rustfmt::skip]
static GLYPHS: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], [0x00, 0x00, 0x5f, 0x00, 0x00], [0x00, 0x07, 0x00, 0x07, 0x00],
    [0x14, 0x7f, 0x14, 0x7f, 0x14], [0x24, 0x2a, 0x7f, 0x2a, 0x12], [0x23, 0x13, 0x08, 0x64, 0x62],
    [0x36, 0x49, 0x55, 0x22, 0x50], [0x00, 0x05, 0x03, 0x00, 0x00], [0x00, 0x1c, 0x22, 0x41, 0x00],
    [0x00, 0x41, 0x22, 0x1c, 0x00], [0x08, 0x2a, 0x1c, 0x2a, 0x08], [0x08, 0x08, 0x3e, 0x08, 0x08],
    [0x00, 0x50, 0x30, 0x00, 0x00], [0x08, 0x08, 0x08, 0x08, 0x08], [0x00, 0x60, 0x60, 0x00, 0x00],
    [0x20, 0x10, 0x08, 0x04, 0x02], [0x3e, 0x51, 0x49, 0x45, 0x3e], [0x00, 0x42, 0x7f, 0x40, 0x00],
    [0x42, 0x61, 0x51, 0x49, 0x46], [0x21, 0x41, 0x45, 0x4b, 0x31], [0x18, 0x14, 0x12, 0x7f, 0x10],
    [0x27, 0x45, 0x45, 0x45, 0x39], [0x3c, 0x4a, 0x49, 0x49, 0x30], [0x01, 0x71, 0x09, 0x05, 0x03],
    [0x36, 0x49, 0x49, 0x49, 0x36], [0x06, 0x49, 0x49, 0x29, 0x1e], [0x00, 0x36, 0x36, 0x00, 0x00],
    [0x00, 0x56, 0x36, 0x00, 0x00], [0x08, 0x14, 0x22, 0x41, 0x00], [0x14, 0x14, 0x14, 0x14, 0x14],
    [0x00, 0x41, 0x22, 0x14, 0x08], [0x02, 0x01, 0x51, 0x09, 0x06], [0x32, 0x49, 0x79, 0x41, 0x3e],
    [0x7e, 0x11, 0x11, 0x11, 0x7e], [0x7f, 0x49, 0x49, 0x49, 0x36], [0x3e, 0x41, 0x41, 0x41, 0x22],
    [0x7f, 0x41, 0x41, 0x22, 0x1c], [0x7f, 0x49, 0x49, 0x49, 0x41], [0x7f, 0x09, 0x09, 0x01, 0x01],
    [0x3e, 0x41, 0x41, 0x51, 0x32], [0x7f, 0x08, 0x08, 0x08, 0x7f], [0x00, 0x41, 0x7f, 0x41, 0x00],
    [0x20, 0x40, 0x41, 0x3f, 0x01], [0x7f, 0x08, 0x14, 0x22, 0x41], [0x7f, 0x40, 0x40, 0x40, 0x40],
    [0x7f, 0x02, 0x04, 0x02, 0x7f], [0x7f, 0x04, 0x08, 0x10, 0x7f], [0x3e, 0x41, 0x41, 0x41, 0x3e],
    [0x7f, 0x09, 0x09, 0x09, 0x06], [0x3e, 0x41, 0x51, 0x21, 0x5e], [0x7f, 0x09, 0x19, 0x29, 0x46],
    [0x46, 0x49, 0x49, 0x49, 0x31], [0x01, 0x01, 0x7f, 0x01, 0x01], [0x3f, 0x40, 0x40, 0x40, 0x3f],
    [0x1f, 0x20, 0x40, 0x20, 0x1f], [0x7f, 0x20, 0x18, 0x20, 0x7f], [0x63, 0x14, 0x08, 0x14, 0x63],
    [0x03, 0x04, 0x78, 0x04, 0x03], [0x61, 0x51, 0x49, 0x45, 0x43], [0x00, 0x7f, 0x41, 0x41, 0x00],
    [0x02, 0x04, 0x08, 0x10, 0x20], [0x00, 0x41, 0x41, 0x7f, 0x00], [0x04, 0x02, 0x01, 0x02, 0x04],
    [0x40, 0x40, 0x40, 0x40, 0x40], [0x00, 0x01, 0x02, 0x04, 0x00], [0x20, 0x54, 0x54, 0x54, 0x78],
    [0x7f, 0x48, 0x44, 0x44, 0x38], [0x38, 0x44, 0x44, 0x44, 0x20], [0x38, 0x44, 0x44, 0x48, 0x7f],
    [0x38, 0x54, 0x54, 0x54, 0x18], [0x08, 0x7e, 0x09, 0x01, 0x02], [0x08, 0x14, 0x54, 0x54, 0x3c],
    [0x7f, 0x08, 0x04, 0x04, 0x78], [0x00, 0x44, 0x7d, 0x40, 0x00], [0x20, 0x40, 0x44, 0x3d, 0x00],
    [0x00, 0x7f, 0x10, 0x28, 0x44], [0x00, 0x41, 0x7f, 0x40, 0x00], [0x7c, 0x04, 0x18, 0x04, 0x78],
    [0x7c, 0x08, 0x04, 0x04, 0x78], [0x38, 0x44, 0x44, 0x44, 0x38], [0x7c, 0x14, 0x14, 0x14, 0x08],
    [0x08, 0x14, 0x14, 0x18, 0x7c], [0x7c, 0x08, 0x04, 0x04, 0x08], [0x48, 0x54, 0x54, 0x54, 0x20],
    [0x04, 0x3f, 0x44, 0x40, 0x20], [0x3c, 0x40, 0x40, 0x20, 0x7c], [0x1c, 0x20, 0x40, 0x20, 0x1c],
    [0x3c, 0x40, 0x30, 0x40, 0x3c], [0x44, 0x28, 0x10, 0x28, 0x44], [0x0c, 0x50, 0x50, 0x50, 0x3c],
    [0x44, 0x64, 0x54, 0x4c, 0x44], [0x00, 0x08, 0x36, 0x41, 0x00], [0x00, 0x00, 0x7f, 0x00, 0x00],
    [0x00, 0x41, 0x36, 0x08, 0x00], [0x08, 0x04, 0x08, 0x10, 0x08],
];

/// Hollow box drawn for characters outside printable ASCII.
const MISSING_GLYPH: [u8; 5] = [0x7f, 0x41, 0x41, 0x41, 0x7f];

/// Built-in 5x7 raster font, magnified by an integer `scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapTypeface {
    scale: i32,
}

impl BitmapTypeface {
    pub fn new(scale: i32) -> Self {
        Self {
            scale: scale.max(1),
        }
    }

    /// Pick the scale whose cell height is closest to `size` pixels.
    pub fn for_size(size: f32) -> Self {
        Self::new((size / CELL_H as f32).round() as i32)
    }

    pub fn scale(&self) -> i32 {
        self.scale
    }

    fn glyph(c: char) -> &'static [u8; 5] {
        let code = c as u32;
        match code.checked_sub(FIRST_CHAR) {
            Some(i) if (i as usize) < GLYPHS.len() => &GLYPHS[i as usize],
            _ => &MISSING_GLYPH,
        }
    }
}

impl Typeface for BitmapTypeface {
    fn measure(&self, text: &str) -> Size {
        let n = text.chars().count() as i32;
        if n == 0 {
            return Size::default();
        }
        Size::new(n * CELL_W * self.scale, CELL_H * self.scale)
    }

    fn render(&self, text: &str, color: Color) -> Option<Surface> {
        let size = self.measure(text);
        if size.is_empty() {
            return None;
        }
        let mut surface = Surface::new(size, ChannelOrder::RGBA, true);
        let mut lock = surface.lock();
        let px = ChannelOrder::RGBA.map(color);
        let s = self.scale;
        for (i, c) in text.chars().enumerate() {
            let origin_x = i as i32 * CELL_W * s;
            for (col, bits) in Self::glyph(c).iter().enumerate() {
                for row in 0..GLYPH_H {
                    if bits & (1 << row) == 0 {
                        continue;
                    }
                    let x = origin_x + col as i32 * s;
                    for dy in 0..s {
                        lock.fill_span(x, x + s - 1, row * s + dy, px);
                    }
                }
            }
        }
        drop(lock);
        Some(surface)
    }
}

// ============================================================================
// TrueType typeface
// ============================================================================

#[cfg(feature = "font")]
pub use truetype::TrueTypeTypeface;

#[cfg(feature = "font")]
mod truetype {
    use super::*;
    use crate::error::{Error, Result};
    use crate::geometry::Point;
    use crate::raster::fill_contours;

    const CURVE_STEPS: usize = 8;

    /// Outline font rendered through the scanline filler.
    pub struct TrueTypeTypeface {
        data: Vec<u8>,
        height: f64,
    }

    impl TrueTypeTypeface {
        /// `height` is the em-height in pixels.
        pub fn from_data(data: Vec<u8>, height: f32) -> Result<Self> {
            ttf_parser::Face::parse(&data, 0)
                .map_err(|e| Error::Font(format!("failed to parse font: {:?}", e)))?;
            Ok(Self {
                data,
                height: height as f64,
            })
        }

        fn with_face<R>(&self, f: impl FnOnce(&ttf_parser::Face<'_>, f64) -> R) -> Option<R> {
            let face = ttf_parser::Face::parse(&self.data, 0).ok()?;
            let scale = self.height / face.units_per_em() as f64;
            Some(f(&face, scale))
        }
    }

    fn line_metrics(face: &ttf_parser::Face<'_>, scale: f64) -> (f64, i32) {
        let ascender = face.ascender() as f64 * scale;
        let descender = face.descender() as f64 * scale;
        (ascender, (ascender - descender).ceil() as i32)
    }

    fn advance(face: &ttf_parser::Face<'_>, scale: f64, c: char) -> f64 {
        face.glyph_index(c)
            .and_then(|g| face.glyph_hor_advance(g))
            .map(|a| a as f64 * scale)
            .unwrap_or(0.0)
    }

    impl Typeface for TrueTypeTypeface {
        fn measure(&self, text: &str) -> Size {
            if text.is_empty() {
                return Size::default();
            }
            self.with_face(|face, scale| {
                let width: f64 = text.chars().map(|c| advance(face, scale, c)).sum();
                Size::new(width.ceil() as i32, line_metrics(face, scale).1)
            })
            .unwrap_or_default()
        }

        fn render(&self, text: &str, color: Color) -> Option<Surface> {
            let size = self.measure(text);
            if size.is_empty() {
                return None;
            }
            let contours = self.with_face(|face, scale| {
                let (ascender, _) = line_metrics(face, scale);
                let mut flattener = Flattener::new(scale, ascender);
                for c in text.chars() {
                    if let Some(glyph) = face.glyph_index(c) {
                        face.outline_glyph(glyph, &mut flattener);
                    }
                    flattener.pen_x += advance(face, scale, c);
                }
                flattener.contours
            })?;

            let mut surface = Surface::new(size, ChannelOrder::RGBA, true);
            let refs: Vec<&[Point]> = contours.iter().map(|c| c.as_slice()).collect();
            fill_contours(&mut surface.lock(), &refs, color, None);
            Some(surface)
        }
    }

    /// Collects glyph outlines as integer polygons, flattening curves.
    struct Flattener {
        contours: Vec<Vec<Point>>,
        current: Vec<(f64, f64)>,
        scale: f64,
        baseline: f64,
        pen_x: f64,
    }

    impl Flattener {
        fn new(scale: f64, baseline: f64) -> Self {
            Self {
                contours: Vec::new(),
                current: Vec::new(),
                scale,
                baseline,
                pen_x: 0.0,
            }
        }

        fn map(&self, x: f32, y: f32) -> (f64, f64) {
            (
                self.pen_x + x as f64 * self.scale,
                self.baseline - y as f64 * self.scale,
            )
        }

        fn last(&self) -> (f64, f64) {
            self.current.last().copied().unwrap_or((self.pen_x, self.baseline))
        }

        fn flush(&mut self) {
            if self.current.len() >= 3 {
                let contour = self
                    .current
                    .iter()
                    .map(|&(x, y)| Point::new(x.round() as i32, y.round() as i32))
                    .collect();
                self.contours.push(contour);
            }
            self.current.clear();
        }
    }

    impl ttf_parser::OutlineBuilder for Flattener {
        fn move_to(&mut self, x: f32, y: f32) {
            self.flush();
            let p = self.map(x, y);
            self.current.push(p);
        }

        fn line_to(&mut self, x: f32, y: f32) {
            let p = self.map(x, y);
            self.current.push(p);
        }

        fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
            let p0 = self.last();
            let c = self.map(x1, y1);
            let p1 = self.map(x, y);
            for i in 1..=CURVE_STEPS {
                let t = i as f64 / CURVE_STEPS as f64;
                let u = 1.0 - t;
                self.current.push((
                    u * u * p0.0 + 2.0 * u * t * c.0 + t * t * p1.0,
                    u * u * p0.1 + 2.0 * u * t * c.1 + t * t * p1.1,
                ));
            }
        }

        fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
            let p0 = self.last();
            let c1 = self.map(x1, y1);
            let c2 = self.map(x2, y2);
            let p1 = self.map(x, y);
            for i in 1..=CURVE_STEPS {
                let t = i as f64 / CURVE_STEPS as f64;
                let u = 1.0 - t;
                let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
                self.current.push((
                    a * p0.0 + b * c1.0 + c * c2.0 + d * p1.0,
                    a * p0.1 + b * c1.1 + c * c2.1 + d * p1.1,
                ));
            }
        }

        fn close(&mut self) {
            self.flush();
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use ttf_parser::OutlineBuilder;

        #[test]
        fn test_flattener_maps_to_baseline() {
            let mut f = Flattener::new(0.5, 20.0);
            f.move_to(0.0, 0.0);
            f.line_to(20.0, 0.0);
            f.line_to(20.0, 20.0);
            f.close();
            assert_eq!(
                f.contours,
                vec![vec![Point::new(0, 20), Point::new(10, 20), Point::new(10, 10)]]
            );
        }

        #[test]
        fn test_flattener_quad_ends_on_target() {
            let mut f = Flattener::new(1.0, 0.0);
            f.move_to(0.0, 0.0);
            f.quad_to(5.0, -10.0, 10.0, 0.0);
            f.close();
            assert_eq!(f.contours[0].len(), 1 + CURVE_STEPS);
            assert_eq!(f.contours[0].last(), Some(&Point::new(10, 0)));
        }

        #[test]
        fn test_invalid_font_data() {
            assert!(TrueTypeTypeface::from_data(vec![0, 1, 2, 3], 12.0).is_err());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::surface::PixelRead;

    #[test]
    fn test_glyph_table_covers_printable_ascii() {
        assert_eq!(GLYPHS.len(), (0x7f - FIRST_CHAR) as usize);
        assert_eq!(BitmapTypeface::glyph(' '), &[0; 5]);
        assert_eq!(BitmapTypeface::glyph('é'), &MISSING_GLYPH);
    }

    #[test]
    fn test_bitmap_measure() {
        let face = BitmapTypeface::new(2);
        assert_eq!(face.measure("abc"), Size::new(36, 16));
        assert_eq!(face.measure(""), Size::default());
        assert_eq!(BitmapTypeface::for_size(22.0).scale(), 3);
        assert_eq!(BitmapTypeface::for_size(2.0).scale(), 1);
    }

    #[test]
    fn test_bitmap_render_pixels() {
        let face = BitmapTypeface::new(1);
        let red = Color::rgb(200, 0, 0);
        let surface = face.render("|", red).unwrap();
        let read = surface.lock_read();
        // '|' is a full-height bar in the middle column.
        for y in 0..GLYPH_H {
            assert_eq!(read.pixel(Point::new(2, y)), Some(red));
        }
        assert_eq!(read.pixel(Point::new(0, 3)), Some(Color::TRANSPARENT));
        assert_eq!(read.pixel(Point::new(2, 7)), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_render_empty_text() {
        assert!(Font::builtin(16.0).render("", Color::BLACK).is_none());
    }

    #[test]
    fn test_font_handle_is_shared() {
        let font = Font::builtin(16.0);
        let copy = font.clone();
        assert_eq!(font.measure("hi"), copy.measure("hi"));
        assert_eq!(copy.size(), 16.0);
    }
}
