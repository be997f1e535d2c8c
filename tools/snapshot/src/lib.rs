//! Snapshot support for ei-toolkit: RGBA buffers captured from surfaces,
//! BMP files and pixel-by-pixel comparison.

use std::fs;
use std::io;
use std::path::Path;

use ei_toolkit::surface::PixelRead;
use ei_toolkit::{Point, Surface};

pub mod scenes;

// ============================================================================
// Pixel Buffer
// ============================================================================

/// Tightly packed RGBA pixels, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; (width * height * 4) as usize],
        }
    }

    /// Decode every pixel of `surface` into RGBA, whatever its channel order.
    pub fn from_surface(surface: &Surface) -> Self {
        let size = surface.size();
        let mut buf = Self::new(size.width.max(0) as u32, size.height.max(0) as u32);
        let read = surface.lock_read();
        for y in 0..size.height {
            for x in 0..size.width {
                if let Some(c) = read.pixel(Point::new(x, y)) {
                    let i = buf.index(x as u32, y as u32);
                    buf.data[i..i + 4].copy_from_slice(&[c.red, c.green, c.blue, c.alpha]);
                }
            }
        }
        buf
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        ((y * self.width + x) * 4) as usize
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }
}

// ============================================================================
// Comparison
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct FirstDiff {
    pub x: u32,
    pub y: u32,
    pub expected: [u8; 4],
    pub actual: [u8; 4],
}

/// Outcome of [`compare`].
#[derive(Debug, Clone)]
pub struct Comparison {
    pub total_pixels: u64,
    pub different_pixels: u64,
    /// Largest per-channel difference seen.
    pub max_channel_diff: u8,
    pub first_diff: Option<FirstDiff>,
}

impl Comparison {
    pub fn identical(&self) -> bool {
        self.different_pixels == 0
    }
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.identical() {
            return write!(f, "identical ({} pixels)", self.total_pixels);
        }
        write!(
            f,
            "{}/{} pixels differ ({:.2}%), max channel diff {}",
            self.different_pixels,
            self.total_pixels,
            self.different_pixels as f64 / self.total_pixels as f64 * 100.0,
            self.max_channel_diff,
        )?;
        if let Some(d) = &self.first_diff {
            write!(
                f,
                "\n  first at ({}, {}): expected {:?}, got {:?}",
                d.x, d.y, d.expected, d.actual
            )?;
        }
        Ok(())
    }
}

/// Compare two buffers of the same dimensions; `None` when they differ in size.
pub fn compare(expected: &PixelBuffer, actual: &PixelBuffer) -> Option<Comparison> {
    if expected.width != actual.width || expected.height != actual.height {
        return None;
    }
    let mut result = Comparison {
        total_pixels: expected.width as u64 * expected.height as u64,
        different_pixels: 0,
        max_channel_diff: 0,
        first_diff: None,
    };
    for y in 0..expected.height {
        for x in 0..expected.width {
            let a = expected.pixel(x, y);
            let b = actual.pixel(x, y);
            if a == b {
                continue;
            }
            result.different_pixels += 1;
            for c in 0..4 {
                result.max_channel_diff = result.max_channel_diff.max(a[c].abs_diff(b[c]));
            }
            if result.first_diff.is_none() {
                result.first_diff = Some(FirstDiff { x, y, expected: a, actual: b });
            }
        }
    }
    Some(result)
}

/// Dark gray where the buffers agree, red where they do not.
pub fn diff_image(expected: &PixelBuffer, actual: &PixelBuffer) -> PixelBuffer {
    let width = expected.width.min(actual.width);
    let height = expected.height.min(actual.height);
    let mut out = PixelBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let px = if expected.pixel(x, y) == actual.pixel(x, y) {
                [40, 40, 40, 255]
            } else {
                [255, 0, 0, 255]
            };
            let i = out.index(x, y);
            out.data[i..i + 4].copy_from_slice(&px);
        }
    }
    out
}

// ============================================================================
// BMP I/O (32-bit BGRA, top-down)
// ============================================================================

const BMP_HEADER_SIZE: usize = 14 + 40;

pub fn encode_bmp(buf: &PixelBuffer) -> Vec<u8> {
    let image_size = buf.width * buf.height * 4;
    let mut out = Vec::with_capacity(BMP_HEADER_SIZE + image_size as usize);

    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(BMP_HEADER_SIZE as u32 + image_size).to_le_bytes());
    out.extend_from_slice(&[0u8; 4]);
    out.extend_from_slice(&(BMP_HEADER_SIZE as u32).to_le_bytes());

    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&(buf.width as i32).to_le_bytes());
    // Negative height: rows are stored top-down.
    out.extend_from_slice(&(-(buf.height as i32)).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&32u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&image_size.to_le_bytes());
    out.extend_from_slice(&[0u8; 16]);

    for px in buf.data.chunks_exact(4) {
        out.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
    }
    out
}

/// Decode a 24- or 32-bit uncompressed BMP.
pub fn decode_bmp(data: &[u8]) -> io::Result<PixelBuffer> {
    let invalid = |msg: &str| io::Error::new(io::ErrorKind::InvalidData, msg.to_string());
    if data.len() < BMP_HEADER_SIZE || &data[0..2] != b"BM" {
        return Err(invalid("not a BMP file"));
    }
    let le32 = |at: usize| [data[at], data[at + 1], data[at + 2], data[at + 3]];
    let offset = u32::from_le_bytes(le32(10)) as usize;
    let w = i32::from_le_bytes(le32(18));
    let h = i32::from_le_bytes(le32(22));
    let bytes_pp = u16::from_le_bytes([data[28], data[29]]) as usize / 8;
    if bytes_pp != 3 && bytes_pp != 4 {
        return Err(invalid("unsupported bit depth"));
    }

    let width = w.unsigned_abs();
    let height = h.unsigned_abs();
    let stride = (width as usize * bytes_pp).div_ceil(4) * 4;
    if data.len() < offset + stride * height as usize {
        return Err(invalid("truncated pixel data"));
    }

    let mut buf = PixelBuffer::new(width, height);
    for y in 0..height {
        let src_y = if h < 0 { y } else { height - 1 - y };
        let row = &data[offset + src_y as usize * stride..];
        for x in 0..width {
            let s = &row[x as usize * bytes_pp..];
            let alpha = if bytes_pp == 4 { s[3] } else { 255 };
            let i = buf.index(x, y);
            buf.data[i..i + 4].copy_from_slice(&[s[2], s[1], s[0], alpha]);
        }
    }
    Ok(buf)
}

pub fn save_bmp(path: &Path, buf: &PixelBuffer) -> io::Result<()> {
    fs::write(path, encode_bmp(buf))
}

pub fn load_bmp(path: &Path) -> io::Result<PixelBuffer> {
    decode_bmp(&fs::read(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ei_toolkit::{ChannelOrder, Color, Size};

    fn checker() -> PixelBuffer {
        let mut b = PixelBuffer::new(3, 2);
        for (i, px) in b.data.chunks_exact_mut(4).enumerate() {
            px.copy_from_slice(&[i as u8 * 10, 0xff - i as u8, 7, 0xff]);
        }
        b
    }

    #[test]
    fn test_bmp_header_and_contents() {
        let buf = checker();
        let bytes = encode_bmp(&buf);
        assert_eq!(&bytes[0..2], b"BM");
        assert_eq!(bytes.len(), BMP_HEADER_SIZE + 3 * 2 * 4);
        assert_eq!(decode_bmp(&bytes).unwrap(), buf);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_bmp(b"PNG").is_err());
        let mut bytes = encode_bmp(&checker());
        bytes.truncate(BMP_HEADER_SIZE + 4);
        assert!(decode_bmp(&bytes).is_err());
    }

    #[test]
    fn test_compare_reports_first_difference() {
        let a = checker();
        let mut b = a.clone();
        let i = b.index(2, 1);
        b.data[i] = b.data[i].wrapping_add(5);
        let r = compare(&a, &b).unwrap();
        assert!(!r.identical());
        assert_eq!(r.different_pixels, 1);
        assert_eq!(r.max_channel_diff, 5);
        assert_eq!(r.first_diff.as_ref().map(|d| (d.x, d.y)), Some((2, 1)));
        assert!(compare(&a, &a).unwrap().identical());
        assert!(compare(&a, &PixelBuffer::new(1, 1)).is_none());

        let diff = diff_image(&a, &b);
        assert_eq!(diff.pixel(2, 1), [255, 0, 0, 255]);
        assert_eq!(diff.pixel(0, 0), [40, 40, 40, 255]);
    }

    #[test]
    fn test_from_surface_decodes_channel_order() {
        let mut s = Surface::new(Size::new(2, 1), ChannelOrder::BGRA, true);
        s.lock()
            .put_pixel(Point::new(1, 0), Color::new(1, 2, 3, 4));
        let buf = PixelBuffer::from_surface(&s);
        assert_eq!(buf.pixel(1, 0), [1, 2, 3, 4]);
    }
}
