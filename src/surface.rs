//! Pixel surfaces.
//!
//! A [`Surface`] owns a top-down buffer of 4-byte pixels in a native
//! [`ChannelOrder`]. Pixels are only reachable through a lock guard:
//!
//! - [`Surface::lock`] returns a [`SurfaceLock`] with read/write access.
//! - [`Surface::lock_read`] returns a [`SurfaceRead`] with read access.
//!
//! Dropping the guard releases the lock, so every exit path of a drawing
//! routine leaves the surface unlocked.

use core::cell::Cell;
use core::fmt;

use crate::color::{ChannelOrder, Color};
use crate::geometry::{Point, Rect, Size};

const BYTES_PER_PIXEL: usize = 4;

// ============================================================================
// Surface
// ============================================================================

/// Owned pixel buffer.
pub struct Surface {
    size: Size,
    order: ChannelOrder,
    has_alpha: bool,
    data: Vec<u8>,
    locks: Cell<u32>,
}

impl Surface {
    /// Create a surface cleared to black. Surfaces without an alpha channel
    /// keep their alpha byte at 255; surfaces with one start fully
    /// transparent.
    pub fn new(size: Size, order: ChannelOrder, has_alpha: bool) -> Self {
        let w = size.width.max(0) as usize;
        let h = size.height.max(0) as usize;
        let mut data = vec![0u8; w * h * BYTES_PER_PIXEL];
        if !has_alpha {
            for px in data.chunks_exact_mut(BYTES_PER_PIXEL) {
                px[order.a] = 0xff;
            }
        }
        Self {
            size: Size::new(w as i32, h as i32),
            order,
            has_alpha,
            data,
            locks: Cell::new(0),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Rectangle covering the whole surface, at the origin.
    pub fn rect(&self) -> Rect {
        Rect::sized(self.size)
    }

    pub fn channel_order(&self) -> ChannelOrder {
        self.order
    }

    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    pub fn is_locked(&self) -> bool {
        self.locks.get() > 0
    }

    /// Acquire read/write access to the pixels.
    pub fn lock(&mut self) -> SurfaceLock<'_> {
        self.locks.set(self.locks.get() + 1);
        SurfaceLock { surface: self }
    }

    /// Acquire read access to the pixels.
    pub fn lock_read(&self) -> SurfaceRead<'_> {
        self.locks.set(self.locks.get() + 1);
        SurfaceRead { surface: self }
    }

    fn release(&self) {
        self.locks.set(self.locks.get().saturating_sub(1));
    }

    fn offset(&self, x: i32, y: i32) -> usize {
        (y as usize * self.size.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    fn row_range(&self, y: i32) -> core::ops::Range<usize> {
        let start = self.offset(0, y);
        start..start + self.size.width as usize * BYTES_PER_PIXEL
    }
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("size", &self.size)
            .field("order", &self.order)
            .field("has_alpha", &self.has_alpha)
            .field("locked", &self.is_locked())
            .finish()
    }
}

// ============================================================================
// Read access
// ============================================================================

/// Read access shared by both lock guards.
pub trait PixelRead {
    fn surface(&self) -> &Surface;

    fn size(&self) -> Size {
        self.surface().size
    }

    fn rect(&self) -> Rect {
        self.surface().rect()
    }

    fn channel_order(&self) -> ChannelOrder {
        self.surface().order
    }

    fn has_alpha(&self) -> bool {
        self.surface().has_alpha
    }

    /// Native bytes of row `y`. Panics if `y` is out of bounds.
    fn row(&self, y: i32) -> &[u8] {
        let s = self.surface();
        &s.data[s.row_range(y)]
    }

    /// Decoded color at `p`, or `None` outside the surface.
    fn pixel(&self, p: Point) -> Option<Color> {
        let s = self.surface();
        if !s.rect().contains(p) {
            return None;
        }
        let i = s.offset(p.x, p.y);
        Some(s.order.unmap(&s.data[i..i + BYTES_PER_PIXEL]))
    }
}

/// Shared read lock on a [`Surface`].
pub struct SurfaceRead<'a> {
    surface: &'a Surface,
}

impl PixelRead for SurfaceRead<'_> {
    fn surface(&self) -> &Surface {
        self.surface
    }
}

impl Drop for SurfaceRead<'_> {
    fn drop(&mut self) {
        self.surface.release();
    }
}

// ============================================================================
// Write access
// ============================================================================

/// Exclusive read/write lock on a [`Surface`].
pub struct SurfaceLock<'a> {
    surface: &'a mut Surface,
}

impl SurfaceLock<'_> {
    /// Native bytes of row `y`, mutable. Panics if `y` is out of bounds.
    pub fn row_mut(&mut self, y: i32) -> &mut [u8] {
        let range = self.surface.row_range(y);
        &mut self.surface.data[range]
    }

    /// Write a native pixel at `(x, y)`; ignored outside the surface.
    #[inline]
    pub fn put_native(&mut self, x: i32, y: i32, px: [u8; 4]) {
        if x < 0 || y < 0 || x >= self.surface.size.width || y >= self.surface.size.height {
            return;
        }
        let i = self.surface.offset(x, y);
        self.surface.data[i..i + BYTES_PER_PIXEL].copy_from_slice(&px);
    }

    /// Write `color` at `p`; ignored outside the surface.
    pub fn put_pixel(&mut self, p: Point, color: Color) {
        let px = self.surface.order.map(color);
        self.put_native(p.x, p.y, px);
    }

    /// Write one native pixel across the inclusive span `x1..=x2` of row `y`.
    /// The span must already be clipped to the surface.
    pub(crate) fn fill_span(&mut self, x1: i32, x2: i32, y: i32, px: [u8; 4]) {
        let start = self.surface.offset(x1, y);
        let end = self.surface.offset(x2, y) + BYTES_PER_PIXEL;
        for dst in self.surface.data[start..end].chunks_exact_mut(BYTES_PER_PIXEL) {
            dst.copy_from_slice(&px);
        }
    }
}

impl PixelRead for SurfaceLock<'_> {
    fn surface(&self) -> &Surface {
        self.surface
    }
}

impl Drop for SurfaceLock<'_> {
    fn drop(&mut self) {
        self.surface.release();
    }
}
