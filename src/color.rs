//! Color types and channel orders.
//!
//! A [`Color`] is four 8-bit components. Surfaces store pixels as four bytes
//! in a native channel order described by [`ChannelOrder`]; [`ChannelOrder::map`]
//! and [`ChannelOrder::unmap`] convert between the two.

// ============================================================================
// Channel orders
// ============================================================================

/// Byte offset of each color component inside a 4-byte pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelOrder {
    pub r: usize,
    pub g: usize,
    pub b: usize,
    pub a: usize,
}

impl ChannelOrder {
    /// R=0, G=1, B=2, A=3
    pub const RGBA: ChannelOrder = ChannelOrder { r: 0, g: 1, b: 2, a: 3 };
    /// B=0, G=1, R=2, A=3
    pub const BGRA: ChannelOrder = ChannelOrder { r: 2, g: 1, b: 0, a: 3 };
    /// A=0, R=1, G=2, B=3
    pub const ARGB: ChannelOrder = ChannelOrder { r: 1, g: 2, b: 3, a: 0 };
    /// A=0, B=1, G=2, R=3
    pub const ABGR: ChannelOrder = ChannelOrder { r: 3, g: 2, b: 1, a: 0 };

    /// Encode `color` into a native pixel.
    #[inline]
    pub fn map(&self, color: Color) -> [u8; 4] {
        let mut px = [0u8; 4];
        px[self.r] = color.red;
        px[self.g] = color.green;
        px[self.b] = color.blue;
        px[self.a] = color.alpha;
        px
    }

    /// Decode a native pixel.
    #[inline]
    pub fn unmap(&self, px: &[u8]) -> Color {
        Color::new(px[self.r], px[self.g], px[self.b], px[self.a])
    }
}

impl Default for ChannelOrder {
    fn default() -> Self {
        ChannelOrder::RGBA
    }
}

// ============================================================================
// Color
// ============================================================================

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Opaque color.
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, 0xff)
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self::new(self.red, self.green, self.blue, alpha)
    }

    /// Add `delta` to each RGB channel, clamping to `[0, 255]`. Alpha is kept.
    pub fn shade(self, delta: i32) -> Color {
        let f = |c: u8| (c as i32 + delta).clamp(0, 255) as u8;
        Color::new(f(self.red), f(self.green), f(self.blue), self.alpha)
    }

    /// Interpolate RGB from `dst` toward `self` by `self.alpha / 255`.
    /// The result is opaque.
    pub fn blend_over(self, dst: Color) -> Color {
        let a = self.alpha as u32;
        let mix = |s: u8, d: u8| ((a * s as u32 + (255 - a) * d as u32) / 255) as u8;
        Color::rgb(
            mix(self.red, dst.red),
            mix(self.green, dst.green),
            mix(self.blue, dst.blue),
        )
    }
}
