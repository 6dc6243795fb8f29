use crate::channel::{compress, expand};

/// 8-bit-per-channel RGBA color. The canonical in-memory pixel.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RgbaColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl RgbaColor {
    pub const TRANSPARENT: RgbaColor = RgbaColor::new(0, 0, 0, 0);
    pub const BLACK: RgbaColor = RgbaColor::new(0, 0, 0, 255);
    pub const WHITE: RgbaColor = RgbaColor::new(255, 255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Gray with all three color channels set to `i`.
    #[inline]
    pub const fn gray(i: u8, a: u8) -> Self {
        Self { r: i, g: i, b: i, a }
    }

    #[inline]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub const fn from_array(c: [u8; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }

    /// Squared euclidean distance over all four channels.
    #[inline]
    pub(crate) fn distance_sq(self, other: RgbaColor) -> u32 {
        let d = |a: u8, b: u8| {
            let v = a.abs_diff(b) as u32;
            v * v
        };
        d(self.r, other.r) + d(self.g, other.g) + d(self.b, other.b) + d(self.a, other.a)
    }
}

#[cfg(feature = "rgb")]
impl From<RgbaColor> for rgb::RGBA8 {
    fn from(c: RgbaColor) -> Self {
        rgb::RGBA8::new(c.r, c.g, c.b, c.a)
    }
}

#[cfg(feature = "rgb")]
impl From<rgb::RGBA8> for RgbaColor {
    fn from(c: rgb::RGBA8) -> Self {
        RgbaColor::new(c.r, c.g, c.b, c.a)
    }
}

/// Packed RGBA 5-5-5-1 color, the TLUT entry and RGBA16 texel layout.
///
/// Bits 15..11 red, 10..6 green, 5..1 blue, bit 0 alpha (opaque when set).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NativeColor16(pub u16);

impl NativeColor16 {
    #[inline]
    pub const fn from_fields(r: u8, g: u8, b: u8, a: bool) -> Self {
        Self(
            ((r as u16 & 0x1F) << 11)
                | ((g as u16 & 0x1F) << 6)
                | ((b as u16 & 0x1F) << 1)
                | a as u16,
        )
    }

    #[inline]
    pub const fn red(self) -> u8 {
        ((self.0 >> 11) & 0x1F) as u8
    }

    #[inline]
    pub const fn green(self) -> u8 {
        ((self.0 >> 6) & 0x1F) as u8
    }

    #[inline]
    pub const fn blue(self) -> u8 {
        ((self.0 >> 1) & 0x1F) as u8
    }

    #[inline]
    pub const fn opaque(self) -> bool {
        self.0 & 1 != 0
    }

    /// Expand to 8-bit channels. Alpha becomes 0 or 255.
    #[inline]
    pub const fn to_rgba(self) -> RgbaColor {
        RgbaColor::new(
            expand(self.red() as u32, 5),
            expand(self.green() as u32, 5),
            expand(self.blue() as u32, 5),
            expand(self.0 as u32 & 1, 1),
        )
    }

    /// Truncate 8-bit channels to 5-5-5-1. Alpha >= 128 is opaque.
    #[inline]
    pub const fn from_rgba(c: RgbaColor) -> Self {
        Self::from_fields(
            compress(c.r, 5) as u8,
            compress(c.g, 5) as u8,
            compress(c.b, 5) as u8,
            compress(c.a, 1) != 0,
        )
    }

    #[inline]
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    #[inline]
    pub const fn from_be_bytes(b: [u8; 2]) -> Self {
        Self(u16::from_be_bytes(b))
    }
}

impl From<RgbaColor> for NativeColor16 {
    fn from(c: RgbaColor) -> Self {
        Self::from_rgba(c)
    }
}

impl From<NativeColor16> for RgbaColor {
    fn from(c: NativeColor16) -> Self {
        c.to_rgba()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes() {
        assert_eq!(NativeColor16(0xFFFF).to_rgba(), RgbaColor::WHITE);
        assert_eq!(NativeColor16(0x0000).to_rgba(), RgbaColor::TRANSPARENT);
        assert_eq!(NativeColor16::from_rgba(RgbaColor::WHITE).0, 0xFFFF);
        assert_eq!(NativeColor16::from_rgba(RgbaColor::BLACK).0, 0x0001);
    }

    #[test]
    fn unpacks_fields() {
        // 11010 10101 01010 1
        let c = NativeColor16(0b1101_0101_0101_0101);
        assert_eq!((c.red(), c.green(), c.blue(), c.opaque()), (26, 21, 10, true));
        assert_eq!(c.to_rgba(), RgbaColor::new(214, 173, 82, 255));
    }

    #[test]
    fn packs_truncated_channels() {
        let c = NativeColor16::from_rgba(RgbaColor::new(213, 172, 82, 255));
        assert_eq!(c.0, 0b1101_0101_0101_0101);
        assert_eq!(
            NativeColor16::from_rgba(RgbaColor::new(120, 200, 50, 150)).to_be_bytes(),
            [126, 77]
        );
    }

    #[test]
    fn alpha_threshold_is_high_bit() {
        let base = RgbaColor::new(0, 0, 0, 127);
        assert!(!NativeColor16::from_rgba(base).opaque());
        assert!(NativeColor16::from_rgba(RgbaColor { a: 128, ..base }).opaque());
    }

    #[test]
    fn every_native_value_survives_expansion() {
        for v in 0..=u16::MAX {
            let c = NativeColor16(v);
            assert_eq!(NativeColor16::from_rgba(c.to_rgba()), c);
        }
    }

    #[test]
    fn byte_order_is_big_endian() {
        let c = NativeColor16(0x1234);
        assert_eq!(c.to_be_bytes(), [0x12, 0x34]);
        assert_eq!(NativeColor16::from_be_bytes([0x12, 0x34]), c);
    }

    #[test]
    fn distance() {
        let a = RgbaColor::new(0, 0, 0, 0);
        let b = RgbaColor::new(1, 2, 3, 4);
        assert_eq!(a.distance_sq(b), 1 + 4 + 9 + 16);
        assert_eq!(b.distance_sq(b), 0);
    }
}
