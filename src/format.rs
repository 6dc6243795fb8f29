use core::fmt;
use core::str::FromStr;

use crate::error::TextureError;

/// N64 native texture format (RDP `G_IM_FMT` × `G_IM_SIZ` combination).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 1-bit intensity, 8 pixels per byte.
    I1,
    /// 4-bit intensity, 2 pixels per byte.
    I4,
    /// 8-bit intensity.
    I8,
    /// 3-bit intensity + 1-bit alpha, 2 pixels per byte.
    Ia4,
    /// 4-bit intensity + 4-bit alpha.
    Ia8,
    /// 8-bit intensity + 8-bit alpha.
    Ia16,
    /// 4-bit palette index into a 16-entry TLUT.
    Ci4,
    /// 8-bit palette index into a 256-entry TLUT.
    Ci8,
    /// 5-5-5-1 RGBA, big-endian.
    Rgba16,
    /// 8-8-8-8 RGBA.
    Rgba32,
}

/// Which kind of per-pixel data a format stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelLayout {
    /// Palette index, `bits_per_pixel` wide.
    Indexed,
    /// Intensity, optionally followed by alpha (alpha width 0 = opaque).
    Intensity { intensity: u8, alpha: u8 },
    /// Direct RGBA fields, most significant first.
    Direct { red: u8, green: u8, blue: u8, alpha: u8 },
}

/// Static description of a [`PixelFormat`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Descriptor {
    pub bits_per_pixel: u8,
    pub layout: ChannelLayout,
}

impl Descriptor {
    /// Whether pixels are palette indices.
    pub fn is_indexed(&self) -> bool {
        matches!(self.layout, ChannelLayout::Indexed)
    }

    /// Number of TLUT entries an indexed format addresses, `None` otherwise.
    pub fn palette_size(&self) -> Option<usize> {
        match self.layout {
            ChannelLayout::Indexed => Some(1 << self.bits_per_pixel),
            _ => None,
        }
    }

    /// Red, green, blue and alpha field widths for direct-color formats.
    pub fn channel_bits(&self) -> Option<[u8; 4]> {
        match self.layout {
            ChannelLayout::Direct {
                red,
                green,
                blue,
                alpha,
            } => Some([red, green, blue, alpha]),
            _ => None,
        }
    }

    /// Whether the format stores any alpha information. Indexed formats
    /// carry alpha in their palette.
    pub fn has_alpha(&self) -> bool {
        match self.layout {
            ChannelLayout::Indexed => true,
            ChannelLayout::Intensity { alpha, .. } => alpha > 0,
            ChannelLayout::Direct { alpha, .. } => alpha > 0,
        }
    }
}

const fn intensity(bpp: u8, intensity: u8, alpha: u8) -> Descriptor {
    Descriptor {
        bits_per_pixel: bpp,
        layout: ChannelLayout::Intensity { intensity, alpha },
    }
}

const fn indexed(bpp: u8) -> Descriptor {
    Descriptor {
        bits_per_pixel: bpp,
        layout: ChannelLayout::Indexed,
    }
}

const fn direct(bpp: u8, red: u8, green: u8, blue: u8, alpha: u8) -> Descriptor {
    Descriptor {
        bits_per_pixel: bpp,
        layout: ChannelLayout::Direct {
            red,
            green,
            blue,
            alpha,
        },
    }
}

impl PixelFormat {
    /// Every format, in declaration order.
    pub const ALL: [PixelFormat; 10] = [
        Self::I1,
        Self::I4,
        Self::I8,
        Self::Ia4,
        Self::Ia8,
        Self::Ia16,
        Self::Ci4,
        Self::Ci8,
        Self::Rgba16,
        Self::Rgba32,
    ];

    /// Static descriptor for this format.
    pub const fn describe(self) -> Descriptor {
        match self {
            Self::I1 => intensity(1, 1, 0),
            Self::I4 => intensity(4, 4, 0),
            Self::I8 => intensity(8, 8, 0),
            Self::Ia4 => intensity(4, 3, 1),
            Self::Ia8 => intensity(8, 4, 4),
            Self::Ia16 => intensity(16, 8, 8),
            Self::Ci4 => indexed(4),
            Self::Ci8 => indexed(8),
            Self::Rgba16 => direct(16, 5, 5, 5, 1),
            Self::Rgba32 => direct(32, 8, 8, 8, 8),
        }
    }

    pub const fn bits_per_pixel(self) -> u32 {
        self.describe().bits_per_pixel as u32
    }

    pub fn is_indexed(self) -> bool {
        self.describe().is_indexed()
    }

    /// TLUT entry count for indexed formats (16 or 256).
    pub fn palette_size(self) -> Option<usize> {
        self.describe().palette_size()
    }

    /// Lower-case tag used on the conversion boundary (`"rgba16"`, `"ci4"`, ...).
    pub const fn tag(self) -> &'static str {
        match self {
            Self::I1 => "i1",
            Self::I4 => "i4",
            Self::I8 => "i8",
            Self::Ia4 => "ia4",
            Self::Ia8 => "ia8",
            Self::Ia16 => "ia16",
            Self::Ci4 => "ci4",
            Self::Ci8 => "ci8",
            Self::Rgba16 => "rgba16",
            Self::Rgba32 => "rgba32",
        }
    }

    /// Bytes in one row. Sub-byte rows are padded to a byte boundary.
    pub fn row_bytes(self, width: u32) -> Result<usize, TextureError> {
        (width as usize)
            .checked_mul(self.bits_per_pixel() as usize)
            .map(|bits| bits.div_ceil(8))
            .ok_or(TextureError::DimensionsTooLarge { width, height: 0 })
    }

    /// Exact payload length of a `width` x `height` image in this format.
    pub fn payload_len(self, width: u32, height: u32) -> Result<usize, TextureError> {
        self.row_bytes(width)?
            .checked_mul(height as usize)
            .ok_or(TextureError::DimensionsTooLarge { width, height })
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for PixelFormat {
    type Err = TextureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PixelFormat::ALL
            .into_iter()
            .find(|f| f.tag().eq_ignore_ascii_case(s))
            .ok_or_else(|| TextureError::UnsupportedFormat(s.into()))
    }
}
