use alloc::string::String;
use enough::StopReason;

use crate::color::RgbaColor;
use crate::format::PixelFormat;

/// Errors from native texture and portable image conversion.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TextureError {
    #[error("unsupported texture format: {0}")]
    UnsupportedFormat(String),

    #[error(
        "{format} payload for {width}x{height} must be {expected} bytes, got {actual}"
    )]
    SizeMismatch {
        format: PixelFormat,
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("pixel buffer holds {actual} pixels, dimensions need {expected}")]
    PixelCountMismatch { expected: usize, actual: usize },

    #[error("indexed format requires a palette")]
    MissingPalette,

    #[error("portable image has no palette")]
    MissingPaletteMetadata,

    #[error("malformed palette: {0}")]
    MalformedPalette(String),

    #[error("color {color:?} at ({x}, {y}) is not in the palette")]
    ColorNotInPalette { x: u32, y: u32, color: RgbaColor },

    #[error("palette index {index} out of range (palette has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("format mismatch: {0}")]
    FormatMismatch(String),

    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("portable image decode failed: {0}")]
    PortableDecode(String),

    #[error("portable image encode failed: {0}")]
    PortableEncode(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for TextureError {
    fn from(r: StopReason) -> Self {
        TextureError::Cancelled(r)
    }
}

#[cfg(feature = "png")]
impl From<png::DecodingError> for TextureError {
    fn from(e: png::DecodingError) -> Self {
        TextureError::PortableDecode(alloc::format!("{e}"))
    }
}

#[cfg(feature = "png")]
impl From<png::EncodingError> for TextureError {
    fn from(e: png::EncodingError) -> Self {
        TextureError::PortableEncode(alloc::format!("{e}"))
    }
}
