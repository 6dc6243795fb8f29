use alloc::vec::Vec;

use crate::color::RgbaColor;
use crate::error::TextureError;
use crate::palette::Palette;

/// Canonical decoded image: RGBA pixels in scan order, plus the palette and
/// index buffer when the source was indexed.
///
/// Immutable once built. Conversions borrow it and produce new values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<RgbaColor>,
    palette: Option<Palette>,
    indices: Option<Vec<u8>>,
}

impl DecodedImage {
    /// Wrap `width * height` pixels.
    pub fn new(width: u32, height: u32, pixels: Vec<RgbaColor>) -> Result<Self, TextureError> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(TextureError::PixelCountMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            palette: None,
            indices: None,
        })
    }

    /// Wrap packed RGBA8 bytes (`width * height * 4`).
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self, TextureError> {
        let expected = pixel_count(width, height)?;
        if bytes.len() != expected.saturating_mul(4) {
            return Err(TextureError::PixelCountMismatch {
                expected,
                actual: bytes.len() / 4,
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|c| RgbaColor::new(c[0], c[1], c[2], c[3]))
            .collect();
        Self::new(width, height, pixels)
    }

    /// Attach a palette to match against when encoding to an indexed format.
    ///
    /// Any index buffer from an earlier decode is dropped, since it referred
    /// to the previous palette.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = Some(palette);
        self.indices = None;
        self
    }

    /// Indexed image whose `pixels` were looked up from `indices`.
    pub(crate) fn indexed(
        width: u32,
        height: u32,
        pixels: Vec<RgbaColor>,
        indices: Vec<u8>,
        palette: Palette,
    ) -> Self {
        debug_assert_eq!(pixels.len(), indices.len());
        Self {
            width,
            height,
            pixels,
            palette: Some(palette),
            indices: Some(indices),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixels in scan order, `width * height` long.
    pub fn pixels(&self) -> &[RgbaColor] {
        &self.pixels
    }

    /// Pixel at (`x`, `y`), if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<RgbaColor> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// Per-pixel palette indices, present when decoded from an indexed source.
    pub fn indices(&self) -> Option<&[u8]> {
        self.indices.as_deref()
    }

    pub fn is_indexed(&self) -> bool {
        self.palette.is_some()
    }

    /// Whether every pixel has R == G == B.
    pub fn is_grayscale(&self) -> bool {
        self.pixels.iter().all(|p| p.r == p.g && p.g == p.b)
    }

    /// Whether every pixel is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.pixels.iter().all(|p| p.a == 255)
    }

    /// Packed RGBA8 bytes.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for p in &self.pixels {
            out.extend_from_slice(&p.to_array());
        }
        out
    }

    /// Convert to typed [`rgb::RGBA8`] pixels.
    #[cfg(feature = "rgb")]
    pub fn to_rgba8(&self) -> Vec<rgb::RGBA8> {
        self.pixels.iter().map(|&p| p.into()).collect()
    }

    /// Convert to an [`imgref::ImgVec`] of typed pixels.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec(&self) -> imgref::ImgVec<rgb::RGBA8> {
        imgref::ImgVec::new(self.to_rgba8(), self.width as usize, self.height as usize)
    }
}

pub(crate) fn pixel_count(width: u32, height: u32) -> Result<usize, TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::InvalidDimensions { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(TextureError::DimensionsTooLarge { width, height })
}
