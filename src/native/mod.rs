//! Native texture buffers and their RGBA codecs.
//!
//! All formats are stored row-major, big-endian for multi-byte texels,
//! with sub-byte rows padded to a whole byte.

mod decode;
mod encode;

use alloc::vec::Vec;

use enough::Stop;

use crate::decode::DecodedImage;
use crate::error::TextureError;
use crate::format::PixelFormat;
use crate::palette::Palette;

/// A raw native texture: format, dimensions and a payload whose length is
/// exactly [`PixelFormat::payload_len`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativeImage {
    format: PixelFormat,
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl NativeImage {
    /// Wrap a payload, rejecting any length other than the one implied by
    /// `format`, `width` and `height`.
    ///
    /// Row padding in sub-byte formats is accepted whatever its value.
    /// Decoding ignores it and encoding writes zero bits there.
    pub fn new(
        format: PixelFormat,
        width: u32,
        height: u32,
        data: Vec<u8>,
    ) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::InvalidDimensions { width, height });
        }
        let expected = format.payload_len(width, height)?;
        if data.len() != expected {
            return Err(TextureError::SizeMismatch {
                format,
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            format,
            width,
            height,
            data,
        })
    }

    /// Like [`NativeImage::new`], copying from a slice.
    pub fn from_slice(
        format: PixelFormat,
        width: u32,
        height: u32,
        data: &[u8],
    ) -> Result<Self, TextureError> {
        Self::new(format, width, height, data.to_vec())
    }

    /// Encode `image` as `format`.
    ///
    /// Indexed formats require `image` to carry a palette. Indices decoded
    /// alongside that palette are reused as-is; otherwise every pixel must
    /// exactly match an entry's expanded color.
    pub fn encode(
        image: &DecodedImage,
        format: PixelFormat,
        stop: impl Stop,
    ) -> Result<Self, TextureError> {
        Self::encode_dyn(image, format, &stop)
    }

    pub(crate) fn encode_dyn(
        image: &DecodedImage,
        format: PixelFormat,
        stop: &dyn Stop,
    ) -> Result<Self, TextureError> {
        let data = encode::encode_texels(image, format, stop)?;
        Self::new(format, image.width(), image.height(), data)
    }

    /// Encode `image` as an indexed `format`, building a palette of
    /// `palette_size(format)` entries by quantization.
    ///
    /// Returns [`TextureError::FormatMismatch`] for non-indexed formats.
    pub fn encode_quantized(
        image: &DecodedImage,
        format: PixelFormat,
        stop: impl Stop,
    ) -> Result<(Self, Palette), TextureError> {
        Self::encode_quantized_dyn(image, format, &stop)
    }

    pub(crate) fn encode_quantized_dyn(
        image: &DecodedImage,
        format: PixelFormat,
        stop: &dyn Stop,
    ) -> Result<(Self, Palette), TextureError> {
        let Some(size) = format.palette_size() else {
            return Err(TextureError::FormatMismatch(alloc::format!(
                "{format} is not an indexed format"
            )));
        };
        let (indices, palette) = crate::quantize::quantize_with_stop(image, size, stop)?;
        let data = encode::encode_indexed(image, format, &indices, &palette, stop)?;
        Ok((Self::new(format, image.width(), image.height(), data)?, palette))
    }

    /// Decode to RGBA. Indexed formats need `palette` and keep both the
    /// palette and the index buffer in the result.
    pub fn decode(
        &self,
        palette: Option<&Palette>,
        stop: impl Stop,
    ) -> Result<DecodedImage, TextureError> {
        self.decode_dyn(palette, &stop)
    }

    pub(crate) fn decode_dyn(
        &self,
        palette: Option<&Palette>,
        stop: &dyn Stop,
    ) -> Result<DecodedImage, TextureError> {
        decode::decode_texels(
            &self.data,
            self.format,
            self.width,
            self.height,
            palette,
            stop,
        )
    }

    /// Swap the two 32-bit words of every 64-bit chunk in odd rows.
    ///
    /// This is the interleaving TMEM expects for textures loaded with
    /// `LoadBlock`. The operation is its own inverse. A trailing partial
    /// chunk in a row is left alone.
    pub fn swap_word_rows(&mut self) {
        let row_bytes = self.data.len() / self.height as usize;
        if row_bytes == 0 {
            return;
        }
        for row in self.data.chunks_exact_mut(row_bytes).skip(1).step_by(2) {
            for chunk in row.chunks_exact_mut(8) {
                let (first, second) = chunk.split_at_mut(4);
                first.swap_with_slice(second);
            }
        }
    }

    /// Builder form of [`NativeImage::swap_word_rows`].
    pub fn with_word_swap(mut self) -> Self {
        self.swap_word_rows();
        self
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
