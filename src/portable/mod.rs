//! PNG as the portable container for native textures.
//!
//! Indexed formats travel as indexed PNGs whose PLTE (plus tRNS) is the
//! native TLUT expanded to 8 bits, in order and at full length. Intensity
//! formats travel as 8-bit grayscale (with alpha for IA formats) and
//! direct-color formats as 8-bit RGBA. Every mapping is chosen so that
//! native -> PNG -> native reproduces the native bytes exactly.

mod decode;
mod encode;

use alloc::vec::Vec;

use enough::Stop;

use crate::decode::DecodedImage;
use crate::error::TextureError;
use crate::format::PixelFormat;
use crate::limits::Limits;
use crate::native::NativeImage;
use crate::palette::Palette;

use encode::PortableLayout;

impl NativeImage {
    /// Encode as a PNG. `palette` is required for indexed formats and is
    /// embedded as the PNG's palette.
    pub fn to_portable(
        &self,
        palette: Option<&Palette>,
        stop: impl Stop,
    ) -> Result<Vec<u8>, TextureError> {
        let image = self.decode_dyn(palette, &stop)?;
        encode::encode_png(&image, PortableLayout::for_format(self.format()), &stop)
    }
}

/// A decoded PNG held for conversion to native formats.
///
/// Immutable: every accessor borrows it and returns new buffers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortableImage {
    image: DecodedImage,
    palette: Option<Palette>,
}

impl PortableImage {
    /// Decode PNG bytes with no limits.
    pub fn from_bytes(data: &[u8]) -> Result<Self, TextureError> {
        PortableRequest::new(data).decode(enough::Unstoppable)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &DecodedImage {
        &self.image
    }

    /// The PNG's PLTE chunk as a native palette, if present.
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// The PNG's PLTE chunk as native TLUT bytes (2 bytes per entry,
    /// big-endian, original order).
    pub fn palette_bytes(&self) -> Result<Vec<u8>, TextureError> {
        self.palette
            .as_ref()
            .map(Palette::to_bytes)
            .ok_or(TextureError::MissingPaletteMetadata)
    }

    /// Convert to `format` by exact encoding. Indexed formats use the PNG's
    /// own palette.
    pub fn to_native(&self, format: PixelFormat) -> Result<NativeImage, TextureError> {
        convert(&self.image, self.palette.as_ref(), format, Conversion::Exact, &enough::Unstoppable)
            .map(|(native, _)| native)
    }

    /// Convert to an indexed `format` by exact matching against a
    /// caller-supplied palette instead of the PNG's own.
    pub fn to_native_matching(
        &self,
        format: PixelFormat,
        palette: &Palette,
    ) -> Result<NativeImage, TextureError> {
        convert(
            &self.image,
            self.palette.as_ref(),
            format,
            Conversion::WithPalette(palette),
            &enough::Unstoppable,
        )
        .map(|(native, _)| native)
    }

    fn native_bytes(&self, format: PixelFormat) -> Result<Vec<u8>, TextureError> {
        self.to_native(format).map(NativeImage::into_data)
    }

    pub fn as_i1(&self) -> Result<Vec<u8>, TextureError> {
        self.native_bytes(PixelFormat::I1)
    }

    pub fn as_i4(&self) -> Result<Vec<u8>, TextureError> {
        self.native_bytes(PixelFormat::I4)
    }

    pub fn as_i8(&self) -> Result<Vec<u8>, TextureError> {
        self.native_bytes(PixelFormat::I8)
    }

    pub fn as_ia4(&self) -> Result<Vec<u8>, TextureError> {
        self.native_bytes(PixelFormat::Ia4)
    }

    pub fn as_ia8(&self) -> Result<Vec<u8>, TextureError> {
        self.native_bytes(PixelFormat::Ia8)
    }

    pub fn as_ia16(&self) -> Result<Vec<u8>, TextureError> {
        self.native_bytes(PixelFormat::Ia16)
    }

    /// 4-bit indices into the PNG's palette.
    pub fn as_ci4(&self) -> Result<Vec<u8>, TextureError> {
        self.native_bytes(PixelFormat::Ci4)
    }

    /// 8-bit indices into the PNG's palette.
    pub fn as_ci8(&self) -> Result<Vec<u8>, TextureError> {
        self.native_bytes(PixelFormat::Ci8)
    }

    pub fn as_rgba16(&self) -> Result<Vec<u8>, TextureError> {
        self.native_bytes(PixelFormat::Rgba16)
    }

    pub fn as_rgba32(&self) -> Result<Vec<u8>, TextureError> {
        self.native_bytes(PixelFormat::Rgba32)
    }
}

/// PNG to native conversion request.
///
/// ```no_run
/// use zentexture::{Limits, PixelFormat, PortableRequest, Unstoppable};
///
/// let png: &[u8] = &[]; // your PNG bytes
/// let (native, palette) = PortableRequest::new(png)
///     .with_limits(&Limits::N64)
///     .with_quantize(true)
///     .to_native_with_palette(PixelFormat::Ci4, Unstoppable)?;
/// # Ok::<(), zentexture::TextureError>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct PortableRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
    palette: Option<&'a Palette>,
    quantize: bool,
}

impl<'a> PortableRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            limits: None,
            palette: None,
            quantize: false,
        }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Match pixels against `palette` when producing an indexed format,
    /// ignoring any palette in the PNG.
    pub fn with_palette(mut self, palette: &'a Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Allow building a palette by quantization when an indexed format is
    /// requested and neither the PNG nor the request supplies one.
    /// Disabled by default.
    pub fn with_quantize(mut self, quantize: bool) -> Self {
        self.quantize = quantize;
        self
    }

    /// Decode the PNG.
    pub fn decode(self, stop: impl Stop) -> Result<PortableImage, TextureError> {
        let (image, palette) = decode::decode_png(self.data, self.limits, &stop)?;
        Ok(PortableImage { image, palette })
    }

    /// Decode and convert to `format`.
    pub fn to_native(self, format: PixelFormat, stop: impl Stop) -> Result<NativeImage, TextureError> {
        self.to_native_with_palette(format, stop).map(|(native, _)| native)
    }

    /// Decode and convert to `format`, also returning the palette the
    /// indices refer to (always `Some` for indexed formats).
    pub fn to_native_with_palette(
        self,
        format: PixelFormat,
        stop: impl Stop,
    ) -> Result<(NativeImage, Option<Palette>), TextureError> {
        let (image, embedded) = decode::decode_png(self.data, self.limits, &stop)?;
        let conversion = match (self.palette, self.quantize) {
            (Some(palette), _) => Conversion::WithPalette(palette),
            (None, true) => Conversion::Quantize,
            (None, false) => Conversion::Exact,
        };
        convert(&image, embedded.as_ref(), format, conversion, &stop)
    }

    /// Read the PNG's palette from its header chunks, without decoding
    /// pixels.
    pub fn extract_palette(self) -> Result<Palette, TextureError> {
        let header = decode::read_header(self.data)?;
        if let Some(limits) = self.limits {
            limits.check(header.width, header.height)?;
        }
        header.palette.ok_or(TextureError::MissingPaletteMetadata)
    }
}

#[derive(Clone, Copy, Debug)]
enum Conversion<'a> {
    /// Use the image's own palette for indexed formats.
    Exact,
    /// Exact-match against this palette.
    WithPalette(&'a Palette),
    /// Use the image's own palette, or quantize when it has none.
    Quantize,
}

fn convert(
    image: &DecodedImage,
    embedded: Option<&Palette>,
    format: PixelFormat,
    conversion: Conversion<'_>,
    stop: &dyn Stop,
) -> Result<(NativeImage, Option<Palette>), TextureError> {
    if !format.is_indexed() {
        return Ok((NativeImage::encode_dyn(image, format, stop)?, None));
    }

    let chosen = match conversion {
        Conversion::WithPalette(palette) => Some(palette),
        Conversion::Exact | Conversion::Quantize => embedded,
    };
    match chosen {
        // The decoded image already carries this palette and its indices.
        Some(palette) if image.palette() == Some(palette) => {
            Ok((NativeImage::encode_dyn(image, format, stop)?, Some(palette.clone())))
        }
        Some(palette) => {
            let image = image.clone().with_palette(palette.clone());
            Ok((NativeImage::encode_dyn(&image, format, stop)?, Some(palette.clone())))
        }
        None if matches!(conversion, Conversion::Quantize) => {
            let (native, palette) = NativeImage::encode_quantized_dyn(image, format, stop)?;
            Ok((native, Some(palette)))
        }
        None => Err(TextureError::FormatMismatch(alloc::format!(
            "{format} needs a palette but the image has none (quantization disabled)"
        ))),
    }
}
