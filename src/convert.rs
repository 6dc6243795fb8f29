//! Byte-buffer conversions between native textures and PNG.

use alloc::vec::Vec;

use enough::Unstoppable;

use crate::error::TextureError;
use crate::format::PixelFormat;
use crate::native::NativeImage;
use crate::palette::Palette;
use crate::portable::PortableRequest;

/// Native TLUT bytes (big-endian 5-5-5-1, 2 bytes per entry, original
/// order) of the palette embedded in `portable`.
///
/// Fails with [`TextureError::MissingPaletteMetadata`] if the PNG has no
/// PLTE chunk.
pub fn extract_palette(portable: &[u8]) -> Result<Vec<u8>, TextureError> {
    PortableRequest::new(portable)
        .extract_palette()
        .map(|palette| palette.to_bytes())
}

/// Convert a raw native texture to PNG bytes.
///
/// `palette` is required exactly when `format` is indexed and must be
/// `palette_size(format) * 2` bytes long.
///
/// Sub-byte rows whose width does not fill the last byte are padded. The
/// padding bits are not validated and are never carried into the PNG, so
/// converting back writes them as zero.
pub fn native_to_portable(
    native: &[u8],
    format: PixelFormat,
    width: u32,
    height: u32,
    palette: Option<&[u8]>,
) -> Result<Vec<u8>, TextureError> {
    let image = NativeImage::from_slice(format, width, height, native)?;
    let palette = match (format.is_indexed(), palette) {
        (true, Some(bytes)) => Some(Palette::from_bytes_for(format, bytes)?),
        (true, None) => return Err(TextureError::MissingPalette),
        (false, Some(_)) => {
            return Err(TextureError::FormatMismatch(alloc::format!(
                "{format} does not use a palette"
            )));
        }
        (false, None) => None,
    };
    image.to_portable(palette.as_ref(), Unstoppable)
}

/// Convert PNG bytes to a raw native texture of `format`, taking the
/// dimensions from the PNG.
///
/// Indexed formats use the PNG's own palette; a PNG without one fails with
/// [`TextureError::FormatMismatch`]. Use [`PortableRequest`] to supply a
/// palette or enable quantization.
pub fn portable_to_native(portable: &[u8], format: PixelFormat) -> Result<Vec<u8>, TextureError> {
    PortableRequest::new(portable)
        .to_native(format, Unstoppable)
        .map(NativeImage::into_data)
}
