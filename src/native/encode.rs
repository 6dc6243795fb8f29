//! Canonical RGBA -> native texel buffer.

use alloc::vec::Vec;

use enough::Stop;

use crate::bits::pack_fields;
use crate::channel::compress;
use crate::color::RgbaColor;
use crate::decode::DecodedImage;
use crate::error::TextureError;
use crate::format::{ChannelLayout, PixelFormat};
use crate::palette::Palette;
use crate::quantize::resolve_indices;

/// Pack a pixel into a non-indexed texel.
///
/// Intensity comes from the red channel alone; callers encoding to an
/// intensity format are expected to supply gray pixels (R == G == B).
#[inline]
pub(super) fn rgba_to_texel(c: RgbaColor, layout: ChannelLayout) -> u32 {
    match layout {
        ChannelLayout::Intensity { intensity, alpha } => {
            (compress(c.r, intensity as u32) << alpha) | compress(c.a, alpha as u32)
        }
        ChannelLayout::Direct {
            red,
            green,
            blue,
            alpha,
        } => {
            let b_shift = alpha as u32;
            let g_shift = b_shift + blue as u32;
            let r_shift = g_shift + green as u32;
            (compress(c.r, red as u32) << r_shift)
                | (compress(c.g, green as u32) << g_shift)
                | (compress(c.b, blue as u32) << b_shift)
                | compress(c.a, alpha as u32)
        }
        ChannelLayout::Indexed => 0,
    }
}

/// Append one row of texels in the format's byte layout.
pub(super) fn write_row(texels: &[u32], bpp: u32, scratch: &mut Vec<u8>, out: &mut Vec<u8>) {
    match bpp {
        16 => {
            for &t in texels {
                out.extend_from_slice(&(t as u16).to_be_bytes());
            }
        }
        32 => {
            for &t in texels {
                out.extend_from_slice(&t.to_be_bytes());
            }
        }
        _ => {
            scratch.clear();
            scratch.extend(texels.iter().map(|&t| t as u8));
            pack_fields(bpp as usize, scratch, out);
        }
    }
}

/// Encode `image` as `format`.
///
/// Indexed formats use the image's palette (see [`resolve_indices`]);
/// without one this fails with [`TextureError::MissingPalette`].
pub(crate) fn encode_texels(
    image: &DecodedImage,
    format: PixelFormat,
    stop: &dyn Stop,
) -> Result<Vec<u8>, TextureError> {
    let desc = format.describe();
    let indices = if desc.is_indexed() {
        let palette = image.palette().ok_or(TextureError::MissingPalette)?;
        Some(resolve_indices(image, palette, desc.bits_per_pixel as u32, stop)?)
    } else {
        None
    };
    pack_image(image, format, indices.as_deref(), stop)
}

/// Encode `image` as an indexed `format` using precomputed `indices`
/// (one per pixel) that refer to `palette`.
pub(crate) fn encode_indexed(
    image: &DecodedImage,
    format: PixelFormat,
    indices: &[u8],
    palette: &Palette,
    stop: &dyn Stop,
) -> Result<Vec<u8>, TextureError> {
    if indices.len() != image.pixels().len() {
        return Err(TextureError::PixelCountMismatch {
            expected: image.pixels().len(),
            actual: indices.len(),
        });
    }
    let addressable = palette.len().min(1 << format.bits_per_pixel());
    if let Some(&bad) = indices.iter().find(|&&i| i as usize >= addressable) {
        return Err(TextureError::IndexOutOfRange {
            index: bad as usize,
            len: addressable,
        });
    }
    pack_image(image, format, Some(indices), stop)
}

fn pack_image(
    image: &DecodedImage,
    format: PixelFormat,
    indices: Option<&[u8]>,
    stop: &dyn Stop,
) -> Result<Vec<u8>, TextureError> {
    let desc = format.describe();
    let bpp = desc.bits_per_pixel as u32;
    let w = image.width() as usize;
    let out_len = format.payload_len(image.width(), image.height())?;

    let mut out = Vec::with_capacity(out_len);
    let mut texels: Vec<u32> = Vec::with_capacity(w);
    let mut scratch = Vec::with_capacity(w);

    for (y, row) in image.pixels().chunks_exact(w).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        texels.clear();
        match indices {
            Some(indices) => {
                let start = y * w;
                texels.extend(indices[start..start + w].iter().map(|&i| i as u32));
            }
            None => texels.extend(row.iter().map(|&c| rgba_to_texel(c, desc.layout))),
        }
        write_row(&texels, bpp, &mut scratch, &mut out);
    }

    debug_assert_eq!(out.len(), out_len);
    Ok(out)
}
