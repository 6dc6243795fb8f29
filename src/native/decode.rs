//! Native texel buffer -> canonical RGBA.

use alloc::vec;
use alloc::vec::Vec;

use enough::Stop;

use crate::bits::unpack_fields;
use crate::channel::expand;
use crate::color::RgbaColor;
use crate::decode::DecodedImage;
use crate::error::TextureError;
use crate::format::{ChannelLayout, PixelFormat};
use crate::palette::Palette;

/// Read one row of raw texel values (one `u32` per pixel).
pub(super) fn read_row(row: &[u8], width: usize, bpp: u32, scratch: &mut Vec<u8>, out: &mut Vec<u32>) {
    out.clear();
    match bpp {
        16 => out.extend(
            row.chunks_exact(2)
                .take(width)
                .map(|c| u16::from_be_bytes([c[0], c[1]]) as u32),
        ),
        32 => out.extend(
            row.chunks_exact(4)
                .take(width)
                .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]])),
        ),
        _ => {
            scratch.clear();
            scratch.resize(width, 0);
            unpack_fields(bpp as usize, row, scratch);
            out.extend(scratch.iter().map(|&v| v as u32));
        }
    }
}

#[inline]
fn field(texel: u32, shift: u32, bits: u8) -> u32 {
    (texel >> shift) & ((1u32 << bits) - 1)
}

/// Expand a non-indexed texel into RGBA.
#[inline]
pub(super) fn texel_to_rgba(texel: u32, layout: ChannelLayout) -> RgbaColor {
    match layout {
        ChannelLayout::Intensity { intensity, alpha } => {
            let i = expand(field(texel, alpha as u32, intensity), intensity as u32);
            let a = if alpha == 0 {
                255
            } else {
                expand(field(texel, 0, alpha), alpha as u32)
            };
            RgbaColor::gray(i, a)
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
            RgbaColor::new(
                expand(field(texel, r_shift, red), red as u32),
                expand(field(texel, g_shift, green), green as u32),
                expand(field(texel, b_shift, blue), blue as u32),
                if alpha == 0 {
                    255
                } else {
                    expand(field(texel, 0, alpha), alpha as u32)
                },
            )
        }
        // Indexed texels are resolved through the palette by the caller.
        ChannelLayout::Indexed => RgbaColor::gray(texel as u8, 255),
    }
}

/// Decode a validated native payload.
pub(crate) fn decode_texels(
    data: &[u8],
    format: PixelFormat,
    width: u32,
    height: u32,
    palette: Option<&Palette>,
    stop: &dyn Stop,
) -> Result<DecodedImage, TextureError> {
    let desc = format.describe();
    let bpp = desc.bits_per_pixel as u32;
    let w = width as usize;
    let row_bytes = format.row_bytes(width)?;
    let pixel_total = crate::decode::pixel_count(width, height)?;

    let palette = match (desc.is_indexed(), palette) {
        (true, None) => return Err(TextureError::MissingPalette),
        (true, Some(p)) => Some(p),
        (false, _) => None,
    };
    if let (Some(pal), Some(size)) = (palette, desc.palette_size()) {
        if pal.len() > size {
            return Err(TextureError::MalformedPalette(alloc::format!(
                "{format} addresses at most {size} palette entries, got {}",
                pal.len()
            )));
        }
    }

    let mut pixels = Vec::with_capacity(pixel_total);
    let mut indices = if palette.is_some() {
        Vec::with_capacity(pixel_total)
    } else {
        Vec::new()
    };
    let mut scratch = vec![0u8; w];
    let mut texels = Vec::with_capacity(w);

    for (y, row) in data.chunks_exact(row_bytes).take(height as usize).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        read_row(row, w, bpp, &mut scratch, &mut texels);
        match palette {
            Some(pal) => {
                for &t in &texels {
                    let index = t as usize;
                    pixels.push(pal.color(index)?);
                    indices.push(t as u8);
                }
            }
            None => pixels.extend(texels.iter().map(|&t| texel_to_rgba(t, desc.layout))),
        }
    }

    if pixels.len() != pixel_total {
        return Err(TextureError::SizeMismatch {
            format,
            width,
            height,
            expected: row_bytes * height as usize,
            actual: data.len(),
        });
    }

    Ok(match palette {
        Some(pal) => DecodedImage::indexed(width, height, pixels, indices, pal.clone()),
        None => DecodedImage::new(width, height, pixels)?,
    })
}
