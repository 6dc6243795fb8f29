//! PNG -> canonical RGBA.
//!
//! Every PNG color type is accepted. 16-bit samples are stripped to their
//! high byte, sub-byte grayscale is bit-replicated, and indexed images keep
//! their index buffer so they re-encode byte-identically.

use alloc::vec;
use alloc::vec::Vec;

use enough::Stop;

use crate::bits::unpack_fields;
use crate::channel::expand;
use crate::color::RgbaColor;
use crate::decode::{DecodedImage, pixel_count};
use crate::error::TextureError;
use crate::limits::Limits;
use crate::palette::Palette;

/// Header fields read without touching image data.
#[derive(Clone, Debug)]
pub(crate) struct PortableHeader {
    pub width: u32,
    pub height: u32,
    pub palette: Option<Palette>,
}

/// Parse the header chunks (IHDR, PLTE, tRNS) only.
pub(crate) fn read_header(data: &[u8]) -> Result<PortableHeader, TextureError> {
    let reader = png::Decoder::new(data).read_info()?;
    let info = reader.info();
    Ok(PortableHeader {
        width: info.width,
        height: info.height,
        palette: palette_from_info(info)?,
    })
}

/// PLTE as a native palette. tRNS is per-entry alpha only for indexed
/// images; for other color types it is a color key and is ignored here.
fn palette_from_info(info: &png::Info<'_>) -> Result<Option<Palette>, TextureError> {
    let Some(plte) = info.palette.as_deref() else {
        return Ok(None);
    };
    let trns = match info.color_type {
        png::ColorType::Indexed => info.trns.as_deref(),
        _ => None,
    };
    Palette::from_rgb_and_alpha(plte, trns).map(Some)
}

/// PLTE + tRNS as 8-bit colors, exactly as stored in the file.
fn plte_colors(info: &png::Info<'_>) -> Vec<RgbaColor> {
    let Some(plte) = info.palette.as_deref() else {
        return Vec::new();
    };
    let trns = info.trns.as_deref().unwrap_or(&[]);
    plte.chunks_exact(3)
        .enumerate()
        .map(|(i, c)| RgbaColor::new(c[0], c[1], c[2], trns.get(i).copied().unwrap_or(255)))
        .collect()
}

/// Transparent color key for grayscale and RGB images, in raw sample values.
///
/// Only honored for sources of 8 bits or fewer; 16-bit keys cannot be
/// compared once samples are stripped to 8 bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ColorKey {
    Gray(u16),
    Rgb([u16; 3]),
}

fn color_key(info: &png::Info<'_>) -> Option<ColorKey> {
    if info.bit_depth == png::BitDepth::Sixteen {
        return None;
    }
    let trns = info.trns.as_deref()?;
    let samples = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::Rgb => 3,
        _ => return None,
    };
    // The decoder narrows keys to one byte per sample at these depths; the
    // two-byte chunk layout is accepted as well.
    let sample = |i: usize| -> Option<u16> {
        if trns.len() >= samples * 2 {
            Some(u16::from_be_bytes([*trns.get(i * 2)?, *trns.get(i * 2 + 1)?]))
        } else {
            trns.get(i).map(|&b| b as u16)
        }
    };
    match samples {
        1 => Some(ColorKey::Gray(sample(0)?)),
        _ => Some(ColorKey::Rgb([sample(0)?, sample(1)?, sample(2)?])),
    }
}

/// Decode a PNG into a [`DecodedImage`] plus its PLTE as a native palette.
///
/// Limits are checked from the header before any pixel buffer exists.
pub(crate) fn decode_png(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<(DecodedImage, Option<Palette>), TextureError> {
    let mut decoder = png::Decoder::new(data);
    decoder.set_transformations(png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;

    let info = reader.info();
    let (width, height) = (info.width, info.height);
    if let Some(limits) = limits {
        limits.check(width, height)?;
    }
    let pixel_total = pixel_count(width, height)?;
    if let Some(limits) = limits {
        limits.check_memory(pixel_total.saturating_mul(4))?;
    }
    let palette = palette_from_info(info)?;
    let colors = plte_colors(info);
    let key = color_key(info);

    stop.check()?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf)?;
    let depth = frame.bit_depth as u8 as usize;
    let w = width as usize;
    let rows = buf[..frame.buffer_size()]
        .chunks_exact(frame.line_size)
        .take(height as usize);

    let indexed = frame.color_type == png::ColorType::Indexed;
    if indexed && palette.is_none() {
        return Err(TextureError::PortableDecode(
            "indexed image without a PLTE chunk".into(),
        ));
    }

    let mut pixels = Vec::with_capacity(pixel_total);
    let mut indices = Vec::with_capacity(if indexed { pixel_total } else { 0 });
    let mut scratch = vec![0u8; w];

    for (y, row) in rows.enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        match frame.color_type {
            png::ColorType::Indexed => {
                unpack_fields(depth, row, &mut scratch);
                for &index in &scratch {
                    let color = colors.get(index as usize).copied().ok_or(
                        TextureError::IndexOutOfRange {
                            index: index as usize,
                            len: colors.len(),
                        },
                    )?;
                    pixels.push(color);
                }
                indices.extend_from_slice(&scratch);
            }
            png::ColorType::Grayscale => {
                unpack_fields(depth, row, &mut scratch);
                pixels.extend(scratch.iter().map(|&v| {
                    let a = if key == Some(ColorKey::Gray(v as u16)) { 0 } else { 255 };
                    RgbaColor::gray(expand(v as u32, depth as u32), a)
                }));
            }
            png::ColorType::GrayscaleAlpha => {
                pixels.extend(row.chunks_exact(2).take(w).map(|c| RgbaColor::gray(c[0], c[1])));
            }
            png::ColorType::Rgb => {
                pixels.extend(row.chunks_exact(3).take(w).map(|c| {
                    let raw = [c[0] as u16, c[1] as u16, c[2] as u16];
                    let a = if key == Some(ColorKey::Rgb(raw)) { 0 } else { 255 };
                    RgbaColor::new(c[0], c[1], c[2], a)
                }));
            }
            png::ColorType::Rgba => {
                pixels.extend(
                    row.chunks_exact(4)
                        .take(w)
                        .map(|c| RgbaColor::new(c[0], c[1], c[2], c[3])),
                );
            }
        }
    }

    if pixels.len() != pixel_total {
        return Err(TextureError::PortableDecode(alloc::format!(
            "image data ended after {} of {pixel_total} pixels",
            pixels.len()
        )));
    }
    let image = match (&palette, indexed) {
        (Some(pal), true) => DecodedImage::indexed(width, height, pixels, indices, pal.clone()),
        _ => DecodedImage::new(width, height, pixels)?,
    };
    Ok((image, palette))
}
