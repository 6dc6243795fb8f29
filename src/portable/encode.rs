//! Canonical RGBA -> PNG.

use alloc::vec::Vec;

use enough::Stop;

use crate::bits::pack_fields;
use crate::decode::DecodedImage;
use crate::error::TextureError;
use crate::format::{ChannelLayout, PixelFormat};
use crate::quantize::resolve_indices;

/// PNG layout used to carry a native format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PortableLayout {
    /// PLTE + tRNS with indices at the given bit depth (4 or 8).
    Indexed { depth: u8 },
    Gray,
    GrayAlpha,
    Rgba,
}

impl PortableLayout {
    /// The narrowest PNG layout that holds `format` without loss.
    pub(crate) fn for_format(format: PixelFormat) -> Self {
        let desc = format.describe();
        match desc.layout {
            ChannelLayout::Indexed => PortableLayout::Indexed {
                depth: desc.bits_per_pixel,
            },
            ChannelLayout::Intensity { .. } if desc.has_alpha() => PortableLayout::GrayAlpha,
            ChannelLayout::Intensity { .. } => PortableLayout::Gray,
            ChannelLayout::Direct { .. } => PortableLayout::Rgba,
        }
    }

    fn color_type(self) -> png::ColorType {
        match self {
            PortableLayout::Indexed { .. } => png::ColorType::Indexed,
            PortableLayout::Gray => png::ColorType::Grayscale,
            PortableLayout::GrayAlpha => png::ColorType::GrayscaleAlpha,
            PortableLayout::Rgba => png::ColorType::Rgba,
        }
    }

    fn bit_depth(self) -> png::BitDepth {
        match self {
            PortableLayout::Indexed { depth: 4 } => png::BitDepth::Four,
            _ => png::BitDepth::Eight,
        }
    }
}

/// Encode `image` as a PNG in `layout`.
///
/// Indexed layouts write the image's palette as PLTE (expanded to 8 bits,
/// in order, duplicates kept) and a tRNS chunk when any entry is
/// transparent. Pixel indices come from [`resolve_indices`].
pub(crate) fn encode_png(
    image: &DecodedImage,
    layout: PortableLayout,
    stop: &dyn Stop,
) -> Result<Vec<u8>, TextureError> {
    let (width, height) = (image.width(), image.height());
    let w = width as usize;

    let mut plte = Vec::new();
    let mut trns = Vec::new();
    let mut data = Vec::new();

    match layout {
        PortableLayout::Indexed { depth } => {
            let palette = image.palette().ok_or(TextureError::MissingPalette)?;
            // PLTE may not hold more entries than the bit depth can address.
            if palette.len() > 1 << depth {
                return Err(TextureError::MalformedPalette(alloc::format!(
                    "{} entries exceed a {depth}-bit palette",
                    palette.len()
                )));
            }
            let indices = resolve_indices(image, palette, depth as u32, stop)?;
            for color in palette.to_portable() {
                plte.extend_from_slice(&[color.r, color.g, color.b]);
                trns.push(color.a);
            }
            if trns.iter().all(|&a| a == 255) {
                trns.clear();
            }
            data.reserve((w * depth as usize).div_ceil(8) * height as usize);
            for (y, row) in indices.chunks_exact(w).enumerate() {
                if y % 16 == 0 {
                    stop.check()?;
                }
                pack_fields(depth as usize, row, &mut data);
            }
        }
        PortableLayout::Gray | PortableLayout::GrayAlpha | PortableLayout::Rgba => {
            let channels = match layout {
                PortableLayout::Gray => 1,
                PortableLayout::GrayAlpha => 2,
                _ => 4,
            };
            data.reserve(image.pixels().len() * channels);
            for (y, row) in image.pixels().chunks_exact(w).enumerate() {
                if y % 16 == 0 {
                    stop.check()?;
                }
                for p in row {
                    match layout {
                        PortableLayout::Gray => data.push(p.r),
                        PortableLayout::GrayAlpha => data.extend_from_slice(&[p.r, p.a]),
                        _ => data.extend_from_slice(&p.to_array()),
                    }
                }
            }
        }
    }

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(layout.color_type());
        encoder.set_depth(layout.bit_depth());
        if !plte.is_empty() {
            encoder.set_palette(plte);
            if !trns.is_empty() {
                encoder.set_trns(trns);
            }
        }
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&data)?;
        writer.finish()?;
    }
    Ok(out)
}
