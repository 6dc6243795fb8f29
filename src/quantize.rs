//! Mapping RGBA pixels onto palette indices.
//!
//! Three sources of indices, in order of preference:
//!
//! 1. An index buffer carried by the [`DecodedImage`] (it was decoded from an
//!    indexed source). Used verbatim after a bounds check, so round trips are
//!    byte-identical even when the palette holds duplicate colors.
//! 2. Exact matching: each pixel must equal the expanded color of some palette
//!    entry; the lowest such index wins. A miss is [`TextureError::ColorNotInPalette`],
//!    never a nearest-color substitute.
//! 3. Quantization, only when explicitly requested and no palette exists:
//!    a popularity palette over the 5-5-5-1 color space with nearest-color
//!    mapping.

use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;

use enough::Stop;

use crate::color::{NativeColor16, RgbaColor};
use crate::decode::DecodedImage;
use crate::error::TextureError;
use crate::palette::Palette;

/// Indices for `image` against `palette`, for an index field of `index_bits`.
///
/// Reuses the image's own index buffer when it has one, otherwise performs
/// exact matching.
pub(crate) fn resolve_indices(
    image: &DecodedImage,
    palette: &Palette,
    index_bits: u32,
    stop: &dyn Stop,
) -> Result<Vec<u8>, TextureError> {
    let addressable = palette.len().min(1 << index_bits);
    if let Some(indices) = image.indices() {
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= addressable) {
            return Err(TextureError::IndexOutOfRange {
                index: bad as usize,
                len: addressable,
            });
        }
        return Ok(indices.to_vec());
    }
    match_exact(image, &palette.entries()[..addressable], stop)
}

/// Exact-match every pixel of `image` against `palette`.
///
/// Fails with [`TextureError::ColorNotInPalette`] on the first pixel whose
/// color is not the expansion of any entry.
pub fn exact_indices(image: &DecodedImage, palette: &Palette) -> Result<Vec<u8>, TextureError> {
    match_exact(image, palette.entries(), &enough::Unstoppable)
}

fn match_exact(
    image: &DecodedImage,
    entries: &[NativeColor16],
    stop: &dyn Stop,
) -> Result<Vec<u8>, TextureError> {
    let mut lookup: BTreeMap<[u8; 4], u8> = BTreeMap::new();
    for (i, entry) in entries.iter().enumerate() {
        // First occurrence wins so ties resolve to the lowest index.
        lookup.entry(entry.to_rgba().to_array()).or_insert(i as u8);
    }

    let width = image.width() as usize;
    let mut out = Vec::with_capacity(image.pixels().len());
    for (y, row) in image.pixels().chunks_exact(width).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        for (x, &color) in row.iter().enumerate() {
            let Some(&index) = lookup.get(&color.to_array()) else {
                return Err(TextureError::ColorNotInPalette {
                    x: x as u32,
                    y: y as u32,
                    color,
                });
            };
            out.push(index);
        }
    }
    Ok(out)
}

/// Build a palette of exactly `palette_size` entries (1..=256) for `image`
/// and map every pixel onto it.
///
/// When the image has no more distinct 5-5-5-1 colors than `palette_size`,
/// the palette holds exactly those colors in first-seen order and the
/// mapping is exact (after 5-5-5-1 truncation). Otherwise the most frequent
/// colors are kept and each pixel takes the nearest entry. Unused slots are
/// transparent black.
pub fn quantize(
    image: &DecodedImage,
    palette_size: usize,
) -> Result<(Vec<u8>, Palette), TextureError> {
    quantize_with_stop(image, palette_size, &enough::Unstoppable)
}

pub(crate) fn quantize_with_stop(
    image: &DecodedImage,
    palette_size: usize,
    stop: &dyn Stop,
) -> Result<(Vec<u8>, Palette), TextureError> {
    if palette_size == 0 || palette_size > crate::palette::MAX_PALETTE_ENTRIES {
        return Err(TextureError::MalformedPalette(alloc::format!(
            "cannot quantize to {palette_size} colors"
        )));
    }

    // native value -> (count, first seen position)
    let mut histogram: BTreeMap<u16, (usize, usize)> = BTreeMap::new();
    for (pos, &p) in image.pixels().iter().enumerate() {
        if pos % (1 << 16) == 0 {
            stop.check()?;
        }
        let slot = histogram
            .entry(NativeColor16::from_rgba(p).0)
            .or_insert((0, pos));
        slot.0 += 1;
    }

    let mut ranked: Vec<(u16, usize, usize)> = histogram
        .into_iter()
        .map(|(value, (count, first))| (value, count, first))
        .collect();

    let exact = ranked.len() <= palette_size;
    if exact {
        ranked.sort_by_key(|&(_, _, first)| first);
    } else {
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        ranked.truncate(palette_size);
    }

    let mut entries: Vec<NativeColor16> = ranked.iter().map(|&(v, _, _)| NativeColor16(v)).collect();
    let used = entries.len();
    entries.resize(palette_size, NativeColor16(0));
    let palette = Palette::new(entries)?;

    let expanded: Vec<RgbaColor> = palette.entries()[..used].iter().map(|e| e.to_rgba()).collect();
    let mut cache: BTreeMap<u16, u8> = BTreeMap::new();
    if exact {
        for (i, &(v, _, _)) in ranked.iter().enumerate() {
            cache.insert(v, i as u8);
        }
    }

    let mut indices = vec![0u8; image.pixels().len()];
    for (pos, (&p, out)) in image.pixels().iter().zip(indices.iter_mut()).enumerate() {
        if pos % (1 << 16) == 0 {
            stop.check()?;
        }
        let key = NativeColor16::from_rgba(p).0;
        *out = match cache.get(&key) {
            Some(&i) => i,
            None => {
                let i = nearest(&expanded, p);
                cache.insert(key, i);
                i
            }
        };
    }

    Ok((indices, palette))
}

/// Index of the entry closest to `color`; lowest index on ties.
fn nearest(entries: &[RgbaColor], color: RgbaColor) -> u8 {
    let mut best = 0usize;
    let mut best_dist = u32::MAX;
    for (i, &e) in entries.iter().enumerate() {
        let d = e.distance_sq(color);
        if d < best_dist {
            best = i;
            best_dist = d;
        }
    }
    best as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette(values: &[u16]) -> Palette {
        Palette::new(values.iter().map(|&v| NativeColor16(v)).collect()).unwrap()
    }

    #[test]
    fn exact_picks_lowest_duplicate() {
        let pal = palette(&[0x0001, 0xF801, 0xF801, 0x07C1]);
        let red = NativeColor16(0xF801).to_rgba();
        let img = DecodedImage::new(2, 1, vec![red, RgbaColor::BLACK]).unwrap();
        assert_eq!(exact_indices(&img, &pal).unwrap(), [1, 0]);
    }

    #[test]
    fn exact_rejects_unknown_color() {
        let pal = palette(&[0x0001, 0xFFFF]);
        let off_grid = RgbaColor::new(1, 2, 3, 255);
        let img = DecodedImage::new(2, 2, vec![RgbaColor::BLACK, RgbaColor::WHITE, RgbaColor::BLACK, off_grid])
            .unwrap();
        let err = exact_indices(&img, &pal).unwrap_err();
        match err {
            TextureError::ColorNotInPalette { x, y, color } => {
                assert_eq!((x, y), (1, 1));
                assert_eq!(color, off_grid);
            }
            other => panic!("expected ColorNotInPalette, got {other:?}"),
        }
    }

    #[test]
    fn exact_compares_expanded_not_truncated() {
        // 0x0843 expands to (8, 8, 8); (9, 9, 9) truncates to the same entry
        // but is not the same color.
        let pal = palette(&[0x0843]);
        assert_eq!(NativeColor16(0x0843).to_rgba(), RgbaColor::new(8, 8, 8, 255));
        let img = DecodedImage::new(1, 1, vec![RgbaColor::new(9, 9, 9, 255)]).unwrap();
        assert!(matches!(
            exact_indices(&img, &pal),
            Err(TextureError::ColorNotInPalette { .. })
        ));
    }

    #[test]
    fn carried_indices_are_trusted() {
        let pal = palette(&[0xF801, 0xF801]);
        let red = NativeColor16(0xF801).to_rgba();
        let img = DecodedImage::indexed(2, 1, vec![red, red], vec![1, 0], pal.clone());
        let idx = resolve_indices(&img, &pal, 4, &enough::Unstoppable).unwrap();
        assert_eq!(idx, [1, 0]);
    }

    #[test]
    fn carried_indices_are_bounds_checked() {
        let pal = palette(&[0x0001; 32]);
        let img = DecodedImage::indexed(1, 1, vec![RgbaColor::BLACK], vec![20], pal.clone());
        let err = resolve_indices(&img, &pal, 4, &enough::Unstoppable).unwrap_err();
        assert!(matches!(err, TextureError::IndexOutOfRange { index: 20, len: 16 }));
    }

    #[test]
    fn exact_only_searches_addressable_entries() {
        let mut values = [0x0001u16; 17];
        values[16] = 0xFFFF;
        let pal = palette(&values);
        let img = DecodedImage::new(1, 1, vec![RgbaColor::WHITE]).unwrap();
        assert!(resolve_indices(&img, &pal, 8, &enough::Unstoppable).is_ok());
        assert!(matches!(
            resolve_indices(&img, &pal, 4, &enough::Unstoppable),
            Err(TextureError::ColorNotInPalette { .. })
        ));
    }

    #[test]
    fn quantize_few_colors_is_exact() {
        let a = NativeColor16(0xF801).to_rgba();
        let b = NativeColor16(0x003F).to_rgba();
        let img = DecodedImage::new(3, 1, vec![b, a, b]).unwrap();
        let (idx, pal) = quantize(&img, 16).unwrap();
        assert_eq!(pal.len(), 16);
        assert_eq!(idx, [0, 1, 0]);
        assert_eq!(pal.entries()[0], NativeColor16(0x003F));
        assert_eq!(pal.entries()[1], NativeColor16(0xF801));
        assert_eq!(pal.entries()[2], NativeColor16(0));
        // The quantized palette satisfies exact matching.
        assert_eq!(exact_indices(&img, &pal).unwrap(), idx);
    }

    #[test]
    fn quantize_many_colors_keeps_popular() {
        let mut pixels = Vec::new();
        for i in 0..64u8 {
            pixels.push(RgbaColor::gray(i * 4, 255));
        }
        // Make one color dominant.
        for _ in 0..64 {
            pixels.push(RgbaColor::gray(200, 255));
        }
        let img = DecodedImage::new(16, 8, pixels).unwrap();
        let (idx, pal) = quantize(&img, 4).unwrap();
        assert_eq!(pal.len(), 4);
        assert_eq!(idx.len(), 128);
        assert!(idx.iter().all(|&i| i < 4));
        assert_eq!(pal.entries()[0], NativeColor16::from_rgba(RgbaColor::gray(200, 255)));
        assert_eq!(idx[127], 0);
    }

    #[test]
    fn quantize_rejects_bad_size() {
        let img = DecodedImage::new(1, 1, vec![RgbaColor::BLACK]).unwrap();
        assert!(quantize(&img, 0).is_err());
        assert!(quantize(&img, 257).is_err());
    }

    #[test]
    fn nearest_prefers_lowest_on_tie() {
        let entries = [RgbaColor::gray(0, 255), RgbaColor::gray(20, 255)];
        assert_eq!(nearest(&entries, RgbaColor::gray(10, 255)), 0);
        assert_eq!(nearest(&entries, RgbaColor::gray(11, 255)), 1);
    }
}
