//! Test corpus: patterned textures across sizes and formats, plus every
//! error condition at the byte-buffer boundary.

#![cfg(feature = "png")]

use enough::Unstoppable;
use zentexture::*;

fn checkerboard(w: u32, h: u32) -> Vec<RgbaColor> {
    let mut pixels = Vec::with_capacity((w * h) as usize);
    for y in 0..h {
        for x in 0..w {
            if (x + y) % 2 == 0 {
                pixels.push(RgbaColor::new(200, 220, 240, 255));
            } else {
                pixels.push(RgbaColor::new(10, 40, 70, 0));
            }
        }
    }
    pixels
}

fn noise_pattern(w: u32, h: u32) -> Vec<RgbaColor> {
    let mut state: u32 = 0xDEAD_BEEF;
    (0..w * h)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            RgbaColor::from_array(state.to_le_bytes())
        })
        .collect()
}

fn gray(pixels: Vec<RgbaColor>) -> Vec<RgbaColor> {
    pixels
        .into_iter()
        .map(|p| RgbaColor::gray(p.r, p.a))
        .collect()
}

/// Native bytes for `pixels`, built by the encoder so row padding is clean.
fn native_bytes(format: PixelFormat, w: u32, h: u32, pixels: Vec<RgbaColor>) -> Vec<u8> {
    let image = DecodedImage::new(w, h, pixels).unwrap();
    NativeImage::encode(&image, format, Unstoppable)
        .unwrap()
        .into_data()
}

const SIZES: [(u32, u32); 6] = [(1, 1), (3, 5), (7, 2), (8, 8), (13, 11), (32, 4)];

// ── Round trips ──────────────────────────────────────────────────────

#[test]
fn direct_formats_all_sizes() {
    for (w, h) in SIZES {
        for pixels in [checkerboard(w, h), noise_pattern(w, h)] {
            for format in [PixelFormat::Rgba16, PixelFormat::Rgba32] {
                let native = native_bytes(format, w, h, pixels.clone());
                let png = native_to_portable(&native, format, w, h, None).unwrap();
                assert_eq!(portable_to_native(&png, format).unwrap(), native, "{format} {w}x{h}");
            }
        }
    }
}

#[test]
fn intensity_formats_odd_widths() {
    for (w, h) in SIZES {
        for format in [
            PixelFormat::I1,
            PixelFormat::I4,
            PixelFormat::I8,
            PixelFormat::Ia4,
            PixelFormat::Ia8,
            PixelFormat::Ia16,
        ] {
            let native = native_bytes(format, w, h, gray(noise_pattern(w, h)));
            assert_eq!(native.len(), format.payload_len(w, h).unwrap());
            let png = native_to_portable(&native, format, w, h, None).unwrap();
            assert_eq!(portable_to_native(&png, format).unwrap(), native, "{format} {w}x{h}");
        }
    }
}

#[test]
fn indexed_formats_odd_widths() {
    let entries: Vec<NativeColor16> = (0..256u32)
        .map(|i| NativeColor16((i * 0x0101 + 1) as u16))
        .collect();
    for (w, h) in SIZES {
        for format in [PixelFormat::Ci4, PixelFormat::Ci8] {
            let size = format.palette_size().unwrap();
            let palette = Palette::new(entries[..size].to_vec()).unwrap();
            // Every pixel is some palette color, so exact matching succeeds.
            let pixels: Vec<RgbaColor> = (0..w * h)
                .map(|i| palette.color((i as usize * 7) % size).unwrap())
                .collect();
            let image = DecodedImage::new(w, h, pixels).unwrap().with_palette(palette.clone());
            let native = NativeImage::encode(&image, format, Unstoppable)
                .unwrap()
                .into_data();

            let png = native_to_portable(&native, format, w, h, Some(&palette.to_bytes())).unwrap();
            assert_eq!(portable_to_native(&png, format).unwrap(), native, "{format} {w}x{h}");
            assert_eq!(extract_palette(&png).unwrap(), palette.to_bytes());
        }
    }
}

#[test]
fn row_padding_is_zeroed() {
    // 3x1 CI4: the low nibble of the second byte is padding.
    let palette = [0u8; 32];
    let png = native_to_portable(&[0x12, 0x3F], PixelFormat::Ci4, 3, 1, Some(&palette)).unwrap();
    assert_eq!(portable_to_native(&png, PixelFormat::Ci4).unwrap(), [0x12, 0x30]);

    let png = native_to_portable(&[0xA5, 0x7F], PixelFormat::I1, 9, 1, None).unwrap();
    assert_eq!(portable_to_native(&png, PixelFormat::I1).unwrap(), [0xA5, 0x00]);
}

#[test]
fn checkerboard_through_rgba16_is_stable() {
    // 8-bit colors snap to the 5-5-5-1 grid once, then stay put.
    let (w, h) = (9, 9);
    let first = native_bytes(PixelFormat::Rgba16, w, h, checkerboard(w, h));
    let png = native_to_portable(&first, PixelFormat::Rgba16, w, h, None).unwrap();
    let image = PortableImage::from_bytes(&png).unwrap();
    assert_eq!(image.image().pixel(0, 0), Some(RgbaColor::new(206, 222, 247, 255)));
    assert_eq!(image.as_rgba16().unwrap(), first);
}

#[test]
fn format_tags_parse() {
    for format in PixelFormat::ALL {
        assert_eq!(format.tag().parse::<PixelFormat>().unwrap(), format);
    }
    assert_eq!("RGBA16".parse::<PixelFormat>().unwrap(), PixelFormat::Rgba16);
}

// ── Error conditions ─────────────────────────────────────────────────

#[test]
fn error_unsupported_format() {
    assert!(matches!(
        "ci2".parse::<PixelFormat>(),
        Err(TextureError::UnsupportedFormat(_))
    ));
}

#[test]
fn error_size_mismatch() {
    let err = native_to_portable(&[0; 31], PixelFormat::Rgba16, 4, 4, None).unwrap_err();
    assert!(matches!(
        err,
        TextureError::SizeMismatch {
            expected: 32,
            actual: 31,
            ..
        }
    ));
    // 3x1 CI4 needs two bytes (one padded row).
    assert!(matches!(
        native_to_portable(&[0], PixelFormat::Ci4, 3, 1, Some(&[0; 32])),
        Err(TextureError::SizeMismatch { expected: 2, .. })
    ));
}

#[test]
fn error_malformed_palette() {
    let native = [0u8; 8];
    assert!(matches!(
        native_to_portable(&native, PixelFormat::Ci4, 4, 4, Some(&[0; 30])),
        Err(TextureError::MalformedPalette(_))
    ));
    assert!(matches!(
        native_to_portable(&native, PixelFormat::Ci4, 4, 4, Some(&[0; 33])),
        Err(TextureError::MalformedPalette(_))
    ));
    assert!(matches!(
        native_to_portable(&[0; 16], PixelFormat::Ci8, 4, 4, Some(&[0; 32])),
        Err(TextureError::MalformedPalette(_))
    ));
}

#[test]
fn error_missing_palette() {
    assert!(matches!(
        native_to_portable(&[0; 8], PixelFormat::Ci4, 4, 4, None),
        Err(TextureError::MissingPalette)
    ));
    let native = NativeImage::new(PixelFormat::Ci8, 2, 2, vec![0; 4]).unwrap();
    assert!(matches!(
        native.decode(None, Unstoppable),
        Err(TextureError::MissingPalette)
    ));
}

#[test]
fn error_palette_on_direct_format() {
    assert!(matches!(
        native_to_portable(&[0; 32], PixelFormat::Rgba16, 4, 4, Some(&[0; 32])),
        Err(TextureError::FormatMismatch(_))
    ));
}

#[test]
fn error_missing_palette_metadata() {
    let png = native_to_portable(&[0; 32], PixelFormat::Rgba16, 4, 4, None).unwrap();
    assert!(matches!(
        extract_palette(&png),
        Err(TextureError::MissingPaletteMetadata)
    ));
    let image = PortableImage::from_bytes(&png).unwrap();
    assert!(matches!(
        image.palette_bytes(),
        Err(TextureError::MissingPaletteMetadata)
    ));
}

#[test]
fn error_format_mismatch_without_quantize() {
    let png = native_to_portable(&[0; 32], PixelFormat::Rgba16, 4, 4, None).unwrap();
    assert!(matches!(
        portable_to_native(&png, PixelFormat::Ci8),
        Err(TextureError::FormatMismatch(_))
    ));
    assert!(matches!(
        PortableImage::from_bytes(&png).unwrap().as_ci4(),
        Err(TextureError::FormatMismatch(_))
    ));
}

#[test]
fn error_color_not_in_palette() {
    let pixels = noise_pattern(4, 4);
    let png = native_to_portable(
        &native_bytes(PixelFormat::Rgba32, 4, 4, pixels),
        PixelFormat::Rgba32,
        4,
        4,
        None,
    )
    .unwrap();
    let palette = Palette::new(vec![NativeColor16(0x0001), NativeColor16(0xFFFF)]).unwrap();
    let err = PortableRequest::new(&png)
        .with_palette(&palette)
        .to_native(PixelFormat::Ci4, Unstoppable)
        .unwrap_err();
    assert!(matches!(err, TextureError::ColorNotInPalette { .. }));
}

#[test]
fn error_index_out_of_range() {
    let palette = Palette::new(vec![NativeColor16(0xFFFF); 16]).unwrap();
    let native = NativeImage::new(PixelFormat::Ci8, 2, 1, vec![3, 200]).unwrap();
    assert!(matches!(
        native.decode(Some(&palette), Unstoppable),
        Err(TextureError::IndexOutOfRange { index: 200, len: 16 })
    ));
}

#[test]
fn error_limit_exceeded() {
    let native = vec![0u8; 1025 * 2];
    let png = native_to_portable(&native, PixelFormat::Rgba16, 1025, 1, None).unwrap();
    assert!(matches!(
        PortableRequest::new(&png)
            .with_limits(&Limits::N64)
            .to_native(PixelFormat::Rgba16, Unstoppable),
        Err(TextureError::LimitExceeded(_))
    ));
    assert!(
        PortableRequest::new(&png)
            .to_native(PixelFormat::Rgba16, Unstoppable)
            .is_ok()
    );
}

#[test]
fn error_invalid_dimensions() {
    assert!(matches!(
        native_to_portable(&[], PixelFormat::I8, 0, 4, None),
        Err(TextureError::InvalidDimensions { .. })
    ));
}

#[test]
fn error_not_a_png() {
    assert!(matches!(
        portable_to_native(b"\x89PNG\r\n\x1a\ntruncated", PixelFormat::Rgba16),
        Err(TextureError::PortableDecode(_))
    ));
    assert!(matches!(
        extract_palette(&[]),
        Err(TextureError::PortableDecode(_))
    ));
}
