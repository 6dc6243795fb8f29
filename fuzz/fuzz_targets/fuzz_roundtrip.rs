#![no_main]
use libfuzzer_sys::fuzz_target;
use zentexture::*;

fuzz_target!(|data: &[u8]| {
    // Header: format selector, width in units of 8 pixels, height
    let [selector, w8, h, body @ ..] = data else {
        return;
    };
    let format = PixelFormat::ALL[*selector as usize % PixelFormat::ALL.len()];
    // Multiples of 8 keep every row byte-aligned, so no padding bits exist
    let width = (*w8 as u32 % 8 + 1) * 8;
    let height = *h as u32 % 16 + 1;

    let (palette, body) = match format.palette_size() {
        Some(size) => {
            let len = size * NATIVE_ENTRY_BYTES;
            if body.len() < len {
                return;
            }
            let (palette, rest) = body.split_at(len);
            (Some(palette), rest)
        }
        None => (None, body),
    };
    let Ok(payload_len) = format.payload_len(width, height) else {
        return;
    };
    if body.len() < payload_len {
        return;
    }
    let native = &body[..payload_len];

    let png = native_to_portable(native, format, width, height, palette)
        .expect("valid native texture failed to encode");
    let back = portable_to_native(&png, format).expect("encoded texture failed to decode");
    assert_eq!(back, native, "{format} roundtrip mismatch");

    if let Some(palette) = palette {
        assert_eq!(extract_palette(&png).unwrap(), palette, "palette mismatch");
    }
});
