#![no_main]
use libfuzzer_sys::fuzz_target;
use zentexture::*;

fuzz_target!(|data: &[u8]| {
    // Arbitrary PNG input must never panic, for any target format
    let _ = extract_palette(data);
    for format in PixelFormat::ALL {
        let _ = PortableRequest::new(data)
            .with_limits(&Limits::N64)
            .with_quantize(true)
            .to_native(format, enough::Unstoppable);
    }
});
