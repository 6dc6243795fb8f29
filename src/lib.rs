//! # zentexture
//!
//! N64 native texture formats to and from PNG, with exact round trips.
//!
//! ## Supported Formats
//!
//! | Format   | Bits | Layout                                   |
//! |----------|------|------------------------------------------|
//! | `i1`     | 1    | intensity, 8 pixels per byte             |
//! | `i4`     | 4    | intensity                                |
//! | `i8`     | 8    | intensity                                |
//! | `ia4`    | 4    | 3-bit intensity, 1-bit alpha             |
//! | `ia8`    | 8    | 4-bit intensity, 4-bit alpha             |
//! | `ia16`   | 16   | 8-bit intensity, 8-bit alpha             |
//! | `ci4`    | 4    | index into a 16-entry TLUT               |
//! | `ci8`    | 8    | index into a 256-entry TLUT              |
//! | `rgba16` | 16   | 5-5-5-1 direct color                     |
//! | `rgba32` | 32   | 8-8-8-8 direct color                     |
//!
//! Multi-byte texels and TLUT entries are big-endian. Sub-byte formats pack
//! the leftmost pixel into the most significant bits and pad each row to a
//! whole byte. Narrow channels expand to 8 bits by bit replication and
//! compress back by truncation, so every native value survives a trip
//! through 8-bit RGBA.
//!
//! ## Palettes
//!
//! Indexed textures travel as indexed PNGs whose palette is the TLUT
//! expanded to 8 bits, at full length and in order. Decoding keeps the
//! per-pixel indices, so CI4/CI8 data re-encodes byte-identically even when
//! the TLUT contains duplicate colors. Without indices, encoding requires
//! every pixel to exactly match a palette entry and fails with
//! [`TextureError::ColorNotInPalette`] otherwise. Quantization is available
//! but never implicit.
//!
//! ## Non-Goals
//!
//! - Image editing (flipping, resizing)
//! - Source-code (C array) output
//! - IA16 TLUTs (palettes are always RGBA 5-5-5-1)
//!
//! ## Usage
//!
//! ```
//! # #[cfg(feature = "png")]
//! # {
//! use zentexture::{native_to_portable, portable_to_native, PixelFormat};
//!
//! // 2x1 RGBA16: opaque red, transparent blue
//! let native = [0xF8, 0x01, 0x00, 0x3E];
//! let png = native_to_portable(&native, PixelFormat::Rgba16, 2, 1, None)?;
//! let back = portable_to_native(&png, PixelFormat::Rgba16)?;
//! assert_eq!(back, native);
//! # }
//! # Ok::<(), zentexture::TextureError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod bits;
mod channel;
mod color;
mod decode;
mod error;
mod format;
mod limits;
mod native;
mod palette;
mod quantize;

#[cfg(feature = "png")]
mod convert;
#[cfg(feature = "png")]
mod portable;

// Re-exports
pub use channel::{compress, expand};
pub use color::{NativeColor16, RgbaColor};
pub use decode::DecodedImage;
pub use enough::{Stop, Unstoppable};
pub use error::TextureError;
pub use format::{ChannelLayout, Descriptor, PixelFormat};
pub use limits::Limits;
pub use native::NativeImage;
pub use palette::{MAX_PALETTE_ENTRIES, NATIVE_ENTRY_BYTES, Palette};
pub use quantize::{exact_indices, quantize};

#[cfg(feature = "png")]
pub use convert::{extract_palette, native_to_portable, portable_to_native};
#[cfg(feature = "png")]
pub use portable::{PortableImage, PortableRequest};
