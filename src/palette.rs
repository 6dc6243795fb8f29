//! TLUT (texture look-up table) codec.
//!
//! A palette is an ordered list of RGBA 5-5-5-1 entries. Conversions to and
//! from the portable representation preserve order and count exactly: no
//! deduplication, reordering, padding or truncation.

use alloc::vec::Vec;

use crate::color::{NativeColor16, RgbaColor};
use crate::error::TextureError;
use crate::format::PixelFormat;

/// Largest palette an indexed image can address.
pub const MAX_PALETTE_ENTRIES: usize = 256;

/// Bytes per native palette entry.
pub const NATIVE_ENTRY_BYTES: usize = 2;

/// Ordered TLUT of packed 16-bit colors. Index `i` of a native index buffer
/// always refers to entry `i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<NativeColor16>,
}

impl Palette {
    /// Wrap native entries. Must hold between 1 and 256 entries.
    pub fn new(entries: Vec<NativeColor16>) -> Result<Self, TextureError> {
        if entries.is_empty() || entries.len() > MAX_PALETTE_ENTRIES {
            return Err(TextureError::MalformedPalette(alloc::format!(
                "palette must have 1..={MAX_PALETTE_ENTRIES} entries, got {}",
                entries.len()
            )));
        }
        Ok(Self { entries })
    }

    /// Parse big-endian native entries, 2 bytes each.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TextureError> {
        if bytes.len() % NATIVE_ENTRY_BYTES != 0 {
            return Err(TextureError::MalformedPalette(alloc::format!(
                "palette length {} is not a multiple of {NATIVE_ENTRY_BYTES}",
                bytes.len()
            )));
        }
        let entries = bytes
            .chunks_exact(NATIVE_ENTRY_BYTES)
            .map(|pair| NativeColor16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        Self::new(entries)
    }

    /// Parse the TLUT for `format`, requiring exactly
    /// `palette_size(format) * 2` bytes.
    pub fn from_bytes_for(format: PixelFormat, bytes: &[u8]) -> Result<Self, TextureError> {
        let Some(size) = format.palette_size() else {
            return Err(TextureError::FormatMismatch(alloc::format!(
                "{format} does not use a palette"
            )));
        };
        let expected = size * NATIVE_ENTRY_BYTES;
        if bytes.len() != expected {
            return Err(TextureError::MalformedPalette(alloc::format!(
                "{format} palette must be {expected} bytes, got {}",
                bytes.len()
            )));
        }
        Self::from_bytes(bytes)
    }

    /// Serialize as big-endian native entries (`len() * 2` bytes).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.entries.len() * NATIVE_ENTRY_BYTES);
        for entry in &self.entries {
            out.extend_from_slice(&entry.to_be_bytes());
        }
        out
    }

    /// Compress 8-bit colors into native entries, preserving order and count.
    pub fn from_portable(colors: &[RgbaColor]) -> Result<Self, TextureError> {
        Self::new(colors.iter().map(|&c| NativeColor16::from_rgba(c)).collect())
    }

    /// Build from PNG-style palette data: packed RGB triples plus an optional
    /// alpha table. Entries past the end of `trns` are opaque.
    pub fn from_rgb_and_alpha(rgb: &[u8], trns: Option<&[u8]>) -> Result<Self, TextureError> {
        if rgb.len() % 3 != 0 {
            return Err(TextureError::MalformedPalette(alloc::format!(
                "RGB palette length {} is not a multiple of 3",
                rgb.len()
            )));
        }
        let trns = trns.unwrap_or(&[]);
        let colors: Vec<RgbaColor> = rgb
            .chunks_exact(3)
            .enumerate()
            .map(|(i, c)| RgbaColor::new(c[0], c[1], c[2], trns.get(i).copied().unwrap_or(255)))
            .collect();
        Self::from_portable(&colors)
    }

    /// Expand every entry to 8-bit channels, preserving order and count.
    pub fn to_portable(&self) -> Vec<RgbaColor> {
        self.entries.iter().map(|e| e.to_rgba()).collect()
    }

    pub fn entries(&self) -> &[NativeColor16] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<NativeColor16> {
        self.entries.get(index).copied()
    }

    /// Expanded color of entry `index`.
    pub fn color(&self, index: usize) -> Result<RgbaColor, TextureError> {
        self.get(index)
            .map(NativeColor16::to_rgba)
            .ok_or(TextureError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
    }
}
