//! Channel width conversion between N-bit hardware fields and 8-bit samples.
//!
//! Expansion replicates the most significant bits into the vacated low bits
//! (the RDP's fixed-point behavior), so a 5-bit `v` becomes
//! `(v << 3) | (v >> 2)` and a 1-bit value becomes 0 or 255. Compression is
//! plain truncation: `v >> (8 - bits)`.
//!
//! `compress(expand(v, n), n) == v` for every `v` that fits in `n` bits.
//! The other direction is lossy: `expand(compress(v, n), n)` snaps `v` onto
//! the `n`-bit grid.

/// Expand an `from_bits`-wide channel value to 8 bits by bit replication.
///
/// Bits of `value` above `from_bits` are ignored. `from_bits` must be in
/// `1..=8`; 0 yields 0.
#[inline]
pub const fn expand(value: u32, from_bits: u32) -> u8 {
    if from_bits == 0 {
        return 0;
    }
    if from_bits >= 8 {
        return (value & 0xFF) as u8;
    }
    let v = value & ((1 << from_bits) - 1);
    // Place the field at the top of the byte, then keep OR-ing copies of it
    // shifted right until every low bit has been filled.
    let mut out = v << (8 - from_bits);
    let mut filled = from_bits;
    while filled < 8 {
        out |= out >> filled;
        filled *= 2;
    }
    (out & 0xFF) as u8
}

/// Truncate an 8-bit channel value to `to_bits` bits.
#[inline]
pub const fn compress(value: u8, to_bits: u32) -> u32 {
    if to_bits == 0 {
        return 0;
    }
    if to_bits >= 8 {
        return value as u32;
    }
    (value as u32) >> (8 - to_bits)
}
