//! Sub-byte field packing shared by the native codecs and the PNG adapter.
//!
//! Both layouts store fields most-significant-first within a byte (the high
//! nibble is the left pixel) and pad every row to a byte boundary.

use alloc::vec::Vec;

/// Unpack `out.len()` fields of `depth` bits (1, 2, 4 or 8) from `input`.
///
/// Values are raw field values, not scaled. `input` must hold at least
/// `ceil(out.len() * depth / 8)` bytes.
pub(crate) fn unpack_fields(depth: usize, input: &[u8], out: &mut [u8]) {
    match depth {
        1 => unpack_with::<8>(input, out, 1, 0x01),
        2 => unpack_with::<4>(input, out, 2, 0x03),
        4 => unpack_with::<2>(input, out, 4, 0x0f),
        _ => {
            let n = out.len().min(input.len());
            out[..n].copy_from_slice(&input[..n]);
        }
    }
}

fn unpack_with<const PER_BYTE: usize>(input: &[u8], out: &mut [u8], depth: usize, mask: u8) {
    let mut in_iter = input.iter();
    let mut out_iter = out.chunks_exact_mut(PER_BYTE);

    (&mut out_iter)
        .zip(&mut in_iter)
        .for_each(|(out_vals, &in_val)| {
            for (pos, v) in out_vals.iter_mut().enumerate() {
                let shift = 8 - depth * (pos + 1);
                *v = (in_val >> shift) & mask;
            }
        });

    let remainder = out_iter.into_remainder();
    if remainder.is_empty() {
        return;
    }
    let in_val = in_iter.next().copied().unwrap_or(0);
    for (pos, v) in remainder.iter_mut().enumerate() {
        let shift = 8 - depth * (pos + 1);
        *v = (in_val >> shift) & mask;
    }
}

/// Pack `values` as `depth`-bit fields (1, 2, 4 or 8), appending to `out`.
/// The final partial byte is zero-padded.
pub(crate) fn pack_fields(depth: usize, values: &[u8], out: &mut Vec<u8>) {
    if depth >= 8 {
        out.extend_from_slice(values);
        return;
    }
    let per_byte = 8 / depth;
    let mask = ((1u16 << depth) - 1) as u8;
    for group in values.chunks(per_byte) {
        let mut byte = 0u8;
        for (pos, &v) in group.iter().enumerate() {
            let shift = 8 - depth * (pos + 1);
            byte |= (v & mask) << shift;
        }
        out.push(byte);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn nibbles_high_first() {
        let mut out = [0u8; 4];
        unpack_fields(4, &[0xAB, 0xCD], &mut out);
        assert_eq!(out, [0xA, 0xB, 0xC, 0xD]);
    }

    #[test]
    fn odd_count_uses_high_nibble_of_last_byte() {
        let mut out = [0u8; 3];
        unpack_fields(4, &[0x12, 0x30], &mut out);
        assert_eq!(out, [1, 2, 3]);
    }

    #[test]
    fn single_bits_msb_first() {
        let mut out = [0u8; 10];
        unpack_fields(1, &[0b1010_0001, 0b1100_0000], &mut out);
        assert_eq!(out, [1, 0, 1, 0, 0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn two_bit_fields() {
        let mut out = [0u8; 4];
        unpack_fields(2, &[0b11_10_01_00], &mut out);
        assert_eq!(out, [3, 2, 1, 0]);
    }

    #[test]
    fn pack_pads_last_byte() {
        let mut out = vec![];
        pack_fields(4, &[1, 2, 3], &mut out);
        assert_eq!(out, [0x12, 0x30]);

        let mut out = vec![];
        pack_fields(1, &[1, 0, 1, 0, 0, 0, 0, 1, 1], &mut out);
        assert_eq!(out, [0b1010_0001, 0b1000_0000]);
    }

    #[test]
    fn pack_then_unpack() {
        for depth in [1usize, 2, 4, 8] {
            let max = if depth == 8 { 255 } else { (1u16 << depth) as u8 - 1 };
            let values: Vec<u8> = (0..13u8).map(|i| i.wrapping_mul(7) & max).collect();
            let mut packed = vec![];
            pack_fields(depth, &values, &mut packed);
            assert_eq!(packed.len(), (values.len() * depth).div_ceil(8));
            let mut out = vec![0u8; values.len()];
            unpack_fields(depth, &packed, &mut out);
            assert_eq!(out, values, "depth={depth}");
        }
    }
}
