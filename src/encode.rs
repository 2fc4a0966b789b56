//! Per-block encoding: bit-plane extraction with group-test coding, and
//! the drivers tying quantization, transform, and reorder together.
//!
//! A block never writes outside its `maxbits` budget: coding stops
//! silently the moment the budget runs out, and the truncated stream is a
//! bit-exact prefix of the stream a larger budget would produce.

use crate::order::fwd_order;
use crate::quantize::{self, Float};
use crate::stream::{BlockWriter, StreamBuffer};
use crate::transform::fwd_xform;
use crate::types::{BlockInt, BlockUInt};

/// Scalar kinds the encoder accepts.
pub trait Scalar: Copy + Send + Sync + 'static {
    /// Bits in the fixed-point form of one coefficient.
    const PRECISION: u32;
    /// Bits a coded block spends on its exponent header.
    const HEADER_BITS: usize;

    /// Encode one block of `N` samples (`N` in {4, 16, 64}) in natural
    /// order into stream slot `block_idx`, writing at most `maxbits` bits.
    /// Returns the number of bits written.
    fn encode_block<const N: usize>(
        block: &[Self; N],
        maxbits: usize,
        block_idx: usize,
        stream: &StreamBuffer,
    ) -> usize;
}

impl Scalar for f32 {
    const PRECISION: u32 = 32;
    const HEADER_BITS: usize = 9;

    fn encode_block<const N: usize>(
        block: &[Self; N],
        maxbits: usize,
        block_idx: usize,
        stream: &StreamBuffer,
    ) -> usize {
        encode_float_block(block, maxbits, block_idx, stream)
    }
}

impl Scalar for f64 {
    const PRECISION: u32 = 64;
    const HEADER_BITS: usize = 12;

    fn encode_block<const N: usize>(
        block: &[Self; N],
        maxbits: usize,
        block_idx: usize,
        stream: &StreamBuffer,
    ) -> usize {
        encode_float_block(block, maxbits, block_idx, stream)
    }
}

impl Scalar for i32 {
    const PRECISION: u32 = 32;
    const HEADER_BITS: usize = 0;

    fn encode_block<const N: usize>(
        block: &[Self; N],
        maxbits: usize,
        block_idx: usize,
        stream: &StreamBuffer,
    ) -> usize {
        encode_int_block(block, maxbits, block_idx, stream)
    }
}

impl Scalar for i64 {
    const PRECISION: u32 = 64;
    const HEADER_BITS: usize = 0;

    fn encode_block<const N: usize>(
        block: &[Self; N],
        maxbits: usize,
        block_idx: usize,
        stream: &StreamBuffer,
    ) -> usize {
        encode_int_block(block, maxbits, block_idx, stream)
    }
}

/// Float driver: exponent header, quantize, transform, reorder, code.
fn encode_float_block<F: Float, const N: usize>(
    fblock: &[F; N],
    maxbits: usize,
    block_idx: usize,
    stream: &StreamBuffer,
) -> usize {
    const { assert!(N == 4 || N == 16 || N == 64) };
    let mut writer = stream.writer(maxbits, block_idx);
    if maxbits == 0 {
        return 0;
    }
    let emax = quantize::max_exponent(fblock);
    let maxprec = quantize::precision::<F>(emax);
    let e = if maxprec > 0 { emax + F::EBIAS } else { 0 };
    if e == 0 {
        // the block is zero everywhere; the buffer already says so
        return 0;
    }

    let ebits = F::EBITS as usize + 1;
    let header = 2 * e as u64 + 1;
    if maxbits < ebits {
        writer.write_bits(header & ((1 << maxbits) - 1), maxbits);
        return maxbits;
    }
    writer.write_bits(header, ebits);

    let mut iblock = quantize::fwd_cast(fblock, emax);
    fwd_xform(&mut iblock);
    let ublock = fwd_order(&iblock);
    ebits + encode_bit_planes(&mut writer, maxbits - ebits, maxprec, &ublock)
}

/// Integer driver: no header, full type precision.
fn encode_int_block<I: BlockInt, const N: usize>(
    iblock: &[I; N],
    maxbits: usize,
    block_idx: usize,
    stream: &StreamBuffer,
) -> usize {
    const { assert!(N == 4 || N == 16 || N == 64) };
    let mut writer = stream.writer(maxbits, block_idx);
    let mut block = *iblock;
    fwd_xform(&mut block);
    let ublock = fwd_order(&block);
    encode_bit_planes(&mut writer, maxbits, I::UInt::PRECISION, &ublock)
}

/// Emit bit planes from most to least significant, interleaving raw
/// refinement bits for known-significant coefficients with a group-test /
/// unary code announcing new ones. Returns the number of bits written.
fn encode_bit_planes<U: BlockUInt, const N: usize>(
    writer: &mut BlockWriter<'_>,
    maxbits: usize,
    maxprec: u32,
    ublock: &[U; N],
) -> usize {
    let intprec = U::PRECISION;
    let kmin = intprec - maxprec.min(intprec);
    let mut bits = maxbits;
    let mut n = 0usize;
    let mut k = intprec;
    while bits > 0 && k > kmin {
        k -= 1;
        // gather plane k across the block
        let mut x = 0u64;
        for (i, u) in ublock.iter().enumerate() {
            x += u.bit(k) << i;
        }
        // refinement bits of the n coefficients already significant
        let m = n.min(bits);
        bits -= m;
        x = writer.write_bits(x, m);
        // group test: a 1 promises another significant coefficient in this
        // plane, located by the unary code that follows
        while n < N && bits > 0 {
            bits -= 1;
            if writer.write_bit((x != 0) as u64) == 0 {
                break;
            }
            while n < N - 1 && bits > 0 {
                bits -= 1;
                if writer.write_bit(x & 1) != 0 {
                    break;
                }
                x >>= 1;
                n += 1;
            }
            x >>= 1;
            n += 1;
        }
    }
    maxbits - bits
}
