//! Coefficient traversal order.
//!
//! After the transform, coefficients are visited by ascending total
//! frequency (distance from the DC corner at index 0), so the coefficients
//! most likely to be zero come last. The order is fixed per block size and
//! never depends on the data.

use crate::types::BlockInt;

pub(crate) static PERM_4: [u8; 4] = [0, 1, 2, 3];

#[rustfmt::skip]
pub(crate) static PERM_16: [u8; 16] = [
     0,  1,  4,  5,  2,  8,  6,  9,
     3, 12, 10,  7, 13, 11, 14, 15,
];

#[rustfmt::skip]
pub(crate) static PERM_64: [u8; 64] = [
     0,  1,  4, 16, 20, 17,  5,  2,  8, 32, 21,  6, 18, 24,  9, 33,
    36,  3, 12, 48, 25, 37, 22, 10, 34, 40,  7, 19, 28, 13, 49, 52,
    26, 38, 41, 23, 29, 53, 11, 35, 44, 14, 50, 56, 42, 27, 39, 45,
    30, 54, 57, 15, 51, 60, 43, 46, 58, 31, 55, 61, 47, 59, 62, 63,
];

pub(crate) fn permutation<const N: usize>() -> &'static [u8] {
    match N {
        4 => &PERM_4,
        16 => &PERM_16,
        64 => &PERM_64,
        _ => unreachable!("block size must be 4, 16, or 64"),
    }
}

/// Permute a transformed block into traversal order and map each
/// coefficient to negabinary.
pub(crate) fn fwd_order<I: BlockInt, const N: usize>(iblock: &[I; N]) -> [I::UInt; N] {
    let perm = permutation::<N>();
    std::array::from_fn(|i| iblock[perm[i] as usize].to_uint())
}
