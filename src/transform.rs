//! Forward integer lifting transform over 4^d blocks.
//!
//! Each axis of a block is decorrelated by the same 4-point lift, applied
//! with stride 1 along x, 4 along y, and 16 along z, in that fixed order.
//! The lift is built from paired add/shift steps on wrapping integers, an
//! integer-exact analogue of an orthogonal wavelet transform.

use crate::types::BlockInt;

/// One 4-point forward lift at `stride`, starting from `base`.
fn fwd_lift<I: BlockInt>(p: &mut [I], base: usize, stride: usize) {
    let mut x = p[base];
    let mut y = p[base + stride];
    let mut z = p[base + 2 * stride];
    let mut w = p[base + 3 * stride];

    x = x.wrapping_add(w).sar(1);
    w = w.wrapping_sub(x);
    z = z.wrapping_add(y).sar(1);
    y = y.wrapping_sub(z);
    x = x.wrapping_add(z).sar(1);
    z = z.wrapping_sub(x);
    w = w.wrapping_add(y).sar(1);
    y = y.wrapping_sub(w);
    w = w.wrapping_add(y.sar(1));
    y = y.wrapping_sub(w.sar(1));

    p[base] = x;
    p[base + stride] = y;
    p[base + 2 * stride] = z;
    p[base + 3 * stride] = w;
}

fn fwd_xform_1d<I: BlockInt>(p: &mut [I]) {
    fwd_lift(p, 0, 1);
}

fn fwd_xform_2d<I: BlockInt>(p: &mut [I]) {
    for y in 0..4 {
        fwd_lift(p, 4 * y, 1);
    }
    for x in 0..4 {
        fwd_lift(p, x, 4);
    }
}

fn fwd_xform_3d<I: BlockInt>(p: &mut [I]) {
    for z in 0..4 {
        for y in 0..4 {
            fwd_lift(p, 4 * y + 16 * z, 1);
        }
    }
    for z in 0..4 {
        for x in 0..4 {
            fwd_lift(p, x + 16 * z, 4);
        }
    }
    for y in 0..4 {
        for x in 0..4 {
            fwd_lift(p, x + 4 * y, 16);
        }
    }
}

/// Forward transform of one block along every axis, d = log4(N).
pub(crate) fn fwd_xform<I: BlockInt, const N: usize>(block: &mut [I; N]) {
    match N {
        4 => fwd_xform_1d(block),
        16 => fwd_xform_2d(block),
        64 => fwd_xform_3d(block),
        _ => unreachable!("block size must be 4, 16, or 64"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Inverse lift, each forward step undone in reverse order.
    fn inv_lift<I: BlockInt>(p: &mut [I], base: usize, stride: usize) {
        let mut x = p[base];
        let mut y = p[base + stride];
        let mut z = p[base + 2 * stride];
        let mut w = p[base + 3 * stride];

        y = y.wrapping_add(w.sar(1));
        w = w.wrapping_sub(y.sar(1));
        y = y.wrapping_add(w);
        w = w.shl(1).wrapping_sub(y);
        z = z.wrapping_add(x);
        x = x.shl(1).wrapping_sub(z);
        y = y.wrapping_add(z);
        z = z.shl(1).wrapping_sub(y);
        w = w.wrapping_add(x);
        x = x.shl(1).wrapping_sub(w);

        p[base] = x;
        p[base + stride] = y;
        p[base + 2 * stride] = z;
        p[base + 3 * stride] = w;
    }

    #[test]
    fn lift_of_constant_block_concentrates_dc() {
        let mut p = [12i32, 12, 12, 12];
        fwd_lift(&mut p, 0, 1);
        assert_eq!(p, [12, 0, 0, 0]);
    }

    #[test]
    fn lift_respects_stride() {
        let mut strided = [7i32, -1, 3, -1, 9, -1, 5, -1];
        let mut packed = [7i32, 3, 9, 5];
        fwd_lift(&mut strided, 0, 2);
        fwd_lift(&mut packed, 0, 1);
        for i in 0..4 {
            assert_eq!(strided[2 * i], packed[i]);
            assert_eq!(strided[2 * i + 1], -1, "off-stride element touched");
        }
    }

    // The forward lift halves sums, so distinct inputs can collapse onto
    // one output; the exact identity runs the other way around: lifting a
    // decoded vector reproduces its coefficients bit for bit. Holds as
    // long as the coefficients keep the headroom the quantizer reserves
    // (the inverse grows magnitudes by up to 4x).
    proptest! {
        #[test]
        fn prop_forward_undoes_inverse_i32(
            v in proptest::array::uniform4(-(1i32 << 27)..(1i32 << 27)),
        ) {
            let mut p = v;
            inv_lift(&mut p, 0, 1);
            fwd_lift(&mut p, 0, 1);
            prop_assert_eq!(p, v);
        }

        #[test]
        fn prop_forward_undoes_inverse_i64(
            v in proptest::array::uniform4(-(1i64 << 59)..(1i64 << 59)),
        ) {
            let mut p = v;
            inv_lift(&mut p, 0, 1);
            fwd_lift(&mut p, 0, 1);
            prop_assert_eq!(p, v);
        }

        #[test]
        fn prop_reconstruction_error_is_bounded(v in proptest::array::uniform4(-1_000_000i32..1_000_000)) {
            let mut p = v;
            fwd_lift(&mut p, 0, 1);
            inv_lift(&mut p, 0, 1);
            for i in 0..4 {
                prop_assert!((p[i] - v[i]).abs() <= 4, "lossy drift too large at {}: {} vs {}", i, p[i], v[i]);
            }
        }
    }

    #[test]
    fn xform_2d_composes_1d_lifts() {
        let mut direct: [i32; 16] = std::array::from_fn(|i| (i as i32) * 31 - 97);
        let mut composed = direct;

        fwd_xform(&mut direct);

        for row in 0..4 {
            fwd_lift(&mut composed, 4 * row, 1);
        }
        for col in 0..4 {
            fwd_lift(&mut composed, col, 4);
        }
        assert_eq!(direct, composed);
    }

    #[test]
    fn xform_3d_composes_1d_lifts() {
        let mut direct: [i64; 64] = std::array::from_fn(|i| (i as i64) * 1_000_003 - 31_000_000);
        let mut composed = direct;

        fwd_xform(&mut direct);

        for z in 0..4 {
            for y in 0..4 {
                fwd_lift(&mut composed, 4 * y + 16 * z, 1);
            }
        }
        for z in 0..4 {
            for x in 0..4 {
                fwd_lift(&mut composed, x + 16 * z, 4);
            }
        }
        for y in 0..4 {
            for x in 0..4 {
                fwd_lift(&mut composed, x + 4 * y, 16);
            }
        }
        assert_eq!(direct, composed);
    }
}
