//! Grid-level compression: partition a 1-D/2-D/3-D array into 4^d blocks
//! and encode every block in parallel into one shared stream.
//!
//! Public API
//! ----------
//! * [`compress_1d`] / [`compress_2d`] / [`compress_3d`] – encode an
//!   ndarray view at a fixed per-block bit budget.
//! * [`Compressed`] – the resulting word stream plus its layout.
//!
//! Edge blocks hanging past the grid are padded by clamping reads to the
//! last sample along each axis.

use std::io;

use anyhow::{ensure, Result};
use byteorder::{LittleEndian, WriteBytesExt};
use log::debug;
use ndarray::{ArrayView1, ArrayView2, ArrayView3};
use rayon::prelude::*;

use crate::encode::Scalar;
use crate::stream::{StreamBuffer, Word};

/// Compressed stream plus the layout needed to address blocks inside it.
#[derive(Debug, Clone)]
pub struct Compressed {
    words: Vec<Word>,
    blocks: usize,
    maxbits: usize,
}

impl Compressed {
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks
    }

    pub fn bits_per_block(&self) -> usize {
        self.maxbits
    }

    /// Total payload size in bits, `num_blocks * bits_per_block`.
    pub fn payload_bits(&self) -> usize {
        self.blocks * self.maxbits
    }

    /// Serialize the word stream little-endian.
    pub fn write_to<W: io::Write>(&self, mut out: W) -> io::Result<()> {
        for &word in &self.words {
            out.write_u64::<LittleEndian>(word)?;
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.words.len() * 8);
        self.write_to(&mut out)
            .expect("writing to a Vec cannot fail");
        out
    }
}

fn check_budget<S: Scalar>(block_size: usize, maxbits: usize) -> Result<()> {
    let cap = block_size * S::PRECISION as usize + S::HEADER_BITS;
    ensure!(
        maxbits <= cap,
        "bit budget {maxbits} exceeds block capacity {cap}"
    );
    Ok(())
}

/// Encode the (already sized) blocks through `gather` in parallel.
fn compress_blocks<S, G, const N: usize>(
    nblocks: usize,
    maxbits: usize,
    gather: G,
) -> Compressed
where
    S: Scalar,
    G: Fn(usize) -> [S; N] + Send + Sync,
{
    let stream = StreamBuffer::for_blocks(nblocks, maxbits);
    (0..nblocks).into_par_iter().for_each(|b| {
        let block = gather(b);
        S::encode_block(&block, maxbits, b, &stream);
    });
    Compressed {
        words: stream.into_words(),
        blocks: nblocks,
        maxbits,
    }
}

/// Compress a 1-D signal at `maxbits` bits per 4-sample block.
pub fn compress_1d<S: Scalar>(data: ArrayView1<'_, S>, maxbits: usize) -> Result<Compressed> {
    check_budget::<S>(4, maxbits)?;
    let n = data.len();
    let bx = n.div_ceil(4);
    debug!("compressing 1-d grid of {n} samples: {bx} blocks at {maxbits} bits each");
    Ok(compress_blocks::<S, _, 4>(bx, maxbits, |b| {
        std::array::from_fn(|i| data[(4 * b + i).min(n - 1)])
    }))
}

/// Compress a 2-D grid at `maxbits` bits per 4x4 block.
pub fn compress_2d<S: Scalar>(data: ArrayView2<'_, S>, maxbits: usize) -> Result<Compressed> {
    check_budget::<S>(16, maxbits)?;
    let (ny, nx) = data.dim();
    // an empty grid has zero blocks, so the gather below never runs
    let (bx, by) = (nx.div_ceil(4), ny.div_ceil(4));
    debug!(
        "compressing 2-d grid of {ny}x{nx} samples: {} blocks at {maxbits} bits each",
        bx * by
    );
    Ok(compress_blocks::<S, _, 16>(bx * by, maxbits, move |b| {
        let (x0, y0) = (4 * (b % bx), 4 * (b / bx));
        std::array::from_fn(|i| {
            let x = (x0 + (i & 3)).min(nx - 1);
            let y = (y0 + (i >> 2)).min(ny - 1);
            data[(y, x)]
        })
    }))
}

/// Compress a 3-D grid at `maxbits` bits per 4x4x4 block.
pub fn compress_3d<S: Scalar>(data: ArrayView3<'_, S>, maxbits: usize) -> Result<Compressed> {
    check_budget::<S>(64, maxbits)?;
    let (nz, ny, nx) = data.dim();
    let (bx, by, bz) = (nx.div_ceil(4), ny.div_ceil(4), nz.div_ceil(4));
    debug!(
        "compressing 3-d grid of {nz}x{ny}x{nx} samples: {} blocks at {maxbits} bits each",
        bx * by * bz
    );
    Ok(compress_blocks::<S, _, 64>(
        bx * by * bz,
        maxbits,
        move |b| {
            let x0 = 4 * (b % bx);
            let y0 = 4 * ((b / bx) % by);
            let z0 = 4 * (b / (bx * by));
            std::array::from_fn(|i| {
                let x = (x0 + (i & 3)).min(nx - 1);
                let y = (y0 + ((i >> 2) & 3)).min(ny - 1);
                let z = (z0 + (i >> 4)).min(nz - 1);
                data[(z, y, x)]
            })
        },
    ))
}
