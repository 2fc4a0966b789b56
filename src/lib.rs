//! gridpack – fixed-rate block compression for regular grids
//! -------------------------------------------------------------
//! Partitions a d-dimensional array (d = 1, 2, 3) of f32/f64/i32/i64
//! samples into 4^d blocks and encodes each one independently:
//!
//! 1. block floating-point quantization against the block's max exponent
//! 2. integer lifting transform along every axis
//! 3. reorder by ascending frequency, negabinary mapping
//! 4. bit-plane coding with group-test termination, cut off at a fixed
//!    per-block bit budget
//!
//! Blocks land at known bit offsets of one shared buffer, so any number
//! of them can be encoded concurrently.

mod order;
mod transform;

pub mod codec;
pub mod encode;
pub mod quantize;
pub mod stream;
pub mod types;

pub use crate::codec::{compress_1d, compress_2d, compress_3d, Compressed};
pub use crate::encode::Scalar;
pub use crate::stream::{BlockWriter, StreamBuffer, Word, WORD_BITS};
