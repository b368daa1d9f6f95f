//! Bit-parallel form of a linear register update.
//!
//! When no new bits are injected, advancing an LFSR is a linear map over GF(2): every
//! output bit is the XOR of a fixed subset of the input bits. [`TransitionMatrix`]
//! records those subsets once, by probing the map with each single-bit input, so that
//! later evaluations cost one masked parity per output bit instead of a serial shift per
//! bit.

use crate::bits::{self, MAX_WIDTH};
use crate::lfsr::Transition;

/// GF(2) matrix mapping an `in_width` bit vector to an `out_width` bit vector.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TransitionMatrix {
    in_width: u32,
    /// `rows[r]` is the mask of input bits XORed into output bit `r`.
    rows: Vec<u128>,
}

impl TransitionMatrix {
    /// Build the matrix of `map` by probing it with each basis vector.
    ///
    /// `map` must be linear over GF(2). Output bits above `out_width` are ignored.
    pub fn probe(in_width: u32, out_width: u32, mut map: impl FnMut(u128) -> u128) -> Self {
        assert!(
            in_width <= MAX_WIDTH && out_width <= MAX_WIDTH,
            "matrix dimensions exceed 128 bits"
        );
        let mut rows = vec![0u128; out_width as usize];
        for col in 0..in_width {
            let image = map(1 << col);
            for (r, row) in rows.iter_mut().enumerate() {
                if (image >> r) & 1 != 0 {
                    *row |= 1 << col;
                }
            }
        }
        TransitionMatrix { in_width, rows }
    }

    /// Matrix of advancing `transition` by `count` zero bits.
    pub fn free_running(transition: &impl Transition, count: u32) -> Self {
        let width = transition.width();
        Self::probe(width, width, |start| transition.advance(start, 0, count))
    }

    #[inline]
    pub fn in_width(&self) -> u32 {
        self.in_width
    }

    #[inline]
    pub fn out_width(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Apply the map to `input`. Bits above `in_width` are ignored.
    pub fn apply(&self, input: u128) -> u128 {
        let input = input & bits::mask(self.in_width);
        self.rows
            .iter()
            .enumerate()
            .fold(0, |acc, (r, &row)| {
                acc | (bits::parity(input & row) as u128) << r
            })
    }
}
