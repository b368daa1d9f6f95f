//! Bit-serial reference model of a linear-feedback shift register.
//!
//! Registers shift towards the most significant bit. Each shift computes one feedback
//! bit, which is written into bit 0 and also emitted as an output bit. The polynomial is
//! given as a mask of `width` bits with the `x^width` term implicit: bit `j` set means
//! the term `x^j` is present.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::bits::{self, MAX_WIDTH};

/// Errors that can result from describing an LFSR.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LfsrError {
    /// An LFSR must have at least one register stage.
    #[error("LFSR width must be at least 1 bit")]
    ZeroWidth,
    /// The register does not fit in the 128 bit working value.
    #[error("LFSR width {width} exceeds the maximum of {max} bits")]
    WidthTooLarge {
        /// The requested width.
        width: u32,
        /// The widest supported register.
        max: u32,
    },
    /// The polynomial mask has bits set at or above `x^width`.
    #[error("Polynomial {poly:#x} does not fit in a {width} bit LFSR")]
    PolynomialOutOfRange {
        /// The polynomial mask.
        poly: u128,
        /// The register width.
        width: u32,
    },
    /// The topology name was not recognized.
    #[error("Unknown LFSR topology: {0:?}")]
    UnknownTopology(String),
    /// The PRBS preset name was not recognized.
    #[error("Unknown PRBS preset: {0:?}")]
    UnknownPreset(String),
}

/// How the feedback of an LFSR is wired.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Topology {
    /// A single XOR of the tapped stages is fed back into bit 0.
    #[default]
    Fibonacci,
    /// The bit shifted out of the top stage is XORed into every tapped stage.
    Galois,
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topology::Fibonacci => f.write_str("FIBONACCI"),
            Topology::Galois => f.write_str("GALOIS"),
        }
    }
}

impl FromStr for Topology {
    type Err = LfsrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("fibonacci") {
            Ok(Topology::Fibonacci)
        } else if s.eq_ignore_ascii_case("galois") {
            Ok(Topology::Galois)
        } else {
            Err(LfsrError::UnknownTopology(s.to_owned()))
        }
    }
}

/// A register transition: advance a register by some number of input bits.
///
/// Implementations must be deterministic and free of side effects.
pub trait Transition {
    /// Number of stages in the register.
    fn width(&self) -> u32;

    /// Shift `start` through the register, injecting the low `count` bits of `new_bits`
    /// one at a time, most significant first. Returns the resulting register value.
    fn advance(&self, start: u128, new_bits: u128, count: u32) -> u128;
}

/// Result of shifting an [`Lfsr`] by several bits.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Shifted {
    /// Register value after the last shift.
    pub state: u128,
    /// The feedback bit of each shift, first shift in the most significant position.
    pub output: u128,
}

/// An LFSR described by its width, polynomial and topology.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Lfsr {
    width: u32,
    poly: u128,
    topology: Topology,
}

impl Lfsr {
    /// Describe an LFSR of `width` stages with the given polynomial mask.
    pub fn new(width: u32, poly: u128, topology: Topology) -> Result<Self, LfsrError> {
        if width == 0 {
            return Err(LfsrError::ZeroWidth);
        }
        if width > MAX_WIDTH {
            return Err(LfsrError::WidthTooLarge {
                width,
                max: MAX_WIDTH,
            });
        }
        if poly & !bits::mask(width) != 0 {
            return Err(LfsrError::PolynomialOutOfRange { poly, width });
        }
        Ok(Lfsr {
            width,
            poly,
            topology,
        })
    }

    /// Polynomial mask, without the implicit `x^width` term.
    #[inline]
    pub fn poly(&self) -> u128 {
        self.poly
    }

    #[inline]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Whether the polynomial includes the `x^0` term.
    ///
    /// A shift register on its own ignores this bit: the top stage always feeds back.
    /// It starts to matter once the polynomial is shifted up by [`Lfsr::extend`].
    #[inline]
    pub fn has_constant_term(&self) -> bool {
        self.poly & 1 != 0
    }

    /// Describe the same recurrence on a register `extra` stages wider, with the
    /// polynomial moved up by `extra` zero low-order terms.
    pub fn extend(&self, extra: u32) -> Result<Lfsr, LfsrError> {
        let width = self.width.saturating_add(extra);
        if width > MAX_WIDTH {
            return Err(LfsrError::WidthTooLarge {
                width,
                max: MAX_WIDTH,
            });
        }
        Lfsr::new(width, self.poly << extra, self.topology)
    }

    /// The Fibonacci LFSR whose output stream obeys the same recurrence as this one.
    ///
    /// A Galois register with polynomial `P` emits bits satisfying
    /// `x[n] = x[n-W] ^ XOR{ x[n-W+j] : P[j] }`, while the Fibonacci wiring satisfies
    /// `x[n] = x[n-W] ^ XOR{ x[n-k] : P[k] }`. The taps are therefore mirrored about
    /// `W`, with the constant term kept.
    pub fn to_fibonacci(&self) -> Lfsr {
        match self.topology {
            Topology::Fibonacci => *self,
            Topology::Galois => {
                let taps = (1..self.width)
                    .filter(|j| (self.poly >> j) & 1 != 0)
                    .fold(1u128, |acc, j| acc | 1 << (self.width - j));
                Lfsr {
                    width: self.width,
                    poly: taps,
                    topology: Topology::Fibonacci,
                }
            }
        }
    }

    /// Shift `count` bits of `new_bits` into the register starting from `start`, most
    /// significant first, collecting the feedback bits as they are produced.
    ///
    /// Panics if `count` is more than 128.
    pub fn shift(&self, start: u128, new_bits: u128, count: u32) -> Shifted {
        assert!(count <= MAX_WIDTH, "cannot shift more than 128 bits at once");
        let mask = bits::mask(self.width);
        let top = self.width - 1;
        // Fibonacci taps: poly bit j reads stage j-1, the implicit top term reads the
        // last stage.
        let fib_taps = (self.poly >> 1) | (1 << top);
        let galois_taps = self.poly & !1;

        let mut state = start & mask;
        let mut output = 0u128;
        for i in (0..count).rev() {
            let input = (new_bits >> i) & 1;
            let feedback = match self.topology {
                Topology::Fibonacci => bits::parity(state & fib_taps) as u128 ^ input,
                Topology::Galois => ((state >> top) & 1) ^ input,
            };
            state = ((state << 1) | feedback) & mask;
            if self.topology == Topology::Galois && feedback != 0 {
                state ^= galois_taps;
            }
            output = (output << 1) | feedback;
        }
        Shifted { state, output }
    }
}

impl Transition for Lfsr {
    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    fn advance(&self, start: u128, new_bits: u128, count: u32) -> u128 {
        self.shift(start, new_bits, count).state
    }
}
