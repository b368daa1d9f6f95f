//! Standard PRBS polynomials.
//!
//! Masks follow the [`Lfsr`] convention: the `x^width` term is implicit and bit `j` set
//! means `x^j` is present. All of these are primitive, so a nonzero seed cycles through
//! every nonzero state in either topology.

use std::fmt;
use std::str::FromStr;

use crate::lfsr::{Lfsr, LfsrError, Topology};

/// The common pseudo-random binary sequences.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Prbs {
    /// x^7 + x^6 + 1
    Prbs7,
    /// x^9 + x^5 + 1
    Prbs9,
    /// x^11 + x^9 + 1
    Prbs11,
    /// x^15 + x^14 + 1
    Prbs15,
    /// x^23 + x^18 + 1
    Prbs23,
    /// x^31 + x^28 + 1
    Prbs31,
}

impl Prbs {
    /// Every preset, shortest first.
    pub const ALL: [Prbs; 6] = [
        Prbs::Prbs7,
        Prbs::Prbs9,
        Prbs::Prbs11,
        Prbs::Prbs15,
        Prbs::Prbs23,
        Prbs::Prbs31,
    ];

    /// Number of register stages.
    pub const fn width(self) -> u32 {
        match self {
            Prbs::Prbs7 => 7,
            Prbs::Prbs9 => 9,
            Prbs::Prbs11 => 11,
            Prbs::Prbs15 => 15,
            Prbs::Prbs23 => 23,
            Prbs::Prbs31 => 31,
        }
    }

    /// Polynomial mask without the implicit top term.
    pub const fn polynomial(self) -> u64 {
        match self {
            Prbs::Prbs7 => 0x41,
            Prbs::Prbs9 => 0x021,
            Prbs::Prbs11 => 0x201,
            Prbs::Prbs15 => 0x4001,
            Prbs::Prbs23 => 0x04_0001,
            Prbs::Prbs31 => 0x1000_0001,
        }
    }

    /// Length of the sequence before it repeats.
    pub const fn period(self) -> u64 {
        (1 << self.width()) - 1
    }

    /// The LFSR producing this sequence with the given wiring.
    pub fn lfsr(self, topology: Topology) -> Lfsr {
        match Lfsr::new(self.width(), self.polynomial() as u128, topology) {
            Ok(lfsr) => lfsr,
            Err(err) => unreachable!("preset {} is malformed: {}", self, err),
        }
    }
}

impl fmt::Display for Prbs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PRBS{}", self.width())
    }
}

impl FromStr for Prbs {
    type Err = LfsrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Prbs::ALL
            .into_iter()
            .find(|p| p.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| LfsrError::UnknownPreset(s.to_owned()))
    }
}
