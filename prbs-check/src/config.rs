//! Construction parameters shared by the checker and the generator.

use bitflags::bitflags;
use prbs_lfsr::bits;
use prbs_lfsr::{Lfsr, LfsrError, Prbs, Topology};
use thiserror::Error;

/// Widest register or data word a checker can hold.
pub const MAX_WIDTH: u32 = u64::BITS;

bitflags! {
    /// Presentation options applied where data words enter and leave the recurrence.
    #[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct Options: u8 {
        /// Words and the register are in reversed bit order: the first bit in time is bit 0
        /// instead of the most significant bit.
        const REVERSE = 0b01;
        /// Every data bit is complemented.
        const INVERT = 0b10;
    }
}

/// Errors that can result from building a checker or generator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Register width must be at least 1 bit")]
    ZeroRegisterWidth,
    #[error("Data width must be at least 1 bit")]
    ZeroDataWidth,
    #[error("Register width {0} exceeds the maximum of 64 bits")]
    RegisterTooWide(u32),
    #[error("Data width {0} exceeds the maximum of 64 bits")]
    DataTooWide(u32),
    /// The initial register value has bits set above the register width.
    #[error("Initial value {value:#x} does not fit in a {width} bit register")]
    InitialValueOutOfRange {
        /// The configured initial value.
        value: u64,
        /// The register width.
        width: u32,
    },
    /// The checker folds each new word in through the polynomial's `x^0` term. Without
    /// it the input never reaches the recurrence.
    #[error("Polynomial {0:#x} has no x^0 term, so the checker cannot see its input")]
    MissingConstantTerm(u64),
    /// The transition supplied to the checker is not as wide as register plus data word.
    #[error("Transition is {actual} bits wide but the extended register needs {expected}")]
    ExtendedWidthMismatch {
        /// Register width plus data width.
        expected: u32,
        /// Width reported by the transition.
        actual: u32,
    },
    /// The LFSR description was rejected.
    #[error("Invalid LFSR: {0}")]
    Lfsr(#[from] LfsrError),
}

/// Register and data widths of a validated configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Geometry {
    register_width: u32,
    data_width: u32,
}

impl Geometry {
    /// Number of bits in the LFSR register, `W`.
    #[inline]
    pub const fn register_width(self) -> u32 {
        self.register_width
    }

    /// Number of bits processed per step, `D`.
    #[inline]
    pub const fn data_width(self) -> u32 {
        self.data_width
    }

    /// Width of the register with a data word appended, `W + D`.
    #[inline]
    pub const fn extended_width(self) -> u32 {
        self.register_width + self.data_width
    }

    #[inline]
    pub const fn register_mask(self) -> u64 {
        bits::mask(self.register_width) as u64
    }

    #[inline]
    pub const fn data_mask(self) -> u64 {
        bits::mask(self.data_width) as u64
    }

    /// Number of valid steps needed to fill the register with received bits.
    #[inline]
    pub const fn sync_steps(self) -> u32 {
        (self.register_width + self.data_width - 1) / self.data_width
    }
}

/// Parameters of a PRBS checker or generator. Fixed for the life of an instance.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PrbsConfig {
    /// Number of LFSR stages.
    pub register_width: u32,
    /// Number of bits in each data word.
    pub data_width: u32,
    /// Polynomial mask with the `x^register_width` term implicit.
    pub polynomial: u64,
    pub topology: Topology,
    /// Register value loaded on reset.
    pub initial_value: u64,
    pub options: Options,
}

impl PrbsConfig {
    /// Fibonacci configuration seeded with all ones, in normal bit order, without
    /// inversion.
    pub fn new(register_width: u32, polynomial: u64, data_width: u32) -> Self {
        PrbsConfig {
            register_width,
            data_width,
            polynomial,
            topology: Topology::Fibonacci,
            initial_value: bits::mask(register_width) as u64,
            options: Options::empty(),
        }
    }

    /// Configuration for one of the standard sequences.
    pub fn preset(prbs: Prbs, data_width: u32) -> Self {
        Self::new(prbs.width(), prbs.polynomial(), data_width)
    }

    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    pub fn with_initial_value(mut self, initial_value: u64) -> Self {
        self.initial_value = initial_value;
        self
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Turn reversed bit order on or off.
    pub fn reversed(mut self, reverse: bool) -> Self {
        self.options.set(Options::REVERSE, reverse);
        self
    }

    /// Turn data inversion on or off.
    pub fn inverted(mut self, invert: bool) -> Self {
        self.options.set(Options::INVERT, invert);
        self
    }

    #[inline]
    pub fn is_reversed(&self) -> bool {
        self.options.contains(Options::REVERSE)
    }

    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.options.contains(Options::INVERT)
    }

    /// Check the widths and the initial value.
    pub fn validate(&self) -> Result<Geometry, ConfigError> {
        if self.register_width == 0 {
            return Err(ConfigError::ZeroRegisterWidth);
        }
        if self.data_width == 0 {
            return Err(ConfigError::ZeroDataWidth);
        }
        if self.register_width > MAX_WIDTH {
            return Err(ConfigError::RegisterTooWide(self.register_width));
        }
        if self.data_width > MAX_WIDTH {
            return Err(ConfigError::DataTooWide(self.data_width));
        }
        let geometry = Geometry {
            register_width: self.register_width,
            data_width: self.data_width,
        };
        if self.initial_value & !geometry.register_mask() != 0 {
            return Err(ConfigError::InitialValueOutOfRange {
                value: self.initial_value,
                width: self.register_width,
            });
        }
        Ok(geometry)
    }

    /// The configured `W` bit LFSR.
    pub fn lfsr(&self) -> Result<Lfsr, ConfigError> {
        Ok(Lfsr::new(
            self.register_width,
            self.polynomial as u128,
            self.topology,
        )?)
    }
}

impl Default for PrbsConfig {
    /// PRBS31 over bytes, seeded with ones and inverted.
    fn default() -> Self {
        Self::preset(Prbs::Prbs31, 8).inverted(true)
    }
}
