//! Multi-bit-per-cycle PRBS checker.
//!
//! Each valid cycle the checker appends the received word to its register, advances the
//! extended register by one shift per received bit, and keeps the low part as the error
//! word: a set bit means the received bit did not follow from the bits before it. The
//! register is left holding the most recently received bits, so the checker locks onto
//! any stream produced by the same recurrence without being seeded in step with it.

use log::{debug, trace};
use prbs_lfsr::{Transition, TransitionMatrix};

use crate::config::{ConfigError, Geometry, PrbsConfig};
use crate::framing::{self, Framing};

/// Which of the two checker states the last clock edge left it in.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub enum CheckerState {
    /// Reset was asserted: the register holds the initial value and the error word is
    /// clear.
    #[default]
    Reset,
    /// Reset is deasserted and words are being checked (or stalled).
    Running,
}

/// A PRBS checker with a one-cycle pipeline latency.
#[derive(Debug, Clone)]
pub struct Checker {
    config: PrbsConfig,
    geometry: Geometry,
    framing: &'static dyn Framing,
    /// Extended register update, already converted to the framing's bit order.
    transition: TransitionMatrix,
    /// XORed into every received word.
    invert_mask: u64,
    register: u64,
    error_out: u64,
    state: CheckerState,
}

impl Checker {
    /// Build a checker using the bit-serial LFSR model as the transition function.
    ///
    /// Galois configurations are checked with the Fibonacci-equivalent recurrence,
    /// since a Galois register folded around received bits would mix its taps into the
    /// stored history instead of comparing against it.
    pub fn new(config: PrbsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let lfsr = config.lfsr()?;
        if !lfsr.has_constant_term() {
            return Err(ConfigError::MissingConstantTerm(config.polynomial));
        }
        let extended = lfsr.to_fibonacci().extend(config.data_width)?;
        Self::with_transition(config, &extended)
    }

    /// Build a checker around a caller-supplied transition of the extended register.
    ///
    /// `transition` must be `W + D` bits wide and linear when no new bits are injected.
    /// It is probed once here; steps never call it again.
    pub fn with_transition(
        config: PrbsConfig,
        transition: &impl Transition,
    ) -> Result<Self, ConfigError> {
        let geometry = config.validate()?;
        let width = geometry.extended_width();
        if transition.width() != width {
            return Err(ConfigError::ExtendedWidthMismatch {
                expected: width,
                actual: transition.width(),
            });
        }

        let framing = framing::select(config.options);
        let count = geometry.data_width();
        let matrix = TransitionMatrix::probe(width, width, |extended| {
            let start = framing.canonical(extended, width);
            framing.canonical(transition.advance(start, 0, count), width)
        });
        let invert_mask = if config.is_inverted() {
            geometry.data_mask()
        } else {
            0
        };

        debug!(
            "PRBS checker: {} bit {} register, {} bit words, poly {:#x}, options {:?}",
            geometry.register_width(),
            config.topology,
            geometry.data_width(),
            config.polynomial,
            config.options,
        );

        Ok(Checker {
            register: config.initial_value,
            config,
            geometry,
            framing,
            transition: matrix,
            invert_mask,
            error_out: 0,
            state: CheckerState::Reset,
        })
    }

    /// Reload the initial register value and clear the error word.
    pub fn reset(&mut self) {
        trace!("PRBS checker reset");
        self.register = self.config.initial_value;
        self.error_out = 0;
        self.state = CheckerState::Reset;
    }

    /// Run one clock cycle with reset deasserted. When `valid` is false nothing is
    /// latched.
    ///
    /// Panics if `data_in` is wider than the configured data width.
    pub fn step(&mut self, data_in: u64, valid: bool) {
        assert!(
            data_in & !self.geometry.data_mask() == 0,
            "data word {:#x} is wider than {} bits",
            data_in,
            self.geometry.data_width()
        );
        self.state = CheckerState::Running;
        if !valid {
            return;
        }

        let word = data_in ^ self.invert_mask;
        let extended = self.framing.compose(self.geometry, self.register, word);
        let (register, error_out) = self
            .framing
            .split(self.geometry, self.transition.apply(extended));
        trace!("PRBS check {:#x}: errors {:#x}", data_in, error_out);

        self.register = register;
        self.error_out = error_out;
    }

    /// Run one clock edge with a synchronous reset input. Reset overrides `valid`.
    pub fn clock(&mut self, rst: bool, data_in: u64, valid: bool) {
        if rst {
            self.reset();
        } else {
            self.step(data_in, valid);
        }
    }

    /// Error mask for the word accepted by the last valid step.
    #[inline]
    pub fn error_out(&self) -> u64 {
        self.error_out
    }

    /// Current register value, in the configured bit order.
    #[inline]
    pub fn register(&self) -> u64 {
        self.register
    }

    #[inline]
    pub fn state(&self) -> CheckerState {
        self.state
    }

    #[inline]
    pub fn config(&self) -> &PrbsConfig {
        &self.config
    }

    #[inline]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }
}

#[cfg(test)]
mod tests {
    use prbs_lfsr::{Lfsr, Prbs, Topology};

    use super::*;

    /// PRBS7 bits from an all-ones history: x[n] = x[n-7] ^ x[n-6].
    fn prbs7_bits(count: usize) -> Vec<u64> {
        let mut bits = vec![1u64; 7];
        for n in 7..7 + count {
            let next = bits[n - 7] ^ bits[n - 6];
            bits.push(next);
        }
        bits.split_off(7)
    }

    #[test]
    fn prbs7_serial() {
        let mut checker = Checker::new(PrbsConfig::new(7, 0x41, 1)).unwrap();
        let bits = prbs7_bits(254);
        assert_eq!(&bits[..16], &[0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1, 1, 0, 0]);
        for (i, &bit) in bits.iter().enumerate() {
            checker.step(bit, true);
            if i >= 7 {
                assert_eq!(checker.error_out(), 0, "bit {}", i);
            }
        }
    }

    #[test]
    fn register_tracks_received_bits() {
        let mut checker = Checker::new(PrbsConfig::preset(Prbs::Prbs7, 4)).unwrap();
        checker.step(0b1010, true);
        assert_eq!(checker.register(), 0b111_1010);
        checker.step(0b0110, true);
        assert_eq!(checker.register(), 0b010_0110);
    }

    #[test]
    fn wide_words_keep_the_newest_bits() {
        let mut checker = Checker::new(PrbsConfig::preset(Prbs::Prbs7, 16)).unwrap();
        checker.step(0xbeef, true);
        assert_eq!(checker.register(), 0xbeef & 0x7f);
    }

    #[test]
    fn reset_and_stall() {
        let config = PrbsConfig::preset(Prbs::Prbs9, 8).with_initial_value(0x0a5);
        let mut checker = Checker::new(config).unwrap();
        assert_eq!(checker.state(), CheckerState::Reset);

        checker.step(0x3c, true);
        let (register, error_out) = (checker.register(), checker.error_out());
        assert_ne!(register, 0x0a5);
        assert_eq!(checker.state(), CheckerState::Running);

        checker.step(0xff, false);
        assert_eq!(checker.register(), register);
        assert_eq!(checker.error_out(), error_out);

        checker.clock(true, 0x12, true);
        assert_eq!(checker.state(), CheckerState::Reset);
        assert_eq!(checker.register(), 0x0a5);
        assert_eq!(checker.error_out(), 0);

        checker.clock(false, 0x12, false);
        assert_eq!(checker.state(), CheckerState::Running);
        assert_eq!(checker.register(), 0x0a5);
    }

    #[test]
    #[should_panic(expected = "wider than 8 bits")]
    fn oversized_word_panics() {
        let mut checker = Checker::new(PrbsConfig::default()).unwrap();
        checker.step(0x100, true);
    }

    #[test]
    fn missing_constant_term() {
        assert_eq!(
            Checker::new(PrbsConfig::new(7, 0x40, 8)).unwrap_err(),
            ConfigError::MissingConstantTerm(0x40)
        );
    }

    #[test]
    fn transition_width_must_cover_word() {
        let config = PrbsConfig::preset(Prbs::Prbs7, 8);
        let narrow = Lfsr::new(7, 0x41, Topology::Fibonacci).unwrap();
        assert_eq!(
            Checker::with_transition(config, &narrow).unwrap_err(),
            ConfigError::ExtendedWidthMismatch {
                expected: 15,
                actual: 7
            }
        );
    }

    #[test]
    fn widest_configuration_builds() {
        let config = PrbsConfig::new(64, 0xd800_0000_0000_0001, 64);
        let mut checker = Checker::new(config).unwrap();
        assert_eq!(checker.geometry().extended_width(), 128);
        checker.step(u64::MAX, true);
        assert_eq!(checker.register(), u64::MAX);
    }
}
