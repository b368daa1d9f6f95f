//! PRBS generator, the mirror image of [`Checker`][crate::checker::Checker].
//!
//! Shares [`PrbsConfig`] with the checker: a generator and a checker built from the same
//! configuration agree on polynomial, topology, bit order and polarity.

use log::{debug, trace, warn};
use prbs_lfsr::TransitionMatrix;

use crate::config::{ConfigError, Geometry, PrbsConfig};
use crate::framing::{self, Framing};

/// Emits one `D` bit word of the sequence per enabled cycle.
#[derive(Debug, Clone)]
pub struct Generator {
    config: PrbsConfig,
    geometry: Geometry,
    framing: &'static dyn Framing,
    /// Maps the register to the extended value holding the next register and word.
    transition: TransitionMatrix,
    invert_mask: u64,
    register: u64,
    output: u64,
}

impl Generator {
    pub fn new(config: PrbsConfig) -> Result<Self, ConfigError> {
        let geometry = config.validate()?;
        let lfsr = config.lfsr()?;
        if config.initial_value == 0 {
            warn!("PRBS generator seeded with zero; it will only ever emit zeros");
        }

        let framing = framing::select(config.options);
        let (width, count) = (geometry.register_width(), geometry.data_width());
        let transition = TransitionMatrix::probe(width, geometry.extended_width(), |register| {
            let shifted = lfsr.shift(framing.canonical(register, width), 0, count);
            framing.compose(
                geometry,
                framing.canonical(shifted.state, width) as u64,
                framing.canonical(shifted.output, count) as u64,
            )
        });
        let invert_mask = if config.is_inverted() {
            geometry.data_mask()
        } else {
            0
        };

        debug!(
            "PRBS generator: {} bit {} register, {} bit words, poly {:#x}, options {:?}",
            width, config.topology, count, config.polynomial, config.options,
        );

        Ok(Generator {
            register: config.initial_value,
            config,
            geometry,
            framing,
            transition,
            invert_mask,
            output: 0,
        })
    }

    /// Reload the initial register value and clear the output word.
    pub fn reset(&mut self) {
        trace!("PRBS generator reset");
        self.register = self.config.initial_value;
        self.output = 0;
    }

    /// Run one clock cycle with reset deasserted, producing a new word if `enable` is set.
    pub fn step(&mut self, enable: bool) {
        if !enable {
            return;
        }
        let extended = self.transition.apply(self.register as u128);
        let (register, output) = self.framing.split(self.geometry, extended);
        trace!("PRBS generate {:#x}", output);
        self.register = register;
        self.output = output;
    }

    /// Run one clock edge with a synchronous reset input. Reset overrides `enable`.
    pub fn clock(&mut self, rst: bool, enable: bool) {
        if rst {
            self.reset();
        } else {
            self.step(enable);
        }
    }

    /// The word produced by the last enabled step, inverted if configured.
    #[inline]
    pub fn data_out(&self) -> u64 {
        self.output ^ self.invert_mask
    }

    #[inline]
    pub fn register(&self) -> u64 {
        self.register
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

/// Yields successive words, stepping the generator once per item.
impl Iterator for Generator {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        self.step(true);
        Some(self.data_out())
    }
}
