//! Bit-order conventions for packing a register and a data word into one extended value.
//!
//! The recurrence itself always runs in canonical order, with the oldest bit in the most
//! significant position. A framing decides where the register and the word sit in the
//! extended value, and how that value maps onto canonical order. The choice is made once
//! per instance with [`select`].

use std::fmt;

use prbs_lfsr::bits::{self, ApplyBitField, BitField};

use crate::config::{Geometry, Options};

/// Layout of the extended register.
pub trait Framing: fmt::Debug + Send + Sync {
    /// Where the register sits in the extended value.
    fn register_field(&self, geometry: Geometry) -> BitField;

    /// Where the data word sits in the extended value.
    fn word_field(&self, geometry: Geometry) -> BitField;

    /// Convert a `width` bit value between this framing's order and canonical order.
    /// Applying it twice gives back the original value.
    fn canonical(&self, value: u128, width: u32) -> u128;

    /// Concatenate a register value and a data word into an extended value.
    fn compose(&self, geometry: Geometry, register: u64, word: u64) -> u128 {
        0u128
            .with_bits(self.register_field(geometry), register as u128)
            .with_bits(self.word_field(geometry), word as u128)
    }

    /// Split an extended value into its register value and data word.
    fn split(&self, geometry: Geometry, extended: u128) -> (u64, u64) {
        (
            self.register_field(geometry).extract(extended) as u64,
            self.word_field(geometry).extract(extended) as u64,
        )
    }
}

/// Register in the high bits, word in the low bits, no reordering.
#[derive(Debug, Copy, Clone)]
pub struct Forward;

impl Framing for Forward {
    fn register_field(&self, geometry: Geometry) -> BitField {
        BitField::low(geometry.data_width()).above(geometry.register_width())
    }

    fn word_field(&self, geometry: Geometry) -> BitField {
        BitField::low(geometry.data_width())
    }

    #[inline]
    fn canonical(&self, value: u128, _width: u32) -> u128 {
        value
    }
}

/// Word in the high bits, register in the low bits, every value bit-reversed.
#[derive(Debug, Copy, Clone)]
pub struct Reversed;

impl Framing for Reversed {
    fn register_field(&self, geometry: Geometry) -> BitField {
        BitField::low(geometry.register_width())
    }

    fn word_field(&self, geometry: Geometry) -> BitField {
        BitField::low(geometry.register_width()).above(geometry.data_width())
    }

    #[inline]
    fn canonical(&self, value: u128, width: u32) -> u128 {
        bits::reverse(value, width)
    }
}

/// The framing selected by [`Options::REVERSE`].
pub fn select(options: Options) -> &'static dyn Framing {
    if options.contains(Options::REVERSE) {
        &Reversed
    } else {
        &Forward
    }
}
