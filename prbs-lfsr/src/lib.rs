//! Linear-feedback shift register transitions for PRBS generators and checkers.
//!
//! The [`lfsr`] module supplies [`Lfsr`][lfsr::Lfsr], a bit-serial reference model of
//! Fibonacci and Galois shift registers, behind the [`Transition`][lfsr::Transition]
//! trait. The [`matrix`] module turns any linear transition into a
//! [`TransitionMatrix`][matrix::TransitionMatrix] that evaluates all bits at once. The
//! [`presets`] module lists the standard PRBS polynomials.

pub mod bits;
pub mod lfsr;
pub mod matrix;
pub mod presets;

pub use lfsr::{Lfsr, LfsrError, Shifted, Topology, Transition};
pub use matrix::TransitionMatrix;
pub use presets::Prbs;
