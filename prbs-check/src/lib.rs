//! PRBS checking and generation, several bits per clock.
//!
//! [`Checker`][checker::Checker] is a synchronous state machine: call
//! [`step`][checker::Checker::step] once per clock with the received word, and read the
//! error mask for that word from [`error_out`][checker::Checker::error_out] afterwards.
//! [`Generator`][generator::Generator] produces the stream a checker with the same
//! [`PrbsConfig`][config::PrbsConfig] expects. The shift-register model both are built
//! on lives in the `prbs-lfsr` crate.

pub mod checker;
pub mod config;
pub mod framing;
pub mod generator;

pub use checker::{Checker, CheckerState};
pub use config::{ConfigError, Geometry, Options, PrbsConfig};
pub use generator::Generator;
pub use prbs_lfsr::{Prbs, Topology};
