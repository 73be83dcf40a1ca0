//! Implementations of branch predictors in the bimodal family.

pub mod bimodal;
pub mod counter;
pub mod table;

pub use bimodal::*;
pub use counter::*;
pub use table::*;

use crate::Outcome;
use thiserror::Error;

/// Errors raised when a predictor is built from an invalid configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("counter width must be within [1, {MAX_COUNTER_BITS}] bits, got {0}")]
    CounterBits(u32),

    #[error("table address width must be within [0, {MAX_ADDR_BITS}] bits, got {0}")]
    AddrBits(u32),

    #[error("initial counter value {value} exceeds counter maximum {max}")]
    InitialValue { value: u8, max: u8 },
}

/// Interface to a predictor addressed by program counter.
///
/// `predict` is a pure read of the predictor state; `update` feeds back
/// whether the prediction just made for `addr` turned out to be correct.
pub trait DirectionPredictor {
    fn name(&self) -> &'static str;

    /// Return the predicted outcome for a branch at `addr`.
    fn predict(&self, addr: usize) -> Outcome;

    /// Update the internal state of the predictor, given that the last
    /// prediction for `addr` was correct or not.
    fn update(&mut self, addr: usize, correct: bool);
}
