//! Implementation of a saturating counter.

use crate::predictor::ConfigError;

/// Widest supported counter (storage is a single byte).
pub const MAX_COUNTER_BITS: u32 = 8;

/// An N-bit saturating counter used to follow the behavior of a branch.
///
/// The counter moves on the line `[0, 2^bits - 1]` one step at a time
/// and clamps silently at both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaturatingCounter {
    value: u8,
    max: u8,
}

impl SaturatingCounter {
    /// Build a counter with `max = 2^bits - 1` holding `init`.
    ///
    /// Callers are responsible for picking a sensible initial value; one
    /// outside `[0, max]` is rejected rather than clamped.
    pub fn new(bits: u32, init: u8) -> Result<Self, ConfigError> {
        if bits == 0 || bits > MAX_COUNTER_BITS {
            return Err(ConfigError::CounterBits(bits));
        }
        let max = ((1u16 << bits) - 1) as u8;
        if init > max {
            return Err(ConfigError::InitialValue { value: init, max });
        }
        Ok(Self { value: init, max })
    }

    /// Move one step toward the ceiling; a no-op at `max`.
    pub fn count_up(&mut self) {
        if self.value < self.max {
            self.value += 1;
        }
    }

    /// Move one step toward the floor; a no-op at zero.
    pub fn count_down(&mut self) {
        if let Some(next) = self.value.checked_sub(1) {
            self.value = next;
        }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn max(&self) -> u8 {
        self.max
    }
}
