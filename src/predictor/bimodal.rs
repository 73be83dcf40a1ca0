//! The bimodal predictor: one saturating counter per table index, with
//! no additional history context.

use crate::predictor::counter::{SaturatingCounter, MAX_COUNTER_BITS};
use crate::predictor::table::BranchHistoryTable;
use crate::predictor::{ConfigError, DirectionPredictor};
use crate::Outcome;

/// A predictor whose only state is a [`BranchHistoryTable`].
///
/// Each table slot walks the line `[0, 2^counter_bits - 1]`: the low
/// half (midpoint included) predicts not-taken, the high half predicts
/// taken.
pub struct BimodalPredictor {
    bht: BranchHistoryTable,
    counter_bits: u32,
    addr_bits: u32,

    /// Highest counter value still predicting not-taken,
    /// `2^(counter_bits - 1) - 1`. Also the initial value of every
    /// table slot ("weakly not-taken").
    half: u8,
}

impl BimodalPredictor {
    pub fn new(counter_bits: u32, addr_bits: u32) -> Result<Self, ConfigError> {
        if counter_bits == 0 || counter_bits > MAX_COUNTER_BITS {
            return Err(ConfigError::CounterBits(counter_bits));
        }
        let half = ((1u16 << (counter_bits - 1)) - 1) as u8;
        let proto = SaturatingCounter::new(counter_bits, half)?;
        let bht = BranchHistoryTable::new(addr_bits, proto)?;
        Ok(Self {
            bht,
            counter_bits,
            addr_bits,
            half,
        })
    }

    pub fn counter_bits(&self) -> u32 {
        self.counter_bits
    }

    pub fn addr_bits(&self) -> u32 {
        self.addr_bits
    }

    /// Number of entries in the history table.
    pub fn table_size(&self) -> usize {
        self.bht.len()
    }
}

impl DirectionPredictor for BimodalPredictor {
    fn name(&self) -> &'static str {
        "BimodalPredictor"
    }

    fn predict(&self, addr: usize) -> Outcome {
        Outcome::from_bool(self.bht.entry(addr).value() > self.half)
    }

    /// Reinforce the counter toward the direction it currently predicts
    /// when that prediction was correct, and push it the opposite way
    /// otherwise.
    ///
    /// The predicted direction is re-derived from the current table
    /// state; `predict` is pure, so as long as no table mutation
    /// intervenes between the prediction and this call, the re-derived
    /// direction equals the one that was predicted.
    fn update(&mut self, addr: usize, correct: bool) {
        let taken: bool = self.predict(addr).into();
        let entry = self.bht.entry_mut(addr);
        if (correct && taken) || (!correct && !taken) {
            entry.count_up();
        } else {
            entry.count_down();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn starts_weakly_not_taken() {
        let bp = BimodalPredictor::new(2, 4).unwrap();
        for addr in 0..bp.table_size() {
            assert_eq!(bp.predict(addr), Outcome::N);
        }
    }

    #[test]
    fn rejects_zero_width_counters() {
        assert!(matches!(
            BimodalPredictor::new(0, 4),
            Err(ConfigError::CounterBits(0))
        ));
    }

    #[test]
    fn one_bit_counters_flip_immediately() {
        // With 1-bit counters the midpoint is 0, so a single correct
        // taken-side update moves the slot to predicting taken.
        let mut bp = BimodalPredictor::new(1, 2).unwrap();
        assert_eq!(bp.predict(0), Outcome::N);
        // Prediction "not taken" was wrong: push toward taken.
        bp.update(0, false);
        assert_eq!(bp.predict(0), Outcome::T);
    }

    #[test]
    fn reinforcement_follows_predicted_direction() {
        let mut bp = BimodalPredictor::new(2, 1).unwrap();
        // Slot starts at 1 (weakly not-taken).
        assert_eq!(bp.predict(1), Outcome::N);
        // Correct not-taken prediction strengthens not-taken.
        bp.update(1, true);
        assert_eq!(bp.predict(1), Outcome::N);
        // Two wrong not-taken predictions walk the slot up past the
        // midpoint.
        bp.update(1, false);
        bp.update(1, false);
        assert_eq!(bp.predict(1), Outcome::T);
    }

    #[test]
    fn distant_addresses_share_slots_modulo_table_size() {
        let mut bp = BimodalPredictor::new(2, 3).unwrap();
        // One wrong not-taken prediction walks slot 1 past the midpoint.
        bp.update(1, false);
        // addr 9 aliases addr 1 in an 8-entry table.
        assert_eq!(bp.predict(9), Outcome::T);
        assert_eq!(bp.predict(2), Outcome::N);
    }

    #[test]
    fn degenerate_single_slot_predictor() {
        let mut bp = BimodalPredictor::new(3, 0).unwrap();
        assert_eq!(bp.table_size(), 1);
        bp.update(12345, false);
        // Every address observes the same slot.
        assert_eq!(bp.predict(0), bp.predict(usize::MAX));
    }
}
