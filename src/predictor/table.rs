//! The branch history table: a table of saturating counters indexed by
//! the program counter.

use crate::predictor::counter::SaturatingCounter;
use crate::predictor::ConfigError;

/// Widest supported table index (bounds the allocation at 2^24 entries).
pub const MAX_ADDR_BITS: u32 = 24;

/// A power-of-two array of [`SaturatingCounter`], the entire mutable
/// state of a bimodal predictor. The table never resizes after
/// construction.
pub struct BranchHistoryTable {
    entries: Vec<SaturatingCounter>,
}

impl BranchHistoryTable {
    /// Build a table of `2^addr_bits` copies of `proto`.
    ///
    /// `addr_bits == 0` is a valid degenerate case: a single shared
    /// counter for every address.
    pub fn new(addr_bits: u32, proto: SaturatingCounter) -> Result<Self, ConfigError> {
        if addr_bits > MAX_ADDR_BITS {
            return Err(ConfigError::AddrBits(addr_bits));
        }
        Ok(Self {
            entries: vec![proto; 1usize << addr_bits],
        })
    }

    /// Returns the number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns a bitmask corresponding to the number of entries.
    pub fn index_mask(&self) -> usize {
        debug_assert!(self.entries.len().is_power_of_two());
        self.entries.len() - 1
    }

    /// Map an address to its table index (`addr mod len`).
    pub fn index(&self, addr: usize) -> usize {
        addr & self.index_mask()
    }

    /// Returns a reference to the entry for `addr`.
    pub fn entry(&self, addr: usize) -> &SaturatingCounter {
        &self.entries[self.index(addr)]
    }

    /// Returns a mutable reference to the entry for `addr`.
    pub fn entry_mut(&mut self, addr: usize) -> &mut SaturatingCounter {
        let index = self.index(addr);
        &mut self.entries[index]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn proto() -> SaturatingCounter {
        SaturatingCounter::new(2, 1).unwrap()
    }

    #[test]
    fn size_is_power_of_two() {
        for addr_bits in [0, 1, 3, 6, 9] {
            let table = BranchHistoryTable::new(addr_bits, proto()).unwrap();
            assert_eq!(table.len(), 1 << addr_bits);
        }
    }

    #[test]
    fn rejects_oversized_index() {
        assert_eq!(
            BranchHistoryTable::new(25, proto()).err(),
            Some(ConfigError::AddrBits(25))
        );
    }

    #[test]
    fn index_wraps_any_address() {
        let table = BranchHistoryTable::new(3, proto()).unwrap();
        for addr in [0usize, 7, 8, 1 << 20, usize::MAX] {
            assert!(table.index(addr) < table.len());
            assert_eq!(table.index(addr), addr % table.len());
        }
    }

    #[test]
    fn single_entry_table_maps_everything_to_zero() {
        let table = BranchHistoryTable::new(0, proto()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.index(usize::MAX), 0);
    }

    #[test]
    fn entries_start_from_prototype() {
        let mut table = BranchHistoryTable::new(2, proto()).unwrap();
        assert!((0..4).all(|i| table.entry(i).value() == 1));
        table.entry_mut(2).count_up();
        assert_eq!(table.entry(2).value(), 2);
        assert_eq!(table.entry(1).value(), 1);
    }
}
