//! Byte histogram over the 257-symbol alphabet.

use crate::bitio::BitSource;
use crate::{ALPH_SIZE, BITS_PER_WORD, EOF_SYMBOL};
use std::io;

/// Occurrence counts per symbol. `EOF_SYMBOL` always counts exactly 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: Vec<u64>,
}

impl FrequencyTable {
    fn empty() -> Self {
        let mut counts = vec![0u64; ALPH_SIZE + 1];
        counts[EOF_SYMBOL as usize] = 1;
        Self { counts }
    }

    /// Counts 8-bit words until the source runs dry. The caller rewinds
    /// the source before reusing it.
    pub fn count<S: BitSource>(source: &mut S) -> io::Result<Self> {
        let mut table = Self::empty();
        while let Some(word) = source.read_bits(BITS_PER_WORD)? {
            table.counts[word as usize] += 1;
        }
        Ok(table)
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::empty();
        for &b in data {
            table.counts[b as usize] += 1;
        }
        table
    }

    pub fn get(&self, symbol: u16) -> u64 {
        self.counts.get(symbol as usize).copied().unwrap_or(0)
    }

    /// Symbols with a non-zero count, in ascending symbol order.
    pub fn active_symbols(&self) -> impl Iterator<Item = (u16, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u16, count))
    }

    /// Number of real bytes counted.
    pub fn total(&self) -> u64 {
        self.counts[..ALPH_SIZE].iter().sum()
    }
}
