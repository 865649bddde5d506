//! Symbol alphabet: one entry per distinct byte, with its frequency and code.
//!
//! Two orders are used during encoding. Tree construction seeds its queue
//! from the alphabet sorted by ascending frequency; canonicalization needs
//! it sorted by ascending code length. Both break ties by ascending byte
//! value so the output is reproducible.

use crate::bitbuf::BitBuffer;
use crate::frequency::FrequencyTable;
use crate::{try_reserve, HuffError, HuffResult};

/// A byte value together with its frequency and assigned code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub symbol: u8,
    /// Occurrence count. Zero for alphabets rebuilt from a header, since
    /// frequencies are not transmitted.
    pub frequency: u64,
    pub code: BitBuffer,
}

impl SymbolEntry {
    pub fn new(symbol: u8, frequency: u64) -> Self {
        SymbolEntry {
            symbol,
            frequency,
            code: BitBuffer::new(),
        }
    }
}

/// An ordered set of [`SymbolEntry`], each byte value appearing at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alphabet {
    entries: Vec<SymbolEntry>,
}

impl Alphabet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an alphabet from the bytes of `input`, sorted by frequency.
    pub fn from_bytes(input: &[u8]) -> HuffResult<Self> {
        let mut alphabet = Alphabet::new();
        alphabet.populate(input)?;
        Ok(alphabet)
    }

    /// Fill an empty alphabet with the distinct bytes of `input`.
    ///
    /// Fails with [`HuffError::AlphabetAlreadyPopulated`] when the alphabet
    /// already holds entries. Empty input leaves it empty.
    pub fn populate(&mut self, input: &[u8]) -> HuffResult<()> {
        let mut freq = FrequencyTable::new();
        freq.count(input);
        self.populate_from_frequencies(&freq)
    }

    /// Fill an empty alphabet from a pre-computed frequency table.
    pub fn populate_from_frequencies(&mut self, freq: &FrequencyTable) -> HuffResult<()> {
        if !self.entries.is_empty() {
            return Err(HuffError::AlphabetAlreadyPopulated);
        }
        try_reserve(&mut self.entries, freq.used as usize)?;
        self.entries.extend(
            freq.symbols()
                .map(|(symbol, count)| SymbolEntry::new(symbol, count)),
        );
        self.sort_by_frequency();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SymbolEntry> {
        self.entries.iter()
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [SymbolEntry] {
        &mut self.entries
    }

    pub(crate) fn reserve(&mut self, additional: usize) -> HuffResult<()> {
        try_reserve(&mut self.entries, additional)
    }

    pub(crate) fn push(&mut self, entry: SymbolEntry) {
        self.entries.push(entry);
    }

    /// Find the entry for `symbol`.
    pub fn get(&self, symbol: u8) -> Option<&SymbolEntry> {
        self.entries.iter().find(|e| e.symbol == symbol)
    }

    /// Sort ascending by frequency, ties by ascending byte value.
    pub fn sort_by_frequency(&mut self) {
        self.entries.sort_by_key(|e| (e.frequency, e.symbol));
    }

    /// Sort ascending by code length, ties by ascending byte value.
    pub fn sort_by_code_length(&mut self) {
        self.entries.sort_by_key(|e| (e.code.len(), e.symbol));
    }

    /// Length of the longest code, or 0 when empty.
    pub fn max_code_len(&self) -> usize {
        self.entries.iter().map(|e| e.code.len()).max().unwrap_or(0)
    }

    /// Direct byte-value lookup: slot `b` holds the code of byte `b`.
    pub fn code_table(&self) -> [Option<&BitBuffer>; 256] {
        let mut table = [None; 256];
        for entry in &self.entries {
            table[entry.symbol as usize] = Some(&entry.code);
        }
        table
    }
}

impl<'a> IntoIterator for &'a Alphabet {
    type Item = &'a SymbolEntry;
    type IntoIter = std::slice::Iter<'a, SymbolEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
