//! Frequency analysis for byte streams.
//!
//! Counts the occurrence of each byte value (0-255) in an input buffer
//! and computes Shannon entropy.

/// A frequency table that tracks byte occurrence counts.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    /// Count of each byte value (index = byte value, value = count).
    pub byte: [u64; 256],
    /// Sum of all counts.
    pub total: u64,
    /// Number of distinct byte values with nonzero count.
    pub used: u32,
}

impl FrequencyTable {
    /// Create a new, zeroed frequency table.
    pub fn new() -> Self {
        Self {
            byte: [0u64; 256],
            total: 0,
            used: 0,
        }
    }

    /// Count byte frequencies in the input buffer.
    ///
    /// Adds to any counts already present and refreshes `total` and `used`.
    pub fn count(&mut self, input: &[u8]) {
        for &b in input {
            self.byte[b as usize] += 1;
        }

        let mut total = 0u64;
        let mut used = 0u32;
        for &c in &self.byte {
            total += c;
            used += (c > 0) as u32;
        }
        self.total = total;
        self.used = used;
    }

    /// Compute the Shannon entropy of the distribution (in bits per symbol).
    ///
    /// Returns 0.0 if the table is empty.
    pub fn entropy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let total = self.total as f64;
        self.byte
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| {
                let prob = c as f64 / total;
                -prob * prob.log2()
            })
            .sum()
    }

    /// Get the count for a specific byte value.
    pub fn get(&self, byte: u8) -> u64 {
        self.byte[byte as usize]
    }

    /// Iterate over `(byte, count)` for every byte with a nonzero count,
    /// in ascending byte order.
    pub fn symbols(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        (0..=255u8)
            .map(move |b| (b, self.byte[b as usize]))
            .filter(|&(_, c)| c > 0)
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function: compute a frequency table from input.
pub fn get_frequency(input: &[u8]) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    table.count(input);
    table
}
