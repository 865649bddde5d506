//! Canonical code assignment and the compact header format.
//!
//! Canonical codes are fully determined by the list of (symbol, code
//! length) pairs, so only lengths and symbols are transmitted:
//!
//! ```text
//! [max_bits][count_1 .. count_max_bits][symbol_0 .. symbol_{N-1}]
//! ```
//!
//! `count_k` is the number of symbols with a `k`-bit code and the symbols
//! are listed by ascending code length, then ascending byte value. Every
//! field is one byte. The only bucket that can hold 256 symbols is the
//! 8-bit bucket of a complete uniform code; that count is written as `0`,
//! which cannot otherwise appear in the `max_bits` slot.

use crate::alphabet::{Alphabet, SymbolEntry};
use crate::bitbuf::BitBuffer;
use crate::{try_reserve, HuffError, HuffResult};

/// Hands out canonical codes for a sequence of non-decreasing lengths.
///
/// The running code is kept as a bit buffer so any code length works.
#[derive(Debug, Default)]
struct CanonicalCounter {
    code: Option<BitBuffer>,
}

impl CanonicalCounter {
    /// The next code of `len` bits, or `None` when the lengths seen so far
    /// overflow the code space or `len` is shorter than the previous one.
    fn next(&mut self, len: usize) -> Option<BitBuffer> {
        match self.code.as_mut() {
            None => self.code = Some(BitBuffer::zeros(len)),
            Some(code) => {
                if len < code.len() || !code.increment() {
                    return None;
                }
                code.extend_zeros(len - code.len());
            }
        }
        self.code.clone()
    }
}

/// Replace every code in `alphabet` by its canonical equivalent.
///
/// Leaves the alphabet sorted by code length, ties by byte value. Only the
/// code lengths are read; fails with [`HuffError::TreeConstructionFailed`]
/// when an entry has no code or the lengths cannot form a prefix code.
pub fn canonicalize(alphabet: &mut Alphabet) -> HuffResult<()> {
    alphabet.sort_by_code_length();
    let mut counter = CanonicalCounter::default();
    for entry in alphabet.entries_mut() {
        let len = entry.code.len();
        if len == 0 {
            return Err(HuffError::TreeConstructionFailed);
        }
        entry.code = counter.next(len).ok_or(HuffError::TreeConstructionFailed)?;
        log::trace!("canonical {:#04x} -> {}", entry.symbol, entry.code);
    }
    Ok(())
}

/// Serialize a canonicalized alphabet into the header layout.
///
/// Fails with [`HuffError::EmptyAlphabet`] when there is nothing to
/// describe.
pub fn serialize_header(alphabet: &Alphabet) -> HuffResult<BitBuffer> {
    let last = alphabet.entries().last().ok_or(HuffError::EmptyAlphabet)?;
    let max_bits = u8::try_from(last.code.len()).map_err(|_| HuffError::TreeConstructionFailed)?;
    let max_bits_usize = max_bits as usize;

    let mut bytes: Vec<u8> = Vec::new();
    try_reserve(&mut bytes, 1 + max_bits_usize + alphabet.len())?;
    bytes.push(max_bits);
    bytes.resize(1 + max_bits_usize, 0);

    for entry in alphabet {
        let len = entry.code.len();
        if len == 0 || len > max_bits_usize {
            return Err(HuffError::TreeConstructionFailed);
        }
        bytes[len] = bytes[len].wrapping_add(1);
    }
    bytes.extend(alphabet.iter().map(|e| e.symbol));

    Ok(BitBuffer::from_byte_vec(bytes))
}

/// Rebuild a canonical alphabet from a header into an empty `target`.
///
/// Frequencies of the rebuilt entries are zero. An empty header yields an
/// empty alphabet.
pub fn deserialize_alphabet(header: &BitBuffer, target: &mut Alphabet) -> HuffResult<()> {
    if !target.is_empty() {
        return Err(HuffError::AlphabetAlreadyPopulated);
    }
    if header.is_empty() {
        return Ok(());
    }
    if header.len() % 8 != 0 {
        return Err(HuffError::CorruptHeader);
    }

    let bytes = header.as_bytes();
    let max_bits = bytes[0] as usize;
    if max_bits == 0 {
        return Err(HuffError::CorruptHeader);
    }
    let symbols_start = 1 + max_bits;
    if bytes.len() < symbols_start {
        return Err(HuffError::HeaderTruncated {
            expected: symbols_start,
            actual: bytes.len(),
        });
    }

    let counts: Vec<usize> = (1..=max_bits)
        .map(|len| match bytes[len] {
            0 if len == max_bits => 256,
            n => n as usize,
        })
        .collect();
    let n: usize = counts.iter().sum();
    if n > 256 {
        return Err(HuffError::CorruptHeader);
    }
    let expected = symbols_start + n;
    if bytes.len() < expected {
        return Err(HuffError::HeaderTruncated {
            expected,
            actual: bytes.len(),
        });
    }
    if bytes.len() > expected {
        return Err(HuffError::CorruptHeader);
    }

    let mut alphabet = Alphabet::new();
    alphabet.reserve(n)?;
    let mut seen = [false; 256];
    let mut symbols = bytes[symbols_start..].iter().copied();
    let mut counter = CanonicalCounter::default();

    for (len, &count) in (1..=max_bits).zip(&counts) {
        for _ in 0..count {
            let symbol = symbols.next().ok_or(HuffError::CorruptHeader)?;
            if std::mem::replace(&mut seen[symbol as usize], true) {
                return Err(HuffError::CorruptHeader);
            }
            let code = counter.next(len).ok_or(HuffError::CorruptHeader)?;
            alphabet.push(SymbolEntry {
                symbol,
                frequency: 0,
                code,
            });
        }
    }

    log::trace!("header: max_bits={} symbols={}", max_bits, n);
    *target = alphabet;
    Ok(())
}
