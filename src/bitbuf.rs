//! Growable bit buffer with MSB-first packing.
//!
//! Bit `i` lives in byte `i / 8` at bit position `7 - (i % 8)`. The
//! backing vector always holds exactly `ceil(len / 8)` bytes and every bit
//! past `len` in the last byte is zero, so two buffers holding the same bit
//! sequence compare equal.

use std::fmt;

use crate::{try_reserve, HuffError, HuffResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitBuffer {
    data: Vec<u8>,
    bits: usize,
}

impl BitBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with room for `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        BitBuffer {
            data: Vec::with_capacity(bits.div_ceil(8)),
            bits: 0,
        }
    }

    /// Create a buffer of `len` zero bits.
    pub fn zeros(len: usize) -> Self {
        BitBuffer {
            data: vec![0u8; len.div_ceil(8)],
            bits: len,
        }
    }

    /// Wrap packed bytes holding `bits` valid bits.
    ///
    /// Bytes past `ceil(bits / 8)` are dropped and padding bits in the last
    /// byte are cleared. Fails with [`HuffError::HeaderTruncated`] when
    /// `bytes` is too short to hold `bits` bits.
    pub fn from_bytes(mut bytes: Vec<u8>, bits: usize) -> HuffResult<Self> {
        let needed = bits.div_ceil(8);
        if bytes.len() < needed {
            return Err(HuffError::HeaderTruncated {
                expected: needed,
                actual: bytes.len(),
            });
        }
        bytes.truncate(needed);
        let tail = bits % 8;
        if tail != 0 {
            if let Some(last) = bytes.last_mut() {
                *last &= 0xFF << (8 - tail);
            }
        }
        Ok(BitBuffer { data: bytes, bits })
    }

    /// Wrap whole bytes; the bit length is `8 * bytes.len()`.
    pub fn from_byte_vec(bytes: Vec<u8>) -> Self {
        let bits = bytes.len() * 8;
        BitBuffer { data: bytes, bits }
    }

    /// Number of bits held.
    pub fn len(&self) -> usize {
        self.bits
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Number of bytes used: `(len - 1) / 8 + 1`, or 0 when empty.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// The packed bytes, padding bits zeroed.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Reserve room for `additional` more bits.
    pub fn reserve_bits(&mut self, additional: usize) -> HuffResult<()> {
        let needed = (self.bits + additional).div_ceil(8);
        let have = self.data.len();
        try_reserve(&mut self.data, needed.saturating_sub(have))
    }

    /// Append one bit, growing the backing storage when needed.
    pub fn push(&mut self, bit: bool) {
        let offset = self.bits % 8;
        if offset == 0 {
            self.data.push(0);
        }
        if bit {
            let last = self.data.len() - 1;
            self.data[last] |= 1 << (7 - offset);
        }
        self.bits += 1;
    }

    /// Remove and return the last bit.
    pub fn pop(&mut self) -> Option<bool> {
        if self.bits == 0 {
            return None;
        }
        let pos = self.bits - 1;
        let bit = self.bit_at(pos);
        self.set(pos, false);
        self.bits = pos;
        self.data.truncate(pos.div_ceil(8));
        Some(bit)
    }

    /// Bit at zero-based index `pos`, or `None` past the end.
    pub fn get(&self, pos: usize) -> Option<bool> {
        (pos < self.bits).then(|| self.bit_at(pos))
    }

    /// Append every bit of `other`.
    pub fn extend_from(&mut self, other: &BitBuffer) {
        if self.bits % 8 == 0 {
            // Byte-aligned: other's padding bits are already zero.
            self.data.extend_from_slice(&other.data);
            self.bits += other.bits;
            return;
        }
        for bit in other.iter() {
            self.push(bit);
        }
    }

    /// Append `n` zero bits.
    pub fn extend_zeros(&mut self, n: usize) {
        self.bits += n;
        self.data.resize(self.bits.div_ceil(8), 0);
    }

    /// Add one to the buffer read as a big-endian unsigned integer of
    /// `len` bits.
    ///
    /// Returns `false` when the addition carries out of the top bit, in
    /// which case every bit has wrapped to zero.
    pub fn increment(&mut self) -> bool {
        for pos in (0..self.bits).rev() {
            if self.bit_at(pos) {
                self.set(pos, false);
            } else {
                self.set(pos, true);
                return true;
            }
        }
        false
    }

    /// Whether `self` is a prefix of `other` (or equal to it).
    pub fn is_prefix_of(&self, other: &BitBuffer) -> bool {
        self.bits <= other.bits && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }

    /// Whether the bits starting at `start` in `stream` equal `self`.
    pub fn matches_at(&self, stream: &BitBuffer, start: usize) -> bool {
        if start + self.bits > stream.bits {
            return false;
        }
        (0..self.bits).all(|i| self.bit_at(i) == stream.bit_at(start + i))
    }

    /// Iterate over the bits in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.bits).map(move |pos| self.bit_at(pos))
    }

    /// Render the bits as a string of `'0'` and `'1'`.
    pub fn to_binary_string(&self) -> String {
        self.iter().map(|bit| if bit { '1' } else { '0' }).collect()
    }

    fn bit_at(&self, pos: usize) -> bool {
        (self.data[pos / 8] >> (7 - (pos % 8))) & 1 == 1
    }

    fn set(&mut self, pos: usize, bit: bool) {
        let mask = 1 << (7 - (pos % 8));
        if bit {
            self.data[pos / 8] |= mask;
        } else {
            self.data[pos / 8] &= !mask;
        }
    }
}

impl fmt::Display for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_binary_string())
    }
}

impl FromIterator<bool> for BitBuffer {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut buf = BitBuffer::new();
        for bit in iter {
            buf.push(bit);
        }
        buf
    }
}
