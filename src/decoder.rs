//! Lookup structures that turn a payload bitstream back into bytes.
//!
//! Three strategies are available:
//!
//! | Decoder         | Lookup                                   | Cost per bit |
//! |-----------------|------------------------------------------|--------------|
//! | `ArrayDecoder`  | complete binary array, `2^(max+1) - 1`   | O(1)         |
//! | `TreeDecoder`   | arena trie built from the codes          | O(1)         |
//! | `LinearDecoder` | prefix match against every code in turn  | O(symbols)   |
//!
//! The array is the fastest but its size grows with the longest code, so
//! long codes fall back to the trie. Every decoder reports a payload that
//! cannot be resolved, or that stops in the middle of a code, as
//! [`HuffError::CorruptHeader`].

use crate::alphabet::Alphabet;
use crate::bitbuf::BitBuffer;
use crate::{try_reserve, HuffError, HuffResult};

/// A decoder built from a canonical alphabet.
pub trait SymbolDecoder {
    /// Decode every symbol in `payload`, appending to `output`.
    fn decode_into(&self, payload: &BitBuffer, output: &mut Vec<u8>) -> HuffResult<()>;

    /// Decode `payload` into a fresh vector.
    fn decode(&self, payload: &BitBuffer) -> HuffResult<Vec<u8>> {
        let mut output = Vec::new();
        try_reserve(&mut output, payload.byte_len())?;
        self.decode_into(payload, &mut output)?;
        Ok(output)
    }
}

/// Append one byte, doubling capacity when full.
fn push_symbol(output: &mut Vec<u8>, symbol: u8) -> HuffResult<()> {
    if output.len() == output.capacity() {
        try_reserve(output, output.capacity().max(16))?;
    }
    output.push(symbol);
    Ok(())
}

/// Longest code the array decoder accepts. Deeper alphabets need
/// [`TreeDecoder`].
pub const ARRAY_MAX_BITS: usize = 24;

/// Complete binary array indexed by code path.
///
/// The root is slot 0 and the children of slot `p` are `2p + 1` (bit 0) and
/// `2p + 2` (bit 1). A symbol sits in the slot its code leads to.
#[derive(Debug, Clone)]
pub struct ArrayDecoder {
    slots: Vec<Option<u8>>,
}

impl ArrayDecoder {
    /// Build the array for `alphabet`.
    ///
    /// Fails with [`HuffError::CorruptHeader`] when codes are not
    /// prefix-free, and [`HuffError::AllocationFailure`] when the longest
    /// code exceeds [`ARRAY_MAX_BITS`] or the array cannot be allocated.
    pub fn new(alphabet: &Alphabet) -> HuffResult<Self> {
        let max_bits = alphabet.max_code_len();
        if max_bits > ARRAY_MAX_BITS {
            return Err(HuffError::AllocationFailure);
        }
        let size = (1usize << (max_bits + 1)) - 1;
        let mut slots = Vec::new();
        try_reserve(&mut slots, size)?;
        slots.resize(size, None);

        for entry in alphabet {
            let mut pos = 0usize;
            for bit in entry.code.iter() {
                if slots[pos].is_some() {
                    return Err(HuffError::CorruptHeader);
                }
                pos = 2 * pos + 1 + bit as usize;
            }
            if pos == 0 || slots[pos].is_some() {
                return Err(HuffError::CorruptHeader);
            }
            slots[pos] = Some(entry.symbol);
        }

        Ok(ArrayDecoder { slots })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl SymbolDecoder for ArrayDecoder {
    fn decode_into(&self, payload: &BitBuffer, output: &mut Vec<u8>) -> HuffResult<()> {
        let mut pos = 0usize;
        for bit in payload.iter() {
            pos = 2 * pos + 1 + bit as usize;
            match self.slots.get(pos) {
                None => return Err(HuffError::CorruptHeader),
                Some(Some(symbol)) => {
                    push_symbol(output, *symbol)?;
                    pos = 0;
                }
                Some(None) => {}
            }
        }
        if pos != 0 {
            return Err(HuffError::CorruptHeader);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct TrieNode {
    children: [Option<u32>; 2],
    symbol: Option<u8>,
}

/// Binary trie over the codes, nodes stored in a flat arena.
#[derive(Debug, Clone)]
pub struct TreeDecoder {
    nodes: Vec<TrieNode>,
}

impl TreeDecoder {
    /// Build the trie for `alphabet`.
    ///
    /// Fails with [`HuffError::CorruptHeader`] when codes are not
    /// prefix-free.
    pub fn new(alphabet: &Alphabet) -> HuffResult<Self> {
        let total_bits: usize = alphabet.iter().map(|e| e.code.len()).sum();
        let mut nodes = Vec::new();
        try_reserve(&mut nodes, total_bits + 1)?;
        nodes.push(TrieNode::default());

        for entry in alphabet {
            if entry.code.is_empty() {
                return Err(HuffError::CorruptHeader);
            }
            let mut idx = 0usize;
            for bit in entry.code.iter() {
                if nodes[idx].symbol.is_some() {
                    return Err(HuffError::CorruptHeader);
                }
                idx = match nodes[idx].children[bit as usize] {
                    Some(child) => child as usize,
                    None => {
                        let child = nodes.len();
                        nodes.push(TrieNode::default());
                        nodes[idx].children[bit as usize] = Some(child as u32);
                        child
                    }
                };
            }
            let node = &mut nodes[idx];
            if node.symbol.is_some() || node.children.iter().any(Option::is_some) {
                return Err(HuffError::CorruptHeader);
            }
            node.symbol = Some(entry.symbol);
        }

        Ok(TreeDecoder { nodes })
    }

    /// Number of trie nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl SymbolDecoder for TreeDecoder {
    fn decode_into(&self, payload: &BitBuffer, output: &mut Vec<u8>) -> HuffResult<()> {
        let mut idx = 0usize;
        for bit in payload.iter() {
            let child = self.nodes[idx].children[bit as usize].ok_or(HuffError::CorruptHeader)?;
            idx = child as usize;
            if let Some(symbol) = self.nodes[idx].symbol {
                push_symbol(output, symbol)?;
                idx = 0;
            }
        }
        if idx != 0 {
            return Err(HuffError::CorruptHeader);
        }
        Ok(())
    }
}

/// Prefix match against each code in canonical order.
#[derive(Debug, Clone, Copy)]
pub struct LinearDecoder<'a> {
    alphabet: &'a Alphabet,
}

impl<'a> LinearDecoder<'a> {
    pub fn new(alphabet: &'a Alphabet) -> Self {
        LinearDecoder { alphabet }
    }
}

impl SymbolDecoder for LinearDecoder<'_> {
    fn decode_into(&self, payload: &BitBuffer, output: &mut Vec<u8>) -> HuffResult<()> {
        let mut start = 0usize;
        while start < payload.len() {
            let entry = self
                .alphabet
                .iter()
                .find(|e| !e.code.is_empty() && e.code.matches_at(payload, start))
                .ok_or(HuffError::CorruptHeader)?;
            push_symbol(output, entry.symbol)?;
            start += entry.code.len();
        }
        Ok(())
    }
}
