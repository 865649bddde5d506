//! End-to-end encode and decode pipelines.
//!
//! **Encoding:** bytes → alphabet (by frequency) → Huffman tree → codes →
//! canonical codes → header, then each input byte's code is appended to the
//! payload through a 256-entry lookup table.
//!
//! **Decoding:** header → canonical alphabet → lookup structure
//! ([`DecodeStrategy`]) → payload walk → bytes.
//!
//! Empty input encodes to an empty header and an empty payload, and that
//! message decodes to empty output.

use crate::alphabet::Alphabet;
use crate::bitbuf::BitBuffer;
use crate::canonical;
use crate::decoder::{ArrayDecoder, LinearDecoder, SymbolDecoder, TreeDecoder};
use crate::frequency::FrequencyTable;
use crate::tree::HuffmanTree;
use crate::{try_reserve, HuffError, HuffResult};

/// A header describing the canonical code table, and the packed payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedMessage {
    pub header: BitBuffer,
    pub payload: BitBuffer,
}

impl EncodedMessage {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when both the header and the payload are empty.
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.payload.is_empty()
    }

    /// Header plus payload size in bytes.
    pub fn compressed_len(&self) -> usize {
        self.header.byte_len() + self.payload.byte_len()
    }
}

/// How the decoder looks up codes in the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodeStrategy {
    /// `Array` when the longest code is at most
    /// [`CodecOptions::max_array_bits`], `Tree` otherwise.
    #[default]
    Auto,
    /// Complete binary array indexed by code path. Headers whose longest
    /// code exceeds [`crate::decoder::ARRAY_MAX_BITS`] fail with
    /// [`HuffError::AllocationFailure`].
    Array,
    /// Arena trie built from the codes.
    Tree,
    /// Linear prefix match over the alphabet.
    Linear,
}

/// Options controlling encoding and decoding.
#[derive(Debug, Clone)]
pub struct CodecOptions {
    pub decode_strategy: DecodeStrategy,
    /// Sum the code lengths of the input first and reserve the payload once.
    pub presize_payload: bool,
    /// Longest code for which `Auto` still picks the array decoder.
    pub max_array_bits: u8,
}

impl Default for CodecOptions {
    fn default() -> Self {
        CodecOptions {
            decode_strategy: DecodeStrategy::Auto,
            presize_payload: true,
            max_array_bits: 16,
        }
    }
}

impl CodecOptions {
    /// The concrete strategy for an alphabet whose longest code is
    /// `max_bits` long.
    pub fn resolve_strategy(&self, max_bits: usize) -> DecodeStrategy {
        match self.decode_strategy {
            DecodeStrategy::Auto if max_bits <= self.max_array_bits as usize => {
                DecodeStrategy::Array
            }
            DecodeStrategy::Auto => DecodeStrategy::Tree,
            other => other,
        }
    }
}

/// Encode pipeline stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EncodeStage {
    Idle,
    AlphabetBuilt,
    TreeBuilt,
    CodesAssigned,
    Canonicalized,
    HeaderSerialized,
    PayloadSerialized,
    Done,
}

/// Decode pipeline stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DecodeStage {
    Idle,
    HeaderParsed,
    AlphabetReconstructed,
    LookupBuilt,
    PayloadDecoded,
    Done,
}

/// Tracks the current stage of a pipeline run.
#[derive(Debug)]
struct Progress<S> {
    stage: S,
}

impl<S: Copy + Ord + std::fmt::Debug> Progress<S> {
    fn new(stage: S) -> Self {
        Progress { stage }
    }

    fn advance(&mut self, next: S) {
        debug_assert!(next > self.stage, "{:?} -> {:?}", self.stage, next);
        log::trace!("{:?} -> {:?}", self.stage, next);
        self.stage = next;
    }
}

/// Encode `input` with default options.
pub fn encode(input: &[u8]) -> HuffResult<EncodedMessage> {
    encode_with_options(input, &CodecOptions::default())
}

/// Encode `input` into a fresh [`EncodedMessage`].
pub fn encode_with_options(input: &[u8], options: &CodecOptions) -> HuffResult<EncodedMessage> {
    let mut message = EncodedMessage::new();
    encode_into(input, &mut message, options)?;
    Ok(message)
}

/// Encode `input` into an empty `target`.
///
/// Fails with [`HuffError::EncodedMessageAlreadyPopulated`] when `target`
/// already holds data. On any failure `target` is left untouched.
pub fn encode_into(
    input: &[u8],
    target: &mut EncodedMessage,
    options: &CodecOptions,
) -> HuffResult<()> {
    if !target.is_empty() {
        return Err(HuffError::EncodedMessageAlreadyPopulated);
    }
    if input.is_empty() {
        return Ok(());
    }

    let mut progress = Progress::new(EncodeStage::Idle);

    let mut freq = FrequencyTable::new();
    freq.count(input);
    let mut alphabet = Alphabet::new();
    alphabet.populate_from_frequencies(&freq)?;
    progress.advance(EncodeStage::AlphabetBuilt);

    let tree = HuffmanTree::build(&alphabet)?;
    progress.advance(EncodeStage::TreeBuilt);
    tree.assign_codes(&mut alphabet)?;
    drop(tree);
    progress.advance(EncodeStage::CodesAssigned);

    canonical::canonicalize(&mut alphabet)?;
    progress.advance(EncodeStage::Canonicalized);

    let header = canonical::serialize_header(&alphabet)?;
    progress.advance(EncodeStage::HeaderSerialized);

    let payload = encode_payload(input, &alphabet, options)?;
    progress.advance(EncodeStage::PayloadSerialized);

    log::debug!(
        "encoded {} bytes: {} symbols, max code {} bits, header {} bytes, payload {} bits ({:.3} bits/byte, entropy {:.3})",
        input.len(),
        alphabet.len(),
        alphabet.max_code_len(),
        header.byte_len(),
        payload.len(),
        payload.len() as f64 / input.len() as f64,
        freq.entropy(),
    );

    target.header = header;
    target.payload = payload;
    progress.advance(EncodeStage::Done);
    Ok(())
}

/// Pack the code of every input byte into a payload.
///
/// Fails with [`HuffError::TreeConstructionFailed`] when a byte has no
/// code in `alphabet`.
pub fn encode_payload(
    input: &[u8],
    alphabet: &Alphabet,
    options: &CodecOptions,
) -> HuffResult<BitBuffer> {
    let table = alphabet.code_table();
    let mut payload = BitBuffer::new();

    if options.presize_payload {
        let mut total_bits = 0usize;
        for &byte in input {
            let code = table[byte as usize].ok_or(HuffError::TreeConstructionFailed)?;
            total_bits += code.len();
        }
        payload.reserve_bits(total_bits)?;
    }

    for &byte in input {
        let code = table[byte as usize].ok_or(HuffError::TreeConstructionFailed)?;
        payload.extend_from(code);
    }
    Ok(payload)
}

/// Decode `message` with default options.
pub fn decode(message: &EncodedMessage) -> HuffResult<Vec<u8>> {
    decode_with_options(message, &CodecOptions::default())
}

/// Decode `message` into a fresh vector.
pub fn decode_with_options(message: &EncodedMessage, options: &CodecOptions) -> HuffResult<Vec<u8>> {
    let mut output = Vec::new();
    decode_into(message, &mut output, options)?;
    Ok(output)
}

/// Decode `message` into an empty `output`.
///
/// Fails with [`HuffError::DecodedMessageAlreadyPopulated`] when `output`
/// already holds bytes, and [`HuffError::CorruptHeader`] when the header is
/// malformed or the payload does not resolve to whole symbols. On any
/// failure `output` is left empty.
pub fn decode_into(
    message: &EncodedMessage,
    output: &mut Vec<u8>,
    options: &CodecOptions,
) -> HuffResult<()> {
    if !output.is_empty() {
        return Err(HuffError::DecodedMessageAlreadyPopulated);
    }
    if message.header.is_empty() {
        return if message.payload.is_empty() {
            Ok(())
        } else {
            Err(HuffError::CorruptHeader)
        };
    }

    let mut progress = Progress::new(DecodeStage::Idle);

    let mut alphabet = Alphabet::new();
    canonical::deserialize_alphabet(&message.header, &mut alphabet)?;
    progress.advance(DecodeStage::HeaderParsed);
    progress.advance(DecodeStage::AlphabetReconstructed);

    let strategy = options.resolve_strategy(alphabet.max_code_len());
    let decoder: Box<dyn SymbolDecoder + '_> = match strategy {
        DecodeStrategy::Array => Box::new(ArrayDecoder::new(&alphabet)?),
        DecodeStrategy::Tree | DecodeStrategy::Auto => Box::new(TreeDecoder::new(&alphabet)?),
        DecodeStrategy::Linear => Box::new(LinearDecoder::new(&alphabet)),
    };
    progress.advance(DecodeStage::LookupBuilt);

    let mut decoded = Vec::new();
    try_reserve(&mut decoded, message.payload.byte_len())?;
    decoder.decode_into(&message.payload, &mut decoded)?;
    progress.advance(DecodeStage::PayloadDecoded);

    log::debug!(
        "decoded {} bytes from {} payload bits ({:?}, {} symbols)",
        decoded.len(),
        message.payload.len(),
        strategy,
        alphabet.len(),
    );

    *output = decoded;
    progress.advance(DecodeStage::Done);
    Ok(())
}
