//! Canonical Huffman compression.
//!
//! The encoder counts byte frequencies, builds a Huffman tree over the
//! distinct bytes, converts the resulting codes to canonical form and emits
//! a compact header plus an MSB-first bitstream. The decoder rebuilds the
//! canonical codes from the header alone.
//!
//! ```
//! let encoded = canhuff::encode(b"abracadabra").unwrap();
//! let decoded = canhuff::decode(&encoded).unwrap();
//! assert_eq!(decoded, b"abracadabra");
//! ```

pub mod alphabet;
pub mod bitbuf;
pub mod canonical;
pub mod codec;
pub mod container;
pub mod decoder;
pub mod frequency;
pub mod pqueue;
pub mod tree;

#[cfg(test)]
mod validation;

pub use alphabet::{Alphabet, SymbolEntry};
pub use bitbuf::BitBuffer;
pub use codec::{
    decode, decode_into, decode_with_options, encode, encode_into, encode_with_options,
    CodecOptions, DecodeStrategy, EncodedMessage,
};

/// Error types for canhuff operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum HuffError {
    /// A buffer could not be allocated.
    #[error("allocation failed")]
    AllocationFailure,
    /// The Huffman tree or its codes could not be built from the alphabet.
    #[error("huffman tree construction failed")]
    TreeConstructionFailed,
    /// Target alphabet already holds symbols.
    #[error("alphabet is already populated")]
    AlphabetAlreadyPopulated,
    /// Target encoded message already holds a header or payload.
    #[error("encoded message is already populated")]
    EncodedMessageAlreadyPopulated,
    /// Target output buffer already holds decoded bytes.
    #[error("decoded message is already populated")]
    DecodedMessageAlreadyPopulated,
    /// An operation that needs at least one symbol got an empty alphabet.
    #[error("alphabet is empty")]
    EmptyAlphabet,
    /// Fewer bytes are available than the header declares.
    #[error("header truncated: expected {expected} bytes, found {actual}")]
    HeaderTruncated { expected: usize, actual: usize },
    /// The header is malformed, or the payload cannot be resolved against it.
    #[error("corrupt header")]
    CorruptHeader,
    /// The byte framing of a stored message is not recognised.
    #[error("invalid container")]
    InvalidContainer,
    /// The container was written by an unknown format version.
    #[error("unsupported container version {0}")]
    UnsupportedVersion(u8),
}

pub type HuffResult<T> = Result<T, HuffError>;

/// Reserve room for `additional` more elements, surfacing allocation
/// failure as [`HuffError::AllocationFailure`].
pub(crate) fn try_reserve<T>(buf: &mut Vec<T>, additional: usize) -> HuffResult<()> {
    buf.try_reserve(additional)
        .map_err(|_| HuffError::AllocationFailure)
}
