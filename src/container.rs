//! Byte framing for storing or transmitting an [`EncodedMessage`].
//!
//! The payload does not delimit itself: its last byte may end in padding
//! bits. The frame therefore records the payload bit count explicitly.
//!
//! **Frame layout:**
//! - Magic bytes: `CH` (2 bytes)
//! - Version: 1 (1 byte)
//! - Header length in bytes: u16 little-endian (2 bytes)
//! - Payload length in bits: u64 little-endian (8 bytes)
//! - Header bytes
//! - Payload bytes, `ceil(bits / 8)`

use crate::bitbuf::BitBuffer;
use crate::codec::{self, EncodedMessage};
use crate::{try_reserve, HuffError, HuffResult};

/// Magic bytes for the container format.
const MAGIC: [u8; 2] = [b'C', b'H'];
/// Format version.
const VERSION: u8 = 1;

/// Fixed prefix size: magic(2) + version(1) + header_len(2) + payload_bits(8) = 13
const FRAME_PREFIX_SIZE: usize = 13;

/// Serialize `message` into a self-contained byte frame.
pub fn to_bytes(message: &EncodedMessage) -> HuffResult<Vec<u8>> {
    if message.header.len() % 8 != 0 {
        return Err(HuffError::CorruptHeader);
    }
    let header = message.header.as_bytes();
    let header_len = u16::try_from(header.len()).map_err(|_| HuffError::CorruptHeader)?;
    let payload = message.payload.as_bytes();

    let mut output = Vec::new();
    try_reserve(&mut output, FRAME_PREFIX_SIZE + header.len() + payload.len())?;
    output.extend_from_slice(&MAGIC);
    output.push(VERSION);
    output.extend_from_slice(&header_len.to_le_bytes());
    output.extend_from_slice(&(message.payload.len() as u64).to_le_bytes());
    output.extend_from_slice(header);
    output.extend_from_slice(payload);
    Ok(output)
}

/// Parse a byte frame produced by [`to_bytes`].
pub fn from_bytes(input: &[u8]) -> HuffResult<EncodedMessage> {
    if input.len() < FRAME_PREFIX_SIZE {
        return Err(HuffError::HeaderTruncated {
            expected: FRAME_PREFIX_SIZE,
            actual: input.len(),
        });
    }
    if input[0..2] != MAGIC {
        return Err(HuffError::InvalidContainer);
    }
    if input[2] != VERSION {
        return Err(HuffError::UnsupportedVersion(input[2]));
    }

    let header_len = u16::from_le_bytes([input[3], input[4]]) as usize;
    let mut bits_le = [0u8; 8];
    bits_le.copy_from_slice(&input[5..13]);
    let payload_bits =
        usize::try_from(u64::from_le_bytes(bits_le)).map_err(|_| HuffError::InvalidContainer)?;
    let payload_len = payload_bits.div_ceil(8);

    let expected = FRAME_PREFIX_SIZE + header_len + payload_len;
    if input.len() < expected {
        return Err(HuffError::HeaderTruncated {
            expected,
            actual: input.len(),
        });
    }
    if input.len() > expected {
        return Err(HuffError::InvalidContainer);
    }

    let header_end = FRAME_PREFIX_SIZE + header_len;
    let header = BitBuffer::from_byte_vec(input[FRAME_PREFIX_SIZE..header_end].to_vec());
    let payload = BitBuffer::from_bytes(input[header_end..].to_vec(), payload_bits)?;
    Ok(EncodedMessage { header, payload })
}

/// Encode `input` and frame the result.
pub fn compress(input: &[u8]) -> HuffResult<Vec<u8>> {
    to_bytes(&codec::encode(input)?)
}

/// Parse a frame and decode it.
pub fn decompress(input: &[u8]) -> HuffResult<Vec<u8>> {
    codec::decode(&from_bytes(input)?)
}
