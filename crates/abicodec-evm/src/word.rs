//! 32-byte word extraction from the hex stream.
//!
//! Every decode path goes through the same word reader: payload and pointer
//! words alike are 64 hex chars, and concentrating the slicing and integer
//! conversion here keeps the offset arithmetic in one place.

use abicodec_core::error::DecodeError;
use alloy_primitives::{I256, U256};

/// Hex characters per 32-byte word.
pub const WORD_HEX_LEN: usize = 64;

/// Bytes per word.
pub const WORD_BYTES: usize = 32;

/// The 64 hex chars starting at `offset` (a hex-char count).
pub fn word_slice(input: &str, offset: usize) -> Result<&str, DecodeError> {
    let end = offset
        .checked_add(WORD_HEX_LEN)
        .ok_or(DecodeError::OffsetOutOfRange {
            offset,
            len: input.len(),
        })?;
    if end > input.len() {
        return Err(DecodeError::TruncatedInput {
            offset,
            needed: WORD_HEX_LEN,
            len: input.len(),
        });
    }
    Ok(&input[offset..end])
}

/// The `word_index`-th word of the input.
pub fn word_at(input: &str, word_index: usize) -> Result<&str, DecodeError> {
    let offset = word_index
        .checked_mul(WORD_HEX_LEN)
        .ok_or(DecodeError::OffsetOutOfRange {
            offset: usize::MAX,
            len: input.len(),
        })?;
    word_slice(input, offset)
}

/// Raw bytes of one word.
pub fn word_bytes(word: &str) -> Result<[u8; WORD_BYTES], DecodeError> {
    let mut out = [0u8; WORD_BYTES];
    hex::decode_to_slice(word, &mut out)?;
    Ok(out)
}

/// Interpret the rightmost `bits / 8` bytes of a word as a big-endian
/// unsigned integer. The padding bytes to the left are ignored.
pub fn as_uint(word: &str, bits: usize) -> Result<U256, DecodeError> {
    let bytes = word_bytes(word)?;
    let start = WORD_BYTES - bits / 8;
    Ok(U256::from_be_slice(&bytes[start..]))
}

/// Interpret the rightmost `bits / 8` bytes of a word as a big-endian
/// two's-complement integer; the sign bit is the MSB of that slice.
pub fn as_int(word: &str, bits: usize) -> Result<I256, DecodeError> {
    let bytes = word_bytes(word)?;
    let start = WORD_BYTES - bits / 8;
    let fill = if bytes[start] & 0x80 != 0 { 0xff } else { 0x00 };
    let mut buf = [fill; WORD_BYTES];
    buf[start..].copy_from_slice(&bytes[start..]);
    Ok(I256::from_raw(U256::from_be_bytes(buf)))
}

/// A full word narrowed to the host word size. Length and offset words go
/// through this; values past `usize::MAX` fail rather than wrap.
pub fn as_usize(word: &str) -> Result<usize, DecodeError> {
    let value = as_uint(word, 256)?;
    usize::try_from(value).map_err(|_| DecodeError::LengthOverflow {
        reason: format!("word value {value} does not fit the host word size"),
    })
}
