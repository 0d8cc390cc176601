//! The ABI encoder — the inverse of the decoding engine.
//!
//! Values encode to unprefixed lowercase hex. Composite regions use the
//! canonical head/tail layout: static members inline, dynamic members
//! contribute one offset word to the head and append their payload to the
//! tail, offsets counted in bytes from the region start.

use abicodec_core::{AbiValue, EncodeError};
use alloy_primitives::U256;

/// Encode a sequence of values as a top-level argument tuple — the layout of
/// function arguments and return data.
pub fn encode_sequence(values: &[AbiValue]) -> Result<String, EncodeError> {
    encode_components(values)
}

/// Encode a single value. For dynamic values this is the tail representation
/// (length prefix plus payload), which is also the top-level form.
pub fn encode_value(value: &AbiValue) -> Result<String, EncodeError> {
    match value {
        AbiValue::Bool(b) => Ok(encode_u256(U256::from(*b as u8))),
        AbiValue::Uint(v, _) => Ok(encode_u256(*v)),
        AbiValue::Int(v, _) => Ok(hex::encode(v.to_be_bytes::<32>())),
        AbiValue::Address(a) => {
            let mut word = [0u8; 32];
            word[12..].copy_from_slice(a.as_slice());
            Ok(hex::encode(word))
        }
        AbiValue::FixedBytes(b) => {
            if b.len() > 32 {
                return Err(EncodeError::InvalidValue {
                    reason: format!("fixed bytes payload of {} bytes", b.len()),
                });
            }
            let mut word = [0u8; 32];
            word[..b.len()].copy_from_slice(b);
            Ok(hex::encode(word))
        }
        AbiValue::Bytes(b) => Ok(encode_byte_payload(b)),
        AbiValue::String(s) => Ok(encode_byte_payload(s.as_bytes())),
        AbiValue::FixedArray(elems) | AbiValue::Tuple(elems) => encode_components(elems),
        AbiValue::Array(elems) => {
            let mut out = encode_u256(U256::from(elems.len()));
            out.push_str(&encode_components(elems)?);
            Ok(out)
        }
    }
}

fn encode_u256(v: U256) -> String {
    hex::encode(v.to_be_bytes::<32>())
}

/// Length word followed by the payload, right-padded to a word boundary.
fn encode_byte_payload(bytes: &[u8]) -> String {
    let mut out = encode_u256(U256::from(bytes.len()));
    out.push_str(&hex::encode(bytes));
    let padded = bytes.len().div_ceil(32) * 64;
    out.push_str(&"0".repeat(padded - bytes.len() * 2));
    out
}

/// Head/tail layout for the members of a tuple-like region.
fn encode_components(elems: &[AbiValue]) -> Result<String, EncodeError> {
    let head_words: usize = elems.iter().map(AbiValue::word_count).sum();
    let mut heads = String::new();
    let mut tails = String::new();
    for value in elems {
        if value.is_dynamic() {
            let byte_offset = head_words * 32 + tails.len() / 2;
            heads.push_str(&encode_u256(U256::from(byte_offset)));
            tails.push_str(&encode_value(value)?);
        } else {
            heads.push_str(&encode_value(value)?);
        }
    }
    heads.push_str(&tails);
    Ok(heads)
}
