//! The ABI decoding engine.
//!
//! A single entry point, [`AbiDecoder::decode`], routes on the schema node
//! kind. Static values are read inline at the cursor; dynamic values occupy
//! one offset word in their container's head region, and the offset (a byte
//! count from the start of the enclosing tuple, doubled in hex) points into
//! the tail region where the payload lives. Composite decoders re-enter
//! `decode` for their children, so arbitrarily nested layouts fall out of the
//! recursion.
//!
//! The engine is purely functional: it borrows the input hex, owns nothing,
//! and returns either a complete value tree or an error — never a partial
//! result.

use abicodec_core::{AbiType, AbiValue, DecodeError};
use alloy_primitives::{Address, U256};

use crate::word::{self, WORD_HEX_LEN};

/// Decode one value with the default configuration.
pub fn decode(input: &str, offset: usize, ty: &AbiType) -> Result<AbiValue, DecodeError> {
    AbiDecoder::new().decode(input, offset, ty)
}

/// Tuning knobs for the decoder.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Reject malformed UTF-8 in `string` payloads instead of substituting
    /// replacement characters.
    pub strict_utf8: bool,
    /// Maximum schema nesting depth accepted before decoding starts. The
    /// recursion is bounded by the schema tree, so capping its depth caps
    /// stack use on adversarial schemas.
    pub max_depth: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            strict_utf8: false,
            max_depth: 32,
        }
    }
}

/// The decoding engine. Stateless apart from its configuration; one instance
/// can serve any number of concurrent decodes.
#[derive(Debug, Clone, Default)]
pub struct AbiDecoder {
    config: DecoderConfig,
}

impl AbiDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Decode one value of type `ty` starting at `offset` (in hex chars).
    ///
    /// The input must be unprefixed hex; the caller strips `0x`. The decoder
    /// reads what the schema demands from the offset given — trailing input
    /// beyond that is not an error.
    pub fn decode(&self, input: &str, offset: usize, ty: &AbiType) -> Result<AbiValue, DecodeError> {
        ty.validate()?;
        let depth = ty.depth();
        if depth > self.config.max_depth {
            return Err(DecodeError::InvalidSchema {
                reason: format!(
                    "schema nesting depth {depth} exceeds the configured maximum {}",
                    self.config.max_depth
                ),
            });
        }
        self.decode_any(input, offset, ty)
    }

    /// Decode a sequence of values laid out as a top-level tuple — the shape
    /// of function arguments and return data.
    pub fn decode_sequence(
        &self,
        input: &str,
        offset: usize,
        types: &[AbiType],
    ) -> Result<Vec<AbiValue>, DecodeError> {
        if types.is_empty() {
            return Ok(Vec::new());
        }
        match self.decode(input, offset, &AbiType::Tuple(types.to_vec()))? {
            AbiValue::Tuple(values) => Ok(values),
            other => Ok(vec![other]),
        }
    }

    /// Kind-directed dispatch. Schema kind alone decides the layout; there is
    /// no sniffing of the data.
    fn decode_any(&self, input: &str, offset: usize, ty: &AbiType) -> Result<AbiValue, DecodeError> {
        match ty {
            AbiType::Bool => self.decode_bool(input, offset),
            AbiType::Address => self.decode_address(input, offset),
            AbiType::Uint(bits) => {
                let value = word::as_uint(word::word_slice(input, offset)?, *bits)?;
                Ok(AbiValue::Uint(value, *bits))
            }
            AbiType::Int(bits) => {
                let value = word::as_int(word::word_slice(input, offset)?, *bits)?;
                Ok(AbiValue::Int(value, *bits))
            }
            AbiType::FixedBytes(n) => self.decode_fixed_bytes(input, offset, *n),
            AbiType::Bytes => Ok(AbiValue::Bytes(self.decode_byte_payload(input, offset)?)),
            AbiType::String => self.decode_string(input, offset),
            AbiType::Fixed(..) | AbiType::Ufixed(..) => Err(DecodeError::Unsupported {
                ty: ty.to_string(),
            }),
            AbiType::FixedArray(elem, n) => self.decode_static_array(input, offset, elem, *n),
            AbiType::Array(elem) => self.decode_dynamic_array(input, offset, elem),
            AbiType::Tuple(fields) if ty.is_dynamic() => {
                self.decode_dynamic_struct(input, offset, fields)
            }
            AbiType::Tuple(fields) => self.decode_static_struct(input, offset, fields),
        }
    }

    // ─── Atomic decoders ──────────────────────────────────────────────────

    fn decode_bool(&self, input: &str, offset: usize) -> Result<AbiValue, DecodeError> {
        let value = word::as_uint(word::word_slice(input, offset)?, 256)?;
        // The wire value 1 is true; any other word decodes as false.
        Ok(AbiValue::Bool(value == U256::from(1u64)))
    }

    fn decode_address(&self, input: &str, offset: usize) -> Result<AbiValue, DecodeError> {
        // An address is uint160 on the wire: the last 20 bytes of the word.
        let bytes = word::word_bytes(word::word_slice(input, offset)?)?;
        Ok(AbiValue::Address(Address::from_slice(&bytes[12..])))
    }

    fn decode_fixed_bytes(
        &self,
        input: &str,
        offset: usize,
        n: usize,
    ) -> Result<AbiValue, DecodeError> {
        // bytesN is left-justified; the trailing 32 - n bytes are padding.
        let bytes = word::word_bytes(word::word_slice(input, offset)?)?;
        Ok(AbiValue::FixedBytes(bytes[..n].to_vec()))
    }

    /// Length-prefixed byte payload shared by `bytes` and `string`.
    fn decode_byte_payload(&self, input: &str, offset: usize) -> Result<Vec<u8>, DecodeError> {
        let len = word::as_usize(word::word_slice(input, offset)?)?;
        let payload = offset + WORD_HEX_LEN;
        let hex_len = len.checked_mul(2).ok_or_else(|| DecodeError::LengthOverflow {
            reason: format!("byte length {len} overflows when doubled"),
        })?;
        if hex_len > input.len().saturating_sub(payload) {
            return Err(DecodeError::LengthOverflow {
                reason: format!(
                    "declared byte length {len} exceeds the {} hex chars remaining",
                    input.len().saturating_sub(payload)
                ),
            });
        }
        Ok(hex::decode(&input[payload..payload + hex_len])?)
    }

    fn decode_string(&self, input: &str, offset: usize) -> Result<AbiValue, DecodeError> {
        let bytes = self.decode_byte_payload(input, offset)?;
        let s = if self.config.strict_utf8 {
            String::from_utf8(bytes)?
        } else {
            String::from_utf8_lossy(&bytes).into_owned()
        };
        Ok(AbiValue::String(s))
    }

    // ─── Array decoders ───────────────────────────────────────────────────

    /// `T[n]`. Static elements are packed contiguously; dynamic elements get
    /// one head word each (offsets relative to the array start) followed by
    /// their tails — no length prefix in either case.
    fn decode_static_array(
        &self,
        input: &str,
        offset: usize,
        elem: &AbiType,
        n: usize,
    ) -> Result<AbiValue, DecodeError> {
        let needed = n
            .checked_mul(elem.word_count() * WORD_HEX_LEN)
            .ok_or_else(|| DecodeError::LengthOverflow {
                reason: format!("static array of {n} elements overflows"),
            })?;
        if needed > input.len().saturating_sub(offset) {
            return Err(DecodeError::TruncatedInput {
                offset,
                needed,
                len: input.len(),
            });
        }
        let mut elements = Vec::with_capacity(n);
        if elem.is_dynamic() {
            for i in 0..n {
                let head = offset + i * WORD_HEX_LEN;
                let target = self.resolve_head(input, head, offset, elem)?;
                elements.push(self.decode_any(input, target, elem)?);
            }
        } else {
            let mut cursor = offset;
            for _ in 0..n {
                elements.push(self.decode_any(input, cursor, elem)?);
                cursor += self.single_element_length(input, cursor, elem)? * WORD_HEX_LEN;
            }
        }
        Ok(AbiValue::FixedArray(elements))
    }

    /// `T[]`: a length word, then the element region laid out exactly like a
    /// static array of that length (relative offsets resolve against the
    /// element region start, after the length word).
    fn decode_dynamic_array(
        &self,
        input: &str,
        offset: usize,
        elem: &AbiType,
    ) -> Result<AbiValue, DecodeError> {
        let len = word::as_usize(word::word_slice(input, offset)?)?;
        let payload = offset + WORD_HEX_LEN;
        // Pre-check the declared length against the remaining input before
        // allocating: each element claims at least its head-region words.
        let needed = len
            .checked_mul(elem.word_count() * WORD_HEX_LEN)
            .ok_or_else(|| DecodeError::LengthOverflow {
                reason: format!("declared array length {len} overflows"),
            })?;
        if needed > input.len().saturating_sub(payload) {
            return Err(DecodeError::LengthOverflow {
                reason: format!(
                    "declared array length {len} needs {needed} hex chars, {} remain",
                    input.len().saturating_sub(payload)
                ),
            });
        }
        let mut elements = Vec::with_capacity(len);
        if elem.is_dynamic() {
            for i in 0..len {
                let head = payload + i * WORD_HEX_LEN;
                let target = self.resolve_head(input, head, payload, elem)?;
                elements.push(self.decode_any(input, target, elem)?);
            }
        } else {
            let mut cursor = payload;
            for _ in 0..len {
                elements.push(self.decode_any(input, cursor, elem)?);
                cursor += self.single_element_length(input, cursor, elem)? * WORD_HEX_LEN;
            }
        }
        Ok(AbiValue::Array(elements))
    }

    // ─── Struct decoders ──────────────────────────────────────────────────

    /// All-static tuple: fields decode left to right at an advancing cursor.
    /// Nested static structs flatten into the enclosing layout, so the cursor
    /// simply advances by each field's word count.
    fn decode_static_struct(
        &self,
        input: &str,
        offset: usize,
        fields: &[AbiType],
    ) -> Result<AbiValue, DecodeError> {
        let mut values = Vec::with_capacity(fields.len());
        let mut cursor = offset;
        for field in fields {
            values.push(self.decode_any(input, cursor, field)?);
            cursor += field.word_count() * WORD_HEX_LEN;
        }
        Ok(AbiValue::Tuple(values))
    }

    /// Tuple with at least one dynamic field: two passes.
    ///
    /// Pass 1 walks the head region, decoding static fields inline and
    /// recording each dynamic field's absolute payload offset. Pass 2 slices
    /// each payload up to the next recorded offset (the last runs to the end
    /// of the input) and recurses into the slice. The boundary rule is what
    /// makes this work: a dynamic payload does not self-declare a total byte
    /// length at its outer boundary, so lengths come from the differences
    /// between consecutive head offsets.
    fn decode_dynamic_struct(
        &self,
        input: &str,
        offset: usize,
        fields: &[AbiType],
    ) -> Result<AbiValue, DecodeError> {
        let mut slots: Vec<Option<AbiValue>> = vec![None; fields.len()];
        let mut pending: Vec<(usize, usize)> = Vec::new();

        let mut cursor = offset;
        for (i, field) in fields.iter().enumerate() {
            if field.is_dynamic() {
                let rel = self.data_offset(input, cursor, field)?;
                let target =
                    offset
                        .checked_add(rel)
                        .ok_or(DecodeError::OffsetOutOfRange {
                            offset: rel,
                            len: input.len(),
                        })?;
                pending.push((i, target));
                cursor += WORD_HEX_LEN;
            } else {
                slots[i] = Some(self.decode_any(input, cursor, field)?);
                cursor += field.word_count() * WORD_HEX_LEN;
            }
        }

        // Head offsets must land inside the input and be strictly increasing;
        // a payload starting at or before the previous one cannot be sliced.
        for (k, &(_, start)) in pending.iter().enumerate() {
            if start >= input.len() {
                return Err(DecodeError::OffsetOutOfRange {
                    offset: start,
                    len: input.len(),
                });
            }
            if k > 0 && start <= pending[k - 1].1 {
                return Err(DecodeError::OffsetOutOfRange {
                    offset: start,
                    len: input.len(),
                });
            }
        }

        for (k, &(i, start)) in pending.iter().enumerate() {
            let end = pending
                .get(k + 1)
                .map(|&(_, next)| next)
                .unwrap_or(input.len());
            slots[i] = Some(self.decode_any(&input[start..end], 0, &fields[i])?);
        }

        let mut values = Vec::with_capacity(fields.len());
        for slot in slots {
            match slot {
                Some(value) => values.push(value),
                None => {
                    return Err(DecodeError::InvalidSchema {
                        reason: "unresolved struct field".into(),
                    })
                }
            }
        }
        Ok(AbiValue::Tuple(values))
    }

    // ─── Layout helpers ───────────────────────────────────────────────────

    /// Words one element consumes when packed contiguously at `offset`:
    /// length word plus data words for byte payloads, the flattened word
    /// count for static composites, one (the head slot) otherwise.
    pub fn single_element_length(
        &self,
        input: &str,
        offset: usize,
        ty: &AbiType,
    ) -> Result<usize, DecodeError> {
        match ty {
            AbiType::Bytes | AbiType::String => {
                let len = word::as_usize(word::word_slice(input, offset)?)?;
                Ok(len.div_ceil(32) + 1)
            }
            _ if ty.is_dynamic() => Ok(1),
            _ => Ok(ty.word_count()),
        }
    }

    /// The doubled byte offset stored in the head word at `head_offset` when
    /// `ty` is dynamic, 0 otherwise.
    pub fn data_offset(
        &self,
        input: &str,
        head_offset: usize,
        ty: &AbiType,
    ) -> Result<usize, DecodeError> {
        if !ty.is_dynamic() {
            return Ok(0);
        }
        let byte_offset = word::as_usize(word::word_slice(input, head_offset)?)?;
        byte_offset
            .checked_mul(2)
            .ok_or_else(|| DecodeError::LengthOverflow {
                reason: format!("offset {byte_offset} overflows when doubled"),
            })
    }

    /// Read a head word and turn it into an absolute, bounds-checked payload
    /// offset relative to `region_start`.
    fn resolve_head(
        &self,
        input: &str,
        head: usize,
        region_start: usize,
        ty: &AbiType,
    ) -> Result<usize, DecodeError> {
        let rel = self.data_offset(input, head, ty)?;
        let target = region_start
            .checked_add(rel)
            .ok_or(DecodeError::OffsetOutOfRange {
                offset: rel,
                len: input.len(),
            })?;
        if target >= input.len() {
            return Err(DecodeError::OffsetOutOfRange {
                offset: target,
                len: input.len(),
            });
        }
        Ok(target)
    }
}
