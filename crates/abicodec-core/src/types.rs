//! The canonical Solidity type system and the decoded value tree.
//!
//! `AbiType` is the schema: one tagged variant per Solidity type kind, built
//! once (by the type-string parser or by hand) and then consulted by the
//! decoder, which dispatches on the tag alone. `AbiValue` is the parallel sum
//! type the decoder produces; its shape mirrors the schema that was requested.

use alloy_primitives::{Address, I256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DecodeError;

/// A schema node describing one Solidity type.
///
/// Tuples carry their ordered field list directly in the node, so the decoder
/// never has to discover struct fields at runtime. Whether a tuple is a
/// "static struct" (encoded inline) or a "dynamic struct" (head/tail layout)
/// is the transitive [`AbiType::is_dynamic`] property, not a separate kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbiType {
    /// Unsigned integer, width in bits (8..=256, multiple of 8).
    Uint(usize),
    /// Signed two's-complement integer, width in bits.
    Int(usize),
    Bool,
    /// 20-byte EVM address (`uint160` on the wire).
    Address,
    /// Fixed-length byte string `bytes1..bytes32`, length in bytes.
    FixedBytes(usize),
    /// Variable-length byte string.
    Bytes,
    /// Variable-length UTF-8 string.
    String,
    /// `fixedMxN` — grammar recognised, decoding unsupported (as in Solidity).
    Fixed(usize, usize),
    /// `ufixedMxN` — grammar recognised, decoding unsupported.
    Ufixed(usize, usize),
    /// `T[n]` with `n > 0`.
    FixedArray(Box<AbiType>, usize),
    /// `T[]`.
    Array(Box<AbiType>),
    /// `(T1,...,Tk)` — struct / tuple with ordered fields.
    Tuple(Vec<AbiType>),
}

impl AbiType {
    /// A type is dynamic iff its encoded length is not fixed by the schema:
    /// `bytes`, `string`, `T[]`, any `T[n]` or tuple with a dynamic member.
    /// Dynamic values contribute one offset word to their container's head
    /// region; static values are inlined.
    pub fn is_dynamic(&self) -> bool {
        match self {
            AbiType::Bytes | AbiType::String | AbiType::Array(_) => true,
            AbiType::FixedArray(elem, _) => elem.is_dynamic(),
            AbiType::Tuple(fields) => fields.iter().any(AbiType::is_dynamic),
            _ => false,
        }
    }

    /// Number of 32-byte words this type occupies in its container's head
    /// region: the full flattened size for static types, exactly one (the
    /// offset word) for dynamic types.
    pub fn word_count(&self) -> usize {
        if self.is_dynamic() {
            return 1;
        }
        match self {
            AbiType::FixedArray(elem, n) => n * elem.word_count(),
            AbiType::Tuple(fields) => fields.iter().map(AbiType::word_count).sum(),
            _ => 1,
        }
    }

    /// Nesting depth of the schema tree (a leaf is 1). Used by the decoder's
    /// recursion guard.
    pub fn depth(&self) -> usize {
        match self {
            AbiType::FixedArray(elem, _) | AbiType::Array(elem) => 1 + elem.depth(),
            AbiType::Tuple(fields) => {
                1 + fields.iter().map(AbiType::depth).max().unwrap_or(0)
            }
            _ => 1,
        }
    }

    /// Checks the structural invariants the decoder relies on: integer widths
    /// that divide 256, `bytes1..bytes32` lengths, non-empty static arrays
    /// and tuples, fixed-point grammar bounds.
    pub fn validate(&self) -> Result<(), DecodeError> {
        match self {
            AbiType::Uint(bits) | AbiType::Int(bits) => {
                if *bits == 0 || *bits > 256 || bits % 8 != 0 {
                    return Err(DecodeError::InvalidSchema {
                        reason: format!("integer width {bits} is not a multiple of 8 in 8..=256"),
                    });
                }
            }
            AbiType::FixedBytes(n) => {
                if *n == 0 || *n > 32 {
                    return Err(DecodeError::InvalidSchema {
                        reason: format!("bytes{n} is outside bytes1..bytes32"),
                    });
                }
            }
            AbiType::Fixed(m, n) | AbiType::Ufixed(m, n) => {
                if *m == 0 || *m > 256 || m % 8 != 0 || *n == 0 || *n > 80 {
                    return Err(DecodeError::InvalidSchema {
                        reason: format!("fixed-point {m}x{n} is outside MxN with M in 8..=256, N in 1..=80"),
                    });
                }
            }
            AbiType::FixedArray(elem, n) => {
                if *n == 0 {
                    return Err(DecodeError::InvalidSchema {
                        reason: "zero-length static array".into(),
                    });
                }
                elem.validate()?;
            }
            AbiType::Array(elem) => elem.validate()?,
            AbiType::Tuple(fields) => {
                if fields.is_empty() {
                    return Err(DecodeError::InvalidSchema {
                        reason: "tuple without inner types".into(),
                    });
                }
                for f in fields {
                    f.validate()?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiType::Uint(bits) => write!(f, "uint{bits}"),
            AbiType::Int(bits) => write!(f, "int{bits}"),
            AbiType::Bool => write!(f, "bool"),
            AbiType::Address => write!(f, "address"),
            AbiType::FixedBytes(n) => write!(f, "bytes{n}"),
            AbiType::Bytes => write!(f, "bytes"),
            AbiType::String => write!(f, "string"),
            AbiType::Fixed(m, n) => write!(f, "fixed{m}x{n}"),
            AbiType::Ufixed(m, n) => write!(f, "ufixed{m}x{n}"),
            AbiType::FixedArray(elem, n) => write!(f, "{elem}[{n}]"),
            AbiType::Array(elem) => write!(f, "{elem}[]"),
            AbiType::Tuple(fields) => {
                write!(f, "(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{field}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// A decoded value. The tree mirrors the requested schema: integers are
/// 256-bit (the widest the ABI supports), byte payloads are owned vectors,
/// composites hold their children in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum AbiValue {
    Bool(bool),
    /// Value plus the declared width in bits.
    Uint(U256, usize),
    Int(I256, usize),
    Address(Address),
    /// `bytes1..bytes32` payload, padding already stripped.
    FixedBytes(Vec<u8>),
    Bytes(Vec<u8>),
    String(String),
    FixedArray(Vec<AbiValue>),
    Array(Vec<AbiValue>),
    Tuple(Vec<AbiValue>),
}

impl AbiValue {
    /// Mirrors [`AbiType::is_dynamic`] on the value side; the encoder uses it
    /// to pick head/tail vs inline layout.
    pub fn is_dynamic(&self) -> bool {
        match self {
            AbiValue::Bytes(_) | AbiValue::String(_) | AbiValue::Array(_) => true,
            AbiValue::FixedArray(elems) => elems.iter().any(AbiValue::is_dynamic),
            AbiValue::Tuple(fields) => fields.iter().any(AbiValue::is_dynamic),
            _ => false,
        }
    }

    /// Head-region footprint in words, mirroring [`AbiType::word_count`].
    pub fn word_count(&self) -> usize {
        if self.is_dynamic() {
            return 1;
        }
        match self {
            AbiValue::FixedArray(elems) | AbiValue::Tuple(elems) => {
                elems.iter().map(AbiValue::word_count).sum()
            }
            _ => 1,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AbiValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<&U256> {
        match self {
            AbiValue::Uint(v, _) => Some(v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&I256> {
        match self {
            AbiValue::Int(v, _) => Some(v),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<&Address> {
        match self {
            AbiValue::Address(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            AbiValue::FixedBytes(b) | AbiValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AbiValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Children of any composite value, in schema order.
    pub fn as_slice(&self) -> Option<&[AbiValue]> {
        match self {
            AbiValue::FixedArray(v) | AbiValue::Array(v) | AbiValue::Tuple(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for AbiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiValue::Bool(b) => write!(f, "{b}"),
            AbiValue::Uint(v, _) => write!(f, "{v}"),
            AbiValue::Int(v, _) => write!(f, "{v}"),
            AbiValue::Address(a) => write!(f, "{a}"),
            AbiValue::FixedBytes(b) | AbiValue::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            AbiValue::String(s) => write!(f, "{s}"),
            AbiValue::FixedArray(elems) | AbiValue::Array(elems) => {
                let parts: Vec<_> = elems.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            AbiValue::Tuple(fields) => {
                let parts: Vec<_> = fields.iter().map(|e| e.to_string()).collect();
                write!(f, "({})", parts.join(", "))
            }
        }
    }
}
