//! # abicodec-evm
//!
//! The Ethereum ABI wire engine: a schema-driven decoder for the canonical
//! contract ABI encoding, its inverse encoder, a Solidity type-string parser,
//! and the function-call layer on top.
//!
//! ## Implementation notes
//! - Input is unprefixed hex; one 32-byte word is 64 hex chars, and offsets
//!   are hex-char counts (byte offsets doubled)
//! - Dispatch is a single tag switch over the pre-built [`AbiType`] schema —
//!   struct field lists live in the schema node, never discovered at runtime
//! - Dynamic values occupy one offset word in their container's head region;
//!   the payload lives in the tail, and the layout recurs arbitrarily
//!
//! [`AbiType`]: abicodec_core::AbiType

pub mod decoder;
pub mod encoder;
pub mod function;
pub mod typeref;
pub mod word;

pub use decoder::{decode, AbiDecoder, DecoderConfig};
pub use function::{Function, FunctionRegistry};
pub use typeref::parse_type;
