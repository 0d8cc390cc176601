//! # abicodec-core
//!
//! Canonical type system, decoded value tree, and error taxonomy shared by
//! the abicodec crates. The wire-format engine (decoder, encoder, type-string
//! parser, function-call layer) lives in `abicodec-evm` and is built on the
//! types defined here.

pub mod error;
pub mod types;

pub use error::{DecodeError, EncodeError, ParseError};
pub use types::{AbiType, AbiValue};
