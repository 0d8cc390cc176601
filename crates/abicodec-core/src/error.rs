//! Error types for the abicodec decode/encode pipeline.

use thiserror::Error;

/// Errors that can occur while decoding ABI data.
///
/// Errors propagate to the top-level `decode` call verbatim; the decoder
/// never returns a partial value tree.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("input truncated: need {needed} hex chars at offset {offset}, input has {len}")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        len: usize,
    },

    #[error("invalid hex in input: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("invalid schema: {reason}")]
    InvalidSchema { reason: String },

    #[error("offset out of range: {offset} (input length {len})")]
    OffsetOutOfRange { offset: usize, len: usize },

    #[error("declared length out of range: {reason}")]
    LengthOverflow { reason: String },

    #[error("string payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("unsupported type: {ty}")]
    Unsupported { ty: String },

    #[error("selector mismatch: calldata starts with {got}, function is {expected}")]
    SelectorMismatch { expected: String, got: String },

    #[error("no function registered for selector {selector}")]
    UnknownSelector { selector: String },
}

/// Errors from the encoder (the inverse operation).
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("value cannot be encoded: {reason}")]
    InvalidValue { reason: String },

    #[error("argument count mismatch: expected {expected}, got {got}")]
    ArityMismatch { expected: usize, got: usize },
}

/// Errors from the Solidity type-string and signature parser.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("empty type string")]
    Empty,

    #[error("unknown type '{ty}'")]
    UnknownType { ty: String },

    #[error("invalid width in '{ty}': {reason}")]
    InvalidWidth { ty: String, reason: String },

    #[error("invalid array suffix in '{ty}': {reason}")]
    InvalidArraySuffix { ty: String, reason: String },

    #[error("unbalanced parentheses in '{ty}'")]
    Unbalanced { ty: String },

    #[error("invalid signature '{sig}': {reason}")]
    InvalidSignature { sig: String, reason: String },
}
