//! Function signatures, selectors, and the calldata layer.
//!
//! A [`Function`] is parsed from a human-readable signature like
//! `transfer(address,uint256)`. Its selector is the first four bytes of the
//! keccak256 of the canonical signature; calldata is the selector followed by
//! the ABI-encoded argument tuple. The [`FunctionRegistry`] resolves raw
//! calldata to a registered function by its selector prefix.

use std::collections::HashMap;

use abicodec_core::{AbiType, AbiValue, DecodeError, EncodeError, ParseError};
use tiny_keccak::{Hasher, Keccak};
use tracing::debug;

use crate::decoder::AbiDecoder;
use crate::encoder;
use crate::typeref;

/// A function's ABI surface: name, input schema, output schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub inputs: Vec<AbiType>,
    pub outputs: Vec<AbiType>,
}

impl Function {
    /// Parse a human-readable signature, e.g. `transfer(address,uint256)`.
    /// Outputs start empty; attach them with [`Function::with_outputs`].
    pub fn parse(sig: &str) -> Result<Self, ParseError> {
        let sig = sig.trim();
        let open = sig.find('(').ok_or_else(|| ParseError::InvalidSignature {
            sig: sig.to_string(),
            reason: "missing '('".into(),
        })?;
        let name = &sig[..open];
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        {
            return Err(ParseError::InvalidSignature {
                sig: sig.to_string(),
                reason: format!("bad function name '{name}'"),
            });
        }
        // The argument list is exactly a tuple body.
        let inputs = match typeref::parse_type(&sig[open..])? {
            AbiType::Tuple(fields) => fields,
            other => vec![other],
        };
        Ok(Self {
            name: name.to_string(),
            inputs,
            outputs: Vec::new(),
        })
    }

    pub fn with_outputs(mut self, outputs: Vec<AbiType>) -> Self {
        self.outputs = outputs;
        self
    }

    /// The canonical signature — the exact string that is fingerprinted.
    pub fn signature(&self) -> String {
        let inputs: Vec<_> = self.inputs.iter().map(ToString::to_string).collect();
        format!("{}({})", self.name, inputs.join(","))
    }

    /// First four bytes of `keccak256(signature)`.
    pub fn selector(&self) -> [u8; 4] {
        let mut hasher = Keccak::v256();
        let mut output = [0u8; 32];
        hasher.update(self.signature().as_bytes());
        hasher.finalize(&mut output);
        [output[0], output[1], output[2], output[3]]
    }

    /// Selector as a hex string (`0xaabbccdd`).
    pub fn selector_hex(&self) -> String {
        format!("0x{}", hex::encode(self.selector()))
    }

    /// Decode full calldata — selector prefix plus argument tuple — against
    /// the input schema. The selector must match this function's.
    pub fn decode_input(&self, calldata: &str) -> Result<Vec<AbiValue>, DecodeError> {
        let data = calldata.strip_prefix("0x").unwrap_or(calldata);
        if data.len() < 8 {
            return Err(DecodeError::TruncatedInput {
                offset: 0,
                needed: 8,
                len: data.len(),
            });
        }
        let (selector, args) = data.split_at(8);
        let expected = hex::encode(self.selector());
        if !selector.eq_ignore_ascii_case(&expected) {
            return Err(DecodeError::SelectorMismatch {
                expected: format!("0x{expected}"),
                got: format!("0x{}", selector.to_ascii_lowercase()),
            });
        }
        AbiDecoder::new().decode_sequence(args, 0, &self.inputs)
    }

    /// Decode return data against the output schema.
    pub fn decode_output(&self, data: &str) -> Result<Vec<AbiValue>, DecodeError> {
        let data = data.strip_prefix("0x").unwrap_or(data);
        AbiDecoder::new().decode_sequence(data, 0, &self.outputs)
    }

    /// Encode a call: `0x` + selector + ABI-encoded argument tuple.
    pub fn encode_input(&self, args: &[AbiValue]) -> Result<String, EncodeError> {
        if args.len() != self.inputs.len() {
            return Err(EncodeError::ArityMismatch {
                expected: self.inputs.len(),
                got: args.len(),
            });
        }
        Ok(format!(
            "0x{}{}",
            hex::encode(self.selector()),
            encoder::encode_sequence(args)?
        ))
    }
}

/// Selector-keyed function registry: register signatures once, then resolve
/// raw calldata to `(function, decoded arguments)`. Registering a second
/// function with the same selector replaces the first.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    by_selector: HashMap<[u8; 4], Function>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, function: Function) {
        self.by_selector.insert(function.selector(), function);
    }

    /// Parse and register a signature in one step.
    pub fn register_signature(&mut self, sig: &str) -> Result<(), ParseError> {
        self.register(Function::parse(sig)?);
        Ok(())
    }

    pub fn get(&self, selector: [u8; 4]) -> Option<&Function> {
        self.by_selector.get(&selector)
    }

    pub fn len(&self) -> usize {
        self.by_selector.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_selector.is_empty()
    }

    /// Resolve calldata by its selector prefix and decode the arguments.
    pub fn decode_call(&self, calldata: &str) -> Result<(&Function, Vec<AbiValue>), DecodeError> {
        let data = calldata.strip_prefix("0x").unwrap_or(calldata);
        if data.len() < 8 {
            return Err(DecodeError::TruncatedInput {
                offset: 0,
                needed: 8,
                len: data.len(),
            });
        }
        let mut selector = [0u8; 4];
        hex::decode_to_slice(&data[..8], &mut selector)?;
        let function =
            self.by_selector
                .get(&selector)
                .ok_or_else(|| DecodeError::UnknownSelector {
                    selector: format!("0x{}", hex::encode(selector)),
                })?;
        debug!(function = %function.signature(), "decoding calldata");
        let values = AbiDecoder::new().decode_sequence(&data[8..], 0, &function.inputs)?;
        Ok((function, values))
    }
}
