//! Solidity type-string parsing.
//!
//! Builds [`AbiType`] schema trees from canonical type names: `uint256`,
//! `bytes32`, `uint256[2][]`, `(address,(string,bytes)[])`. Aliases without
//! an explicit width (`uint`, `int`, `fixed`, `ufixed`) resolve to their
//! canonical widths. Fixed-point grammar is recognised even though decoding
//! it is unsupported, mirroring Solidity itself.

use abicodec_core::{AbiType, ParseError};

/// Parse a single Solidity type string into a schema node.
pub fn parse_type(s: &str) -> Result<AbiType, ParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ParseError::Empty);
    }
    // Array suffixes bind left to right, so the trailing suffix is the
    // outermost type.
    if s.ends_with(']') {
        let open = s.rfind('[').ok_or_else(|| ParseError::Unbalanced { ty: s.to_string() })?;
        let inner = parse_type(&s[..open])?;
        let suffix = &s[open + 1..s.len() - 1];
        if suffix.is_empty() {
            return Ok(AbiType::Array(Box::new(inner)));
        }
        let n: usize = suffix
            .parse()
            .map_err(|_| ParseError::InvalidArraySuffix {
                ty: s.to_string(),
                reason: format!("'{suffix}' is not a length"),
            })?;
        if n == 0 {
            return Err(ParseError::InvalidArraySuffix {
                ty: s.to_string(),
                reason: "zero-length static array".into(),
            });
        }
        return Ok(AbiType::FixedArray(Box::new(inner), n));
    }
    if let Some(body) = s.strip_prefix('(') {
        let body = body
            .strip_suffix(')')
            .ok_or_else(|| ParseError::Unbalanced { ty: s.to_string() })?;
        return Ok(AbiType::Tuple(split_components(body, s)?));
    }
    parse_base(s)
}

/// Split a tuple body on top-level commas and parse each component.
fn split_components(body: &str, whole: &str) -> Result<Vec<AbiType>, ParseError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut fields = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| ParseError::Unbalanced { ty: whole.to_string() })?;
            }
            ',' if depth == 0 => {
                fields.push(parse_type(&body[start..i])?);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(ParseError::Unbalanced { ty: whole.to_string() });
    }
    fields.push(parse_type(&body[start..])?);
    Ok(fields)
}

fn parse_base(s: &str) -> Result<AbiType, ParseError> {
    match s {
        "bool" => return Ok(AbiType::Bool),
        "address" => return Ok(AbiType::Address),
        "string" => return Ok(AbiType::String),
        "bytes" => return Ok(AbiType::Bytes),
        "uint" => return Ok(AbiType::Uint(256)),
        "int" => return Ok(AbiType::Int(256)),
        "ufixed" => return Ok(AbiType::Ufixed(128, 18)),
        "fixed" => return Ok(AbiType::Fixed(128, 18)),
        _ => {}
    }
    if let Some(digits) = s.strip_prefix("uint") {
        return Ok(AbiType::Uint(parse_int_width(s, digits)?));
    }
    if let Some(digits) = s.strip_prefix("int") {
        return Ok(AbiType::Int(parse_int_width(s, digits)?));
    }
    if let Some(digits) = s.strip_prefix("bytes") {
        let n: usize = digits.parse().map_err(|_| ParseError::UnknownType { ty: s.to_string() })?;
        if n == 0 || n > 32 {
            return Err(ParseError::InvalidWidth {
                ty: s.to_string(),
                reason: format!("bytes{n} is outside bytes1..bytes32"),
            });
        }
        return Ok(AbiType::FixedBytes(n));
    }
    if let Some(dims) = s.strip_prefix("ufixed") {
        let (m, n) = parse_fixed_dims(s, dims)?;
        return Ok(AbiType::Ufixed(m, n));
    }
    if let Some(dims) = s.strip_prefix("fixed") {
        let (m, n) = parse_fixed_dims(s, dims)?;
        return Ok(AbiType::Fixed(m, n));
    }
    Err(ParseError::UnknownType { ty: s.to_string() })
}

fn parse_int_width(ty: &str, digits: &str) -> Result<usize, ParseError> {
    let bits: usize = digits
        .parse()
        .map_err(|_| ParseError::UnknownType { ty: ty.to_string() })?;
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(ParseError::InvalidWidth {
            ty: ty.to_string(),
            reason: format!("width {bits} is not a multiple of 8 in 8..=256"),
        });
    }
    Ok(bits)
}

/// `MxN` dimensions of a fixed-point type: M in 8..=256 (multiple of 8),
/// N in 1..=80.
fn parse_fixed_dims(ty: &str, dims: &str) -> Result<(usize, usize), ParseError> {
    let (m, n) = dims
        .split_once('x')
        .ok_or_else(|| ParseError::UnknownType { ty: ty.to_string() })?;
    let m: usize = m
        .parse()
        .map_err(|_| ParseError::UnknownType { ty: ty.to_string() })?;
    let n: usize = n
        .parse()
        .map_err(|_| ParseError::UnknownType { ty: ty.to_string() })?;
    if m == 0 || m > 256 || m % 8 != 0 || n == 0 || n > 80 {
        return Err(ParseError::InvalidWidth {
            ty: ty.to_string(),
            reason: format!("{m}x{n} is outside MxN with M in 8..=256, N in 1..=80"),
        });
    }
    Ok((m, n))
}
