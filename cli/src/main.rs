//! abicodec CLI — decode and encode Ethereum ABI data from the command line.
//!
//! # Commands
//! ```
//! abicodec decode      --type <solidity-type> --data <hex>
//! abicodec decode-call --sig <signature> --calldata <hex>
//! abicodec encode      --type <solidity-type> --value <json>
//! abicodec selector    --sig <signature>
//! abicodec info
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use abicodec_core::{AbiType, AbiValue};
use abicodec_evm::{encoder, parse_type, AbiDecoder, DecoderConfig, Function};
use alloy_primitives::{Address, I256, U256};

#[derive(Parser)]
#[command(
    name = "abicodec",
    about = "Ethereum ABI codec — decode, encode, and inspect contract data",
    version
)]
struct Cli {
    /// Enable verbose (debug) logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode ABI data against a Solidity type
    Decode {
        /// Solidity type, e.g. "(uint256,string)" or "uint256[2][]"
        #[arg(long = "type")]
        ty: String,
        /// ABI-encoded data (hex, with or without 0x prefix)
        #[arg(long)]
        data: String,
        /// Hex-char offset to start decoding at
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// Reject malformed UTF-8 in strings instead of replacing it
        #[arg(long)]
        strict_utf8: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode function calldata using a human-readable signature
    #[command(name = "decode-call")]
    DecodeCall {
        /// Function signature, e.g. "transfer(address,uint256)"
        #[arg(long)]
        sig: String,
        /// Full calldata including the 4-byte selector
        #[arg(long)]
        calldata: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Encode a JSON value to ABI data
    Encode {
        /// Solidity type the value should be encoded as
        #[arg(long = "type")]
        ty: String,
        /// JSON value, e.g. '[42, "hi"]' for a (uint256,string) tuple
        #[arg(long)]
        value: String,
    },

    /// Print the 4-byte selector of a function signature
    Selector {
        /// Function signature, e.g. "transfer(address,uint256)"
        #[arg(long)]
        sig: String,
    },

    /// Show build and capability info
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Decode {
            ty,
            data,
            offset,
            strict_utf8,
            json,
        } => cmd_decode(&ty, &data, offset, strict_utf8, json),
        Commands::DecodeCall { sig, calldata, json } => cmd_decode_call(&sig, &calldata, json),
        Commands::Encode { ty, value } => cmd_encode(&ty, &value),
        Commands::Selector { sig } => cmd_selector(&sig),
        Commands::Info => cmd_info(),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ─── Command implementations ─────────────────────────────────────────────────

fn cmd_decode(ty: &str, data: &str, offset: usize, strict_utf8: bool, as_json: bool) -> Result<()> {
    let schema = parse_type(ty).with_context(|| format!("parse type '{ty}'"))?;
    let hex_data = data.strip_prefix("0x").unwrap_or(data);

    let decoder = AbiDecoder::with_config(DecoderConfig {
        strict_utf8,
        ..Default::default()
    });
    let value = decoder
        .decode(hex_data, offset, &schema)
        .with_context(|| format!("decode as {schema}"))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{value}");
    }
    Ok(())
}

fn cmd_decode_call(sig: &str, calldata: &str, as_json: bool) -> Result<()> {
    let func = Function::parse(sig).with_context(|| format!("parse signature '{sig}'"))?;
    let args = func.decode_input(calldata)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&args)?);
    } else {
        println!("Function:  {}", func.signature());
        println!("Selector:  {}", func.selector_hex());
        println!("Inputs:");
        for (ty, value) in func.inputs.iter().zip(args.iter()) {
            println!("  {ty}: {value}");
        }
    }
    Ok(())
}

fn cmd_encode(ty: &str, value_json: &str) -> Result<()> {
    let schema = parse_type(ty).with_context(|| format!("parse type '{ty}'"))?;
    let json: serde_json::Value = serde_json::from_str(value_json).context("parse value JSON")?;
    let value = value_from_json(&schema, &json)?;
    let encoded = encoder::encode_value(&value)?;
    println!("0x{encoded}");
    Ok(())
}

fn cmd_selector(sig: &str) -> Result<()> {
    let func = Function::parse(sig).with_context(|| format!("parse signature '{sig}'"))?;
    println!("{}  {}", func.selector_hex(), func.signature());
    Ok(())
}

fn cmd_info() -> Result<()> {
    println!("abicodec v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Capabilities:");
    println!("  ✓ ABI decoding              (schema-driven, head/tail layout)");
    println!("  ✓ ABI encoding              (inverse operation)");
    println!("  ✓ Type-string parsing       (atoms, arrays, nested tuples)");
    println!("  ✓ Function selectors        (keccak256 fingerprints)");
    println!("  ✓ Calldata / return decode  (signature-driven)");
    println!();
    println!("Unsupported:                  fixed/ufixed decoding (grammar only)");
    Ok(())
}

// ─── JSON → AbiValue ─────────────────────────────────────────────────────────

/// Build an `AbiValue` from JSON, guided by the target schema. Numbers may be
/// JSON integers or strings (decimal or 0x-hex); byte payloads are 0x-hex
/// strings.
fn value_from_json(ty: &AbiType, json: &serde_json::Value) -> Result<AbiValue> {
    use serde_json::Value;

    match ty {
        AbiType::Bool => match json {
            Value::Bool(b) => Ok(AbiValue::Bool(*b)),
            other => bail!("expected a bool for {ty}, got {other}"),
        },
        AbiType::Uint(bits) => {
            let value = match json {
                Value::Number(n) => {
                    let n = n.as_u64().with_context(|| format!("{n} is not a u64"))?;
                    U256::from(n)
                }
                Value::String(s) => s.parse::<U256>().with_context(|| format!("parse '{s}'"))?,
                other => bail!("expected a number or string for {ty}, got {other}"),
            };
            Ok(AbiValue::Uint(value, *bits))
        }
        AbiType::Int(bits) => {
            let value = match json {
                Value::Number(n) => {
                    let n = n.as_i64().with_context(|| format!("{n} is not an i64"))?;
                    I256::try_from(n).context("out of range")?
                }
                Value::String(s) => s.parse::<I256>().with_context(|| format!("parse '{s}'"))?,
                other => bail!("expected a number or string for {ty}, got {other}"),
            };
            Ok(AbiValue::Int(value, *bits))
        }
        AbiType::Address => match json {
            Value::String(s) => {
                let addr: Address = s.parse().with_context(|| format!("parse address '{s}'"))?;
                Ok(AbiValue::Address(addr))
            }
            other => bail!("expected an address string for {ty}, got {other}"),
        },
        AbiType::FixedBytes(n) => {
            let bytes = hex_bytes_from_json(ty, json)?;
            if bytes.len() != *n {
                bail!("{ty} needs exactly {n} bytes, got {}", bytes.len());
            }
            Ok(AbiValue::FixedBytes(bytes))
        }
        AbiType::Bytes => Ok(AbiValue::Bytes(hex_bytes_from_json(ty, json)?)),
        AbiType::String => match json {
            Value::String(s) => Ok(AbiValue::String(s.clone())),
            other => bail!("expected a string for {ty}, got {other}"),
        },
        AbiType::FixedArray(elem, n) => {
            let items = array_from_json(ty, json)?;
            if items.len() != *n {
                bail!("{ty} needs exactly {n} elements, got {}", items.len());
            }
            let values: Result<Vec<_>> =
                items.iter().map(|item| value_from_json(elem, item)).collect();
            Ok(AbiValue::FixedArray(values?))
        }
        AbiType::Array(elem) => {
            let items = array_from_json(ty, json)?;
            let values: Result<Vec<_>> =
                items.iter().map(|item| value_from_json(elem, item)).collect();
            Ok(AbiValue::Array(values?))
        }
        AbiType::Tuple(fields) => {
            let items = array_from_json(ty, json)?;
            if items.len() != fields.len() {
                bail!("{ty} needs {} components, got {}", fields.len(), items.len());
            }
            let values: Result<Vec<_>> = fields
                .iter()
                .zip(items.iter())
                .map(|(field, item)| value_from_json(field, item))
                .collect();
            Ok(AbiValue::Tuple(values?))
        }
        AbiType::Fixed(..) | AbiType::Ufixed(..) => {
            bail!("{ty} is not supported for encoding")
        }
    }
}

fn hex_bytes_from_json(ty: &AbiType, json: &serde_json::Value) -> Result<Vec<u8>> {
    match json {
        serde_json::Value::String(s) => {
            let s = s.strip_prefix("0x").unwrap_or(s);
            hex::decode(s).with_context(|| format!("parse hex for {ty}"))
        }
        other => bail!("expected a 0x-hex string for {ty}, got {other}"),
    }
}

fn array_from_json<'a>(
    ty: &AbiType,
    json: &'a serde_json::Value,
) -> Result<&'a Vec<serde_json::Value>> {
    match json {
        serde_json::Value::Array(items) => Ok(items),
        other => bail!("expected a JSON array for {ty}, got {other}"),
    }
}
