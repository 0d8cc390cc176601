//! Golden vector integration tests.
//!
//! Each test decodes a wire-format vector (real calldata where available,
//! hand-assembled words otherwise) through the public API and asserts the
//! full value tree. Round-trip sections drive every schema through
//! encode-then-decode.

use abicodec_core::{AbiType, AbiValue, DecodeError};
use abicodec_evm::{encoder, parse_type, AbiDecoder, Function, FunctionRegistry};
use alloy_primitives::{Address, I256, U256};

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// One word, left-padded with zeros.
fn w(tail: &str) -> String {
    format!("{tail:0>64}")
}

/// One word, right-padded with zeros (byte payload words).
fn data(head: &str) -> String {
    format!("{head:0<64}")
}

fn decode(input: &str, ty_str: &str) -> AbiValue {
    let ty = parse_type(ty_str).expect("type parses");
    AbiDecoder::new()
        .decode(input, 0, &ty)
        .unwrap_or_else(|e| panic!("decode {ty_str} failed: {e}"))
}

fn uint(v: u64) -> AbiValue {
    AbiValue::Uint(U256::from(v), 256)
}

// ─── ERC-20 transfer calldata ─────────────────────────────────────────────────

/// transfer(to=0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045, amount=1000000),
/// as submitted on mainnet.
const TRANSFER_CALLDATA: &str = concat!(
    "0xa9059cbb",
    "000000000000000000000000d8da6bf26964af9d7eed9e03e53415d37aa96045",
    "00000000000000000000000000000000000000000000000000000000000f4240",
);

#[test]
fn erc20_transfer_golden() {
    let mut registry = FunctionRegistry::new();
    registry
        .register_signature("transfer(address,uint256)")
        .unwrap();
    registry
        .register_signature("approve(address,uint256)")
        .unwrap();
    registry.register_signature("balanceOf(address)").unwrap();

    let (func, args) = registry.decode_call(TRANSFER_CALLDATA).unwrap();
    assert_eq!(func.signature(), "transfer(address,uint256)");
    assert_eq!(func.selector_hex(), "0xa9059cbb");

    let to: Address = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"
        .parse()
        .unwrap();
    assert_eq!(args[0], AbiValue::Address(to));
    assert_eq!(args[1], uint(1_000_000));
}

#[test]
fn erc20_balance_return_data() {
    // eth_call return data for balanceOf: a single uint256.
    let func = Function::parse("balanceOf(address)")
        .unwrap()
        .with_outputs(vec![AbiType::Uint(256)]);
    let ret = w("0de0b6b3a7640000"); // 1 ether in wei
    let out = func.decode_output(&ret).unwrap();
    assert_eq!(out, vec![uint(1_000_000_000_000_000_000)]);
}

#[test]
fn uniswap_v2_get_reserves_return_data() {
    // getReserves() → (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast)
    let func = Function::parse("getReserves()")
        .unwrap()
        .with_outputs(vec![
            AbiType::Uint(112),
            AbiType::Uint(112),
            AbiType::Uint(32),
        ]);
    let ret = format!("{}{}{}", w("1bc16d674ec80000"), w("6f05b59d3b200000"), w("65a1b2c0"));
    let out = func.decode_output(&ret).unwrap();
    assert_eq!(
        out,
        vec![
            AbiValue::Uint(U256::from(2_000_000_000_000_000_000u64), 112),
            AbiValue::Uint(U256::from(8_000_000_000_000_000_000u64), 112),
            AbiValue::Uint(U256::from(0x65a1b2c0u64), 32),
        ]
    );
}

// ─── Wire-format scenarios ────────────────────────────────────────────────────

#[test]
fn scenario_atoms() {
    assert_eq!(decode(&w("1"), "bool"), AbiValue::Bool(true));
    assert_eq!(
        decode(&w("ff"), "uint8"),
        AbiValue::Uint(U256::from(255u64), 8)
    );
    assert_eq!(
        decode(&"f".repeat(64), "int8"),
        AbiValue::Int(I256::MINUS_ONE, 8)
    );
    let addr_word = format!("{}{}", "00".repeat(12), "0a".repeat(20));
    assert_eq!(
        decode(&addr_word, "address"),
        AbiValue::Address(Address::repeat_byte(0x0a))
    );
}

#[test]
fn scenario_dynamic_bytes() {
    let input = format!("{}{}", w("3"), data("616263"));
    assert_eq!(
        decode(&input, "bytes"),
        AbiValue::Bytes(vec![0x61, 0x62, 0x63])
    );
}

#[test]
fn scenario_uint_array() {
    let input = format!("{}{}{}{}", w("3"), w("1"), w("2"), w("3"));
    assert_eq!(
        decode(&input, "uint256[]"),
        AbiValue::Array(vec![uint(1), uint(2), uint(3)])
    );
}

#[test]
fn scenario_struct_with_string_tail() {
    let input = format!("{}{}{}{}", w("2a"), w("40"), w("2"), data("6869"));
    assert_eq!(
        decode(&input, "(uint256,string)"),
        AbiValue::Tuple(vec![uint(42), AbiValue::String("hi".into())])
    );
}

#[test]
fn scenario_nested_dynamic_arrays() {
    // [[1, 2], [3]] — two levels of offset indirection.
    let input = format!(
        "{}{}{}{}{}{}{}{}",
        w("2"),
        w("40"),
        w("a0"),
        w("2"),
        w("1"),
        w("2"),
        w("1"),
        w("3"),
    );
    assert_eq!(
        decode(&input, "uint256[][]"),
        AbiValue::Array(vec![
            AbiValue::Array(vec![uint(1), uint(2)]),
            AbiValue::Array(vec![uint(3)]),
        ])
    );
}

#[test]
fn scenario_struct_of_arrays() {
    // (uint256[], string): both fields dynamic; tails ordered after the
    // two-word head region.
    let input = format!(
        "{}{}{}{}{}{}{}",
        w("40"),        // uint256[] tail at byte 64
        w("a0"),        // string tail at byte 160
        w("2"),         // array length
        w("5"),
        w("7"),
        w("3"),         // string length
        data("616263"), // "abc"
    );
    assert_eq!(
        decode(&input, "(uint256[],string)"),
        AbiValue::Tuple(vec![
            AbiValue::Array(vec![uint(5), uint(7)]),
            AbiValue::String("abc".into()),
        ])
    );
}

// ─── Failure taxonomy ─────────────────────────────────────────────────────────

#[test]
fn failure_length_overflow() {
    let length = format!("{:0>64}", format!("1{}", "0".repeat(50))); // 2^200
    let ty = parse_type("uint256[]").unwrap();
    assert!(matches!(
        AbiDecoder::new().decode(&length, 0, &ty),
        Err(DecodeError::LengthOverflow { .. })
    ));
}

#[test]
fn failure_zero_length_static_array() {
    let ty = AbiType::FixedArray(Box::new(AbiType::Uint(256)), 0);
    assert!(matches!(
        AbiDecoder::new().decode(&w("0"), 0, &ty),
        Err(DecodeError::InvalidSchema { .. })
    ));
}

#[test]
fn failure_backwards_offsets() {
    let input = format!(
        "{}{}{}{}{}{}",
        w("80"),
        w("40"),
        w("2"),
        data("6869"),
        w("2"),
        data("6869"),
    );
    let ty = parse_type("(string,string)").unwrap();
    assert!(matches!(
        AbiDecoder::new().decode(&input, 0, &ty),
        Err(DecodeError::OffsetOutOfRange { .. })
    ));
}

#[test]
fn failure_truncated_word() {
    let ty = parse_type("uint256").unwrap();
    assert!(matches!(
        AbiDecoder::new().decode("00ff", 0, &ty),
        Err(DecodeError::TruncatedInput { .. })
    ));
}

#[test]
fn failure_non_hex_input() {
    let ty = parse_type("uint256").unwrap();
    let input = "zz".repeat(32);
    assert!(matches!(
        AbiDecoder::new().decode(&input, 0, &ty),
        Err(DecodeError::InvalidHex(_))
    ));
}

#[test]
fn failure_fixed_point_unsupported() {
    let ty = parse_type("fixed128x18").unwrap();
    assert!(matches!(
        AbiDecoder::new().decode(&w("1"), 0, &ty),
        Err(DecodeError::Unsupported { .. })
    ));
}

// ─── Round trips ──────────────────────────────────────────────────────────────

/// Encode each fixture and decode it back; the trees must match exactly.
#[test]
fn round_trip_fixtures() {
    let fixtures: Vec<(&str, AbiValue)> = vec![
        ("bool", AbiValue::Bool(true)),
        ("uint256", AbiValue::Uint(U256::MAX, 256)),
        (
            "int256",
            AbiValue::Int(I256::try_from(-1234567890i64).unwrap(), 256),
        ),
        ("address", AbiValue::Address(Address::repeat_byte(0x7f))),
        ("bytes8", AbiValue::FixedBytes(vec![1, 2, 3, 4, 5, 6, 7, 8])),
        ("bytes", AbiValue::Bytes((0u8..75).collect())),
        ("string", AbiValue::String("héllo wörld".into())),
        ("bytes", AbiValue::Bytes(vec![])),
        (
            "uint256[3]",
            AbiValue::FixedArray(vec![uint(1), uint(2), uint(3)]),
        ),
        (
            "string[2]",
            AbiValue::FixedArray(vec![
                AbiValue::String("one".into()),
                AbiValue::String("two".into()),
            ]),
        ),
        ("uint8[]", AbiValue::Array(vec![])),
        (
            "bytes[]",
            AbiValue::Array(vec![
                AbiValue::Bytes(vec![0xaa; 33]),
                AbiValue::Bytes(vec![]),
                AbiValue::Bytes(vec![0xbb]),
            ]),
        ),
        (
            "(uint256,(string,bytes))",
            AbiValue::Tuple(vec![
                uint(99),
                AbiValue::Tuple(vec![
                    AbiValue::String("nested".into()),
                    AbiValue::Bytes(vec![9, 9, 9]),
                ]),
            ]),
        ),
        (
            "(address,uint256)[]",
            AbiValue::Array(vec![
                AbiValue::Tuple(vec![
                    AbiValue::Address(Address::repeat_byte(1)),
                    uint(10),
                ]),
                AbiValue::Tuple(vec![
                    AbiValue::Address(Address::repeat_byte(2)),
                    uint(20),
                ]),
            ]),
        ),
        (
            "(string,uint256)[2]",
            AbiValue::FixedArray(vec![
                AbiValue::Tuple(vec![AbiValue::String("a".into()), uint(1)]),
                AbiValue::Tuple(vec![AbiValue::String("b".into()), uint(2)]),
            ]),
        ),
        (
            "uint256[][]",
            AbiValue::Array(vec![
                AbiValue::Array(vec![uint(1), uint(2)]),
                AbiValue::Array(vec![uint(3)]),
                AbiValue::Array(vec![]),
            ]),
        ),
    ];

    let decoder = AbiDecoder::new();
    for (ty_str, value) in fixtures {
        let ty = parse_type(ty_str).expect("fixture type parses");
        let encoded = encoder::encode_value(&value)
            .unwrap_or_else(|e| panic!("encode {ty_str} failed: {e}"));
        let decoded = decoder
            .decode(&encoded, 0, &ty)
            .unwrap_or_else(|e| panic!("round trip {ty_str} failed: {e}\ninput: {encoded}"));
        assert_eq!(decoded, value, "round trip mismatch for {ty_str}");
    }
}

/// Word alignment: a static schema consumes exactly word_count * 64 hex chars.
#[test]
fn static_encodings_are_word_aligned() {
    for ty_str in ["bool", "uint256", "address", "bytes32", "uint8[4]", "(bool,uint256)"] {
        let ty = parse_type(ty_str).unwrap();
        assert!(!ty.is_dynamic(), "{ty_str} should be static");
        let hex_len = ty.word_count() * 64;
        // A buffer of exactly that many chars decodes; one word fewer fails.
        let input = "0".repeat(hex_len);
        assert!(AbiDecoder::new().decode(&input, 0, &ty).is_ok());
        if hex_len >= 64 {
            let short = "0".repeat(hex_len - 64);
            assert!(AbiDecoder::new().decode(&short, 0, &ty).is_err());
        }
    }
}

/// The decoded tree serialises to stable JSON (CLI and downstream consumers
/// rely on the tagged layout).
#[test]
fn decoded_tree_serialises() {
    let input = format!("{}{}{}{}", w("2a"), w("40"), w("2"), data("6869"));
    let value = decode(&input, "(uint256,string)");
    let json = serde_json::to_value(&value).unwrap();
    assert_eq!(json["type"], "tuple");
    assert_eq!(json["value"][1]["type"], "string");
    assert_eq!(json["value"][1]["value"], "hi");
}
