//! Decode throughput benchmarks.
//!
//! Measures the decoder on three shapes: a flat static tuple (ERC-20
//! transfer arguments), a dynamic struct with a string tail, and a nested
//! dynamic array — the three layout regimes the engine distinguishes.
//!
//! # Running
//! ```bash
//! cargo bench --package abicodec-evm
//! ```

use abicodec_evm::{encoder, parse_type, AbiDecoder};
use abicodec_core::AbiValue;
use alloy_primitives::{Address, U256};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn encoded_fixture(value: &AbiValue) -> String {
    encoder::encode_value(value).expect("fixture encodes")
}

fn bench_decode(c: &mut Criterion) {
    let decoder = AbiDecoder::new();

    let flat_ty = parse_type("(address,uint256)").unwrap();
    let flat = encoded_fixture(&AbiValue::Tuple(vec![
        AbiValue::Address(Address::repeat_byte(0x42)),
        AbiValue::Uint(U256::from(1_000_000u64), 256),
    ]));

    let tail_ty = parse_type("(uint256,string)").unwrap();
    let tail = encoded_fixture(&AbiValue::Tuple(vec![
        AbiValue::Uint(U256::from(42u64), 256),
        AbiValue::String("the quick brown fox jumps over the lazy dog".into()),
    ]));

    let nested_ty = parse_type("uint256[][]").unwrap();
    let nested = encoded_fixture(&AbiValue::Array(
        (0..16)
            .map(|i| {
                AbiValue::Array(
                    (0..16)
                        .map(|j| AbiValue::Uint(U256::from((i * 16 + j) as u64), 256))
                        .collect(),
                )
            })
            .collect(),
    ));

    let mut group = c.benchmark_group("decode");
    for (name, input, ty) in [
        ("flat_static_tuple", &flat, &flat_ty),
        ("dynamic_struct_with_tail", &tail, &tail_ty),
        ("nested_dynamic_arrays", &nested, &nested_ty),
    ] {
        group.throughput(Throughput::Bytes((input.len() / 2) as u64));
        group.bench_function(name, |b| {
            b.iter(|| decoder.decode(black_box(input), 0, ty).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
