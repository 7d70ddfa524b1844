use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vsp_crypto::{AddressDeriver, FeeKeyChain, FeeSeed};

fn fee_address_derive_bench(c: &mut Criterion) {
    let chain = FeeKeyChain::new(FeeSeed::new([7u8; 32]), "Ds");
    let mut index = 0u32;

    c.bench_function("fee_address_derive", |b| {
        b.iter(|| {
            index = (index + 1) % 1_000_000;
            chain.derive(black_box(index))
        })
    });
}

fn fee_address_validate_bench(c: &mut Criterion) {
    let chain = FeeKeyChain::new(FeeSeed::new([7u8; 32]), "Ds");
    let addr = chain.derive(1).expect("index in range");

    c.bench_function("fee_address_validate", |b| {
        b.iter(|| vsp_crypto::validate_fee_address("Ds", black_box(addr.as_str())))
    });
}

fn fee_seed_parse_bench(c: &mut Criterion) {
    let hex = "5a".repeat(32);

    c.bench_function("fee_seed_from_hex", |b| {
        b.iter(|| FeeSeed::from_hex(black_box(&hex)))
    });
}

criterion_group!(
    benches,
    fee_address_derive_bench,
    fee_address_validate_bench,
    fee_seed_parse_bench
);
criterion_main!(benches);
