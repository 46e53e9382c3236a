//! Benchmarks for the DKC hash and the full garble/evaluate passes.
//!
//! These are the performance signal for the engines: per-gate cost is
//! dominated by the four (garbling) or two (evaluation) AES-based hashes of
//! each AND-family gate.

#![allow(unused_crate_dependencies)]

use bitvec::vec::BitVec;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use garnet_engine::{
    Dkc, Label, evaluate, garble, generate_delta, generate_label_pairs, select_labels,
};
use rand_chacha::ChaCha20Rng;
use rand_chacha::rand_core::{RngCore, SeedableRng};

fn bench_dkc_hash(c: &mut Criterion) {
    let dkc = Dkc::new([0x2b; 16]);
    let mut x = Label::from([0x51; 16]);
    let mut tweak = 0u64;

    c.bench_function("dkc/hash", |b| {
        b.iter(|| {
            // Chain outputs to prevent constant folding
            tweak = tweak.wrapping_add(1);
            x = dkc.hash(black_box(x), black_box(tweak));
            black_box(x)
        })
    });
}

fn bench_adder(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::seed_from_u64(1);
    let mut key = [0u8; 16];
    rng.fill_bytes(&mut key);

    let circuit = netgen::ripple_adder(64, key);
    let delta = generate_delta(&mut rng);
    let input_pairs = generate_label_pairs(&mut rng, delta, 128);

    c.bench_function("adder64/garble", |b| {
        b.iter(|| garble(black_box(&circuit), &input_pairs, &[], delta).unwrap())
    });

    let garbled = garble(&circuit, &input_pairs, &[], delta).unwrap();
    let mut values = BitVec::new();
    for i in 0..128 {
        values.push(i % 3 == 0);
    }
    let held = select_labels(&input_pairs, &values).unwrap();

    c.bench_function("adder64/evaluate", |b| {
        b.iter(|| evaluate(black_box(&circuit), &garbled.table, &held, &[]).unwrap())
    });
}

criterion_group!(benches, bench_dkc_hash, bench_adder);
criterion_main!(benches);
