use criterion::{black_box, criterion_group, criterion_main, Criterion};
use halfpack_accel::{
    bf16_encode_batch, dot_bf16, f16_decode_batch, f16_encode_batch, scalar, Backend,
};
use halfpack_core::convert::f32_to_bf16_nearest;

const N: usize = 1 << 16;

fn make_floats() -> Vec<f32> {
    (0..N).map(|i| (i as f32) * 0.37 - 9000.0).collect()
}

fn make_patterns() -> Vec<u16> {
    (0..N).map(|i| (i as u16).wrapping_mul(0x9E37)).collect()
}

fn bench_f16_decode(c: &mut Criterion) {
    let input = make_patterns();
    let mut output = vec![0.0f32; N];
    let name = format!("f16_decode_64k_{:?}", Backend::cached());
    c.bench_function(&name, |b| {
        b.iter(|| f16_decode_batch(black_box(&input), black_box(&mut output)))
    });
    c.bench_function("f16_decode_64k_scalar", |b| {
        b.iter(|| scalar::f16_decode_batch(black_box(&input), black_box(&mut output)))
    });
}

fn bench_f16_encode(c: &mut Criterion) {
    let input = make_floats();
    let mut output = vec![0u16; N];
    let name = format!("f16_encode_64k_{:?}", Backend::cached());
    c.bench_function(&name, |b| {
        b.iter(|| f16_encode_batch(black_box(&input), black_box(&mut output)))
    });
    c.bench_function("f16_encode_64k_scalar", |b| {
        b.iter(|| scalar::f16_encode_batch(black_box(&input), black_box(&mut output)))
    });
}

fn bench_bf16_encode(c: &mut Criterion) {
    let input = make_floats();
    let mut output = vec![0u16; N];
    let name = format!("bf16_encode_64k_{:?}", Backend::cached());
    c.bench_function(&name, |b| {
        b.iter(|| bf16_encode_batch(black_box(&input), black_box(&mut output)))
    });
}

fn bench_dot_bf16(c: &mut Criterion) {
    let floats = make_floats();
    let a: Vec<u16> = floats.iter().map(|&v| f32_to_bf16_nearest(v)).collect();
    let b_vals: Vec<u16> = floats.iter().map(|&v| f32_to_bf16_nearest(v * 0.5)).collect();
    c.bench_function("dot_bf16_64k", |b| {
        b.iter(|| dot_bf16(black_box(&a), black_box(&b_vals)))
    });
}

criterion_group!(
    benches,
    bench_f16_decode,
    bench_f16_encode,
    bench_bf16_encode,
    bench_dot_bf16,
);
criterion_main!(benches);
