use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use csvf_format::{Config, compress::compress, convert_bytes, expand};

/// A program shaped like typical flash programming: many compares with sparse data.
fn program(shifts: usize) -> Vec<u8> {
    let mut xsvf = vec![0x12, 0x00, 0x12, 0x01, 0x08, 0x00, 0x00, 0x04, 0x00];
    for i in 0..shifts {
        xsvf.push(0x09);
        for j in 0..2 * 128 {
            xsvf.push(if (i + j) % 37 == 0 { 0xA5 } else { 0x00 });
        }
        xsvf.extend_from_slice(&[0x04, 0x00, 0x00, 0x00, 0x64]);
    }
    xsvf.push(0x00);
    xsvf
}

fn bench_conversion(c: &mut Criterion) {
    let xsvf = program(256);
    let config = Config::default();

    c.bench_function("convert", |b| {
        b.iter(|| convert_bytes(black_box(&xsvf), &config).unwrap())
    });

    c.bench_function("compress", |b| {
        b.iter(|| {
            let mut out: Vec<u8> = Vec::with_capacity(xsvf.len());
            compress(black_box(&xsvf), &mut out).unwrap();
            out
        })
    });

    let csvf = convert_bytes(&xsvf, &config).unwrap().csvf;
    c.bench_function("expand", |b| b.iter(|| expand(black_box(&csvf)).unwrap()));
}

criterion_group!(benches, bench_conversion);
criterion_main!(benches);
