//! Benchmarks for transfer curve generation and lookup.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use perdak::dsp::curve::{CurveShape, TransferCurve};

use crate::BLOCK_SIZES;

const SHAPES: &[(&str, CurveShape)] = &[
    ("saturate", CurveShape::Saturate(12.0)),
    ("fuzz", CurveShape::Fuzz(3.0)),
    ("hard_clip", CurveShape::HardClip(0.6)),
    ("fold", CurveShape::Fold(3.0)),
];

pub fn bench_curve(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/curve");

    // Tabulation happens once per mode when the catalog is built
    group.bench_function("generate_fold", |b| {
        b.iter(|| TransferCurve::generate(black_box(CurveShape::Fold(3.0))))
    });

    for &size in BLOCK_SIZES {
        // Sweep past both ends so the clamped edges are exercised too
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 3.0 - 1.5)
            .collect();

        for (name, shape) in SHAPES {
            let curve = TransferCurve::generate(*shape);
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(*name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    curve.apply_buffer(black_box(&mut buffer));
                })
            });
        }
    }

    group.finish();
}
