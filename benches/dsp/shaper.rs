//! Benchmarks for the waveshaping node at each oversampling factor.

use std::{hint::black_box, sync::Arc};

use criterion::{BenchmarkId, Criterion};
use perdak::dsp::curve::{CurveShape, TransferCurve};
use perdak::dsp::oversample::Oversampling;
use perdak::graph::{shaper::ShaperNode, GraphNode, RenderCtx};

use crate::BLOCK_SIZES;

pub fn bench_shaper(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/shaper");
    let ctx = RenderCtx::new(48_000.0, 0.0);
    let curve = Arc::new(TransferCurve::generate(CurveShape::Fuzz(3.0)));

    for &size in BLOCK_SIZES {
        // 55 Hz sine, roughly where a kick body sits
        let input: Vec<f32> = (0..size)
            .map(|i| (std::f32::consts::TAU * 55.0 * i as f32 / 48_000.0).sin() * 0.9)
            .collect();

        for (name, factor) in [
            ("none", Oversampling::None),
            ("x2", Oversampling::X2),
            ("x4", Oversampling::X4),
        ] {
            let mut node = ShaperNode::new(Arc::clone(&curve)).with_oversampling(factor);
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    node.render_block(black_box(&mut buffer), black_box(&ctx));
                })
            });
        }

        // The full three-stage stack every mode runs
        let mut stack = ShaperNode::new(Arc::clone(&curve));
        let mut second = ShaperNode::new(Arc::clone(&curve));
        let mut third = ShaperNode::new(Arc::clone(&curve));
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("stack_x4", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                stack.render_block(black_box(&mut buffer), &ctx);
                second.render_block(black_box(&mut buffer), &ctx);
                third.render_block(black_box(&mut buffer), &ctx);
            })
        });
    }

    group.finish();
}
