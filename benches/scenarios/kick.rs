//! Benchmarks for the synthesized kick, alone and as a pattern's worth of
//! overlapping voices.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use perdak::graph::{GraphNode, RenderCtx};
use perdak::modes::{Mode, ModeName};
use perdak::sequencing::schedule_iteration;
use perdak::voices::{KickBus, KickHit, KickVoice};

use crate::BLOCK_SIZES;

pub fn bench_kick(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/kick");
    // Inside the pitch sweep, where every layer is sounding
    let ctx = RenderCtx::new(48_000.0, 0.005);

    let hit = KickHit {
        step: 0,
        time: 0.0,
        pitch: 55.0,
        decay: 0.4,
        level: 1.0,
    };
    let schedule = schedule_iteration(Mode::get(ModeName::Fuzz), 0.0, 1);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let mut voice = KickVoice::new(hit, 48_000.0, 7);
        group.bench_with_input(BenchmarkId::new("voice", size), &size, |b, _| {
            b.iter(|| {
                voice.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });

        let mut bus = KickBus::new(&schedule.hits, 48_000.0, 7);
        group.bench_with_input(BenchmarkId::new("fuzz_pattern", size), &size, |b, _| {
            b.iter(|| {
                bus.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });
    }

    group.finish();
}
