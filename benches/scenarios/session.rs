//! Benchmarks for complete sessions: kick bus, EQ, three shaping stages,
//! tone filter, limiter and master gain.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use perdak::graph::{GraphNode, RenderCtx};
use perdak::session::{Session, SessionKind, SessionSpec};
use perdak::{LiveParams, ModeCatalog, ModeName};

use crate::BLOCK_SIZES;

pub fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/session");
    let catalog = ModeCatalog::new();
    let ctx = RenderCtx::new(48_000.0, 0.01);

    // Build cost matters too: it runs on the control thread once per loop
    group.bench_function("build_tube", |b| {
        b.iter(|| {
            Session::build(
                &catalog,
                SessionSpec {
                    id: 1,
                    kind: SessionKind::Loop,
                    mode: catalog.mode(ModeName::Tube),
                    params: LiveParams::default(),
                    start: 0.0,
                    cycles: 1,
                    sample_rate: 48_000.0,
                },
            )
        })
    });

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for mode in ModeName::ALL {
            let mut session = Session::build(
                &catalog,
                SessionSpec {
                    id: 1,
                    kind: SessionKind::Loop,
                    mode: catalog.mode(mode),
                    params: LiveParams::default(),
                    start: 0.0,
                    cycles: 1,
                    sample_rate: 48_000.0,
                },
            );
            group.bench_with_input(BenchmarkId::new(mode.as_str(), size), &size, |b, _| {
                b.iter(|| {
                    session.render_block(black_box(&mut buffer), black_box(&ctx));
                })
            });
        }
    }

    group.finish();
}
