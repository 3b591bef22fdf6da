//! Benchmarks for low-level shaping primitives.

mod curve;
mod shaper;

pub use curve::bench_curve;
pub use shaper::bench_shaper;
