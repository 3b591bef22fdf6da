//! Benchmarks for realistic rendering paths.

mod kick;
mod session;

pub use kick::bench_kick;
pub use session::bench_session;
