//! Composable building blocks for constructing audio-processing graphs.
//!
//! Graph nodes wrap the low-level DSP primitives with block-based rendering
//! against an absolute render clock. The `extensions` module adds fluent
//! helpers so the kick chain can be written as one readable expression.

/// Fluent combinators (`.through()`, `.dry_wet()`).
pub mod extensions;
/// Peaking EQ, low-pass and high-pass nodes.
pub mod filter;
/// Fixed and automated gain stages.
pub mod gain;
/// Output limiter node.
pub mod limiter;
/// Dry/wet split around an effect chain.
pub mod mix;
/// Core traits shared by all graph nodes.
pub mod node;
/// Oversampled waveshaping stage.
pub mod shaper;
/// Serial chaining of two nodes (source → effect).
pub mod through;

pub use extensions::NodeExt;
pub use node::{GraphNode, RenderCtx};
