//! Low-level DSP primitives used by the higher level graph nodes.
//!
//! These components keep to the signal-processing math; the graph layer adds
//! block rendering and the session layer adds scheduling. Everything here is
//! allocation-free once constructed, except curve and noise generation, which
//! happen when a session is built rather than while it renders.

/// Gain staging helpers.
pub mod amplify;
/// Scheduled set/ramp timelines for pitch and level envelopes.
pub mod automation;
/// Tabulated waveshaping transfer curves.
pub mod curve;
/// State-variable filter with low-pass, high-pass and peaking responses.
pub mod filter;
/// Soft-knee peak limiter.
pub mod limiter;
/// Dry/wet and summing helpers.
pub mod mix;
/// Sine oscillator and noise bursts.
pub mod oscillator;
/// Up/down sampling around nonlinear stages.
pub mod oversample;

pub use automation::Automation;
pub use curve::{CurveShape, TransferCurve};
