//! Step timing and iteration schedules.
//!
//! An iteration is one pass over a mode's 16-step pattern. Every hit of the
//! iteration is computed up front, so the whole schedule exists before the
//! first sample of it is rendered.

pub mod schedule;

pub use schedule::{iteration_duration, schedule_iteration, step_duration, Iteration};
