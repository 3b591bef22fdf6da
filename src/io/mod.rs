//! Host-facing audio seams.
//!
//! The engine never talks to an audio device directly. It submits
//! [`RenderCommand`]s to an [`AudioBackend`] and reads the backend's clock.
//! Two backends ship with the crate:
//!
//! - [`OfflineBackend`] renders into memory, and its clock only moves when
//!   frames are rendered. Tests, benches and the WAV bounce use it.
//! - `DeviceBackend` (feature `rtrb`) drives the default cpal output device
//!   from a real-time callback.

#[cfg(feature = "rtrb")]
pub mod device;
pub mod offline;
pub mod render;

#[cfg(feature = "rtrb")]
pub use device::DeviceBackend;
pub use offline::OfflineBackend;
pub use render::{CommandSource, RenderCommand, Renderer};

use crate::error::Result;

/// Rendering device plus its monotonic clock.
pub trait AudioBackend {
    fn sample_rate(&self) -> f32;

    /// Seconds of audio rendered so far.
    fn current_time(&self) -> f64;

    /// Worst-case delay between submitting a command and the render thread
    /// applying it (seconds). New sessions start at least this far ahead.
    fn latency(&self) -> f64 {
        0.0
    }

    /// `false` once the device could not be opened or has failed.
    fn is_available(&self) -> bool;

    /// Hand a command to the render thread. Never blocks.
    fn submit(&mut self, command: RenderCommand) -> Result<()>;

    /// Housekeeping on the control thread (reclaiming finished sessions,
    /// noticing device failures). Called from the transport's poll.
    fn maintain(&mut self) {}
}
