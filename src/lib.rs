pub mod chain; // Per-iteration signal chain assembly
pub mod config;
pub mod dsp;
pub mod engine; // Transport, timers and the UI-facing facade
pub mod error;
pub mod graph; // Composable audio graph nodes
pub mod io;
pub mod modes;
pub mod params;
pub mod sequencing; // Step patterns and iteration schedules
pub mod session;
pub mod voices;

pub use config::EngineConfig;
pub use engine::{Engine, LoopTransport, TransportState, UiEvent};
pub use error::EngineError;
pub use io::{AudioBackend, OfflineBackend};
pub use modes::{ModeCatalog, ModeName};
pub use params::{LiveParams, Param};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
