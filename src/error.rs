use thiserror::Error;

/// Errors surfaced by the engine's host-facing seams.
///
/// None of these are fatal to the caller: the transport turns them into a
/// logged warning or an "unavailable" status.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no audio output device available")]
    DeviceUnavailable,

    #[error("audio stream error: {0}")]
    Stream(String),

    #[error("render command queue is full")]
    QueueFull,

    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),

    #[error("unknown mode `{0}` (expected tube, fuzz, clip or fold)")]
    UnknownMode(String),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
