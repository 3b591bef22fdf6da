//! The kick drum, the engine's one and only voice.
//!
//! A voice is a fully scheduled node: build it from a [`KickHit`] and it
//! renders silence until its start time, then plays out and goes inactive.
//! Every hit of an iteration lands on a [`KickBus`], which is the head of the
//! signal chain.
//!
//! # Example
//!
//! ```ignore
//! use perdak::voices::{KickBus, KickHit};
//!
//! let hit = KickHit { step: 0, time: 0.0, pitch: 52.0, decay: 0.45, level: 1.0 };
//! let bus = KickBus::new(&[hit], 48_000.0, 7);
//! ```

mod kick;

pub use kick::{KickBus, KickHit, KickVoice};
