//! UI-facing engine.
//!
//! [`Engine`] is what a front panel talks to: a power button, a mode
//! selector, four knobs and a preview button. It translates those events
//! into [`LoopTransport`] calls, forgiving bad input along the way (unknown
//! modes fall back to tube, unknown knobs are logged and ignored, values are
//! clamped).

pub mod scheduler;
pub mod transport;

pub use scheduler::{Scheduler, TimerId, TimerTask};
pub use transport::{LoopTransport, TransportState};

use tracing::warn;

use crate::{
    config::EngineConfig,
    io::AudioBackend,
    modes::ModeName,
    params::{LiveParams, Param},
};

/// Front-panel input.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    PowerToggle,
    SelectMode(String),
    SetKnob { name: String, value: f32 },
    PlayPreview(String),
    StopPreview,
}

pub struct Engine<B> {
    transport: LoopTransport<B>,
}

impl<B: AudioBackend> Engine<B> {
    pub fn new(backend: B, config: EngineConfig) -> Self {
        Self {
            transport: LoopTransport::new(backend, config),
        }
    }

    pub fn with_defaults(backend: B) -> Self {
        Self::new(backend, EngineConfig::default())
    }

    /// Start the loop in the selected mode, or stop it.
    pub fn power_toggle(&mut self) -> TransportState {
        match self.transport.state() {
            TransportState::Running => self.transport.stop(),
            TransportState::Stopped => {
                let mode = self.transport.mode();
                self.transport.start(mode);
            }
        }
        self.transport.state()
    }

    pub fn select_mode(&mut self, name: &str) -> ModeName {
        let mode = ModeName::resolve(name);
        self.transport.set_mode(mode);
        mode
    }

    /// Set a knob by name. Returns the stored (clamped) value, or `None`
    /// for an unknown knob.
    pub fn set_knob(&mut self, name: &str, value: f32) -> Option<f32> {
        match name.parse::<Param>() {
            Ok(param) => Some(self.transport.set_parameter(param, value)),
            Err(err) => {
                warn!(error = %err, value, "knob change ignored");
                None
            }
        }
    }

    pub fn play_preview(&mut self, name: &str) {
        self.transport.play_preview(ModeName::resolve(name));
    }

    pub fn stop_preview(&mut self) {
        self.transport.stop_preview();
    }

    pub fn handle(&mut self, event: UiEvent) {
        match event {
            UiEvent::PowerToggle => {
                self.power_toggle();
            }
            UiEvent::SelectMode(name) => {
                self.select_mode(&name);
            }
            UiEvent::SetKnob { name, value } => {
                self.set_knob(&name, value);
            }
            UiEvent::PlayPreview(name) => self.play_preview(&name),
            UiEvent::StopPreview => self.stop_preview(),
        }
    }

    /// Fire due timers; call regularly.
    pub fn poll(&mut self) {
        self.transport.poll();
    }

    pub fn is_running(&self) -> bool {
        self.transport.is_running()
    }

    pub fn mode(&self) -> ModeName {
        self.transport.mode()
    }

    pub fn params(&self) -> &LiveParams {
        self.transport.params()
    }

    pub fn is_unavailable(&self) -> bool {
        self.transport.is_unavailable()
    }

    pub fn is_preview_playing(&self) -> bool {
        self.transport.is_preview_playing()
    }

    pub fn transport(&self) -> &LoopTransport<B> {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut LoopTransport<B> {
        &mut self.transport
    }

    pub fn backend(&self) -> &B {
        self.transport.backend()
    }

    pub fn backend_mut(&mut self) -> &mut B {
        self.transport.backend_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::OfflineBackend;

    fn engine() -> Engine<OfflineBackend> {
        Engine::with_defaults(OfflineBackend::new(48_000.0))
    }

    #[test]
    fn power_toggles() {
        let mut engine = engine();

        assert_eq!(engine.power_toggle(), TransportState::Running);
        assert_eq!(engine.power_toggle(), TransportState::Stopped);
    }

    #[test]
    fn unknown_knob_is_ignored() {
        let mut engine = engine();
        let before = *engine.params();

        assert_eq!(engine.set_knob("resonance", 50.0), None);
        assert_eq!(*engine.params(), before);
        assert_eq!(engine.set_knob("drive", 150.0), Some(100.0));
    }

    #[test]
    fn unknown_mode_selects_tube() {
        let mut engine = engine();
        engine.select_mode("fold");
        assert_eq!(engine.mode(), ModeName::Fold);

        assert_eq!(engine.select_mode("laser"), ModeName::Tube);
        assert_eq!(engine.mode(), ModeName::Tube);
    }

    #[test]
    fn events_route_to_transport() {
        let mut engine = engine();
        engine.handle(UiEvent::SetKnob {
            name: "tone".into(),
            value: -5.0,
        });
        engine.handle(UiEvent::PlayPreview("clip".into()));

        assert_eq!(engine.params().tone(), 0.0);
        assert!(engine.is_preview_playing());

        engine.handle(UiEvent::PowerToggle);
        assert!(engine.is_running());
        assert!(!engine.is_preview_playing());
    }
}
