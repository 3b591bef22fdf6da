use crate::{
    error::{EngineError, Result},
    io::{
        render::{release, RenderCommand, Renderer},
        AudioBackend,
    },
    session::Session,
};

/// Renders into memory on demand.
///
/// Commands are applied immediately and the clock stands still between
/// renders, which makes the loop fully deterministic.
#[derive(Debug)]
pub struct OfflineBackend {
    renderer: Renderer,
    available: bool,
}

impl OfflineBackend {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            renderer: Renderer::new(sample_rate),
            available: true,
        }
    }

    /// A backend that refuses every command, standing in for a missing
    /// output device.
    pub fn unavailable(sample_rate: f32) -> Self {
        Self {
            available: false,
            ..Self::new(sample_rate)
        }
    }

    /// Render the next `out.len()` frames.
    pub fn render(&mut self, out: &mut [f32]) {
        self.renderer.render(out, release);
    }

    /// Render `seconds` of audio into a new buffer.
    pub fn render_seconds(&mut self, seconds: f64) -> Vec<f32> {
        let frames = (seconds * self.renderer.sample_rate() as f64).round() as usize;
        let mut out = vec![0.0; frames];
        self.render(&mut out);
        out
    }

    /// Sessions currently held by the renderer.
    pub fn sessions(&self) -> &[Box<Session>] {
        self.renderer.sessions()
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }
}

impl AudioBackend for OfflineBackend {
    fn sample_rate(&self) -> f32 {
        self.renderer.sample_rate()
    }

    fn current_time(&self) -> f64 {
        self.renderer.current_time()
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn submit(&mut self, command: RenderCommand) -> Result<()> {
        if !self.available {
            return Err(EngineError::DeviceUnavailable);
        }
        self.renderer.apply(command);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_backend_rejects_commands() {
        let mut backend = OfflineBackend::unavailable(48_000.0);
        let result = backend.submit(RenderCommand::Silence {
            kind: None,
            at: 0.0,
            fade: 0.03,
        });

        assert!(!backend.is_available());
        assert!(matches!(result, Err(EngineError::DeviceUnavailable)));
    }

    #[test]
    fn render_seconds_advances_clock() {
        let mut backend = OfflineBackend::new(44_100.0);
        let out = backend.render_seconds(0.5);

        assert_eq!(out.len(), 22_050);
        assert!((backend.current_time() - 0.5).abs() < 1e-12);
    }
}
