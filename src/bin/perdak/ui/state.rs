//! Snapshot of the engine taken once per frame for the widgets

use perdak::{
    io::DeviceBackend,
    modes::{Mode, StepPattern},
    sequencing::step_duration,
    AudioBackend, Engine, LiveParams, ModeName,
};

pub struct PanelState {
    pub running: bool,
    pub preview: bool,
    pub unavailable: bool,
    pub mode: ModeName,
    pub bpm: f32,
    pub pattern: StepPattern,
    pub params: LiveParams,
    pub selected_knob: usize,
    pub sample_rate: f32,
    /// Step under the playhead, while the loop is audible
    pub current_step: Option<usize>,
}

impl PanelState {
    pub fn capture(engine: &Engine<DeviceBackend>, sample_rate: f32, selected_knob: usize) -> Self {
        let mode = engine.mode();
        let definition = Mode::get(mode);
        let now = engine.backend().current_time();

        let current_step = engine
            .transport()
            .current_iteration()
            .filter(|_| engine.is_running())
            .and_then(|(_, start, duration)| {
                // The next iteration is queued before the current one ends
                let start = if now < start { start - duration } else { start };
                let elapsed = now - start;
                (elapsed >= 0.0)
                    .then(|| (elapsed / step_duration(definition.bpm)) as usize % 16)
            });

        Self {
            running: engine.is_running(),
            preview: engine.is_preview_playing(),
            unavailable: engine.is_unavailable(),
            mode,
            bpm: definition.bpm,
            pattern: definition.pattern,
            params: *engine.params(),
            selected_knob,
            sample_rate,
            current_step,
        }
    }
}
