//! Live playback: open the audio device and hand it to the TUI

use color_eyre::eyre::Result as EyreResult;
use tracing::info;

use perdak::{io::DeviceBackend, AudioBackend, Engine, EngineConfig};

use super::ui::UiApp;

pub fn run(config: EngineConfig) -> EyreResult<()> {
    let mut backend = DeviceBackend::open_default();
    let scope = backend.take_scope();
    let sample_rate = backend.sample_rate();
    info!(
        sample_rate,
        channels = backend.channels(),
        available = backend.is_available(),
        "starting perdak"
    );

    let engine = Engine::new(backend, config);

    let mut terminal = ratatui::init();
    let result = UiApp::new(engine, scope, sample_rate).run(&mut terminal);
    ratatui::restore();
    result
}
