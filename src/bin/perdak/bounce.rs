//! Offline render to a WAV file

use std::path::Path;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::info;

use perdak::{
    modes::Mode, sequencing::iteration_duration, Engine, EngineConfig, OfflineBackend,
};

const BLOCK: usize = 512;
/// Ring-out after a preview's last hit.
const PREVIEW_TAIL: f64 = 0.75;

pub fn run(
    config: EngineConfig,
    path: &Path,
    iterations: usize,
    sample_rate: u32,
    preview: bool,
) -> EyreResult<()> {
    if iterations == 0 {
        return Err(eyre!("--iterations must be at least 1"));
    }

    let mut engine = Engine::new(OfflineBackend::new(sample_rate as f32), config);
    let mode = engine.mode();

    let end = if preview {
        engine.play_preview(mode.as_str());
        engine
            .transport()
            .preview_end()
            .ok_or_else(|| eyre!("preview did not start"))?
            + PREVIEW_TAIL
    } else {
        engine.power_toggle();
        let (_, start, _) = engine
            .transport()
            .current_iteration()
            .ok_or_else(|| eyre!("loop did not start"))?;
        start + iteration_duration(Mode::get(mode).bpm, iterations)
    };

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)
        .wrap_err_with(|| format!("failed to create {}", path.display()))?;

    let total = (end * sample_rate as f64).ceil() as usize;
    let mut block = vec![0.0f32; BLOCK];
    let mut written = 0;

    while written < total {
        let frames = (total - written).min(BLOCK);
        let out = &mut block[..frames];
        engine.backend_mut().render(out);
        engine.poll();

        for &sample in out.iter() {
            writer.write_sample(sample)?;
        }
        written += frames;
    }

    writer.finalize().wrap_err("failed to finalize WAV")?;
    info!(
        path = %path.display(),
        %mode,
        seconds = end,
        preview,
        "bounce written"
    );
    Ok(())
}
