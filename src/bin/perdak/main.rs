//! perdak - distorted kick loop in the terminal
//!
//! Run with: cargo run -- --mode fuzz
//! Bounce to disk: cargo run -- --bounce loop.wav --iterations 4

mod app;
mod bounce;
mod ui;

use std::{fs::File, path::PathBuf, sync::Mutex};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;

use perdak::{EngineConfig, LiveParams, ModeName, Param};

#[derive(Debug, Parser)]
#[command(name = "perdak", version, about = "Kick drum synthesis, distortion and loop transport")]
struct Args {
    /// Mode at power-on: tube, fuzz, clip or fold
    #[arg(long, default_value = "tube")]
    mode: String,

    /// Drive knob (0-100)
    #[arg(long)]
    drive: Option<f32>,

    /// Tone knob (0-100)
    #[arg(long)]
    tone: Option<f32>,

    /// Mix knob (0-100)
    #[arg(long)]
    mix: Option<f32>,

    /// Level knob (0-100)
    #[arg(long)]
    level: Option<f32>,

    /// Render offline to this WAV file instead of opening the TUI
    #[arg(long, value_name = "WAV")]
    bounce: Option<PathBuf>,

    /// Loop iterations to bounce
    #[arg(long, default_value_t = 4)]
    iterations: usize,

    /// Bounce the fixed-setting preview instead of the loop
    #[arg(long)]
    preview: bool,

    /// Sample rate for bounces
    #[arg(long, default_value_t = 48_000)]
    sample_rate: u32,

    /// Where the TUI writes its log
    #[arg(long, value_name = "FILE", default_value = "perdak.log")]
    log_file: PathBuf,
}

impl Args {
    fn config(&self) -> EngineConfig {
        let mut params = LiveParams::default();
        let knobs = [
            (Param::Drive, self.drive),
            (Param::Tone, self.tone),
            (Param::Mix, self.mix),
            (Param::Level, self.level),
        ];
        for (param, value) in knobs {
            if let Some(value) = value {
                params.set(param, value);
            }
        }

        EngineConfig::default()
            .with_mode(ModeName::resolve(&self.mode))
            .with_params(params)
    }
}

fn init_logging(log_file: Option<&PathBuf>) -> EyreResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        // The terminal belongs to the TUI, so logs go to a file
        Some(path) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let config = args.config();

    match &args.bounce {
        Some(path) => {
            init_logging(None)?;
            bounce::run(config, path, args.iterations, args.sample_rate, args.preview)
        }
        None => {
            init_logging(Some(&args.log_file))?;
            app::run(config)
        }
    }
}
