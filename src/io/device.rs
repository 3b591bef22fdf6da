use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, Producer, RingBuffer};
use tracing::{info, warn};

use crate::{
    error::{EngineError, Result},
    io::{
        render::{release, RenderCommand, Renderer},
        AudioBackend,
    },
    session::Session,
    MAX_BLOCK_SIZE,
};

const COMMAND_CAPACITY: usize = 64;
const RETIRED_CAPACITY: usize = 64;
/// Scope tap length: a little over a second at 48 kHz.
const SCOPE_CAPACITY: usize = 1 << 16;
const FALLBACK_SAMPLE_RATE: f32 = 48_000.0;

/// Default cpal output device.
///
/// The audio callback owns a [`Renderer`]; commands reach it through an
/// `rtrb` ring and finished sessions come back through a second ring so they
/// are freed on the control thread. The clock is the callback's frame count.
pub struct DeviceBackend {
    sample_rate: f32,
    channels: usize,
    clock: Arc<AtomicU64>,
    /// Frames in the most recent callback
    block: Arc<AtomicU64>,
    failed: Arc<AtomicBool>,
    commands: Option<Producer<RenderCommand>>,
    retired: Option<Consumer<Box<Session>>>,
    scope: Option<Consumer<f32>>,
    stream: Option<cpal::Stream>,
}

impl DeviceBackend {
    /// Open the default output device, or report it unavailable.
    pub fn open_default() -> Self {
        match Self::open() {
            Ok(backend) => backend,
            Err(err) => {
                warn!(error = %err, "audio output unavailable");
                Self::unavailable()
            }
        }
    }

    pub fn open() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(EngineError::DeviceUnavailable)?;
        let config = device
            .default_output_config()
            .map_err(|err| EngineError::Stream(err.to_string()))?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let (command_tx, mut command_rx) = RingBuffer::<RenderCommand>::new(COMMAND_CAPACITY);
        let (mut retired_tx, retired_rx) = RingBuffer::<Box<Session>>::new(RETIRED_CAPACITY);
        let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_CAPACITY);

        let clock = Arc::new(AtomicU64::new(0));
        let block = Arc::new(AtomicU64::new(0));
        let failed = Arc::new(AtomicBool::new(false));

        let mut renderer = Renderer::new(sample_rate);
        let mut mono = vec![0.0f32; MAX_BLOCK_SIZE];
        let callback_clock = Arc::clone(&clock);
        let callback_block = Arc::clone(&block);
        let callback_failed = Arc::clone(&failed);

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    renderer.drain(&mut command_rx);

                    let total_frames = data.len() / channels;
                    let mut frames_written = 0;

                    while frames_written < total_frames {
                        let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                        let block = &mut mono[..frames];

                        // A full return ring means the control thread stalled;
                        // the session is then freed here.
                        renderer.render(block, |session| {
                            let _ = retired_tx.push(session);
                        });

                        // Mono to all channels
                        let offset = frames_written * channels;
                        for (i, &sample) in block.iter().enumerate() {
                            for ch in 0..channels {
                                data[offset + i * channels + ch] = sample;
                            }
                            let _ = scope_tx.push(sample);
                        }

                        frames_written += frames;
                    }

                    callback_block.store(total_frames as u64, Ordering::Relaxed);
                    callback_clock.store(renderer.frames(), Ordering::Release);
                },
                move |err| {
                    callback_failed.store(true, Ordering::Release);
                    warn!(error = %err, "audio stream error");
                },
                None,
            )
            .map_err(|err| EngineError::Stream(err.to_string()))?;

        stream
            .play()
            .map_err(|err| EngineError::Stream(err.to_string()))?;

        info!(sample_rate, channels, "audio output opened");

        Ok(Self {
            sample_rate,
            channels,
            clock,
            block,
            failed,
            commands: Some(command_tx),
            retired: Some(retired_rx),
            scope: Some(scope_rx),
            stream: Some(stream),
        })
    }

    fn unavailable() -> Self {
        Self {
            sample_rate: FALLBACK_SAMPLE_RATE,
            channels: 0,
            clock: Arc::new(AtomicU64::new(0)),
            block: Arc::new(AtomicU64::new(0)),
            failed: Arc::new(AtomicBool::new(true)),
            commands: None,
            retired: None,
            scope: None,
            stream: None,
        }
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Take the mono output tap (once).
    pub fn take_scope(&mut self) -> Option<Consumer<f32>> {
        self.scope.take()
    }
}

impl AudioBackend for DeviceBackend {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn current_time(&self) -> f64 {
        self.clock.load(Ordering::Acquire) as f64 / self.sample_rate as f64
    }

    /// The clock only moves once per callback, and a command submitted just
    /// after one is drained at the start of the next.
    fn latency(&self) -> f64 {
        self.block.load(Ordering::Relaxed) as f64 / self.sample_rate as f64
    }

    fn is_available(&self) -> bool {
        self.stream.is_some() && !self.failed.load(Ordering::Acquire)
    }

    fn submit(&mut self, command: RenderCommand) -> Result<()> {
        if !self.is_available() {
            return Err(EngineError::DeviceUnavailable);
        }
        let commands = self.commands.as_mut().ok_or(EngineError::DeviceUnavailable)?;
        commands.push(command).map_err(|_| EngineError::QueueFull)
    }

    fn maintain(&mut self) {
        if let Some(retired) = self.retired.as_mut() {
            while let Ok(session) = retired.pop() {
                release(session);
            }
        }
    }
}
