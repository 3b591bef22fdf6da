//! Kick drum voice.
//!
//! An analog-style kick built from three layers that start together and die
//! away independently:
//!
//! 1. Body: a sine that drops from 4.5× the pitch to the pitch in 40 ms (the
//!    "thump"), held at full level for 10 ms, then decaying exponentially.
//! 2. Harmonic: a second sine an octave-and-a-fifth higher that dives below
//!    the fundamental in 30 ms and fades over half the decay. Adds the
//!    upper-register knock.
//! 3. Transient: 15 ms of decaying white noise, high-passed at 800 Hz, for
//!    the beater click.
//!
//! Every envelope is written into an `Automation` timeline at build time, so
//! a voice is fully scheduled before it is ever rendered. Voices render
//! silence before their start time and report inactive once all three layers
//! have finished.
//!
//! # Variations
//!
//! - Longer decay = boomy 808-style kick
//! - Higher pitch = tighter, more "techno"
//! - Levels above 1.0 are allowed; the limiter downstream catches them

use crate::{
    dsp::{
        automation::{Automation, SILENCE},
        filter::SVFilter,
        mix::sum_in_place,
        oscillator::{noise_burst, SineOsc},
    },
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/// Start frequency of the body, as a multiple of the pitch.
pub const BODY_SWEEP_RATIO: f32 = 4.5;
/// Body pitch sweep time.
pub const BODY_SWEEP_TIME: f64 = 0.04;
/// Body hold time before the level decay begins.
pub const BODY_HOLD_TIME: f64 = 0.01;
/// Harmonic start frequency relative to the body's start frequency.
pub const HARMONIC_RATIO: f32 = 1.5;
pub const HARMONIC_SWEEP_TIME: f64 = 0.03;
pub const HARMONIC_LEVEL: f32 = 0.25;
/// Transient burst length.
pub const CLICK_TIME: f64 = 0.015;
pub const CLICK_LEVEL: f32 = 0.6;
pub const CLICK_HIGHPASS_HZ: f32 = 800.0;
/// Noise envelope constant: e^(-i / (N · CLICK_DECAY)).
pub const CLICK_DECAY: f32 = 0.15;

/// One scheduled kick: when, how low, how long and how loud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KickHit {
    /// Step index within the session
    pub step: usize,
    /// Absolute start time on the render clock (seconds)
    pub time: f64,
    /// Fundamental pitch in Hz
    pub pitch: f32,
    /// Body decay time in seconds
    pub decay: f32,
    /// Peak level (may exceed 1.0)
    pub level: f32,
}

impl KickHit {
    /// Time after which every layer of this hit has decayed.
    pub fn end_time(&self) -> f64 {
        let decay = self.decay.max(crate::MIN_TIME) as f64;
        self.time + (BODY_HOLD_TIME + decay).max(CLICK_TIME)
    }
}

struct Layer {
    osc: SineOsc,
    frequency: Automation,
    gain: Automation,
    end: f64,
}

impl Layer {
    fn render_add(&mut self, out: &mut [f32], start: f64, ctx: &RenderCtx) {
        for (i, sample) in out.iter_mut().enumerate() {
            let t = ctx.time_at(i);
            if t < start || t >= self.end {
                continue;
            }
            let freq = self.frequency.value_at(t);
            *sample += self.osc.next_sample(freq, ctx.sample_rate) * self.gain.value_at(t);
        }
    }
}

pub struct KickVoice {
    start: f64,
    end: f64,
    body: Layer,
    harmonic: Layer,
    click: Vec<f32>,
    click_gain: Automation,
    click_filter: SVFilter,
    finished: bool,
}

impl KickVoice {
    pub fn new(hit: KickHit, sample_rate: f32, seed: u64) -> Self {
        let t0 = hit.time;
        let level = hit.level.max(SILENCE);
        let decay = hit.decay.max(crate::MIN_TIME) as f64;
        let sweep_start = hit.pitch * BODY_SWEEP_RATIO;

        let mut body_freq = Automation::new(sweep_start);
        body_freq
            .set_value_at(sweep_start, t0)
            .exponential_ramp_to(hit.pitch, t0 + BODY_SWEEP_TIME);
        let mut body_gain = Automation::new(0.0);
        body_gain
            .set_value_at(level, t0)
            .set_value_at(level, t0 + BODY_HOLD_TIME)
            .exponential_ramp_to(SILENCE, t0 + BODY_HOLD_TIME + decay);
        let body = Layer {
            osc: SineOsc::new(),
            frequency: body_freq,
            gain: body_gain,
            end: t0 + BODY_HOLD_TIME + decay,
        };

        let harmonic_start = sweep_start * HARMONIC_RATIO;
        let mut harmonic_freq = Automation::new(harmonic_start);
        harmonic_freq
            .set_value_at(harmonic_start, t0)
            .exponential_ramp_to(hit.pitch * 0.5, t0 + HARMONIC_SWEEP_TIME);
        let mut harmonic_gain = Automation::new(0.0);
        harmonic_gain
            .set_value_at(level * HARMONIC_LEVEL, t0)
            .exponential_ramp_to(SILENCE, t0 + decay * 0.5);
        let harmonic = Layer {
            osc: SineOsc::new(),
            frequency: harmonic_freq,
            gain: harmonic_gain,
            end: t0 + decay * 0.5,
        };

        let click_len = (CLICK_TIME * sample_rate as f64).round().max(1.0) as usize;
        let click = noise_burst(click_len, CLICK_DECAY, seed);
        let mut click_gain = Automation::new(0.0);
        click_gain
            .set_value_at(level * CLICK_LEVEL, t0)
            .exponential_ramp_to(SILENCE, t0 + CLICK_TIME);

        let end = hit.end_time();

        Self {
            start: t0,
            end,
            body,
            harmonic,
            click,
            click_gain,
            click_filter: SVFilter::highpass(CLICK_HIGHPASS_HZ),
            finished: false,
        }
    }

    pub fn start_time(&self) -> f64 {
        self.start
    }

    /// Time after which the voice is silent for good.
    pub fn end_time(&self) -> f64 {
        self.end
    }

    fn render_click(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let sr = ctx.sample_rate as f64;
        for (i, sample) in out.iter_mut().enumerate() {
            let t = ctx.time_at(i);
            if t < self.start {
                continue;
            }
            let index = ((t - self.start) * sr).round() as usize;
            let Some(&noise) = self.click.get(index) else {
                break;
            };
            let filtered = self.click_filter.process(noise, ctx.sample_rate);
            *sample += filtered * self.click_gain.value_at(t);
        }
    }
}

impl GraphNode for KickVoice {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        out.fill(0.0);
        if self.finished || ctx.block_end(out.len()) <= self.start {
            return;
        }

        let start = self.start;
        self.body.render_add(out, start, ctx);
        self.harmonic.render_add(out, start, ctx);
        self.render_click(out, ctx);

        if ctx.block_end(out.len()) >= self.end {
            self.finished = true;
        }
    }

    fn is_active(&self) -> bool {
        !self.finished
    }
}

/// Sums every kick scheduled for a session; the head of the signal chain.
pub struct KickBus {
    voices: Vec<KickVoice>,
    scratch: Vec<f32>,
}

impl KickBus {
    pub fn new(hits: &[KickHit], sample_rate: f32, seed: u64) -> Self {
        let voices = hits
            .iter()
            .enumerate()
            .map(|(i, hit)| KickVoice::new(*hit, sample_rate, seed.wrapping_add(i as u64)))
            .collect();

        Self {
            voices,
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn voices(&self) -> &[KickVoice] {
        &self.voices
    }

    /// End of the last voice's tail.
    pub fn end_time(&self) -> f64 {
        self.voices
            .iter()
            .map(KickVoice::end_time)
            .fold(0.0, f64::max)
    }
}

impl GraphNode for KickBus {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        out.fill(0.0);
        let len = out.len().min(self.scratch.len());
        let block_end = ctx.block_end(len);

        for voice in &mut self.voices {
            // Voices are in time order; nothing later can start in this block
            if voice.start_time() >= block_end {
                break;
            }
            if !voice.is_active() {
                continue;
            }
            let scratch = &mut self.scratch[..len];
            voice.render_block(scratch, ctx);
            sum_in_place(&mut out[..len], scratch);
        }
    }

    fn is_active(&self) -> bool {
        self.voices.iter().any(KickVoice::is_active)
    }
}
