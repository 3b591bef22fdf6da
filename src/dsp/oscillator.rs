use std::f32::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Phase-accumulating sine oscillator.
///
/// Frequency is supplied per sample so pitch envelopes sweep smoothly
/// without phase jumps.
#[derive(Debug, Clone, Default)]
pub struct SineOsc {
    phase: f32, // 0.0 - 1.0
}

impl SineOsc {
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let out = (TAU * self.phase).sin();
        self.phase += frequency / sample_rate;
        self.phase -= self.phase.floor();
        out
    }
}

/// Fill a buffer with a decaying white-noise burst.
///
/// Each sample is uniform noise in [-1, 1] shaped by `e^(-i / (N · decay))`,
/// so `decay = 0.15` leaves the tail ~56 dB down by the last sample.
pub fn noise_burst(len: usize, decay: f32, seed: u64) -> Vec<f32> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let tau = (len as f32 * decay).max(1.0);
    (0..len)
        .map(|i| {
            let white: f32 = rng.random_range(-1.0..=1.0);
            white * (-(i as f32) / tau).exp()
        })
        .collect()
}
