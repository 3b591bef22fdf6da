//! Oversampled nonlinear processing.

/*
Why Oversample a Waveshaper?
============================

A nonlinear curve creates new harmonics. A 3 kHz component pushed through a
hard clipper gains energy at 9, 15, 21, 27 kHz... Anything above Nyquist
(24 kHz at 48 kHz) cannot be represented and folds back down as inharmonic
"aliasing" that sounds gritty and digital.

Running the curve at 4× the sample rate gives the new harmonics room to
exist, then a low-pass removes them before we drop back down:

    x ──▶ [zero-stuff ×4] ──▶ [LPF] ──▶ f(·) ──▶ [LPF] ──▶ [keep every 4th] ──▶ y
            (upsample)       (image      (curve)  (anti-alias)  (decimate)
                              rejection)

Both low-pass stages are two cascaded Butterworth SVF sections (24 dB/oct)
tuned just under the ORIGINAL Nyquist, running at the oversampled rate.
Zero-stuffing divides the signal energy by the factor, so the upsampled
samples are scaled back up by it.
*/

use crate::dsp::filter::{FilterType, SVFilter, BUTTERWORTH_Q};

/// Internal rate multiplier for a nonlinear stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Oversampling {
    None,
    X2,
    X4,
}

impl Oversampling {
    pub fn ratio(self) -> usize {
        match self {
            Oversampling::None => 1,
            Oversampling::X2 => 2,
            Oversampling::X4 => 4,
        }
    }
}

/// Cutoff as a fraction of the base sample rate (just below Nyquist).
const CUTOFF_FRACTION: f32 = 0.45;

struct Lowpass4 {
    stages: [SVFilter; 2],
}

impl Lowpass4 {
    fn new(cutoff_hz: f32) -> Self {
        Self {
            stages: [
                SVFilter::new(FilterType::LowPass, cutoff_hz, BUTTERWORTH_Q),
                SVFilter::new(FilterType::LowPass, cutoff_hz, BUTTERWORTH_Q),
            ],
        }
    }

    #[inline]
    fn process(&mut self, sample: f32, sample_rate: f32) -> f32 {
        let first = self.stages[0].process(sample, sample_rate);
        self.stages[1].process(first, sample_rate)
    }

    fn set_cutoff(&mut self, cutoff_hz: f32) {
        for stage in &mut self.stages {
            stage.set_cutoff(cutoff_hz);
        }
    }
}

/// Up/down sampler around a per-sample nonlinear function.
pub struct Oversampler {
    factor: Oversampling,
    base_rate: f32,
    interpolator: Lowpass4,
    decimator: Lowpass4,
}

impl Oversampler {
    pub fn new(factor: Oversampling) -> Self {
        Self {
            factor,
            base_rate: 0.0,
            interpolator: Lowpass4::new(20_000.0),
            decimator: Lowpass4::new(20_000.0),
        }
    }

    pub fn factor(&self) -> Oversampling {
        self.factor
    }

    /// Run `shape` at the oversampled rate over `buffer`, in place.
    pub fn process<F>(&mut self, buffer: &mut [f32], sample_rate: f32, mut shape: F)
    where
        F: FnMut(f32) -> f32,
    {
        let ratio = self.factor.ratio();
        if ratio == 1 {
            for sample in buffer.iter_mut() {
                *sample = shape(*sample);
            }
            return;
        }

        if self.base_rate != sample_rate {
            let cutoff = sample_rate * CUTOFF_FRACTION;
            self.interpolator.set_cutoff(cutoff);
            self.decimator.set_cutoff(cutoff);
            self.base_rate = sample_rate;
        }

        let high_rate = sample_rate * ratio as f32;
        let gain = ratio as f32;

        for sample in buffer.iter_mut() {
            let mut kept = 0.0;
            for phase in 0..ratio {
                let stuffed = if phase == 0 { *sample * gain } else { 0.0 };
                let upsampled = self.interpolator.process(stuffed, high_rate);
                let shaped = shape(upsampled);
                let filtered = self.decimator.process(shaped, high_rate);
                if phase == 0 {
                    kept = filtered;
                }
            }
            *sample = kept;
        }
    }
}
