use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
| type              | passes                 | shapes                          |
| ----------------- | ---------------------- | ------------------------------- |
| low-pass          | below cutoff           | tone control, anti-aliasing     |
| high-pass         | above cutoff           | transient click                 |
| peaking (bell)    | everything             | ±gain_db around cutoff, width Q |

All three come out of the same TPT state-variable core. The bell is the
Cytomic formulation: with A = 10^(gain_db / 40) and k = 1 / (Q·A),

    y = x + k·(A² - 1)·bandpass
*/

/// Butterworth Q, the flattest passband for low-pass/high-pass.
pub const BUTTERWORTH_Q: f32 = std::f32::consts::FRAC_1_SQRT_2;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterType {
    LowPass,
    HighPass,
    Peaking { gain_db: f32 },
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
}

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    pub cutoff_hz: f32,
    pub q: f32,
    filter_type: FilterType,

    // Coefficients, recomputed only when the sample rate or settings change
    coeff_rate: f32,
    g: f32,
    k: f32,
    bell_gain: f32,
}

impl SVFilter {
    pub fn new(filter_type: FilterType, cutoff_hz: f32, q: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            q: q.max(0.01),
            filter_type,
            coeff_rate: 0.0,
            g: 0.0,
            k: 0.0,
            bell_gain: 0.0,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz, BUTTERWORTH_Q)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz, BUTTERWORTH_Q)
    }

    pub fn peaking(cutoff_hz: f32, q: f32, gain_db: f32) -> Self {
        Self::new(FilterType::Peaking { gain_db }, cutoff_hz, q)
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    fn update_coefficients(&mut self, sample_rate: f32) {
        // Keep the cutoff safely below Nyquist so tan() stays finite
        let cutoff = self.cutoff_hz.clamp(10.0, sample_rate * 0.49);
        self.g = (PI * cutoff / sample_rate).tan();

        match self.filter_type {
            FilterType::Peaking { gain_db } => {
                let a = 10.0_f32.powf(gain_db / 40.0);
                self.k = 1.0 / (self.q * a);
                self.bell_gain = self.k * (a * a - 1.0);
            }
            _ => {
                self.k = 1.0 / self.q;
                self.bell_gain = 0.0;
            }
        }
        self.coeff_rate = sample_rate;
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32) -> FilterOutputs {
        let g = self.g;
        let k = self.k;
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
        }
    }

    /// Filter one sample at the given rate.
    #[inline]
    pub fn process(&mut self, sample: f32, sample_rate: f32) -> f32 {
        if self.coeff_rate != sample_rate {
            self.update_coefficients(sample_rate);
        }

        let outputs = self.next_sample(sample);
        match self.filter_type {
            FilterType::LowPass => outputs.lowpass,
            FilterType::HighPass => outputs.highpass,
            FilterType::Peaking { .. } => sample + self.bell_gain * outputs.bandpass,
        }
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample, sample_rate);
        }
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff_hz = cutoff;
        self.coeff_rate = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn sine(freq: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|n| (TAU * freq * n as f32 / SAMPLE_RATE).sin())
            .collect()
    }

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len() / 2;
        buffer[skip..].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    fn response(mut filter: SVFilter, freq: f32) -> f32 {
        let mut buffer = sine(freq, 4096);
        filter.render(&mut buffer, SAMPLE_RATE);
        peak_after_transient(&buffer)
    }

    #[test]
    fn lowpass_passes_dc() {
        let mut filter = SVFilter::lowpass(500.0);
        let mut buffer = vec![1.0; 2048];
        filter.render(&mut buffer, SAMPLE_RATE);
        assert!(buffer[2047] > 0.99);
    }

    #[test]
    fn highpass_blocks_dc() {
        let mut filter = SVFilter::highpass(800.0);
        let mut buffer = vec![1.0; 2048];
        filter.render(&mut buffer, SAMPLE_RATE);
        assert!(buffer[2047].abs() < 0.001);
    }

    #[test]
    fn lowpass_filters_high_freq() {
        let peak = response(SVFilter::lowpass(500.0), 5_000.0);
        assert!(peak < 0.05, "expected strong attenuation, got {peak}");
    }

    #[test]
    fn peaking_boosts_at_center() {
        let peak = response(SVFilter::peaking(1_000.0, 1.0, 6.0), 1_000.0);
        // +6 dB ≈ ×2
        assert!((peak - 1.995).abs() < 0.05, "expected ~2.0, got {peak}");
    }

    #[test]
    fn peaking_cuts_at_center_and_leaves_far_bands() {
        let center = response(SVFilter::peaking(2_500.0, 0.7, -6.0), 2_500.0);
        assert!((center - 0.501).abs() < 0.03, "expected ~0.5, got {center}");

        let far = response(SVFilter::peaking(2_500.0, 0.7, -6.0), 60.0);
        assert!(far > 0.95, "expected far band untouched, got {far}");
    }

    #[test]
    fn set_cutoff_affects_filtering() {
        let mut filter = SVFilter::lowpass(200.0);
        let mut buffer = sine(1_000.0, 4096);
        filter.render(&mut buffer, SAMPLE_RATE);
        let closed = peak_after_transient(&buffer);

        filter.set_cutoff(5_000.0);
        let mut buffer = sine(1_000.0, 4096);
        filter.render(&mut buffer, SAMPLE_RATE);
        let open = peak_after_transient(&buffer);

        assert!(open > closed * 2.0, "open={open}, closed={closed}");
    }
}
