//! Spectrum widget
//!
//! Hann-windowed FFT of the scope buffer, sampled at log-spaced points
//! between 20 Hz and 8 kHz. Kick energy lives at the bottom of that range and
//! the distortion harmonics spread upward from it, so the x axis is plotted in
//! octaves rather than Hz.

use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

const POINTS: usize = 64;
const LOW_HZ: f64 = 20.0;
const HIGH_HZ: f64 = 8_000.0;
const FLOOR_DB: f64 = -90.0;
/// Per-update fall of the displayed curve
const RELEASE_DB: f64 = 3.0;

pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    /// FFT bin for each display point
    bins: Vec<usize>,
    /// (octaves above LOW_HZ, dB)
    curve: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(len: usize, sample_rate: f32) -> Self {
        let len = len.max(2);
        let fft = FftPlanner::new().plan_fft_forward(len);

        let denom = (len - 1) as f32;
        let window = (0..len)
            .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos()))
            .collect();

        let nyquist = sample_rate as f64 / 2.0;
        let high = HIGH_HZ.min(nyquist).max(LOW_HZ * 2.0);
        let octaves = (high / LOW_HZ).log2();
        let last_bin = len / 2 - 1;

        let mut bins = Vec::with_capacity(POINTS);
        let mut curve = Vec::with_capacity(POINTS);
        for i in 0..POINTS {
            let octave = octaves * i as f64 / (POINTS - 1) as f64;
            let freq = LOW_HZ * octave.exp2();
            let bin = (freq * len as f64 / sample_rate as f64).round() as usize;
            bins.push(bin.clamp(1, last_bin.max(1)));
            curve.push((octave, FLOOR_DB));
        }

        Self {
            fft,
            window,
            scratch: vec![Complex::new(0.0, 0.0); len],
            bins,
            curve,
        }
    }

    /// Analyze `samples`; ignored unless it matches the FFT length.
    pub fn update(&mut self, samples: &[f32]) {
        if samples.len() != self.window.len() {
            return;
        }

        for ((slot, &s), &w) in self.scratch.iter_mut().zip(samples).zip(&self.window) {
            *slot = Complex::new(s * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let scale = 2.0 / self.window.len() as f64;
        for (point, &bin) in self.curve.iter_mut().zip(&self.bins) {
            let magnitude = self.scratch[bin].norm() as f64 * scale;
            let db = (20.0 * magnitude.max(1e-9).log10()).max(FLOOR_DB);
            // Rise instantly, fall slowly
            point.1 = db.max(point.1 - RELEASE_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.curve
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, data: &[(f64, f64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);
    let octaves = data.last().map_or(1.0, |(x, _)| x.max(1.0));

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Yellow))
        .data(data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, octaves])
                .labels(vec!["20", "320", "5k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 0.0])
                .labels(vec!["-90", "-45", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
