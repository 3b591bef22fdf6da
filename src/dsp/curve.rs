//! Transfer curves for waveshaping
//!
//! A waveshaper remaps every sample through a fixed transfer function:
//!   output = f(input)
//!
//! Evaluating `f` per sample is wasteful when the function never changes, so
//! each curve is tabulated once into `CURVE_LEN` points spanning the input
//! range [-1, 1] and looked up with linear interpolation afterwards.
//!
//! # The Four Characters
//!
//! Saturate:
//!   f(x) = ((π + a)·x) / (π + a·|x|)
//!   - Smooth, odd-symmetric, tube-like
//!   - Larger `a` = harder knee
//!
//! Fuzz:
//!   f(x) = 1 - e^(-3kx)            for x > 0
//!   f(x) = -0.9·(1 - e^(2kx))      for x ≤ 0
//!   - Asymmetric, like a pair of mismatched diodes
//!   - Produces even harmonics as well as odd ones
//!
//! Hard clip:
//!   f(x) = clamp(20x, -t, t)
//!   - Short linear region, then a wall at ±t
//!   - Buzzy, square-ish
//!
//! Fold:
//!   f(x) = sin(π·n·x)
//!   - The wave re-enters instead of clipping
//!   - More folds = denser, metallic upper harmonics
//!
//! # Lookup
//!
//!   index = (x + 1) / 2 · (CURVE_LEN - 1)
//!
//! Inputs outside [-1, 1] are pinned to the ends of the table, which matches
//! how a browser WaveShaperNode treats out-of-range samples.

use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of points in every transfer table.
pub const CURVE_LEN: usize = 8192;

/// One nonlinear law plus its single shape parameter.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveShape {
    /// Soft saturation, parameter = knee amount
    Saturate(f32),
    /// Asymmetric exponential fuzz, parameter = intensity
    Fuzz(f32),
    /// Linear gain of 20 into a wall, parameter = threshold
    HardClip(f32),
    /// Sine wavefolder, parameter = number of folds
    Fold(f32),
}

impl CurveShape {
    /// Evaluate the transfer law directly (no table).
    #[inline]
    pub fn eval(self, x: f32) -> f32 {
        match self {
            CurveShape::Saturate(amount) => saturate(x, amount),
            CurveShape::Fuzz(intensity) => fuzz(x, intensity),
            CurveShape::HardClip(threshold) => hard_clip(x, threshold),
            CurveShape::Fold(folds) => fold(x, folds),
        }
    }
}

#[inline]
pub fn saturate(x: f32, amount: f32) -> f32 {
    ((PI + amount) * x) / (PI + amount * x.abs())
}

#[inline]
pub fn fuzz(x: f32, intensity: f32) -> f32 {
    if x > 0.0 {
        1.0 - (-3.0 * intensity * x).exp()
    } else {
        -0.9 * (1.0 - (2.0 * intensity * x).exp())
    }
}

#[inline]
pub fn hard_clip(x: f32, threshold: f32) -> f32 {
    let threshold = threshold.abs();
    (20.0 * x).clamp(-threshold, threshold)
}

#[inline]
pub fn fold(x: f32, folds: f32) -> f32 {
    (PI * folds * x).sin()
}

/// Precomputed lookup table for one `CurveShape`.
#[derive(Clone)]
pub struct TransferCurve {
    shape: CurveShape,
    table: Box<[f32]>,
}

impl TransferCurve {
    pub fn generate(shape: CurveShape) -> Self {
        let last = (CURVE_LEN - 1) as f32;
        let table = (0..CURVE_LEN)
            .map(|i| {
                let x = (i as f32 * 2.0) / last - 1.0;
                shape.eval(x)
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self { shape, table }
    }

    pub fn shape(&self) -> CurveShape {
        self.shape
    }

    pub fn table(&self) -> &[f32] {
        &self.table
    }

    /// Map one sample through the table.
    #[inline]
    pub fn apply(&self, sample: f32) -> f32 {
        let last = self.table.len() - 1;
        let pos = (sample.clamp(-1.0, 1.0) + 1.0) * 0.5 * last as f32;
        let index = pos as usize;
        if index >= last {
            return self.table[last];
        }

        let frac = pos - index as f32;
        let a = self.table[index];
        let b = self.table[index + 1];
        a + (b - a) * frac
    }

    /// Shape a buffer in place.
    pub fn apply_buffer(&self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.apply(*sample);
        }
    }
}

impl std::fmt::Debug for TransferCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferCurve")
            .field("shape", &self.shape)
            .field("len", &self.table.len())
            .finish()
    }
}
