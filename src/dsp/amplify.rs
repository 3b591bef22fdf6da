//! Gain staging primitives.

/*
Gain Staging
============

Every stage of a distortion chain cares about HOW HOT the signal is when it
arrives. A waveshaping curve barely bends a quiet input and flattens a loud
one, so "drive" is nothing more than a gain stage placed in front of the
curves:

    kick (≈ ±1) ──▶ × drive ──▶ curve ──▶ curve ──▶ curve

  drive < 1.0  →  signal stays in the near-linear middle of the curve
  drive = 1.0  →  peaks just reach the curve's bend
  drive > 1.0  →  peaks are pushed into the knee / wall / fold

Gain in Decibels
----------------

    dB = 20 × log₁₀(gain)

    ×0.5  =  -6 dB
    ×1.0  =   0 dB
    ×2.0  =  +6 dB
    ×12.0 = +21.6 dB  (the hottest catalog drive: fuzz at full knob)

Time-varying gain
-----------------

The master stage multiplies by an automation curve instead of a constant,
which is how a playing session fades to silence without a click:
`multiply_in_place(signal, gains)` with `gains` rendered from the timeline.
*/

/// Multiply a signal by a constant gain factor (in-place).
///
/// # Arguments
/// * `signal` - The signal buffer to modify in-place
/// * `gain` - The gain factor (0.0 = silence, 1.0 = unchanged, 2.0 = double)
#[inline]
pub fn apply_gain(signal: &mut [f32], gain: f32) {
    for sample in signal.iter_mut() {
        *sample *= gain;
    }
}

/// Multiply a signal by a per-sample gain curve (in-place).
#[inline]
pub fn multiply_in_place(signal: &mut [f32], gains: &[f32]) {
    debug_assert_eq!(signal.len(), gains.len());

    for (s, &g) in signal.iter_mut().zip(gains.iter()) {
        *s *= g;
    }
}
