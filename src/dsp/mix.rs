//! Signal mixing primitives.

/*
Dry/Wet Mixing
==============

Effects are blended with the unprocessed signal using two complementary
weights:

    output = dry × (1 - wet) + processed × wet

  wet = 0.0  →  untouched input
  wet = 0.5  →  half and half
  wet = 1.0  →  effect only

This is a LINEAR crossfade: the weights always sum to 1.0, so two
correlated signals never sum above full scale. On heavily distorted drums
the dry path carries the transient punch that saturation smears, so
pulling the mix back below 100% restores the attack.

Summing
-------

Voices that overlap in time are simply added. Nothing bounds the result,
so a limiter sits downstream of every summing point in the chain.
*/

/// Blend dry and wet samples (single sample version).
#[inline]
pub fn blend_dry_wet(dry: f32, wet: f32, mix: f32) -> f32 {
    dry * (1.0 - mix) + wet * mix
}

/// Blend a processed buffer with its dry reference, in place.
///
/// wet[i] = (dry[i] × (1-mix)) + (wet[i] × mix)
#[inline]
pub fn apply_dry_wet(dry: &[f32], wet: &mut [f32], mix: f32) {
    debug_assert_eq!(dry.len(), wet.len());
    let mix = mix.clamp(0.0, 1.0);
    for (w, &d) in wet.iter_mut().zip(dry.iter()) {
        *w = blend_dry_wet(d, *w, mix);
    }
}

/// Add signal B into signal A in-place (summing).
///
/// ⚠️ WARNING: Can exceed [-1.0, +1.0] range!
#[inline]
pub fn sum_in_place(a: &mut [f32], b: &[f32]) {
    debug_assert_eq!(a.len(), b.len());
    for (sa, &sb) in a.iter_mut().zip(b.iter()) {
        *sa += sb;
    }
}
