use std::sync::Arc;

use crate::dsp::curve::TransferCurve;
use crate::dsp::oversample::{Oversampler, Oversampling};
use crate::graph::node::{GraphNode, RenderCtx};

/*
Waveshaper Node
===============

Maps every sample through a precomputed transfer curve. The curve is shared
(`Arc`) because the same table is reused by every session built for a mode;
only the oversampler's filter state belongs to the node.

Three of these in a row form the distortion stack:

  drive ──▶ [curve A, 4×] ──▶ [curve B, 4×] ──▶ [curve C, 4×]

Each stage sees the previous stage's harmonics and bends them again, which
builds density faster than pushing one curve harder would, without the
stepped edges a single brutal curve leaves behind.

Example usage:

  let stage = ShaperNode::new(Arc::new(TransferCurve::generate(CurveShape::Fuzz(3.0))))
      .with_oversampling(Oversampling::X4);
*/

pub struct ShaperNode {
    curve: Arc<TransferCurve>,
    oversampler: Oversampler,
}

impl ShaperNode {
    /// Create a 4× oversampled shaping stage.
    pub fn new(curve: Arc<TransferCurve>) -> Self {
        Self {
            curve,
            oversampler: Oversampler::new(Oversampling::X4),
        }
    }

    pub fn with_oversampling(mut self, factor: Oversampling) -> Self {
        self.oversampler = Oversampler::new(factor);
        self
    }

    pub fn curve(&self) -> &TransferCurve {
        &self.curve
    }

    pub fn oversampling(&self) -> Oversampling {
        self.oversampler.factor()
    }
}

impl GraphNode for ShaperNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let curve = &self.curve;
        self.oversampler
            .process(out, ctx.sample_rate, |sample| curve.apply(sample));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::curve::CurveShape;

    fn ctx() -> RenderCtx {
        RenderCtx::new(48_000.0, 0.0)
    }

    #[test]
    fn shaping_modifies_signal() {
        let curve = Arc::new(TransferCurve::generate(CurveShape::Saturate(12.0)));
        let mut node = ShaperNode::new(curve).with_oversampling(Oversampling::None);
        let mut buffer = vec![0.5, -0.5, 0.8, -0.8];
        let original = buffer.clone();

        node.render_block(&mut buffer, &ctx());

        assert!(buffer.iter().zip(original.iter()).any(|(a, b)| (a - b).abs() > 0.01));
    }

    #[test]
    fn hard_clip_stage_limits_amplitude() {
        let curve = Arc::new(TransferCurve::generate(CurveShape::HardClip(0.5)));
        let mut node = ShaperNode::new(curve).with_oversampling(Oversampling::None);
        let mut buffer = vec![0.5, -0.5, 0.8, -0.8];

        node.render_block(&mut buffer, &ctx());

        for sample in &buffer {
            assert!(sample.abs() <= 0.5 + 1e-6);
        }
    }

    #[test]
    fn oversampled_stage_stays_finite_at_extreme_input() {
        let curve = Arc::new(TransferCurve::generate(CurveShape::Fold(10.0)));
        let mut node = ShaperNode::new(curve);
        let mut buffer: Vec<f32> = (0..512).map(|i| ((i as f32) * 0.37).sin() * 12.0).collect();

        node.render_block(&mut buffer, &ctx());

        assert_eq!(node.oversampling(), Oversampling::X4);
        assert!(buffer.iter().all(|s| s.is_finite()));
    }
}
