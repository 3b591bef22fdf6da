use crate::{
    dsp::mix::apply_dry_wet,
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/*
Dry/Wet Split
=============

DryWet renders its source once, keeps a copy as the dry path, pushes the
buffer through the wet chain in place and crossfades the two:

    output = dry × (1 - wet_fraction) + wet × wet_fraction

In the kick chain the split sits right after the pre-EQ, so the dry path is
the clean (but tone-shaped) kick and the wet path is the full distortion
stack. The dry copy lives in a pre-allocated buffer, so rendering never
allocates.

Example usage:

  let split = KickBus::new(&hits, 48_000.0, seed)
      .through(FilterNode::peaking(120.0, 0.9, 4.0))
      .dry_wet(
          GainNode::new(6.0).through(ShaperNode::new(curve)),
          0.8,
      );
*/

pub struct DryWet<S, W> {
    source: S,
    wet: W,
    wet_fraction: f32,
    dry_buffer: Vec<f32>,
}

impl<S, W> DryWet<S, W> {
    pub fn new(source: S, wet: W, wet_fraction: f32) -> Self {
        Self {
            source,
            wet,
            wet_fraction: wet_fraction.clamp(0.0, 1.0),
            dry_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn wet_fraction(&self) -> f32 {
        self.wet_fraction
    }

    pub fn dry_fraction(&self) -> f32 {
        1.0 - self.wet_fraction
    }
}

impl<S: GraphNode, W: GraphNode> GraphNode for DryWet<S, W> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let len = out.len().min(MAX_BLOCK_SIZE);
        let out = &mut out[..len];

        self.source.render_block(out, ctx);
        self.dry_buffer[..len].copy_from_slice(out);

        self.wet.render_block(out, ctx);
        apply_dry_wet(&self.dry_buffer[..len], out, self.wet_fraction);
    }

    fn is_active(&self) -> bool {
        self.source.is_active()
    }
}
