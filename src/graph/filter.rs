use crate::{
    dsp::filter::{FilterType, SVFilter},
    graph::node::{GraphNode, RenderCtx},
};

/*
State-Variable Filter (SVF)
===========================

Three filters shape the kick chain and one shapes the kick itself:

Peaking (bell): Boosts or cuts a band around the centre frequency and leaves
  everything else alone.
  - Pre-EQ: decides WHICH part of the kick hits the distortion hardest.
    A +5 dB bell at 100 Hz makes the body saturate before the click does.
  - Post-EQ: re-voices the distorted result (scoop the fizz, lift the bite).

Lowpass (LP): The "tone" knob. 800 Hz fully counter-clockwise (dark, thuddy)
  to 6.8 kHz fully clockwise (bright, raspy).

Highpass (HP): Keeps only the snap of the transient noise burst (800 Hz up)
  so the click never muddies the body.

Parameters:
-----------

Cutoff (Hz): Centre or corner frequency.

Q: Bandwidth. 0.707 is the flattest low/high-pass; for a bell, higher Q is a
  narrower bump.

Gain (dB, peaking only): Height of the bell. Positive boosts, negative cuts.

Example usage:
  let pre = FilterNode::peaking(120.0, 0.9, 4.0);
  let tone = FilterNode::lowpass(3_800.0);
*/

pub struct FilterNode {
    filter: SVFilter,
}

impl FilterNode {
    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self {
            filter: SVFilter::lowpass(cutoff_hz),
        }
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self {
            filter: SVFilter::highpass(cutoff_hz),
        }
    }

    pub fn peaking(cutoff_hz: f32, q: f32, gain_db: f32) -> Self {
        Self {
            filter: SVFilter::peaking(cutoff_hz, q, gain_db),
        }
    }

    pub fn cutoff(&self) -> f32 {
        self.filter.cutoff_hz
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter.filter_type()
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.filter.render(out, ctx.sample_rate);
    }
}
