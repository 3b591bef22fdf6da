use crate::{
    dsp::limiter::{Limiter, LimiterSettings},
    graph::node::{GraphNode, RenderCtx},
};

/// Output limiter stage (-6 dB, 3 dB knee, 20:1, 1 ms / 50 ms by default).
pub struct LimiterNode {
    limiter: Limiter,
}

impl LimiterNode {
    pub fn new(settings: LimiterSettings) -> Self {
        Self {
            limiter: Limiter::new(settings),
        }
    }

    pub fn settings(&self) -> LimiterSettings {
        self.limiter.settings()
    }
}

impl Default for LimiterNode {
    fn default() -> Self {
        Self::new(LimiterSettings::OUTPUT)
    }
}

impl GraphNode for LimiterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.limiter.render(out, ctx.sample_rate);
    }
}
