use crate::graph::node::{GraphNode, RenderCtx};

/*
Serial Signal Chain (Through)
=============================

Through connects two nodes in series, passing the output of the first (source)
into the second (effect). Every serial hop in the kick chain is a Through:

  kick bus → pre EQ → drive → shaper → shaper → shaper → post EQ → tone

How It Works:
-------------
1. Render the source into the output buffer
2. Pass that buffer through the effect (in-place processing)

Effects ignore what "source" means; a GainNode followed by a ShaperNode is a
perfectly good Through on its own, which is how the wet branch is assembled
before it is attached to a dry/wet split.

Signal Flow Diagram:
--------------------
  Through: [Source] ──→ [Effect] ──→ output

  DryWet:  [Source] ──┬────────────────→ (×dry) ──┐
                      └──→ [Wet chain] ─→ (×wet) ──┴──→ (+) ──→ output
*/

pub struct Through<S, F> {
    source: S,
    filter: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, filter: F) -> Self {
        Self { source, filter }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn effect(&self) -> &F {
        &self.filter
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.filter.render_block(out, ctx);
    }

    fn is_active(&self) -> bool {
        self.source.is_active()
    }
}
