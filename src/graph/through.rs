use crate::graph::node::{GraphNode, RenderCtx};

/*
Serial Signal Chain (Through)
=============================

Through connects two nodes in series: the source renders into the output
buffer, then the effect transforms that buffer in place.

  [Source] ──→ [Effect] ──→ output

Spectral effects stack the same way, and their latencies add up:

     let chain = source
         .through(SpectralNode::with_op(&config, BrickWallLowPass::for_window(1024))?)
         .through(SpectralNode::new(&config)?);

   - Two window-length delays; latency() reports the sum.
*/

pub struct Through<S, F> {
    source: S,
    effect: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, effect: F) -> Self {
        Self { source, effect }
    }

    pub fn effect(&self) -> &F {
        &self.effect
    }

    pub fn effect_mut(&mut self) -> &mut F {
        &mut self.effect
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.effect.render_block(out, ctx);
    }

    fn is_active(&self) -> bool {
        self.source.is_active() && self.effect.is_active()
    }

    fn latency(&self) -> usize {
        self.source.latency() + self.effect.latency()
    }
}
