use crate::{
    config::StftConfig,
    error::{SpectralError, SpectralResult},
    graph::{
        adapter::QuantumAdapter,
        node::{GraphNode, RenderCtx},
    },
    stft::{Identity, SpectralOp, StftEngine},
};

/*
Spectral Effect Node
====================

Wraps an StftEngine as an in-place effect so it can sit in a serial chain:

    let chain = source.through(SpectralNode::with_op(&config, BrickWallLowPass::for_window(1024))?);

The node accepts host blocks of any length. Its latency is one full window:
window - quantum inside the engine plus one quantum in the adapter.

If the engine ever reports an error the node goes silent and inactive; the
error stays available through fault().
*/

pub struct SpectralNode<Op = Identity> {
    engine: StftEngine<Op>,
    adapter: QuantumAdapter,
    fault: Option<SpectralError>,
}

impl SpectralNode<Identity> {
    pub fn new(config: &StftConfig) -> SpectralResult<Self> {
        Self::with_op(config, Identity)
    }
}

impl<Op: SpectralOp> SpectralNode<Op> {
    pub fn with_op(config: &StftConfig, op: Op) -> SpectralResult<Self> {
        let engine = StftEngine::with_op(config, op)?;
        Ok(Self {
            adapter: QuantumAdapter::new(config.quantum_size),
            engine,
            fault: None,
        })
    }

    pub fn engine(&self) -> &StftEngine<Op> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut StftEngine<Op> {
        &mut self.engine
    }

    pub fn fault(&self) -> Option<&SpectralError> {
        self.fault.as_ref()
    }

    pub fn reset(&mut self) {
        self.engine.reset();
        self.adapter.reset();
        self.fault = None;
    }

    fn run(&mut self, out: &mut [f32]) -> SpectralResult<()> {
        let mut done = 0;
        while done < out.len() {
            let span = self.adapter.span(out.len() - done);
            let chunk = &mut out[done..done + span.len()];

            self.engine.input_slot()[span.clone()].copy_from_slice(chunk);
            chunk.copy_from_slice(&self.adapter.held()[span.clone()]);
            done += span.len();

            if self.adapter.advance(span.len()) {
                self.engine.process()?;
                self.adapter.hold(self.engine.output_slot()?);
            }
        }
        Ok(())
    }
}

impl<Op: SpectralOp> GraphNode for SpectralNode<Op> {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        if self.fault.is_some() {
            out.fill(0.0);
            return;
        }
        if let Err(err) = self.run(out) {
            self.fault = Some(err);
            out.fill(0.0);
        }
    }

    fn is_active(&self) -> bool {
        self.fault.is_none()
    }

    fn latency(&self) -> usize {
        self.engine.latency() + self.adapter.quantum()
    }
}
