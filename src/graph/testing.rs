use std::f32::consts::TAU;

use crate::graph::node::{GraphNode, RenderCtx};

/// Unit-amplitude sine source for exercising effect nodes.
pub struct Sine {
    freq: f32,
    phase: f32,
}

impl Sine {
    pub fn new(freq: f32) -> Self {
        Self { freq, phase: 0.0 }
    }
}

impl GraphNode for Sine {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let step = self.freq / ctx.sample_rate;
        for sample in out.iter_mut() {
            *sample = (TAU * self.phase).sin();
            self.phase = (self.phase + step).fract();
        }
    }
}

pub struct Silence;

impl GraphNode for Silence {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        out.fill(0.0);
    }
}
