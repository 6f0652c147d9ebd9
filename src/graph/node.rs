/// Context passed to graph nodes during rendering
///
/// The spectral engines are configured up front, so the context only carries
/// what sources need to render:
/// - sample_rate: Audio sample rate (e.g., 48000.0)
pub struct RenderCtx {
    pub sample_rate: f32,
}

impl RenderCtx {
    pub fn new(sample_rate: f32) -> Self {
        Self { sample_rate }
    }
}

/// Core trait for audio processing graph nodes
///
/// Sources fill `out`; effects read `out` and overwrite it in place.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Check if this node is still producing sound
    fn is_active(&self) -> bool {
        true
    }

    /// Delay in samples between a node's input and its output.
    fn latency(&self) -> usize {
        0
    }
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch)
impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }

    fn latency(&self) -> usize {
        (**self).latency()
    }
}
