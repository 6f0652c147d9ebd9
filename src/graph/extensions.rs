use crate::{
    config::VocoderConfig,
    error::SpectralResult,
    graph::{node::GraphNode, through::Through, vocoder::VocoderNode},
};

pub trait NodeExt: GraphNode + Sized {
    fn through<F: GraphNode>(self, effect: F) -> Through<Self, F> {
        Through::new(self, effect)
    }

    /// Use this node as the modulator and `carrier` as the carrier.
    fn vocode<C: GraphNode>(
        self,
        carrier: C,
        config: &VocoderConfig,
    ) -> SpectralResult<VocoderNode<Self, C>> {
        VocoderNode::new(self, carrier, config)
    }
}

impl<T: GraphNode> NodeExt for T {}
