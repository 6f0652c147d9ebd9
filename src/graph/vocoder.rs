#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};
#[cfg(feature = "rtrb")]
use tracing::warn;

use crate::{
    config::{EnvelopeFloor, VocoderConfig},
    error::{SpectralError, SpectralResult},
    graph::{
        adapter::QuantumAdapter,
        node::{GraphNode, RenderCtx},
    },
    vocoder::{Vocoder, VocoderFlags},
    MAX_BLOCK_SIZE,
};

/*
Vocoder Node
============

Drives a Vocoder from two graph sources:

  [Modulator] ──→ temp buffer ──┐
                                ├──→ Vocoder ──→ output
  [Carrier]   ──→ output ───────┘

The carrier renders straight into the output buffer, which is then replaced
in place by the vocoded result. Like SpectralNode, any host block length is
accepted and the latency is one full window.

     let voice = mic.vocode(saw, &VocoderConfig::default())?
         .with_flags(VocoderFlags::MEL_SMOOTHING);

With the rtrb feature, with_handle() also returns a VocoderHandle that a
control thread uses to change flags or the envelope floor, or to shut the
node down. Messages are applied at the start of the next render_block().
*/

pub enum VocoderMessage {
    SetFlags(VocoderFlags),
    SetFloor(EnvelopeFloor),
    Shutdown,
}

#[cfg(feature = "rtrb")]
const VOCODER_QUEUE_SIZE: usize = 64;

#[cfg(feature = "rtrb")]
pub struct VocoderHandle {
    tx: Producer<VocoderMessage>,
}

#[cfg(feature = "rtrb")]
impl VocoderHandle {
    pub fn set_flags(&mut self, flags: VocoderFlags) {
        self.send(VocoderMessage::SetFlags(flags));
    }

    pub fn set_floor(&mut self, floor: EnvelopeFloor) {
        self.send(VocoderMessage::SetFloor(floor));
    }

    pub fn shutdown(&mut self) {
        self.send(VocoderMessage::Shutdown);
    }

    fn send(&mut self, msg: VocoderMessage) {
        if self.tx.push(msg).is_err() {
            warn!("vocoder control queue full, message dropped");
        }
    }
}

pub struct VocoderNode<M, C> {
    modulator: M,
    carrier: C,
    vocoder: Vocoder,
    adapter: QuantumAdapter,
    modulator_buffer: Vec<f32>,
    flags: VocoderFlags,
    shut_down: bool,
    fault: Option<SpectralError>,
    #[cfg(feature = "rtrb")]
    rx: Option<Consumer<VocoderMessage>>,
}

impl<M: GraphNode, C: GraphNode> VocoderNode<M, C> {
    pub fn new(modulator: M, carrier: C, config: &VocoderConfig) -> SpectralResult<Self> {
        let vocoder = Vocoder::new(config)?;
        Ok(Self {
            modulator,
            carrier,
            adapter: QuantumAdapter::new(config.stft.quantum_size),
            vocoder,
            modulator_buffer: vec![0.0; MAX_BLOCK_SIZE],
            flags: VocoderFlags::NONE,
            shut_down: false,
            fault: None,
            #[cfg(feature = "rtrb")]
            rx: None,
        })
    }

    #[cfg(feature = "rtrb")]
    pub fn with_handle(
        modulator: M,
        carrier: C,
        config: &VocoderConfig,
    ) -> SpectralResult<(Self, VocoderHandle)> {
        let mut node = Self::new(modulator, carrier, config)?;
        let (tx, rx) = RingBuffer::<VocoderMessage>::new(VOCODER_QUEUE_SIZE);
        node.rx = Some(rx);
        Ok((node, VocoderHandle { tx }))
    }

    pub fn with_flags(mut self, flags: VocoderFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn flags(&self) -> VocoderFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: VocoderFlags) {
        self.flags = flags;
    }

    pub fn vocoder(&self) -> &Vocoder {
        &self.vocoder
    }

    pub fn fault(&self) -> Option<&SpectralError> {
        self.fault.as_ref()
    }

    pub fn shutdown(&mut self) {
        self.shut_down = true;
    }

    pub fn reset(&mut self) {
        self.vocoder.reset();
        self.adapter.reset();
        self.fault = None;
    }

    /// Apply a control message directly, as the handle would.
    pub fn apply(&mut self, msg: VocoderMessage) {
        match msg {
            VocoderMessage::SetFlags(flags) => self.flags = flags,
            VocoderMessage::SetFloor(floor) => self.vocoder.set_floor(floor),
            VocoderMessage::Shutdown => self.shut_down = true,
        }
    }

    #[cfg(feature = "rtrb")]
    fn drain_messages(&mut self) {
        while let Some(msg) = self.rx.as_mut().and_then(|rx| rx.pop().ok()) {
            self.apply(msg);
        }
    }

    fn run(&mut self, out: &mut [f32], ctx: &RenderCtx) -> SpectralResult<()> {
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.carrier.render_block(chunk, ctx);

            let modulation = &mut self.modulator_buffer[..chunk.len()];
            modulation.fill(0.0);
            self.modulator.render_block(modulation, ctx);

            let mut done = 0;
            while done < chunk.len() {
                let span = self.adapter.span(chunk.len() - done);
                let range = done..done + span.len();

                self.vocoder.modulator_slot()[span.clone()]
                    .copy_from_slice(&modulation[range.clone()]);
                self.vocoder.carrier_slot()[span.clone()].copy_from_slice(&chunk[range.clone()]);
                chunk[range].copy_from_slice(&self.adapter.held()[span.clone()]);
                done += span.len();

                if self.adapter.advance(span.len()) {
                    self.vocoder.process(self.flags)?;
                    self.adapter.hold(self.vocoder.output_slot()?);
                }
            }
        }
        Ok(())
    }
}

impl<M: GraphNode, C: GraphNode> GraphNode for VocoderNode<M, C> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        #[cfg(feature = "rtrb")]
        self.drain_messages();

        if !self.is_active() {
            out.fill(0.0);
            return;
        }
        if let Err(err) = self.run(out, ctx) {
            self.fault = Some(err);
            out.fill(0.0);
        }
    }

    fn is_active(&self) -> bool {
        !self.shut_down && self.fault.is_none()
    }

    fn latency(&self) -> usize {
        self.vocoder.latency() + self.adapter.quantum()
    }
}
