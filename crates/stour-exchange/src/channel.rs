//! Channel-backed exchange for ranks running as threads.

use crossbeam_channel::{unbounded, Receiver, Sender};
use indexmap::IndexMap;
use stour_core::{ExchangeError, RankId, StepId};

use crate::PartitionExchange;

/// One generation's boundary payload, tagged with the step it belongs
/// to so lockstep violations surface as errors instead of corruption.
#[derive(Clone, Debug)]
pub struct Envelope {
    /// The step whose post-collision values these are.
    pub step: StepId,
    /// Distribution values in the sender's halo order.
    pub values: Vec<f64>,
}

/// This rank's end of a bidirectional link to one neighbour.
#[derive(Clone, Debug)]
pub struct RankLink {
    peer: RankId,
    sender: Sender<Envelope>,
    receiver: Receiver<Envelope>,
}

impl RankLink {
    /// The neighbouring rank this link leads to.
    pub fn peer(&self) -> RankId {
        self.peer
    }

    /// Push an envelope to the peer without waiting for it to be read.
    pub fn send(&self, envelope: Envelope) -> Result<(), ExchangeError> {
        self.sender
            .send(envelope)
            .map_err(|_| ExchangeError::Disconnected { rank: self.peer })
    }
}

/// Create the two ends of the link between ranks `a` and `b`.
///
/// The first returned end belongs to `a` (its peer is `b`), the second
/// to `b`. Channels are unbounded: every rank can post its outgoing
/// payloads before draining incoming ones, so no pair of ranks can
/// deadlock on a full channel mid-exchange.
pub fn link_pair(a: RankId, b: RankId) -> (RankLink, RankLink) {
    let (a_tx, b_rx) = unbounded();
    let (b_tx, a_rx) = unbounded();
    (
        RankLink {
            peer: b,
            sender: a_tx,
            receiver: a_rx,
        },
        RankLink {
            peer: a,
            sender: b_tx,
            receiver: b_rx,
        },
    )
}

/// Message-passing exchange across in-process rank threads.
///
/// Holds one [`RankLink`] per neighbour. The exchange posts every
/// outgoing payload first, then blocks on each neighbour in turn until
/// its envelope for the current step arrives — the barrier the
/// timestep orchestration relies on.
#[derive(Debug, Default)]
pub struct ChannelExchange {
    links: IndexMap<RankId, RankLink>,
}

impl ChannelExchange {
    /// An exchange with no links yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a link; keyed by the rank at its far end.
    pub fn connect(&mut self, link: RankLink) {
        self.links.insert(link.peer(), link);
    }

    fn link(&self, rank: RankId) -> Result<&RankLink, ExchangeError> {
        self.links
            .get(&rank)
            .ok_or(ExchangeError::UnknownRank { rank })
    }
}

impl PartitionExchange for ChannelExchange {
    fn exchange(
        &mut self,
        step: StepId,
        outgoing: &[(RankId, &[f64])],
        incoming: &mut [(RankId, &mut [f64])],
    ) -> Result<(), ExchangeError> {
        // Post everything before receiving anything.
        for (rank, values) in outgoing {
            self.link(*rank)?.send(Envelope {
                step,
                values: values.to_vec(),
            })?;
        }

        for (rank, buffer) in incoming.iter_mut() {
            let link = self.link(*rank)?;
            let envelope = link
                .receiver
                .recv()
                .map_err(|_| ExchangeError::Disconnected { rank: *rank })?;
            if envelope.step != step {
                return Err(ExchangeError::StepMismatch {
                    rank: *rank,
                    expected: step,
                    received: envelope.step,
                });
            }
            if envelope.values.len() != buffer.len() {
                return Err(ExchangeError::PayloadLength {
                    rank: *rank,
                    expected: buffer.len(),
                    received: envelope.values.len(),
                });
            }
            buffer.copy_from_slice(&envelope.values);
        }
        Ok(())
    }
}
