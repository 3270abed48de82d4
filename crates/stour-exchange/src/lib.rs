//! Cross-rank exchange of boundary-crossing distribution values.
//!
//! After a rank finishes its local collide pass, the values destined
//! for neighbouring partitions sit in the send-halo tail of its new
//! buffer. The [`PartitionExchange`] trait delivers those slices and
//! blocks until every neighbour's payload for the same step has
//! arrived — the one suspension point of the whole timestep. No rank
//! may begin its next collide pass before its exchange returns.
//!
//! Ranks are modelled as threads inside one process; the
//! [`ChannelExchange`] implementation wires them with one
//! bidirectional channel pair per neighbour link.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod channel;

pub use channel::{link_pair, ChannelExchange, Envelope, RankLink};

use stour_core::{ExchangeError, RankId, StepId};

/// Synchronizes one generation's boundary-crossing values with every
/// neighbouring rank.
///
/// `outgoing` and `incoming` are keyed by neighbour rank in the halo
/// layout's order; incoming buffers arrive pre-sized to the expected
/// payload length. Implementations must not return until every
/// incoming buffer holds its neighbour's values for `step`.
pub trait PartitionExchange: Send {
    /// Deliver outgoing slices and fill every incoming buffer for `step`.
    fn exchange(
        &mut self,
        step: StepId,
        outgoing: &[(RankId, &[f64])],
        incoming: &mut [(RankId, &mut [f64])],
    ) -> Result<(), ExchangeError>;
}

/// The exchange for a partition with no neighbours.
///
/// A single-rank run still drives the same orchestration; this
/// implementation only verifies that nothing was asked to cross.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullExchange;

impl PartitionExchange for NullExchange {
    fn exchange(
        &mut self,
        _step: StepId,
        outgoing: &[(RankId, &[f64])],
        incoming: &mut [(RankId, &mut [f64])],
    ) -> Result<(), ExchangeError> {
        if let Some((rank, _)) = outgoing.first() {
            return Err(ExchangeError::UnknownRank { rank: *rank });
        }
        if let Some((rank, _)) = incoming.first() {
            return Err(ExchangeError::UnknownRank { rank: *rank });
        }
        Ok(())
    }
}
