//! Halo layout: how send-halo slots and incoming values map to ranks.

use std::ops::Range;

use indexmap::IndexMap;
use stour_core::{PartitionError, RankId};

/// Per-neighbour-rank layout of the exchange halo.
///
/// The send side assigns each neighbour a contiguous range of the
/// send-halo tail; ranges tile the tail exactly in table order, so one
/// slice per rank can be handed to the exchange with no copying. The
/// receive side is a scatter table: for each neighbour, the local
/// new-buffer index where each incoming value belongs, in the order
/// that neighbour sends them.
#[derive(Clone, Debug, Default)]
pub struct HaloLayout {
    send: IndexMap<RankId, Range<usize>>,
    recv: IndexMap<RankId, Vec<u32>>,
}

impl HaloLayout {
    /// An empty layout for a partition with no neighbours.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a layout from per-rank send ranges and receive scatters.
    ///
    /// Send ranges must tile `[0, total)` contiguously in map order —
    /// a gap, overlap, or out-of-order range is a build-time fatal
    /// defect. Scatter destinations are range-checked later by
    /// `Partition::new`, which knows the local slot count.
    pub fn new(
        send: IndexMap<RankId, Range<usize>>,
        recv: IndexMap<RankId, Vec<u32>>,
    ) -> Result<Self, PartitionError> {
        let mut cursor = 0usize;
        for (rank, range) in &send {
            if range.start != cursor {
                return Err(PartitionError::MalformedSendRanges {
                    reason: format!(
                        "rank {rank} range starts at {} but the previous range ends at {cursor}",
                        range.start
                    ),
                });
            }
            if range.end < range.start {
                return Err(PartitionError::MalformedSendRanges {
                    reason: format!("rank {rank} range {range:?} is inverted"),
                });
            }
            cursor = range.end;
        }
        Ok(Self { send, recv })
    }

    /// Total number of send-halo slots.
    pub fn send_len(&self) -> usize {
        self.send.values().map(|r| r.len()).sum()
    }

    /// Iterate `(rank, send range)` pairs in layout order.
    pub fn sends(&self) -> impl Iterator<Item = (RankId, &Range<usize>)> + '_ {
        self.send.iter().map(|(rank, range)| (*rank, range))
    }

    /// Iterate `(rank, scatter destinations)` pairs in layout order.
    pub fn recvs(&self) -> impl Iterator<Item = (RankId, &[u32])> + '_ {
        self.recv.iter().map(|(rank, dests)| (*rank, dests.as_slice()))
    }

    /// Scatter destinations for one neighbour, if linked.
    pub fn recv_for(&self, rank: RankId) -> Option<&[u32]> {
        self.recv.get(&rank).map(Vec::as_slice)
    }

    /// Number of neighbouring ranks this partition exchanges with.
    pub fn neighbour_count(&self) -> usize {
        self.send.len().max(self.recv.len())
    }

    pub(crate) fn validate_scatter(&self, local_slots: usize) -> Result<(), PartitionError> {
        for (rank, dests) in &self.recv {
            for &dest in dests {
                if dest as usize >= local_slots {
                    return Err(PartitionError::ScatterIndexOutOfRange {
                        rank: *rank,
                        index: dest as usize,
                        local_slots,
                    });
                }
            }
        }
        Ok(())
    }
}
