//! Error types for the Stour solver, organized by subsystem:
//! boundary tables, partition building, exchange, and the step driver.

use std::error::Error;
use std::fmt;

use crate::id::{RankId, SiteIndex, StepId};

/// Errors detected while building a boundary-value table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryError {
    /// The shared cycle period is zero.
    ZeroPeriod,
    /// A waveform holds a NaN or infinite mean, amplitude, or phase.
    NonFiniteWaveform {
        /// Position of the offending waveform in the table.
        index: usize,
    },
}

impl fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroPeriod => write!(f, "boundary cycle period is zero"),
            Self::NonFiniteWaveform { index } => {
                write!(f, "waveform {index} holds a non-finite value")
            }
        }
    }
}

impl Error for BoundaryError {}

/// Fatal defects in partition data, reported once at build time.
///
/// Malformed partition data is a configuration error, never re-checked
/// in the per-step hot path. A partition that survives construction is
/// trusted by the collision and streaming code.
#[derive(Clone, Debug, PartialEq)]
pub enum PartitionError {
    /// A streamed-index entry points outside the new-buffer slot range.
    StreamSlotOutOfRange {
        /// The site whose entry is defective.
        site: SiteIndex,
        /// The lattice direction of the defective entry.
        direction: usize,
        /// The out-of-range slot value.
        slot: usize,
        /// Total number of addressable slots.
        slot_count: usize,
    },
    /// A wall-distance fraction lies outside `(0, 1]`.
    CutDistanceOutOfRange {
        /// The site carrying the defective wall link.
        site: SiteIndex,
        /// The lattice direction of the wall link.
        direction: usize,
        /// The defective fraction.
        cut: f64,
    },
    /// A wall link names an invalid lattice direction (0 or >= 15).
    InvalidWallDirection {
        /// The site carrying the defective wall link.
        site: SiteIndex,
        /// The invalid direction value.
        direction: usize,
    },
    /// An inlet/outlet site carries no boundary id.
    MissingBoundaryId {
        /// The boundary site without an id.
        site: SiteIndex,
    },
    /// A site references a boundary id beyond the boundary table.
    BoundaryIdOutOfRange {
        /// The site with the dangling reference.
        site: SiteIndex,
        /// The referenced boundary id.
        boundary: u32,
        /// Number of boundaries actually available.
        boundary_count: usize,
    },
    /// The wall-link table length does not match the site count.
    WallTableLengthMismatch {
        /// Number of wall-link rows supplied.
        rows: usize,
        /// Number of sites in the partition.
        site_count: usize,
    },
    /// The streamed-index table length is not `site_count × 15`.
    StreamTableLengthMismatch {
        /// Number of entries supplied.
        entries: usize,
        /// Number of entries expected.
        expected: usize,
    },
    /// Per-rank send ranges do not tile the send-halo exactly.
    MalformedSendRanges {
        /// Description of the defect.
        reason: String,
    },
    /// A receive-scatter entry points outside the local site region.
    ScatterIndexOutOfRange {
        /// The neighbouring rank whose scatter table is defective.
        rank: RankId,
        /// The out-of-range destination index.
        index: usize,
        /// Last valid local slot (exclusive).
        local_slots: usize,
    },
}

impl fmt::Display for PartitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StreamSlotOutOfRange {
                site,
                direction,
                slot,
                slot_count,
            } => write!(
                f,
                "site {site} direction {direction} streams to slot {slot}, \
                 but only {slot_count} slots exist"
            ),
            Self::CutDistanceOutOfRange {
                site,
                direction,
                cut,
            } => write!(
                f,
                "site {site} direction {direction} wall distance {cut} outside (0, 1]"
            ),
            Self::InvalidWallDirection { site, direction } => {
                write!(f, "site {site} wall link names invalid direction {direction}")
            }
            Self::MissingBoundaryId { site } => {
                write!(f, "boundary site {site} carries no boundary id")
            }
            Self::BoundaryIdOutOfRange {
                site,
                boundary,
                boundary_count,
            } => write!(
                f,
                "site {site} references boundary {boundary}, \
                 but the table holds {boundary_count}"
            ),
            Self::WallTableLengthMismatch { rows, site_count } => write!(
                f,
                "wall table has {rows} rows for {site_count} sites"
            ),
            Self::StreamTableLengthMismatch { entries, expected } => write!(
                f,
                "streamed-index table has {entries} entries, expected {expected}"
            ),
            Self::MalformedSendRanges { reason } => {
                write!(f, "malformed send-halo ranges: {reason}")
            }
            Self::ScatterIndexOutOfRange {
                rank,
                index,
                local_slots,
            } => write!(
                f,
                "rank {rank} scatter entry {index} outside local region of {local_slots} slots"
            ),
        }
    }
}

impl Error for PartitionError {}

/// Errors from the cross-rank exchange barrier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExchangeError {
    /// A neighbouring rank hung up before delivering its payload.
    Disconnected {
        /// The rank that is no longer reachable.
        rank: RankId,
    },
    /// A payload arrived tagged with the wrong step.
    ///
    /// The exchange is a per-generation barrier; a mismatched step means
    /// the ranks have fallen out of lockstep.
    StepMismatch {
        /// The rank that sent the payload.
        rank: RankId,
        /// The step this rank is exchanging.
        expected: StepId,
        /// The step the payload was tagged with.
        received: StepId,
    },
    /// A payload's length does not match the halo layout.
    PayloadLength {
        /// The rank that sent the payload.
        rank: RankId,
        /// Expected number of distribution values.
        expected: usize,
        /// Number of values actually received.
        received: usize,
    },
    /// An exchange was requested for a rank with no registered link.
    UnknownRank {
        /// The unlinked rank.
        rank: RankId,
    },
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected { rank } => write!(f, "rank {rank} disconnected"),
            Self::StepMismatch {
                rank,
                expected,
                received,
            } => write!(
                f,
                "rank {rank} sent step {received} while exchanging step {expected}"
            ),
            Self::PayloadLength {
                rank,
                expected,
                received,
            } => write!(
                f,
                "rank {rank} sent {received} values, expected {expected}"
            ),
            Self::UnknownRank { rank } => write!(f, "no link registered for rank {rank}"),
        }
    }
}

impl Error for ExchangeError {}

/// Errors from the timestep driver.
#[derive(Clone, Debug, PartialEq)]
pub enum StepError {
    /// The engine was halted by the stability monitor; no further
    /// steps are taken and the last completed generation stays exposed.
    Halted {
        /// The last step completed before the halt.
        last_step: StepId,
    },
    /// The cross-rank exchange failed mid-step.
    Exchange(ExchangeError),
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Halted { last_step } => {
                write!(f, "engine halted; last completed step is {last_step}")
            }
            Self::Exchange(e) => write!(f, "exchange failed: {e}"),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Exchange(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ExchangeError> for StepError {
    fn from(e: ExchangeError) -> Self {
        Self::Exchange(e)
    }
}
