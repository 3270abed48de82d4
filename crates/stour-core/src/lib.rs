//! Core types for the Stour lattice-Boltzmann solver.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the strongly-typed identifiers, site classification, boundary-value
//! tables, and error types used throughout the Stour workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod error;
pub mod id;
pub mod site;

pub use boundary::{BoundaryValues, DensityWaveform};
pub use error::{BoundaryError, ExchangeError, PartitionError, StepError};
pub use id::{BoundaryId, RankId, SiteIndex, StepId};
pub use site::{SiteDescriptor, SiteKind};
