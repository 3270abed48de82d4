//! One rank's partition of the lattice.
//!
//! A [`Partition`] is handed to this crate fully decomposed: a site
//! classification array, sparse per-direction wall links, a
//! streamed-index table, and the halo layout describing which
//! post-collision values cross to neighbouring ranks. Construction
//! validates everything once and fatally; the per-step hot path trusts
//! the data completely (a documented precondition, not a runtime
//! check).
//!
//! Topology is immutable after build — only the distribution values
//! flowing through it change.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod halo;
pub mod partition;
pub mod stream;

pub use halo::HaloLayout;
pub use partition::{Partition, WallLink, WallLinks, MAX_RECORDED_CUT};
pub use stream::{StreamMap, StreamTarget};
