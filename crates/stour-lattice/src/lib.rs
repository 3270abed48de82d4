//! Lattice geometry and per-site hydrodynamic state.
//!
//! This crate holds the fixed D3Q15 velocity set — discrete velocity
//! vectors, their opposite-direction mapping, and the weights feeding
//! the equilibrium-distribution polynomial — plus [`HydroState`], the
//! transient numeric bundle rebuilt per site per collision.
//!
//! Everything here is pure arithmetic: no state, no error paths.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod d3q15;
pub mod hydro;

pub use hydro::HydroState;
