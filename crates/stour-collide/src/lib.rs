//! Collision operators for the Stour solver.
//!
//! The per-site, per-direction numeric work lives here: the
//! single-relaxation-time [`LbgkKernel`], the closed
//! [`CollisionOperator`] family that differs only in how equilibrium
//! inputs are derived, and the [`WallStreamingResolver`] implementing
//! the interpolated bounce-back wall closure.
//!
//! Operators are selected once per site at setup; the per-direction
//! loop dispatches on a plain enum, keeping virtual calls out of the
//! innermost path.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod kernel;
pub mod operator;
pub mod wall;

pub use kernel::{LbgkKernel, RelaxationParameters};
pub use operator::{BoundaryTreatment, CollisionOperator};
pub use wall::WallStreamingResolver;
