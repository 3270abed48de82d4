//! The collision-operator family.
//!
//! Each variant derives the equilibrium inputs differently — locally,
//! with velocity forced to zero, or with density imposed from the
//! boundary-value table — then delegates the per-direction relaxation
//! to the shared [`LbgkKernel`]. All variants flow through the same
//! equilibrium formula, so imposing the locally-derived density must
//! reproduce the local operator's equilibrium exactly.

use stour_core::{BoundaryId, BoundaryValues, StepId};
use stour_lattice::d3q15::{self, NUM_VECTORS};
use stour_lattice::HydroState;

use crate::kernel::{LbgkKernel, RelaxationParameters};

/// How inlet or outlet sites derive their equilibrium inputs.
///
/// Chosen independently for the inlet side and the outlet side of a
/// run; maps onto a [`CollisionOperator`] variant per site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryTreatment {
    /// Impose the boundary density, keep the locally-derived momentum.
    FixedDensityLocalVelocity,
    /// Impose the boundary density with zero velocity.
    FixedDensityZeroVelocity,
    /// Derive density locally, force velocity to zero (pressure-only
    /// approximation that needs no boundary table entry).
    ZeroVelocityLocalDensity,
}

impl BoundaryTreatment {
    /// The operator this treatment selects for a site fed by `boundary`.
    pub fn operator(self, boundary: BoundaryId) -> CollisionOperator {
        match self {
            Self::FixedDensityLocalVelocity => {
                CollisionOperator::NonZeroVelocityEquilibriumFixedDensity { boundary }
            }
            Self::FixedDensityZeroVelocity => {
                CollisionOperator::ZeroVelocityEquilibriumFixedDensity { boundary }
            }
            Self::ZeroVelocityLocalDensity => CollisionOperator::ZeroVelocityEquilibrium,
        }
    }
}

/// One site's collision strategy, fixed at partition-build time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionOperator {
    /// Ordinary fluid collision: both moments derived from the old
    /// distributions.
    Normal,
    /// Density derived locally, velocity forced to zero.
    ZeroVelocityEquilibrium,
    /// Density imposed from the boundary table, velocity zero.
    ZeroVelocityEquilibriumFixedDensity {
        /// Which boundary's waveform supplies the density.
        boundary: BoundaryId,
    },
    /// Density imposed from the boundary table, momentum derived
    /// locally — imposed pressure with locally consistent flow.
    NonZeroVelocityEquilibriumFixedDensity {
        /// Which boundary's waveform supplies the density.
        boundary: BoundaryId,
    },
}

impl CollisionOperator {
    /// Populate the site's hydrodynamic state for this step.
    pub fn prepare(
        &self,
        f: [f64; NUM_VECTORS],
        boundaries: &BoundaryValues,
        step: StepId,
    ) -> HydroState {
        match *self {
            Self::Normal => HydroState::from_distributions(f),
            Self::ZeroVelocityEquilibrium => {
                let (density, _) = d3q15::density_momentum(&f);
                let f_eq = d3q15::equilibrium(density, [0.0; 3]);
                HydroState::with_equilibrium(f, density, [0.0; 3], f_eq)
            }
            Self::ZeroVelocityEquilibriumFixedDensity { boundary } => {
                let density = boundaries.density(boundary, step);
                let f_eq = d3q15::equilibrium(density, [0.0; 3]);
                HydroState::with_equilibrium(f, density, [0.0; 3], f_eq)
            }
            Self::NonZeroVelocityEquilibriumFixedDensity { boundary } => {
                let density = boundaries.density(boundary, step);
                let (_, momentum) = d3q15::density_momentum(&f);
                let f_eq = d3q15::equilibrium(density, momentum);
                HydroState::with_equilibrium(f, density, momentum, f_eq)
            }
        }
    }

    /// Post-collision value for one direction.
    ///
    /// Every variant relaxes the prepared state through the shared
    /// kernel; the variants differ only in what [`prepare`](Self::prepare)
    /// put into the state.
    #[inline]
    pub fn collide(
        &self,
        params: &RelaxationParameters,
        direction: usize,
        hydro: &HydroState,
    ) -> f64 {
        LbgkKernel.collide(params, hydro, direction)
    }
}
