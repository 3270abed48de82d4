//! Interpolated bounce-back for wall-adjacent sites.
//!
//! After the ordinary collision has streamed a site's values, the
//! directions cut by a wall have left one slot unfilled from the
//! outside: the value that would have streamed *in* from beyond the
//! wall. The resolver reconstructs it from a wall-slip velocity
//! estimate and the site's non-equilibrium residual, optionally
//! extrapolating through the next interior site for second-order
//! accuracy.

use stour_core::SiteIndex;
use stour_lattice::d3q15::{self, NUM_VECTORS};
use stour_lattice::HydroState;
use stour_partition::{Partition, StreamTarget, WallLink};

use crate::kernel::RelaxationParameters;

/// Threshold below which the wall closure extrapolates through the
/// next interior site.
const EXTRAPOLATION_CUTOFF: f64 = 0.75;

/// Computes the corrected post-collision value for each wall-facing
/// direction of a site.
///
/// Stateless over the step: borrows the partition topology and the
/// run's relaxation parameters, and writes only the wall-facing
/// inverse-direction slots of the site it is invoked for.
#[derive(Clone, Copy, Debug)]
pub struct WallStreamingResolver<'a> {
    partition: &'a Partition,
    params: &'a RelaxationParameters,
}

impl<'a> WallStreamingResolver<'a> {
    /// A resolver over one rank's topology.
    pub fn new(partition: &'a Partition, params: &'a RelaxationParameters) -> Self {
        Self { partition, params }
    }

    /// Overwrite every wall-facing slot of `site` in `f_new`.
    ///
    /// `hydro` must be the state the site's ordinary collision was
    /// prepared with; `f_old` is the full old-generation buffer (the
    /// extrapolation reads the next interior site's distributions).
    pub fn correct(
        &self,
        site: SiteIndex,
        hydro: &HydroState,
        f_old: &[f64],
        f_new: &mut [f64],
    ) {
        for link in self.partition.wall_links(site) {
            self.correct_direction(site, *link, hydro, f_old, f_new);
        }
    }

    /// Apply the closure for a single wall link.
    ///
    /// Exposed separately so raw geometry fractions in `(0, 1]` can be
    /// exercised directly; links coming out of a [`Partition`] are
    /// already clamped to one half.
    pub fn correct_direction(
        &self,
        site: SiteIndex,
        link: WallLink,
        hydro: &HydroState,
        f_old: &[f64],
        f_new: &mut [f64],
    ) {
        let delta = link.cut;
        let away = d3q15::inverse(link.direction);

        // First-order wall-slip estimate from this site alone.
        let slip = 1.0 - 1.0 / delta;
        let mut u_wall = [
            slip * hydro.momentum[0],
            slip * hydro.momentum[1],
            slip * hydro.momentum[2],
        ];
        let mut f_neq = hydro.f_neq[away];

        if delta < EXTRAPOLATION_CUTOFF {
            match self.interior_state(site, away, f_old) {
                Some((momentum_next, f_next, f_eq_next)) => {
                    // Blend with the next site away from the wall.
                    let coeff = (1.0 - delta) * (delta - 1.0) / (1.0 + delta);
                    for a in 0..3 {
                        u_wall[a] = delta * u_wall[a] + coeff * momentum_next[a];
                    }
                    f_neq = delta * f_neq + (1.0 - delta) * (f_next[away] - f_eq_next[away]);
                }
                // No interior site to extrapolate from: fall back to a
                // pure-equilibrium approximation (a documented
                // first-order degradation, kept as-is).
                None => {
                    u_wall = [0.0; 3];
                    f_neq = 0.0;
                }
            }
        }

        // Equilibrium at the wall, assuming the density of this site.
        let f_eq_wall = d3q15::equilibrium(hydro.density, u_wall);

        f_new[site.index() * NUM_VECTORS + away] =
            f_eq_wall[away] + (1.0 + self.params.omega()) * f_neq;
    }

    /// Moments and equilibrium of the next site in direction `away`,
    /// or `None` when that direction is itself wall-cut, crosses to
    /// another rank, or loops back onto the site.
    fn interior_state(
        &self,
        site: SiteIndex,
        away: usize,
        f_old: &[f64],
    ) -> Option<([f64; 3], [f64; NUM_VECTORS], [f64; NUM_VECTORS])> {
        if self.partition.has_wall(site, away) {
            return None;
        }
        match self.partition.stream_target(site, away) {
            StreamTarget::Local { site: next, .. } if next != site => {
                let base = next.index() * NUM_VECTORS;
                let mut f_next = [0.0; NUM_VECTORS];
                f_next.copy_from_slice(&f_old[base..base + NUM_VECTORS]);
                let (_density, momentum, f_eq) = d3q15::density_momentum_equilibrium(&f_next);
                Some((momentum, f_next, f_eq))
            }
            _ => None,
        }
    }
}
