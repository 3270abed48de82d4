//! The single-relaxation-time (LBGK) collision kernel.

use stour_lattice::HydroState;

/// Relaxation parameters shared by every collision in a run.
///
/// Stores the relaxation time `τ` and the derived factor `ω = −1/τ`
/// applied to the non-equilibrium residual. With `τ = 1` a collision
/// lands exactly on the equilibrium distribution; larger `τ` relaxes
/// more slowly (higher viscosity).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RelaxationParameters {
    tau: f64,
    omega: f64,
}

impl RelaxationParameters {
    /// Derive the relaxation factor from the relaxation time `τ`.
    ///
    /// No stability bounds are enforced here — an unstable `τ` is a
    /// simulation-level concern for the external monitor, not a kernel
    /// error.
    pub fn from_tau(tau: f64) -> Self {
        Self {
            tau,
            omega: -1.0 / tau,
        }
    }

    /// The relaxation time `τ`.
    pub fn tau(&self) -> f64 {
        self.tau
    }

    /// The relaxation factor `ω = −1/τ` applied to residuals.
    pub fn omega(&self) -> f64 {
        self.omega
    }
}

/// The baseline lattice-BGK relaxation.
///
/// Stateless: each call depends only on the passed-in state and may be
/// made once per (site, direction) in any order, so operators can
/// selectively override individual directions.
#[derive(Clone, Copy, Debug, Default)]
pub struct LbgkKernel;

impl LbgkKernel {
    /// Post-collision value for one direction:
    /// `f[d] + ω·(f[d] − f_eq[d])`.
    #[inline]
    pub fn collide(
        &self,
        params: &RelaxationParameters,
        hydro: &HydroState,
        direction: usize,
    ) -> f64 {
        hydro.f[direction] + params.omega() * hydro.f_neq[direction]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stour_lattice::d3q15::NUM_VECTORS;

    fn ascending_f() -> [f64; NUM_VECTORS] {
        core::array::from_fn(|i| (i + 1) as f64 / 10.0)
    }

    #[test]
    fn omega_is_negative_reciprocal_of_tau() {
        let params = RelaxationParameters::from_tau(0.8);
        assert_eq!(params.tau(), 0.8);
        assert!((params.omega() + 1.25).abs() < 1e-15);
    }

    #[test]
    fn unit_tau_collides_onto_equilibrium() {
        let params = RelaxationParameters::from_tau(1.0);
        let hydro = HydroState::from_distributions(ascending_f());
        for d in 0..NUM_VECTORS {
            let collided = LbgkKernel.collide(&params, &hydro, d);
            assert!(
                (collided - hydro.f_eq[d]).abs() < 1e-10,
                "direction {d}: {collided} vs {}",
                hydro.f_eq[d]
            );
        }
    }

    #[test]
    fn collision_conserves_mass_and_momentum() {
        use stour_lattice::d3q15;

        let params = RelaxationParameters::from_tau(0.7);
        let hydro = HydroState::from_distributions(ascending_f());
        let collided: [f64; NUM_VECTORS] =
            core::array::from_fn(|d| LbgkKernel.collide(&params, &hydro, d));
        let (density, momentum) = d3q15::density_momentum(&collided);
        assert!((density - hydro.density).abs() < 1e-10);
        for a in 0..3 {
            assert!((momentum[a] - hydro.momentum[a]).abs() < 1e-10);
        }
    }

    proptest::proptest! {
        #[test]
        fn collision_conserves_moments_for_any_state(
            f in proptest::prelude::prop::array::uniform15(0.01f64..2.0),
            tau in 0.51f64..2.0,
        ) {
            use stour_lattice::d3q15;

            let params = RelaxationParameters::from_tau(tau);
            let hydro = HydroState::from_distributions(f);
            let collided: [f64; NUM_VECTORS] =
                core::array::from_fn(|d| LbgkKernel.collide(&params, &hydro, d));
            let (density, momentum) = d3q15::density_momentum(&collided);
            proptest::prop_assert!((density - hydro.density).abs() < 1e-9);
            for a in 0..3 {
                proptest::prop_assert!((momentum[a] - hydro.momentum[a]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn directions_collide_independently() {
        // Overriding the evaluation order must not change any value.
        let params = RelaxationParameters::from_tau(1.3);
        let hydro = HydroState::from_distributions(ascending_f());
        let forward: Vec<f64> = (0..NUM_VECTORS)
            .map(|d| LbgkKernel.collide(&params, &hydro, d))
            .collect();
        let backward: Vec<f64> = (0..NUM_VECTORS)
            .rev()
            .map(|d| LbgkKernel.collide(&params, &hydro, d))
            .collect();
        for (d, (a, b)) in forward.iter().zip(backward.iter().rev()).enumerate() {
            assert_eq!(a, b, "direction {d}");
        }
    }
}
