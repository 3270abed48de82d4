//! Benchmark profiles and utilities for the Stour solver.
//!
//! Provides pre-built configurations for benchmarking:
//!
//! - [`periodic_box`]: a fully periodic box of fluid sites with exact
//!   streaming topology
//! - [`reference_profile`]: 16³ box (4,096 sites) wired for a
//!   single-rank run
//! - [`random_distributions`]: deterministic pseudo-random site states

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use stour_collide::BoundaryTreatment;
use stour_core::{BoundaryValues, SiteDescriptor};
use stour_engine::EngineConfig;
use stour_exchange::NullExchange;
use stour_lattice::d3q15::{DIRECTIONS, NUM_VECTORS};
use stour_partition::{HaloLayout, Partition, WallLinks};

/// Build an `nx × ny × nz` box of fluid sites, periodic in all three
/// axes, with the exact streamed-index topology.
///
/// Every direction of every site resolves to the wrapped neighbour's
/// same-direction slot; there is no halo (single rank).
pub fn periodic_box(nx: usize, ny: usize, nz: usize) -> Partition {
    let site_count = nx * ny * nz;
    let flat = |x: usize, y: usize, z: usize| (x * ny + y) * nz + z;
    let wrap = |v: i64, n: usize| v.rem_euclid(n as i64) as usize;

    let mut slots = vec![0u32; site_count * NUM_VECTORS];
    for x in 0..nx {
        for y in 0..ny {
            for z in 0..nz {
                let site = flat(x, y, z);
                for (d, c) in DIRECTIONS.iter().enumerate() {
                    let neighbour = flat(
                        wrap(x as i64 + c[0] as i64, nx),
                        wrap(y as i64 + c[1] as i64, ny),
                        wrap(z as i64 + c[2] as i64, nz),
                    );
                    slots[site * NUM_VECTORS + d] = (neighbour * NUM_VECTORS + d) as u32;
                }
            }
        }
    }

    Partition::new(
        vec![SiteDescriptor::fluid(); site_count],
        vec![WallLinks::new(); site_count],
        slots,
        HaloLayout::empty(),
        0,
    )
    .expect("periodic box topology is well-formed by construction")
}

/// Build the reference benchmark profile: a 16³ periodic box
/// (4,096 sites), τ = 0.8, single rank.
pub fn reference_profile() -> EngineConfig {
    EngineConfig {
        partition: periodic_box(16, 16, 16),
        boundaries: BoundaryValues::new(100, vec![]).expect("non-zero period"),
        tau: 0.8,
        initial_density: 1.0,
        inlet_treatment: BoundaryTreatment::FixedDensityLocalVelocity,
        outlet_treatment: BoundaryTreatment::FixedDensityZeroVelocity,
        exchange: Box::new(NullExchange),
    }
}

/// Deterministic pseudo-random distribution sets near unit density.
///
/// Each site's fifteen values are drawn from `[0.05, 0.15)` with a
/// seeded ChaCha stream, so repeated runs see identical inputs.
pub fn random_distributions(site_count: usize, seed: u64) -> Vec<[f64; NUM_VECTORS]> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..site_count)
        .map(|_| core::array::from_fn(|_| 0.05 + 0.1 * rng.gen::<f64>()))
        .collect()
}
