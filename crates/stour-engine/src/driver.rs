//! The per-rank timestep driver.
//!
//! One [`StepDriver`] owns everything a rank needs to advance its
//! partition: the collision operators selected per site at
//! construction, the double-buffered distributions, the boundary-value
//! table, and this rank's end of the cross-rank exchange. Each
//! [`step()`](StepDriver::step) runs the full cycle
//! collide → wall-correct → exchange → scatter → swap.

use std::time::Instant;

use stour_collide::{
    BoundaryTreatment, CollisionOperator, RelaxationParameters, WallStreamingResolver,
};
use stour_core::{BoundaryValues, RankId, SiteDescriptor, SiteIndex, SiteKind, StepError, StepId};
use stour_exchange::PartitionExchange;
use stour_lattice::d3q15::{self, NUM_VECTORS};
use stour_partition::Partition;

use crate::config::{ConfigError, EngineConfig};
use crate::distributions::DistributionBuffers;
use crate::fields::SiteFields;
use crate::metrics::StepMetrics;

/// Collision strategy for one site, resolved once from its descriptor.
fn operator_for(
    descriptor: SiteDescriptor,
    inlet: BoundaryTreatment,
    outlet: BoundaryTreatment,
) -> CollisionOperator {
    match (descriptor.kind, descriptor.boundary) {
        (SiteKind::Fluid, _) => CollisionOperator::Normal,
        (SiteKind::Inlet, Some(boundary)) => inlet.operator(boundary),
        (SiteKind::Outlet, Some(boundary)) => outlet.operator(boundary),
        // Partition construction guarantees boundary ids on inlet and
        // outlet sites.
        (_, None) => CollisionOperator::Normal,
    }
}

/// Drives the collide-stream cycle over one rank's partition.
///
/// Deterministic: a sequential pass over the owned sites, reading only
/// the old distribution generation, the immutable topology, and the
/// current boundary table. The only suspension point is the exchange
/// barrier. A halt — from the external stability monitor or from an
/// exchange failure — is terminal: further steps are refused and the
/// last completed generation stays readable.
pub struct StepDriver {
    partition: Partition,
    boundaries: BoundaryValues,
    params: RelaxationParameters,
    operators: Vec<CollisionOperator>,
    buffers: DistributionBuffers,
    recv: Vec<(RankId, Vec<f64>)>,
    exchange: Box<dyn PartitionExchange>,
    fields: Vec<SiteFields>,
    metrics: StepMetrics,
    step: StepId,
    halted: bool,
}

impl StepDriver {
    /// Build a driver from a validated configuration.
    ///
    /// Selects each site's collision operator, sizes the buffers
    /// (local slots plus the send halo), and seeds every site with the
    /// rest equilibrium at the configured initial density.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let EngineConfig {
            partition,
            boundaries,
            tau,
            initial_density,
            inlet_treatment,
            outlet_treatment,
            exchange,
        } = config;

        let operators: Vec<CollisionOperator> = partition
            .sites()
            .map(|site| operator_for(partition.descriptor(site), inlet_treatment, outlet_treatment))
            .collect();

        let mut buffers = DistributionBuffers::new(partition.stream().slot_count());
        let rest = d3q15::equilibrium(initial_density, [0.0; 3]);
        for site in partition.sites() {
            let base = site.index() * NUM_VECTORS;
            buffers.old_mut()[base..base + NUM_VECTORS].copy_from_slice(&rest);
        }

        let recv: Vec<(RankId, Vec<f64>)> = partition
            .halo()
            .recvs()
            .map(|(rank, dests)| (rank, vec![0.0; dests.len()]))
            .collect();

        let fields = vec![SiteFields::default(); partition.site_count()];

        Ok(Self {
            partition,
            boundaries,
            params: RelaxationParameters::from_tau(tau),
            operators,
            buffers,
            recv,
            exchange,
            fields,
            metrics: StepMetrics::default(),
            step: StepId(0),
            halted: false,
        })
    }

    /// Advance the partition by one step.
    ///
    /// # Errors
    ///
    /// [`StepError::Halted`] once the driver has been halted;
    /// [`StepError::Exchange`] if the cross-rank barrier fails, which
    /// also halts the driver (the staged generation is discarded and
    /// the last completed one stays published).
    pub fn step(&mut self) -> Result<(), StepError> {
        if self.halted {
            return Err(StepError::Halted {
                last_step: self.step,
            });
        }
        let step_started = Instant::now();

        let mut density_min = f64::INFINITY;
        let mut density_max = f64::NEG_INFINITY;
        let mut speed_max = 0.0f64;
        let mut wall_corrections = 0usize;

        let (f_old, f_new) = self.buffers.split();
        let resolver = WallStreamingResolver::new(&self.partition, &self.params);

        for site in self.partition.sites() {
            let base = site.index() * NUM_VECTORS;
            let mut f = [0.0; NUM_VECTORS];
            f.copy_from_slice(&f_old[base..base + NUM_VECTORS]);

            let operator = self.operators[site.index()];
            let hydro = operator.prepare(f, &self.boundaries, self.step);

            for d in 0..NUM_VECTORS {
                f_new[self.partition.stream().slot(site, d)] =
                    operator.collide(&self.params, d, &hydro);
            }

            let links = self.partition.wall_links(site);
            if !links.is_empty() {
                resolver.correct(site, &hydro, f_old, f_new);
                wall_corrections += links.len();
            }

            density_min = density_min.min(hydro.density);
            density_max = density_max.max(hydro.density);
            let v = hydro.velocity();
            let speed = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            speed_max = speed_max.max(speed);

            self.fields[site.index()] = SiteFields {
                density: hydro.density,
                momentum: hydro.momentum,
                f_neq: hydro.f_neq,
            };
        }
        let collide_us = step_started.elapsed().as_micros() as u64;

        // Exchange barrier: no next collide pass until every neighbour
        // has delivered this generation's crossing values.
        let exchange_started = Instant::now();
        let local = self.partition.stream().local_slots();
        let values_exchanged;
        {
            let staged: &[f64] = f_new;
            let outgoing: Vec<(RankId, &[f64])> = self
                .partition
                .halo()
                .sends()
                .map(|(rank, range)| (rank, &staged[local + range.start..local + range.end]))
                .collect();
            values_exchanged = outgoing.iter().map(|(_, s)| s.len()).sum();

            let mut incoming: Vec<(RankId, &mut [f64])> = self
                .recv
                .iter_mut()
                .map(|(rank, buffer)| (*rank, buffer.as_mut_slice()))
                .collect();

            if let Err(e) = self.exchange.exchange(self.step, &outgoing, &mut incoming) {
                self.halted = true;
                return Err(e.into());
            }
        }

        // Scatter what arrived into the staged generation. The recv
        // buffers were built from the halo layout, so the two iterate
        // in the same rank order.
        for ((_, dests), (_, buffer)) in self.partition.halo().recvs().zip(self.recv.iter()) {
            for (&dest, &value) in dests.iter().zip(buffer.iter()) {
                f_new[dest as usize] = value;
            }
        }
        let exchange_us = exchange_started.elapsed().as_micros() as u64;

        self.buffers.swap();
        self.step = self.step.next();
        self.metrics = StepMetrics {
            total_us: step_started.elapsed().as_micros() as u64,
            collide_us,
            exchange_us,
            sites_processed: self.partition.site_count(),
            wall_corrections,
            values_exchanged,
            density_min,
            density_max,
            speed_max,
            steps_completed: self.metrics.steps_completed + 1,
        };
        Ok(())
    }

    /// Halt the engine.
    ///
    /// The hook for the external stability monitor: after a halt the
    /// driver refuses further steps and keeps the last completed
    /// generation and macroscopic fields readable.
    pub fn halt(&mut self) {
        self.halted = true;
    }

    /// Whether the driver has been halted.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Number of completed steps.
    pub fn current_step(&self) -> StepId {
        self.step
    }

    /// The latest published distributions of one site.
    pub fn distributions(&self, site: SiteIndex) -> [f64; NUM_VECTORS] {
        let base = site.index() * NUM_VECTORS;
        let mut f = [0.0; NUM_VECTORS];
        f.copy_from_slice(&self.buffers.old()[base..base + NUM_VECTORS]);
        f
    }

    /// Overwrite one site's published distributions.
    ///
    /// For conditioning the initial state before the run; the next
    /// step reads these as its old generation.
    pub fn seed_site(&mut self, site: SiteIndex, f: [f64; NUM_VECTORS]) {
        let base = site.index() * NUM_VECTORS;
        self.buffers.old_mut()[base..base + NUM_VECTORS].copy_from_slice(&f);
    }

    /// Macroscopic fields of one site after the latest step.
    pub fn site_fields(&self, site: SiteIndex) -> &SiteFields {
        &self.fields[site.index()]
    }

    /// Macroscopic fields for every owned site, in site order.
    pub fn fields(&self) -> &[SiteFields] {
        &self.fields
    }

    /// Metrics from the most recent completed step.
    pub fn metrics(&self) -> &StepMetrics {
        &self.metrics
    }

    /// The partition this driver runs.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// The boundary-value table this driver reads.
    pub fn boundaries(&self) -> &BoundaryValues {
        &self.boundaries
    }

    /// The run's relaxation parameters.
    pub fn relaxation(&self) -> &RelaxationParameters {
        &self.params
    }
}

impl std::fmt::Debug for StepDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepDriver")
            .field("sites", &self.partition.site_count())
            .field("step", &self.step)
            .field("tau", &self.params.tau())
            .field("halted", &self.halted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use stour_exchange::{link_pair, ChannelExchange, NullExchange};
    use stour_lattice::d3q15::WEIGHTS;
    use stour_test_utils::{
        ascending_distributions, constant_boundaries, inlet_site, linked_pair, periodic_site,
        walled_pair,
    };

    const TOLERANCE: f64 = 1e-10;

    fn single_rank_config(
        partition: Partition,
        boundary_count: usize,
        tau: f64,
    ) -> EngineConfig {
        EngineConfig {
            partition,
            boundaries: constant_boundaries(boundary_count, 1.0),
            tau,
            initial_density: 1.0,
            inlet_treatment: BoundaryTreatment::FixedDensityLocalVelocity,
            outlet_treatment: BoundaryTreatment::FixedDensityZeroVelocity,
            exchange: Box::new(NullExchange),
        }
    }

    #[test]
    fn construction_seeds_rest_equilibrium() {
        let driver = StepDriver::new(single_rank_config(periodic_site(), 0, 1.0)).unwrap();
        let f = driver.distributions(SiteIndex(0));
        for d in 0..NUM_VECTORS {
            assert!(
                (f[d] - WEIGHTS[d]).abs() < TOLERANCE,
                "direction {d}: {} vs weight {}",
                f[d],
                WEIGHTS[d]
            );
        }
    }

    #[test]
    fn unit_tau_collides_interior_site_to_equilibrium() {
        // The reference check: fifteen ascending values under the
        // ordinary collision with τ = 1 land exactly on equilibrium.
        let mut driver = StepDriver::new(single_rank_config(periodic_site(), 0, 1.0)).unwrap();
        let f = ascending_distributions();
        driver.seed_site(SiteIndex(0), f);
        driver.step().unwrap();

        let (_, _, expected) = d3q15::density_momentum_equilibrium(&f);
        let result = driver.distributions(SiteIndex(0));
        for d in 0..NUM_VECTORS {
            assert!(
                (result[d] - expected[d]).abs() < TOLERANCE,
                "direction {d}: {} vs {}",
                result[d],
                expected[d]
            );
        }
        assert_eq!(driver.current_step(), StepId(1));
    }

    #[test]
    fn equilibrium_state_is_a_fixed_point() {
        let mut driver = StepDriver::new(single_rank_config(periodic_site(), 0, 0.8)).unwrap();
        let seed = d3q15::equilibrium(1.0, [0.0; 3]);
        driver.seed_site(SiteIndex(0), seed);
        for _ in 0..5 {
            driver.step().unwrap();
        }
        let result = driver.distributions(SiteIndex(0));
        for d in 0..NUM_VECTORS {
            assert!(
                (result[d] - seed[d]).abs() < 1e-12,
                "direction {d} drifted: {} vs {}",
                result[d],
                seed[d]
            );
        }
    }

    #[test]
    fn fixed_density_inlet_ignores_local_velocity() {
        // With zero-velocity treatment and τ = 1 the inlet site lands
        // on the equilibrium of the imposed density at rest, whatever
        // the seeded distributions said.
        let imposed = 13.5;
        let config = EngineConfig {
            partition: inlet_site(),
            boundaries: constant_boundaries(1, imposed),
            tau: 1.0,
            initial_density: 1.0,
            inlet_treatment: BoundaryTreatment::FixedDensityZeroVelocity,
            outlet_treatment: BoundaryTreatment::FixedDensityZeroVelocity,
            exchange: Box::new(NullExchange),
        };
        let mut driver = StepDriver::new(config).unwrap();
        driver.seed_site(SiteIndex(0), ascending_distributions());
        driver.step().unwrap();

        let expected = d3q15::equilibrium(imposed, [0.0; 3]);
        let result = driver.distributions(SiteIndex(0));
        for d in 0..NUM_VECTORS {
            assert!(
                (result[d] - expected[d]).abs() < TOLERANCE,
                "direction {d}: {} vs {}",
                result[d],
                expected[d]
            );
        }
        assert_eq!(driver.site_fields(SiteIndex(0)).density, imposed);
    }

    #[test]
    fn wall_correction_overwrites_the_reflected_slot() {
        // δ = 1/2 with the interior neighbour at rest equilibrium:
        // u_wall = −p₀/2, blended residual = f_neq₀[1]/2.
        let tau = 0.9;
        let mut driver = StepDriver::new(single_rank_config(walled_pair(0.5), 0, tau)).unwrap();
        let f0 = ascending_distributions();
        driver.seed_site(SiteIndex(0), f0);
        driver.step().unwrap();

        let (density, momentum, f_eq) = d3q15::density_momentum_equilibrium(&f0);
        let f_neq_away = f0[1] - f_eq[1];
        let u_wall = [
            -0.5 * momentum[0],
            -0.5 * momentum[1],
            -0.5 * momentum[2],
        ];
        let omega = -1.0 / tau;
        let expected =
            d3q15::equilibrium(density, u_wall)[1] + (1.0 + omega) * 0.5 * f_neq_away;

        let result = driver.distributions(SiteIndex(0));
        assert!(
            (result[1] - expected).abs() < TOLERANCE,
            "wall slot holds {}, expected {expected}",
            result[1]
        );
        assert_eq!(driver.metrics().wall_corrections, 1);
    }

    #[test]
    fn halted_driver_refuses_to_step_and_keeps_state() {
        let mut driver = StepDriver::new(single_rank_config(periodic_site(), 0, 1.0)).unwrap();
        driver.seed_site(SiteIndex(0), ascending_distributions());
        driver.step().unwrap();
        let published = driver.distributions(SiteIndex(0));

        driver.halt();
        assert!(driver.is_halted());
        let err = driver.step().unwrap_err();
        assert_eq!(
            err,
            StepError::Halted {
                last_step: StepId(1)
            }
        );
        assert_eq!(driver.distributions(SiteIndex(0)), published);
        assert_eq!(driver.current_step(), StepId(1));
    }

    #[test]
    fn nonpositive_density_surfaces_in_the_stability_signal() {
        // The engine itself keeps running — detecting instability is
        // the external monitor's job. The contract is that the signal
        // it watches (per-step density minimum) exposes the violation,
        // and that its halt() stops the run.
        let mut driver = StepDriver::new(single_rank_config(periodic_site(), 0, 1.0)).unwrap();
        driver.seed_site(SiteIndex(0), [-0.1; NUM_VECTORS]);
        driver.step().unwrap();

        assert!(driver.metrics().density_min <= 0.0);
        driver.halt();
        assert!(matches!(driver.step(), Err(StepError::Halted { .. })));
    }

    #[test]
    fn metrics_track_the_pass() {
        let mut driver = StepDriver::new(single_rank_config(walled_pair(0.5), 0, 1.0)).unwrap();
        driver.step().unwrap();
        let m = driver.metrics();
        assert_eq!(m.sites_processed, 2);
        assert_eq!(m.wall_corrections, 1);
        assert_eq!(m.values_exchanged, 0);
        assert_eq!(m.steps_completed, 1);
        // Rest-equilibrium seed: both sites at density 1, no motion.
        assert!((m.density_min - 1.0).abs() < TOLERANCE);
        assert!((m.density_max - 1.0).abs() < TOLERANCE);
        assert!(m.speed_max.abs() < TOLERANCE);
    }

    #[test]
    fn two_ranks_stream_across_the_boundary() {
        let (partition_a, partition_b) = linked_pair();
        let (link_a, link_b) = link_pair(RankId(0), RankId(1));

        let mut exchange_a = ChannelExchange::new();
        exchange_a.connect(link_a);
        let mut exchange_b = ChannelExchange::new();
        exchange_b.connect(link_b);

        let config_a = EngineConfig {
            partition: partition_a,
            boundaries: constant_boundaries(0, 1.0),
            tau: 1.0,
            initial_density: 1.0,
            inlet_treatment: BoundaryTreatment::FixedDensityLocalVelocity,
            outlet_treatment: BoundaryTreatment::FixedDensityZeroVelocity,
            exchange: Box::new(exchange_a),
        };
        let config_b = EngineConfig {
            partition: partition_b,
            boundaries: constant_boundaries(0, 1.0),
            tau: 1.0,
            initial_density: 2.0,
            inlet_treatment: BoundaryTreatment::FixedDensityLocalVelocity,
            outlet_treatment: BoundaryTreatment::FixedDensityZeroVelocity,
            exchange: Box::new(exchange_b),
        };

        let f_a = ascending_distributions();
        let (_, _, feq_a) = d3q15::density_momentum_equilibrium(&f_a);
        let rest_b = d3q15::equilibrium(2.0, [0.0; 3]);

        let mut driver_a = StepDriver::new(config_a).unwrap();
        driver_a.seed_site(SiteIndex(0), f_a);

        let handle = thread::spawn(move || {
            let mut driver_b = StepDriver::new(config_b).unwrap();
            driver_b.step().unwrap();
            driver_b.distributions(SiteIndex(0))
        });

        driver_a.step().unwrap();
        let result_a = driver_a.distributions(SiteIndex(0));
        let result_b = handle.join().unwrap();

        // Rank 1's −x value (its collided direction 2) landed in rank
        // 0's −x slot; with τ = 1 that is its rest equilibrium weight.
        assert!(
            (result_a[2] - rest_b[2]).abs() < TOLERANCE,
            "rank 0 received {}, expected {}",
            result_a[2],
            rest_b[2]
        );
        // Rank 0's +x value (collided direction 1) landed in rank 1.
        assert!(
            (result_b[1] - feq_a[1]).abs() < TOLERANCE,
            "rank 1 received {}, expected {}",
            result_b[1],
            feq_a[1]
        );
        assert_eq!(driver_a.metrics().values_exchanged, 1);
    }

    #[test]
    fn exchange_failure_halts_the_driver() {
        let (partition_a, _) = linked_pair();
        let (link_a, link_b) = link_pair(RankId(0), RankId(1));
        let mut exchange = ChannelExchange::new();
        exchange.connect(link_a);
        drop(link_b); // neighbour never comes up

        let config = EngineConfig {
            partition: partition_a,
            boundaries: constant_boundaries(0, 1.0),
            tau: 1.0,
            initial_density: 1.0,
            inlet_treatment: BoundaryTreatment::FixedDensityLocalVelocity,
            outlet_treatment: BoundaryTreatment::FixedDensityZeroVelocity,
            exchange: Box::new(exchange),
        };
        let mut driver = StepDriver::new(config).unwrap();
        let err = driver.step().unwrap_err();
        assert!(matches!(err, StepError::Exchange(_)));
        assert!(driver.is_halted());
        assert_eq!(driver.current_step(), StepId(0));
    }
}
