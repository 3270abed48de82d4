//! Engine configuration and its validation.
//!
//! [`EngineConfig`] gathers everything a rank's driver needs — the
//! partition, the boundary-value table, the relaxation time, the
//! boundary treatment selection, and the exchange — as one explicit,
//! passed-in object whose ownership follows the simulation run. No
//! process-wide tables.

use std::error::Error;
use std::fmt;

use stour_collide::BoundaryTreatment;
use stour_core::BoundaryValues;
use stour_exchange::PartitionExchange;
use stour_partition::Partition;

/// Errors detected during [`EngineConfig::validate()`].
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// The relaxation time is NaN, infinite, or not strictly positive.
    InvalidTau {
        /// The rejected value.
        value: f64,
    },
    /// The initial density is NaN, infinite, or not strictly positive.
    InvalidInitialDensity {
        /// The rejected value.
        value: f64,
    },
    /// A site references a boundary id beyond the supplied table.
    ///
    /// The partition was validated against some table size at build
    /// time; this re-check catches a partition paired with the wrong
    /// table.
    BoundaryTableMismatch {
        /// The dangling boundary id.
        boundary: u32,
        /// Number of boundaries in the supplied table.
        available: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTau { value } => {
                write!(f, "relaxation time {value} is not a positive finite number")
            }
            Self::InvalidInitialDensity { value } => {
                write!(f, "initial density {value} is not a positive finite number")
            }
            Self::BoundaryTableMismatch {
                boundary,
                available,
            } => write!(
                f,
                "partition references boundary {boundary}, \
                 but the supplied table holds {available}"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Everything a [`StepDriver`](crate::StepDriver) needs to run one rank.
pub struct EngineConfig {
    /// This rank's share of the lattice.
    pub partition: Partition,
    /// Imposed-density waveforms for every inlet/outlet boundary.
    pub boundaries: BoundaryValues,
    /// Relaxation time `τ`; sets the fluid viscosity.
    pub tau: f64,
    /// Density the whole partition is seeded with at step zero.
    pub initial_density: f64,
    /// Collision treatment for inlet sites.
    pub inlet_treatment: BoundaryTreatment,
    /// Collision treatment for outlet sites.
    pub outlet_treatment: BoundaryTreatment,
    /// The cross-rank exchange this rank participates in.
    pub exchange: Box<dyn PartitionExchange>,
}

impl EngineConfig {
    /// Check structural invariants once, before the driver is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tau.is_finite() && self.tau > 0.0) {
            return Err(ConfigError::InvalidTau { value: self.tau });
        }
        if !(self.initial_density.is_finite() && self.initial_density > 0.0) {
            return Err(ConfigError::InvalidInitialDensity {
                value: self.initial_density,
            });
        }
        for site in self.partition.sites() {
            if let Some(boundary) = self.partition.descriptor(site).boundary {
                if boundary.index() >= self.boundaries.len() {
                    return Err(ConfigError::BoundaryTableMismatch {
                        boundary: boundary.0,
                        available: self.boundaries.len(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("sites", &self.partition.site_count())
            .field("boundaries", &self.boundaries.len())
            .field("tau", &self.tau)
            .field("initial_density", &self.initial_density)
            .field("inlet_treatment", &self.inlet_treatment)
            .field("outlet_treatment", &self.outlet_treatment)
            .finish_non_exhaustive()
    }
}
