//! Time-varying macroscopic targets for inlet and outlet boundaries.

use std::f64::consts::TAU;

use crate::error::BoundaryError;
use crate::id::{BoundaryId, StepId};

/// One boundary's periodic density waveform.
///
/// The imposed density oscillates around `mean` with the given
/// `amplitude` and `phase` (radians). All boundaries in a table share
/// one period, so a single phase offset is enough to stagger them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DensityWaveform {
    /// Cycle-average imposed density.
    pub mean: f64,
    /// Oscillation amplitude around the mean.
    pub amplitude: f64,
    /// Phase offset in radians.
    pub phase: f64,
}

impl DensityWaveform {
    /// A waveform that holds a constant value over the whole cycle.
    pub fn constant(density: f64) -> Self {
        Self {
            mean: density,
            amplitude: 0.0,
            phase: 0.0,
        }
    }

    /// Evaluate the waveform at `step` within a cycle of `period` steps.
    fn at(&self, step: StepId, period: u64) -> f64 {
        let angle = TAU * (step.0 % period) as f64 / period as f64;
        self.mean + self.amplitude * (angle + self.phase).cos()
    }
}

/// Ordered table of boundary waveforms, one per distinct inlet/outlet.
///
/// Populated once by the configuration loader and read by many sites
/// concurrently during a step; nothing here mutates between steps —
/// the observed value changes only because the queried step advances.
#[derive(Clone, Debug)]
pub struct BoundaryValues {
    period: u64,
    waveforms: Vec<DensityWaveform>,
}

impl BoundaryValues {
    /// Build a boundary table with the shared cycle `period` (in steps).
    ///
    /// Fails if the period is zero or any waveform field is non-finite;
    /// this is a configuration-time check, never repeated per step.
    pub fn new(period: u64, waveforms: Vec<DensityWaveform>) -> Result<Self, BoundaryError> {
        if period == 0 {
            return Err(BoundaryError::ZeroPeriod);
        }
        for (index, w) in waveforms.iter().enumerate() {
            if !(w.mean.is_finite() && w.amplitude.is_finite() && w.phase.is_finite()) {
                return Err(BoundaryError::NonFiniteWaveform { index });
            }
        }
        Ok(Self { period, waveforms })
    }

    /// The imposed density for `boundary` at the given step.
    ///
    /// # Panics
    ///
    /// Panics if `boundary` is out of range. Boundary ids are validated
    /// against this table at partition build time, so an out-of-range id
    /// here is a caller bug, not a runtime condition.
    pub fn density(&self, boundary: BoundaryId, step: StepId) -> f64 {
        self.waveforms[boundary.index()].at(step, self.period)
    }

    /// Number of boundaries in the table.
    pub fn len(&self) -> usize {
        self.waveforms.len()
    }

    /// Whether the table holds no boundaries.
    pub fn is_empty(&self) -> bool {
        self.waveforms.is_empty()
    }

    /// The shared cycle period in steps.
    pub fn period(&self) -> u64 {
        self.period
    }
}
