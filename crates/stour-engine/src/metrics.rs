//! Per-step performance and field-range metrics.

/// Timing and field-range data for the most recent step.
///
/// Durations are in microseconds. The driver refreshes the per-step
/// values after each completed step; the cumulative counters grow over
/// the run. Field ranges double as the stability monitor's raw signal
/// — a non-positive `density_min` means the run has left the engine's
/// operating contract.
#[derive(Clone, Debug, Default)]
pub struct StepMetrics {
    /// Wall-clock time for the whole step, in microseconds.
    pub total_us: u64,
    /// Time in the collide/wall-correct pass, in microseconds.
    pub collide_us: u64,
    /// Time blocked in the cross-rank exchange, in microseconds.
    pub exchange_us: u64,
    /// Sites processed this step.
    pub sites_processed: usize,
    /// Wall-facing directions corrected this step.
    pub wall_corrections: usize,
    /// Distribution values sent to neighbouring ranks this step.
    pub values_exchanged: usize,
    /// Smallest site density observed this step.
    pub density_min: f64,
    /// Largest site density observed this step.
    pub density_max: f64,
    /// Largest velocity magnitude observed this step.
    pub speed_max: f64,
    /// Steps completed since construction.
    pub steps_completed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.total_us, 0);
        assert_eq!(m.collide_us, 0);
        assert_eq!(m.exchange_us, 0);
        assert_eq!(m.sites_processed, 0);
        assert_eq!(m.wall_corrections, 0);
        assert_eq!(m.values_exchanged, 0);
        assert_eq!(m.density_min, 0.0);
        assert_eq!(m.density_max, 0.0);
        assert_eq!(m.speed_max, 0.0);
        assert_eq!(m.steps_completed, 0);
    }
}
