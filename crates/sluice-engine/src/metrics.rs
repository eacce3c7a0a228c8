//! Per-tick metrics for the simulation engine.
//!
//! [`TickMetrics`] captures timing and flow data for a single tick.
//! Consumers (telemetry, debug overlays) read the most recent values
//! through [`Simulation::last_metrics`](crate::Simulation::last_metrics);
//! cumulative per-pipe totals live on the simulation itself.

/// Timing and flow metrics collected during a single tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickMetrics {
    /// Wall-clock time for the entire tick, in microseconds.
    pub total_us: u64,
    /// Volume delivered into destination tanks this tick, summed over
    /// all edges.
    pub volume_moved: f64,
    /// Number of pipes whose flow indicator is set after this tick.
    pub edges_flowing: u32,
    /// Cumulative number of completed ticks.
    pub ticks_completed: u64,
}
