//! Plain-data snapshot of observable simulation state.

use crate::id::{PipeId, TankId, TickId};

/// A cheap copy of everything a rendering collaborator reads per redraw.
///
/// Arrays are indexed by [`TankId::index`] / [`PipeId::index`]. The
/// snapshot is a value type: taking one never blocks the simulation,
/// and a held snapshot never observes a partially applied tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimSnapshot {
    /// Tick counter at the time the snapshot was taken.
    pub tick: TickId,
    /// Per-tank volume in absolute units.
    pub volumes: [f64; 5],
    /// Per-tank fill ratio in `[0, 1]`.
    pub fill_ratios: [f64; 5],
    /// Per-pipe flow indicator for the most recently completed tick.
    pub flowing: [bool; 5],
    /// Whether the pump edge is enabled.
    pub pump_enabled: bool,
    /// Whether the simulation is in the Running state.
    pub running: bool,
}

impl SimSnapshot {
    /// Volume of `tank` in absolute units.
    pub fn volume(&self, tank: TankId) -> f64 {
        self.volumes[tank.index()]
    }

    /// Fill ratio of `tank` in `[0, 1]`.
    pub fn fill_ratio(&self, tank: TankId) -> f64 {
        self.fill_ratios[tank.index()]
    }

    /// Whether `pipe` carried flow during the most recent tick.
    pub fn is_flowing(&self, pipe: PipeId) -> bool {
        self.flowing[pipe.index()]
    }

    /// Total volume across all tanks (diagnostic).
    pub fn total_volume(&self) -> f64 {
        self.volumes.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_index_by_id() {
        let snap = SimSnapshot {
            tick: TickId(3),
            volumes: [100.0, 1.0, 2.0, 3.0, 4.0],
            fill_ratios: [1.0, 0.01, 0.02, 0.03, 0.04],
            flowing: [true, false, false, false, true],
            pump_enabled: true,
            running: false,
        };
        assert_eq!(snap.volume(TankId::Source), 100.0);
        assert_eq!(snap.volume(TankId::D), 4.0);
        assert_eq!(snap.fill_ratio(TankId::B), 0.02);
        assert!(snap.is_flowing(PipeId::SourceToA));
        assert!(snap.is_flowing(PipeId::Pump));
        assert!(!snap.is_flowing(PipeId::AToB));
        assert!((snap.total_volume() - 110.0).abs() < 1e-12);
    }
}
