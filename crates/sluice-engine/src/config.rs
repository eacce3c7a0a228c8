//! Simulation configuration, validation, and error types.
//!
//! [`SimConfig`] carries the numeric constants of the reference
//! network. `validate()` checks structural invariants at construction
//! time; once a [`Simulation`](crate::Simulation) exists, every
//! operation on it is total and the tick path cannot fail.

use std::error::Error;
use std::fmt;

use sluice_core::TankId;

use crate::topology::TopologyError;

// ── SimConfig ──────────────────────────────────────────────────────

/// Numeric constants for constructing a simulation.
///
/// The defaults are the reference instance: capacity 100, source tank
/// full at start, gravity quantum 0.8 per tick, pump quantum 1.2
/// (larger, modeling forced flow), level epsilon 0.1.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Fixed capacity shared by every tank, in absolute units.
    pub capacity: f64,
    /// Initial volume of the designated source tank.
    pub initial_source_volume: f64,
    /// Per-tick transfer quantum for the four gravity edges.
    pub gravity_quantum: f64,
    /// Per-tick transfer quantum for the pump edge.
    pub pump_quantum: f64,
    /// Empty/full detection threshold, in absolute units.
    ///
    /// Guards against flow oscillation from floating-point residue
    /// near the boundaries; not a physical threshold.
    pub level_epsilon: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            capacity: 100.0,
            initial_source_volume: 100.0,
            gravity_quantum: 0.8,
            pump_quantum: 1.2,
            level_epsilon: 0.1,
        }
    }
}

impl SimConfig {
    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.capacity.is_finite() || self.capacity <= 0.0 {
            return Err(ConfigError::InvalidCapacity {
                value: self.capacity,
            });
        }
        if !self.level_epsilon.is_finite()
            || self.level_epsilon <= 0.0
            || self.level_epsilon >= self.capacity
        {
            return Err(ConfigError::InvalidEpsilon {
                value: self.level_epsilon,
            });
        }
        if !self.gravity_quantum.is_finite() || self.gravity_quantum <= 0.0 {
            return Err(ConfigError::InvalidQuantum {
                name: "gravity_quantum",
                value: self.gravity_quantum,
            });
        }
        if !self.pump_quantum.is_finite() || self.pump_quantum <= 0.0 {
            return Err(ConfigError::InvalidQuantum {
                name: "pump_quantum",
                value: self.pump_quantum,
            });
        }
        if !self.initial_source_volume.is_finite()
            || self.initial_source_volume < 0.0
            || self.initial_source_volume > self.capacity
        {
            return Err(ConfigError::InvalidInitialVolume {
                tank: TankId::Source,
                value: self.initial_source_volume,
            });
        }
        Ok(())
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while validating a [`SimConfig`] or constructing a
/// [`Simulation`](crate::Simulation).
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Capacity is non-finite or non-positive.
    InvalidCapacity {
        /// The rejected value.
        value: f64,
    },
    /// Level epsilon is non-finite, non-positive, or at least the
    /// capacity (every tank would read as both empty and full).
    InvalidEpsilon {
        /// The rejected value.
        value: f64,
    },
    /// A per-tick quantum is non-finite or non-positive.
    InvalidQuantum {
        /// Which quantum field was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// An initial tank volume is non-finite or outside `[0, capacity]`.
    InvalidInitialVolume {
        /// The tank whose initial volume was rejected.
        tank: TankId,
        /// The rejected value.
        value: f64,
    },
    /// The flow-step list failed structural validation.
    Topology(TopologyError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCapacity { value } => {
                write!(f, "capacity must be finite and positive, got {value}")
            }
            Self::InvalidEpsilon { value } => {
                write!(
                    f,
                    "level_epsilon must be finite and in (0, capacity), got {value}"
                )
            }
            Self::InvalidQuantum { name, value } => {
                write!(f, "{name} must be finite and positive, got {value}")
            }
            Self::InvalidInitialVolume { tank, value } => {
                write!(
                    f,
                    "initial volume for {tank} must be finite and in [0, capacity], got {value}"
                )
            }
            Self::Topology(e) => write!(f, "topology: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Topology(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TopologyError> for ConfigError {
    fn from(e: TopologyError) -> Self {
        Self::Topology(e)
    }
}
