//! Simulation engine for the Sluice tank network.
//!
//! The controller, `Simulation`, owns a fixed topology of 5 tanks and
//! 5 pipes (4 gravity edges forming a binary branching tree plus a
//! pump edge closing a cycle) and advances it one deterministic tick
//! at a time. The per-tick priority order lives in [`Topology`] as
//! ordered edge-descriptor data; [`RealtimeDriver`] ticks a simulation
//! from a background thread at a fixed cadence while it is Running.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod metrics;
pub mod realtime;
pub mod simulation;
pub mod topology;

pub use config::{ConfigError, SimConfig};
pub use metrics::TickMetrics;
pub use realtime::{DriverConfig, DriverError, RealtimeDriver};
pub use simulation::{RunState, Simulation};
pub use topology::{FlowStep, Topology, TopologyError};
