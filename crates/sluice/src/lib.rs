//! Sluice: a deterministic gravity-and-pump tank network simulation.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Sluice sub-crates. For most users, adding `sluice` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use sluice::prelude::*;
//!
//! // Build the reference network: a full source cascading through five
//! // tanks, with a pump that lifts water back out of the left sink.
//! let mut sim = Simulation::new(SimConfig::default()).unwrap();
//! sim.start();
//! sim.set_pump(true);
//! for _ in 0..100 {
//!     sim.tick();
//! }
//!
//! let snap = sim.snapshot();
//! assert_eq!(snap.tick, sluice::types::TickId(100));
//! assert!(snap.total_volume() <= 100.0 + 1e-9);
//!
//! // Translate the snapshot into renderer-agnostic draw primitives.
//! let layout = Layout::reference();
//! let scene = build_scene(&snap, &layout);
//! assert!(!scene.prims.is_empty());
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core value types (`sluice-core`).
///
/// Contains tank and pipe identifiers, the [`types::Tank`] and
/// [`types::Pipe`] value types, and the [`types::SimSnapshot`] handed to
/// rendering collaborators.
pub use sluice_core as types;

/// Simulation engine (`sluice-engine`).
///
/// [`engine::Simulation`] for synchronous stepping,
/// [`engine::RealtimeDriver`] for autonomous fixed-cadence ticking on a
/// background thread.
pub use sluice_engine as engine;

/// Renderer-agnostic presentation (`sluice-scene`).
///
/// Fixes the canvas placement of the reference network with
/// [`scene::Layout`] and turns snapshots into ordered draw primitives
/// with [`scene::build_scene`].
pub use sluice_scene as scene;

/// Common imports for typical Sluice usage.
///
/// ```rust
/// use sluice::prelude::*;
/// ```
pub mod prelude {
    // Core ids and snapshot
    pub use sluice_core::{PipeId, SimSnapshot, TankId, TickId};

    // Engine
    pub use sluice_engine::{
        ConfigError, DriverConfig, DriverError, RealtimeDriver, RunState, SimConfig, Simulation,
        TickMetrics,
    };

    // Scene
    pub use sluice_scene::{build_scene, DrawPrim, Layout, Scene};
}
