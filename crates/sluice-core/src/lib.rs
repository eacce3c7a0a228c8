//! Core types for the Sluice tank/pipe flow simulation.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the two leaf entities of the data model — [`Tank`] (a bounded fluid
//! reservoir) and [`Pipe`] (a directed flow-state edge) — plus the
//! strongly-typed identifiers and the [`SimSnapshot`] record consumed
//! by rendering collaborators.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod pipe;
pub mod snapshot;
pub mod tank;

pub use id::{PipeId, TankId, TickId};
pub use pipe::Pipe;
pub use snapshot::SimSnapshot;
pub use tank::Tank;
