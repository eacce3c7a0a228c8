//! Renderer-agnostic presentation of sluice snapshots.
//!
//! The crate fixes the canvas placement of the reference network
//! ([`layout::Layout`]) and translates engine snapshots into ordered draw
//! primitives ([`scene::build_scene`]). It depends only on plain geometry
//! and the core value types, so any renderer can consume its output.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod geometry;
pub mod layout;
pub mod scene;

pub use geometry::{Color, Point, Rect};
pub use layout::{Layout, LayoutError, PipePath, PipeStyle};
pub use scene::{build_scene, DrawPrim, Scene};
