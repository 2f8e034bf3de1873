//! Core types for the SolidMatrix lattice walk.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the walk parameters and their validation, the toroidal lattice
//! arithmetic, and the dense 2D fields the engine writes into.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod lattice;
pub mod params;

pub use error::ConfigError;
pub use field::Field2D;
pub use lattice::{periodic_position, Axis, LatticePos};
pub use params::{Momentum, TraceMode, WalkParams};
