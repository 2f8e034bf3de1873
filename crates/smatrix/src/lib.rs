//! SolidMatrix: a single particle walking a periodic square lattice with
//! momentum-biased steps, and the windowed autocorrelation of its path.
//!
//! This is the facade crate that re-exports the public API of the
//! SolidMatrix sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use smatrix::prelude::*;
//!
//! let params = WalkParams::default()
//!     .with_size(32)
//!     .with_runs(3, 100)
//!     .with_stat_window(8)
//!     .with_momentum(0.5, 0.0)
//!     .with_seed(42);
//! let mut session = Session::new(params).unwrap();
//! let summary = session.run();
//! assert_eq!(summary.runs_completed, 3);
//!
//! let hist = session.histogram().unwrap();
//! assert_eq!(hist.shape(), [2, 9, 9]);
//! assert_eq!(session.occupancy().nonzero_cells(), vec![session.position()]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `smatrix-core` | Parameters, lattice positions, fields, config errors |
//! | [`engine`] | `smatrix-engine` | Step rule, run loop, log table, autocorrelation, sessions |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Parameters, lattice arithmetic, and field storage (`smatrix-core`).
pub use smatrix_core as types;

/// Walk engine and sessions (`smatrix-engine`).
///
/// [`engine::Session`] for synchronous use, [`engine::SessionThread`]
/// to run a session on its own thread.
pub use smatrix_engine as engine;

/// Common imports for typical SolidMatrix usage.
pub mod prelude {
    // Core types
    pub use smatrix_core::{
        Axis, ConfigError, Field2D, LatticePos, Momentum, TraceMode, WalkParams,
    };

    // Engine
    pub use smatrix_engine::{
        AutocorrHistogram, BackgroundConfig, FieldSnapshot, LogRow, LogTable, RunEvent,
        RunSummary, Session, SessionError, SessionThread, StepFrame, StepObserver, StopHandle,
    };
}
