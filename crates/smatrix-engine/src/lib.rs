//! Walk engine for SolidMatrix.
//!
//! Provides the momentum-biased step rule, the multi-run loop with its
//! trajectory log, the windowed autocorrelation pass, and the
//! [`Session`] object that ties them together. A session can run
//! synchronously or on a background thread via [`SessionThread`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod autocorr;
pub mod background;
pub mod log_table;
pub mod run;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod step;
pub mod stop;
pub mod walk;

pub use autocorr::AutocorrHistogram;
pub use background::{BackgroundConfig, RunEvent, SessionError, SessionThread};
pub use log_table::{LogRow, LogTable};
pub use run::{NoopObserver, RunLoop, RunSummary, StepFrame, StepObserver};
pub use session::Session;
pub use snapshot::{FieldSnapshot, SnapshotSlot};
pub use state::SimulationState;
pub use step::StepEngine;
pub use stop::StopHandle;
pub use walk::{DisplacementSampler, MomentumWalk, WalkProbabilities};
