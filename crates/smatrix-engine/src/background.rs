//! Background execution of a [`Session`].
//!
//! The run loop is single-threaded. To keep a renderer responsive, the
//! session is moved onto a dedicated thread and the caller keeps a
//! [`StopHandle`], a lossy channel of per-step [`StepFrame`]s, a lossless
//! channel of lifecycle [`RunEvent`]s, and a [`SnapshotSlot`] holding the
//! latest copy of the occupancy and trace fields. Joining returns the
//! session so its log and histogram can be read afterwards.
//!
//! ```text
//! Caller thread                         smatrix-run thread
//!     |                                       |
//!     |--spawn(session, config)-------------->| session.execute()
//!     |<--frames: bounded, try_send-----------|   per step
//!     |<--fields: latest snapshot-------------|   every snapshot_interval steps
//!     |<--events: RunComplete{run}------------|   per run
//!     |--stop.request()---------------------->|   polled per step
//!     |<--events: Finished{summary}-----------|
//!     |--join()------------------------------>| returns Session
//! ```

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use log::{debug, info};

use crate::run::{RunSummary, StepFrame, StepObserver};
use crate::session::Session;
use crate::snapshot::{FieldSnapshot, SnapshotSlot};
use crate::state::SimulationState;
use crate::stop::StopHandle;
use crate::walk::DisplacementSampler;

// ── Error types ──────────────────────────────────────────────────

/// Errors from running a session off-thread.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionError {
    /// The background thread could not be spawned.
    ThreadSpawnFailed {
        /// OS error description.
        reason: String,
    },
    /// The background thread panicked; the session is lost.
    RunThreadPanicked,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
            Self::RunThreadPanicked => write!(f, "run thread panicked"),
        }
    }
}

impl std::error::Error for SessionError {}

// ── Configuration ────────────────────────────────────────────────

/// Channel sizing and snapshot cadence for a [`SessionThread`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackgroundConfig {
    /// Bound of the step-frame channel. Zero is treated as one.
    pub frame_capacity: usize,
    /// Publish a field snapshot every this many steps, and at the end of
    /// every run. Zero is treated as one.
    pub snapshot_interval: u64,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            frame_capacity: 256,
            snapshot_interval: 100,
        }
    }
}

impl BackgroundConfig {
    /// Set the frame channel bound.
    pub fn with_frame_capacity(mut self, frame_capacity: usize) -> Self {
        self.frame_capacity = frame_capacity;
        self
    }

    /// Set the snapshot interval.
    pub fn with_snapshot_interval(mut self, snapshot_interval: u64) -> Self {
        self.snapshot_interval = snapshot_interval;
        self
    }
}

// ── Events ───────────────────────────────────────────────────────

/// Lifecycle notifications from the run thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunEvent {
    /// A run executed all of its steps.
    RunComplete {
        /// Index of the finished run.
        run: usize,
    },
    /// The loop (and the autocorrelation pass, if enabled) is done.
    Finished {
        /// Run loop outcome.
        summary: RunSummary,
        /// Step frames discarded because the frame channel was full.
        dropped_frames: u64,
    },
}

/// Forwards observer callbacks onto channels and the snapshot slot.
struct ChannelObserver {
    frames: Sender<StepFrame>,
    events: Sender<RunEvent>,
    fields: SnapshotSlot,
    snapshot_interval: u64,
    dropped_frames: u64,
}

impl StepObserver for ChannelObserver {
    fn on_step(&mut self, frame: &StepFrame, state: &SimulationState) {
        // A slow reader only sees stale frames; the loop never waits.
        if let Err(TrySendError::Full(_)) = self.frames.try_send(*frame) {
            self.dropped_frames += 1;
        }
        if frame.time % self.snapshot_interval == 0 {
            self.fields.publish(FieldSnapshot::capture(state));
        }
    }

    fn on_run_complete(&mut self, run: usize, state: &SimulationState) {
        self.fields.publish(FieldSnapshot::capture(state));
        // Best-effort: the caller may have dropped the receiver.
        let _ = self.events.send(RunEvent::RunComplete { run });
    }
}

// ── SessionThread ────────────────────────────────────────────────

/// A session running on its own thread.
///
/// Dropping a `SessionThread` without joining requests a stop and waits
/// for the thread to exit.
pub struct SessionThread<S> {
    handle: Option<JoinHandle<Session<S>>>,
    stop: StopHandle,
    frames: Receiver<StepFrame>,
    events: Receiver<RunEvent>,
    fields: SnapshotSlot,
}

impl<S: DisplacementSampler + Send + 'static> SessionThread<S> {
    /// Move `session` onto a new thread and start `run()`.
    ///
    /// Frames that do not fit the channel are dropped and counted. The
    /// starting state is published to the snapshot slot before the thread
    /// starts. Any earlier stop request is cleared first, so a stop issued
    /// after `spawn` returns is never lost.
    pub fn spawn(mut session: Session<S>, config: BackgroundConfig) -> Result<Self, SessionError> {
        let stop = session.stop_handle();
        stop.clear();

        let (frame_tx, frame_rx) = crossbeam_channel::bounded(config.frame_capacity.max(1));
        let (event_tx, event_rx) = crossbeam_channel::unbounded();
        let fields = SnapshotSlot::new();
        fields.publish(FieldSnapshot::capture(session.state()));
        let thread_fields = fields.clone();

        let handle = thread::Builder::new()
            .name("smatrix-run".into())
            .spawn(move || {
                let mut observer = ChannelObserver {
                    frames: frame_tx,
                    events: event_tx,
                    fields: thread_fields,
                    snapshot_interval: config.snapshot_interval.max(1),
                    dropped_frames: 0,
                };
                let summary = session.execute(&mut observer);
                observer.fields.publish(FieldSnapshot::capture(session.state()));
                info!(
                    "background run finished: {} runs, {} steps, stopped_early={}",
                    summary.runs_completed, summary.steps_executed, summary.stopped_early
                );
                let _ = observer.events.send(RunEvent::Finished {
                    summary,
                    dropped_frames: observer.dropped_frames,
                });
                session
            })
            .map_err(|e| SessionError::ThreadSpawnFailed {
                reason: format!("run thread: {e}"),
            })?;

        Ok(Self {
            handle: Some(handle),
            stop,
            frames: frame_rx,
            events: event_rx,
            fields,
        })
    }
}

impl<S> SessionThread<S> {
    /// Ask the run loop to stop at the next step boundary.
    pub fn request_stop(&self) {
        self.stop.request();
    }

    /// Clonable handle to the stop flag.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Per-step position frames (lossy).
    pub fn frames(&self) -> &Receiver<StepFrame> {
        &self.frames
    }

    /// Run lifecycle events (lossless).
    pub fn events(&self) -> &Receiver<RunEvent> {
        &self.events
    }

    /// Latest published occupancy and trace snapshot.
    ///
    /// Readable while the run is in progress; the thread publishes every
    /// `snapshot_interval` steps, at the end of each run, and once more
    /// when the loop exits.
    pub fn latest_fields(&self) -> Option<Arc<FieldSnapshot>> {
        self.fields.latest()
    }

    /// Clonable handle to the snapshot slot, for other reader threads.
    pub fn fields(&self) -> SnapshotSlot {
        self.fields.clone()
    }

    /// Whether the thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Wait for the thread and take the session back.
    pub fn join(mut self) -> Result<Session<S>, SessionError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| SessionError::RunThreadPanicked),
            None => Err(SessionError::RunThreadPanicked),
        }
    }
}

impl<S> Drop for SessionThread<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!("session thread dropped while running; requesting stop");
            self.stop.request();
            let _ = handle.join();
        }
    }
}
