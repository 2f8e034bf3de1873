//! Latest-value slot for field snapshots.
//!
//! The run thread owns the live fields. At a configurable step interval
//! it copies them into an immutable [`FieldSnapshot`] and publishes it to
//! a [`SnapshotSlot`]; readers on other threads take the most recent one
//! without ever blocking the loop for more than a pointer swap.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use smatrix_core::{Field2D, LatticePos};

use crate::state::SimulationState;

/// Owned copy of the renderable state at one step.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSnapshot {
    /// Run index.
    pub run: usize,
    /// Steps taken in this run.
    pub time: u64,
    /// Particle position.
    pub position: LatticePos,
    /// Occupancy field.
    pub occupancy: Field2D,
    /// Visit-count trace field.
    pub trace: Field2D,
}

impl FieldSnapshot {
    /// Copy the fields and counters out of `state`.
    pub fn capture(state: &SimulationState) -> Self {
        Self {
            run: state.run(),
            time: state.time(),
            position: state.position(),
            occupancy: state.occupancy().clone(),
            trace: state.trace().clone(),
        }
    }
}

/// Single-producer, multi-reader slot holding the newest snapshot.
///
/// Publishing replaces the previous snapshot; readers that still hold an
/// `Arc` to it keep it alive.
#[derive(Clone, Debug, Default)]
pub struct SnapshotSlot {
    latest: Arc<Mutex<Option<Arc<FieldSnapshot>>>>,
    published: Arc<AtomicU64>,
}

impl SnapshotSlot {
    /// Empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored snapshot.
    pub fn publish(&self, snapshot: FieldSnapshot) {
        let arc = Arc::new(snapshot);
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(arc);
        self.published.fetch_add(1, Ordering::Release);
    }

    /// Most recently published snapshot, if any.
    pub fn latest(&self) -> Option<Arc<FieldSnapshot>> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of snapshots published so far.
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Acquire)
    }
}

// Compile-time assertion: SnapshotSlot must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<SnapshotSlot>();
};
